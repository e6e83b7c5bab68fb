#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use rofficetracker::core::events::TrackerEvent;
use rofficetracker::core::notifier::Notifier;
use rofficetracker::core::tracker::Tracker;
use rofficetracker::db::store::MemoryStore;
use rofficetracker::models::location::{Coordinates, OfficeLocation};
use std::cell::RefCell;
use std::fs;
use tempfile::TempDir;

pub fn rti() -> Command {
    cargo_bin_cmd!("rofficetracker")
}

/// Isolated home directory and database for one CLI test.
pub struct TestEnv {
    pub dir: TempDir,
    pub db_path: String,
}

impl TestEnv {
    /// Create the environment and run `init --test` on its database.
    pub fn init() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_path = dir
            .path()
            .join("rofficetracker.sqlite")
            .to_string_lossy()
            .to_string();

        let env = Self { dir, db_path };
        env.cmd(&["--test", "init"]).assert().success();
        env
    }

    /// `rofficetracker --db <db> <args…>` with HOME pointing at the temp dir.
    pub fn cmd(&self, args: &[&str]) -> Command {
        let mut cmd = rti();
        cmd.env("HOME", self.dir.path())
            .env_remove("RUST_LOG")
            .args(["--db", &self.db_path])
            .args(args);
        cmd
    }

    /// Run and return stdout, asserting success.
    pub fn stdout(&self, args: &[&str]) -> String {
        let output = self.cmd(args).output().expect("run rofficetracker");
        assert!(
            output.status.success(),
            "command {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    /// Write a JSON-lines samples file and return its path.
    pub fn samples_file(&self, name: &str, lines: &[&str]) -> String {
        let path = self.dir.path().join(name);
        fs::write(&path, lines.join("\n")).expect("write samples");
        path.to_string_lossy().to_string()
    }
}

/// Office at the origin with the default 100 m geofence.
pub fn origin_office() -> OfficeLocation {
    OfficeLocation::new("HQ", Coordinates::new(0.0, 0.0), 100.0)
}

/// Tracker on an in-memory store, set up with `origin_office` in GPS mode.
pub fn gps_tracker() -> Tracker<MemoryStore> {
    let mut tracker = Tracker::open(MemoryStore::new());
    tracker
        .complete_setup(Some(origin_office()))
        .expect("setup");
    tracker
}

/// Notifier that remembers every notification it was handed.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<(String, String)>>,
}

impl Notifier for RecordingNotifier {
    fn emit(&self, title: &str, body: &str) {
        self.sent
            .borrow_mut()
            .push((title.to_string(), body.to_string()));
    }
}

impl RecordingNotifier {
    pub fn titles(&self) -> Vec<String> {
        self.sent.borrow().iter().map(|(t, _)| t.clone()).collect()
    }
}

pub fn count_starts(events: &[TrackerEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, TrackerEvent::SessionStarted { .. }))
        .count()
}
