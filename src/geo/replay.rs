//! Replay sampler: feeds recorded or piped readings into a watch.
//!
//! Input is JSON lines, one reading per line:
//!
//! ```text
//! {"latitude": 45.4642, "longitude": 9.19, "accuracy": 12.0}
//! {"latitude": 45.4642, "longitude": 9.19, "accuracy": 8.5, "timestamp": 1730712000000}
//! {"error": "permission denied"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Readings without a
//! timestamp are stamped when they are read.

use super::sampler::{GeoSampler, WatchFeed, WatchHandle, WatchOptions};
use crate::errors::{AppError, AppResult};
use crate::models::geo::{GeoError, GeoReading, GeoSample};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

const CANCEL_POLL: Duration = Duration::from_millis(25);

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplayLine {
    Fix {
        #[serde(alias = "lat")]
        latitude: f64,
        #[serde(alias = "lng", alias = "lon")]
        longitude: f64,
        #[serde(default)]
        accuracy: f64,
        #[serde(default)]
        timestamp: Option<i64>,
    },
    Failure {
        error: String,
    },
}

/// Parse one input line. `None` for lines that carry no reading.
pub fn parse_reading(line: &str, received_at: DateTime<Utc>) -> Option<GeoReading> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let reading = match serde_json::from_str::<ReplayLine>(trimmed) {
        Ok(ReplayLine::Fix {
            latitude,
            longitude,
            accuracy,
            timestamp,
        }) => {
            let at = timestamp
                .and_then(DateTime::from_timestamp_millis)
                .unwrap_or(received_at);
            Ok(GeoSample::new(latitude, longitude, accuracy, at))
        }
        Ok(ReplayLine::Failure { error }) => Err(GeoError::from_message(&error)),
        Err(e) => Err(GeoError::Other(format!("malformed sample: {}", e))),
    };

    Some(reading)
}

#[derive(Debug, Clone)]
pub enum ReplaySource {
    File(PathBuf),
    Stdin,
    Lines(Vec<String>),
}

pub struct ReplaySampler {
    source: ReplaySource,
    interval: Duration,
    active: Option<Arc<AtomicBool>>,
}

impl ReplaySampler {
    pub fn new(source: ReplaySource) -> Self {
        Self {
            source,
            interval: Duration::ZERO,
            active: None,
        }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(ReplaySource::File(path.into()))
    }

    pub fn stdin() -> Self {
        Self::new(ReplaySource::Stdin)
    }

    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self::new(ReplaySource::Lines(
            lines.into_iter().map(Into::into).collect(),
        ))
    }

    /// Pause between two delivered readings.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// `-` selects stdin, anything else a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            Self::stdin()
        } else {
            Self::from_file(arg)
        }
    }
}

impl GeoSampler for ReplaySampler {
    fn watch(&mut self, options: &WatchOptions) -> AppResult<WatchHandle> {
        if let Some(previous) = self.active.take() {
            previous.store(true, Ordering::SeqCst);
        }

        let (feed, handle) = WatchHandle::channel();
        self.active = Some(handle.cancel_flag());

        let interval = self.interval;
        let max_age = options.max_age;

        tracing::debug!(
            source = ?self.source,
            high_accuracy = options.high_accuracy,
            "opening replay watch"
        );

        let handle = match &self.source {
            ReplaySource::File(path) => {
                let file = File::open(path).map_err(|e| {
                    AppError::Sampler(format!("cannot open {}: {}", path.display(), e))
                })?;
                let worker = thread::spawn(move || {
                    replay(&feed, BufReader::new(file).lines(), interval, max_age)
                });
                handle.with_worker(worker)
            }
            ReplaySource::Lines(lines) => {
                let lines = lines.clone();
                let worker = thread::spawn(move || {
                    replay(&feed, lines.into_iter().map(Ok), interval, max_age)
                });
                handle.with_worker(worker)
            }
            ReplaySource::Stdin => {
                // a blocked stdin read cannot be interrupted: the worker is
                // detached and exits on the next line or at EOF
                thread::spawn(move || {
                    replay(&feed, io::stdin().lock().lines(), interval, max_age)
                });
                handle
            }
        };

        Ok(handle)
    }
}

fn replay<I>(feed: &WatchFeed, lines: I, interval: Duration, max_age: Duration)
where
    I: Iterator<Item = io::Result<String>>,
{
    for line in lines {
        if feed.is_cancelled() {
            return;
        }

        let line = match line {
            Ok(l) => l,
            Err(e) => {
                feed.deliver(Err(GeoError::Other(format!("read error: {}", e))));
                return;
            }
        };

        let now = Utc::now();
        let Some(reading) = parse_reading(&line, now) else {
            continue;
        };

        if let Ok(sample) = &reading {
            let age = (now - sample.timestamp).num_milliseconds();
            if age > max_age.as_millis() as i64 {
                tracing::debug!(age_ms = age, "delivering fix older than max age");
            }
        }

        if !feed.deliver(reading) {
            return;
        }

        pause(feed, interval);
    }
}

fn pause(feed: &WatchFeed, interval: Duration) {
    let mut left = interval;
    while !left.is_zero() && !feed.is_cancelled() {
        let step = left.min(CANCEL_POLL);
        thread::sleep(step);
        left = left.saturating_sub(step);
    }
}
