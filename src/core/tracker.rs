//! Session state machine.
//!
//! `Tracker` owns the `AppState` and is the only way to change it. Every
//! public mutation builds the next snapshot, saves it through the store and
//! only then adopts it: if the save fails the in-memory state is untouched,
//! so an operation is applied completely or not at all.
//!
//! ```text
//! Idle --start_session / geofence entry--> Active --stop_session--> Idle (+1 history entry)
//! ```
//!
//! Redundant calls (start while active, stop while idle, setting the current
//! mode) are no-ops that return `Ok(None)`.

use super::clock::{CompletionClock, Progress, elapsed_ms};
use super::distance::distance;
use super::events::{StartTrigger, TrackerEvent};
use crate::db::store::StateStore;
use crate::errors::{AppError, AppResult};
use crate::models::geo::{GeoReading, GeoSample, GeoStatus};
use crate::models::location::OfficeLocation;
use crate::models::mode::TrackerMode;
use crate::models::session::DailySession;
use crate::models::state::AppState;
use crate::utils::time::{millis_between, truncate_to_millis};
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

pub struct Tracker<S: StateStore> {
    state: AppState,
    store: S,
    geo: GeoStatus,
    completion: CompletionClock,
}

impl<S: StateStore> Tracker<S> {
    /// Load the stored snapshot, falling back to the initial state when it
    /// is missing or unreadable.
    pub fn open(mut store: S) -> Self {
        let state = match store.load() {
            Ok(Some(state)) => state.normalized(),
            Ok(None) => {
                debug!("no stored snapshot, starting from initial state");
                AppState::initial()
            }
            Err(e) => {
                warn!(error = %e, "stored snapshot unreadable, starting from initial state");
                AppState::initial()
            }
        };

        Self {
            state,
            store,
            geo: GeoStatus::default(),
            completion: CompletionClock::default(),
        }
    }

    /// Override the workday target and clock cadence.
    pub fn with_clock(mut self, target_ms: u64, tick_ms: u64) -> Self {
        self.completion = CompletionClock::new(target_ms, tick_ms);
        self
    }

    pub fn with_workday_target(self, target_ms: u64) -> Self {
        let tick = self.completion.tick_ms();
        self.with_clock(target_ms, tick)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn geo_status(&self) -> &GeoStatus {
        &self.geo
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable access to the backing store. The snapshot itself can only be
    /// changed through the tracker operations.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn workday_target_ms(&self) -> u64 {
        self.completion.target_ms()
    }

    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        elapsed_ms(&self.state, now)
    }

    pub fn progress(&self, now: DateTime<Utc>) -> Progress {
        Progress::project(&self.state, now, self.completion.target_ms())
    }

    // ── Session control ──────────────────────────────────────────────

    /// Start a session by user intent. Refused (no-op) before setup.
    pub fn start_session(&mut self, now: DateTime<Utc>) -> AppResult<Option<TrackerEvent>> {
        if !self.state.is_setup {
            warn!("start ignored: tracker is not set up");
            return Ok(None);
        }
        self.begin_session(now, StartTrigger::Manual, None)
    }

    fn begin_session(
        &mut self,
        now: DateTime<Utc>,
        trigger: StartTrigger,
        distance_meters: Option<f64>,
    ) -> AppResult<Option<TrackerEvent>> {
        if self.state.is_active {
            return Ok(None);
        }

        let start = truncate_to_millis(now);
        let mut next = self.state.clone();
        next.is_active = true;
        next.start_time = Some(start);

        let event = TrackerEvent::SessionStarted {
            trigger,
            at: start,
            distance_meters,
        };
        self.commit(next, &event)?;
        info!(?trigger, at = %start, "session started");
        Ok(Some(event))
    }

    /// Stop the running session and append it to the history, dated by the
    /// UTC calendar day of the stop instant.
    pub fn stop_session(&mut self, now: DateTime<Utc>) -> AppResult<Option<TrackerEvent>> {
        let Some(start) = self.state.active_since() else {
            return Ok(None);
        };

        let session = DailySession::new(
            now.date_naive(),
            millis_between(start, now),
        );

        let mut next = self.state.clone();
        next.is_active = false;
        next.start_time = None;
        next.history.append(session.clone());

        let event = TrackerEvent::SessionStopped { session, at: now };
        self.commit(next, &event)?;
        info!(duration_ms = millis_between(start, now), "session stopped");
        Ok(Some(event))
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Switch mode. Never starts or stops a session by itself.
    pub fn set_mode(&mut self, mode: TrackerMode) -> AppResult<Option<TrackerEvent>> {
        if self.state.mode == mode {
            return Ok(None);
        }

        let mut next = self.state.clone();
        next.mode = mode;

        let event = TrackerEvent::ModeChanged { mode };
        self.commit(next, &event)?;
        Ok(Some(event))
    }

    /// Assign the office and mark setup complete. A running session is left
    /// alone.
    pub fn set_office_location(
        &mut self,
        location: OfficeLocation,
    ) -> AppResult<Option<TrackerEvent>> {
        if self.state.is_setup && self.state.office_location.as_ref() == Some(&location) {
            return Ok(None);
        }

        let mut next = self.state.clone();
        next.office_location = Some(location.clone());
        next.is_setup = true;

        let event = TrackerEvent::OfficeLocationSet {
            location: Some(location),
        };
        self.commit(next, &event)?;
        Ok(Some(event))
    }

    /// Finish the setup flow in one commit: with a location the tracker goes
    /// to GPS mode, without one ("skip") to manual mode.
    pub fn complete_setup(
        &mut self,
        location: Option<OfficeLocation>,
    ) -> AppResult<Option<TrackerEvent>> {
        let mut next = self.state.clone();
        next.is_setup = true;
        next.mode = if location.is_some() {
            TrackerMode::Gps
        } else {
            TrackerMode::Manual
        };
        next.office_location = location.clone();

        if next == self.state {
            return Ok(None);
        }

        let event = TrackerEvent::OfficeLocationSet { location };
        self.commit(next, &event)?;
        Ok(Some(event))
    }

    /// Switch the geofence radius between `primary` and `alternate`. No-op
    /// without an office location.
    pub fn toggle_radius(
        &mut self,
        primary: f64,
        alternate: f64,
    ) -> AppResult<Option<TrackerEvent>> {
        let Some(office) = &self.state.office_location else {
            debug!("radius toggle ignored: no office location");
            return Ok(None);
        };
        let radius = office.toggled_radius(primary, alternate);
        self.set_radius(radius)
    }

    pub fn set_radius(&mut self, radius_meters: f64) -> AppResult<Option<TrackerEvent>> {
        if !radius_meters.is_finite() || radius_meters < 0.0 {
            return Err(AppError::InvalidRadius(radius_meters.to_string()));
        }
        let Some(office) = &self.state.office_location else {
            return Err(AppError::NoOfficeLocation);
        };
        let updated = office.with_radius(radius_meters);
        self.set_office_location(updated)
    }

    // ── Geofence automation ──────────────────────────────────────────

    /// Entry point for everything the geo sampler delivers. Errors are kept
    /// for display and never touch session state.
    pub fn apply_geo_reading(
        &mut self,
        reading: GeoReading,
        now: DateTime<Utc>,
    ) -> AppResult<Option<TrackerEvent>> {
        match reading {
            Ok(sample) => self.apply_geo_sample(&sample, now),
            Err(err) => {
                warn!(error = %err, "geolocation error, keeping last known position");
                self.geo.record_error(&err);
                Ok(None)
            }
        }
    }

    /// Apply one position fix.
    ///
    /// In GPS mode, entering the geofence while idle starts a session (and
    /// the returned event carries the welcome notification). Leaving the
    /// geofence never stops a session: jitter and short excursions must not
    /// end the day. The live position is recorded in every mode.
    pub fn apply_geo_sample(
        &mut self,
        sample: &GeoSample,
        now: DateTime<Utc>,
    ) -> AppResult<Option<TrackerEvent>> {
        let Some(office) = self.state.office_location.clone() else {
            self.geo.record_fix(sample, None);
            return Ok(None);
        };

        let dist = distance(sample.coordinates(), office.coordinates());
        let is_inside = dist <= office.radius_meters;
        self.geo.record_fix(sample, Some(dist));

        debug!(
            distance_m = dist,
            radius_m = office.radius_meters,
            inside = is_inside,
            "position sample"
        );

        if !self.state.is_setup || !self.state.mode.is_gps() {
            return Ok(None);
        }

        if is_inside && !self.state.is_active {
            return self.begin_session(now, StartTrigger::Geofence, Some(dist));
        }

        Ok(None)
    }

    // ── Clock ────────────────────────────────────────────────────────

    /// One clock poll; returns `WorkdayComplete` at most once per session.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<TrackerEvent> {
        let event = self.completion.poll(&self.state, now);
        if let Some(ev) = &event {
            self.audit(ev);
        }
        event
    }

    // ── Reset ────────────────────────────────────────────────────────

    /// Drop everything: history, office, setup flag, running session.
    /// There is no undo.
    pub fn reset(&mut self) -> AppResult<Option<TrackerEvent>> {
        let discarded = self.state.history.len();
        let next = AppState::initial();

        let event = TrackerEvent::StateReset {
            discarded_sessions: discarded,
        };
        self.commit(next, &event)?;
        self.geo = GeoStatus::default();
        self.completion = CompletionClock::new(self.completion.target_ms(), self.completion.tick_ms());
        info!(discarded, "tracker reset");
        Ok(Some(event))
    }

    // ── Internals ────────────────────────────────────────────────────

    fn commit(&mut self, next: AppState, event: &TrackerEvent) -> AppResult<()> {
        self.store.save(&next)?;
        self.state = next;
        self.audit(event);
        Ok(())
    }

    fn audit(&mut self, event: &TrackerEvent) {
        let (operation, target, message) = event.audit_entry();
        if let Err(e) = self.store.record(operation, &target, &message) {
            warn!(error = %e, operation, "failed to write audit log");
        }
    }
}

impl<S: StateStore> std::fmt::Debug for Tracker<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("state", &self.state)
            .field("geo", &self.geo)
            .finish()
    }
}
