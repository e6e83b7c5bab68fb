//! The persisted application snapshot.
//!
//! The JSON layout is fixed (camelCase keys, `startTime` as epoch
//! milliseconds, `history` as a plain array) so snapshots written by earlier
//! releases keep loading.

use super::location::OfficeLocation;
use super::mode::TrackerMode;
use crate::core::history::HistoryLedger;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub is_setup: bool,
    pub mode: TrackerMode,
    pub office_location: Option<OfficeLocation>,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub start_time: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub history: HistoryLedger,
}

impl AppState {
    /// Fresh state used on first run, after a reset, and when the stored
    /// snapshot is missing or unreadable.
    pub fn initial() -> Self {
        Self::default()
    }

    /// Restore `is_active ⇔ start_time.is_some()` on a snapshot coming from
    /// storage. A flag without an instant cannot be resumed and is dropped;
    /// an instant without the flag is stale and is cleared.
    pub fn normalized(mut self) -> Self {
        if self.is_active != self.start_time.is_some() {
            self.is_active = false;
            self.start_time = None;
        }
        self
    }

    /// Start instant of the running session, if any.
    pub fn active_since(&self) -> Option<DateTime<Utc>> {
        if self.is_active { self.start_time } else { None }
    }

    /// GPS mode without an office location is inert.
    pub fn geofence_armed(&self) -> bool {
        self.is_setup && self.mode.is_gps() && self.office_location.is_some()
    }
}
