//! Elapsed-time projection and the one-shot workday-complete detector.
//!
//! Elapsed time is never stored: it is derived from the running session's
//! start instant every time it is polled.

use super::events::TrackerEvent;
use crate::models::state::AppState;
use crate::utils::time::millis_between;
use chrono::{DateTime, TimeDelta, Utc};

/// Default workday target: 9 hours.
pub const WORKDAY_MS: u64 = 9 * 60 * 60 * 1000;

/// Default polling cadence of the clock.
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Milliseconds since the running session started, 0 while idle.
pub fn elapsed_ms(state: &AppState, now: DateTime<Utc>) -> u64 {
    state
        .active_since()
        .map(|start| millis_between(start, now))
        .unwrap_or(0)
}

/// Display projection of the current session against the target.
#[derive(Debug, Clone, PartialEq)]
pub struct Progress {
    pub elapsed_ms: u64,
    pub remaining_ms: u64,
    /// 0.0 ..= 100.0
    pub percentage: f64,
    /// `start + target`, only while a session runs and the instant is
    /// representable.
    pub expected_end: Option<DateTime<Utc>>,
    pub target_ms: u64,
}

impl Progress {
    pub fn project(state: &AppState, now: DateTime<Utc>, target_ms: u64) -> Self {
        let elapsed = elapsed_ms(state, now);
        let percentage = if target_ms == 0 {
            100.0
        } else {
            (elapsed as f64 / target_ms as f64 * 100.0).min(100.0)
        };

        Self {
            elapsed_ms: elapsed,
            remaining_ms: target_ms.saturating_sub(elapsed),
            percentage,
            expected_end: state.active_since().and_then(|start| {
                let target = TimeDelta::try_milliseconds(i64::try_from(target_ms).ok()?)?;
                start.checked_add_signed(target)
            }),
            target_ms,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed_ms >= self.target_ms
    }
}

/// Raises `WorkdayComplete` once per session.
///
/// Between two polls of the same session the clock fires when elapsed time
/// crosses the target. The first poll of a session only fires inside the
/// window `target <= elapsed < target + tick`, so a session that passed the
/// target before anyone was watching stays quiet. The clock latches the
/// start instant of the session it fired for, and forgets it as soon as a
/// poll sees the tracker idle.
#[derive(Debug, Clone)]
pub struct CompletionClock {
    target_ms: u64,
    tick_ms: u64,
    /// (session start, elapsed at the previous poll)
    last_poll: Option<(DateTime<Utc>, u64)>,
    fired_for: Option<DateTime<Utc>>,
}

impl Default for CompletionClock {
    fn default() -> Self {
        Self::new(WORKDAY_MS, TICK_INTERVAL_MS)
    }
}

impl CompletionClock {
    pub fn new(target_ms: u64, tick_ms: u64) -> Self {
        Self {
            target_ms,
            tick_ms: tick_ms.max(1),
            last_poll: None,
            fired_for: None,
        }
    }

    pub fn target_ms(&self) -> u64 {
        self.target_ms
    }

    pub fn tick_ms(&self) -> u64 {
        self.tick_ms
    }

    pub fn poll(&mut self, state: &AppState, now: DateTime<Utc>) -> Option<TrackerEvent> {
        let Some(start) = state.active_since() else {
            self.last_poll = None;
            self.fired_for = None;
            return None;
        };

        if self.fired_for.is_some_and(|fired| fired != start) {
            // a different session is running now
            self.fired_for = None;
        }

        let elapsed = millis_between(start, now);
        let previous = self
            .last_poll
            .filter(|(polled_start, _)| *polled_start == start)
            .map(|(_, prev)| prev);
        self.last_poll = Some((start, elapsed));

        let reached = match previous {
            Some(prev) => prev < self.target_ms && elapsed >= self.target_ms,
            None => {
                elapsed >= self.target_ms
                    && elapsed < self.target_ms.saturating_add(self.tick_ms)
            }
        };

        if reached && self.fired_for.is_none() {
            self.fired_for = Some(start);
            return Some(TrackerEvent::WorkdayComplete {
                elapsed_ms: elapsed,
                target_ms: self.target_ms,
                at: now,
            });
        }

        None
    }
}
