//! The long-running tracking loop.
//!
//! Position readings and clock ticks are the two event sources. They are
//! handled on the calling thread, one at a time: a reading is applied (and
//! persisted) before the next reading or tick is looked at. The sampler
//! worker only ever pushes into the watch channel.

use super::events::TrackerEvent;
use super::notifier::{Notifier, dispatch};
use super::tracker::Tracker;
use crate::db::store::StateStore;
use crate::errors::AppResult;
use crate::geo::sampler::{Delivery, GeoSampler, WatchOptions};
use crate::models::geo::GeoError;
use chrono::Utc;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct WatchSettings {
    /// Clock cadence.
    pub tick: Duration,
    /// Stop after this many ticks. `Some(0)` returns before anything is read.
    pub max_ticks: Option<u64>,
    /// Stop as soon as the sampler has nothing more to deliver.
    pub stop_when_drained: bool,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(super::clock::TICK_INTERVAL_MS),
            max_ticks: None,
            stop_when_drained: true,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct WatchSummary {
    pub readings: usize,
    pub errors: usize,
    pub ticks: u64,
    pub notifications: usize,
    pub events: Vec<TrackerEvent>,
}

pub fn run_watch<S, G, F>(
    tracker: &mut Tracker<S>,
    sampler: &mut G,
    options: &WatchOptions,
    settings: &WatchSettings,
    notifier: &dyn Notifier,
    mut on_event: F,
) -> AppResult<WatchSummary>
where
    S: StateStore,
    G: GeoSampler,
    F: FnMut(&TrackerEvent),
{
    let mut handle = sampler.watch(options)?;
    let mut summary = WatchSummary::default();

    let tick = settings.tick.max(Duration::from_millis(1));
    let mut next_tick = Instant::now() + tick;
    let mut last_reading = Instant::now();
    let mut timeout_reported = false;
    let mut drained = false;

    let mut emit = |event: TrackerEvent, summary: &mut WatchSummary| {
        if dispatch(notifier, &event) {
            summary.notifications += 1;
        }
        on_event(&event);
        summary.events.push(event);
    };

    loop {
        if settings.max_ticks.is_some_and(|max| summary.ticks >= max) {
            break;
        }

        let now = Instant::now();

        if now >= next_tick {
            summary.ticks += 1;
            next_tick += tick;

            if let Some(event) = tracker.tick(Utc::now()) {
                emit(event, &mut summary);
            }

            if !drained && !timeout_reported && last_reading.elapsed() >= options.timeout {
                tracker.apply_geo_reading(Err(GeoError::Timeout), Utc::now())?;
                summary.errors += 1;
                timeout_reported = true;
            }

            continue;
        }

        if drained {
            if settings.stop_when_drained {
                break;
            }
            thread::sleep(next_tick - now);
            continue;
        }

        match handle.next_within(next_tick - now) {
            Delivery::Reading(reading) => {
                summary.readings += 1;
                if reading.is_err() {
                    summary.errors += 1;
                }
                last_reading = Instant::now();
                timeout_reported = false;

                if let Some(event) = tracker.apply_geo_reading(reading, Utc::now())? {
                    emit(event, &mut summary);
                }
            }
            Delivery::Idle => {}
            Delivery::Closed => {
                tracing::debug!(readings = summary.readings, "sampler drained");
                drained = true;
            }
        }
    }

    handle.cancel();
    Ok(summary)
}
