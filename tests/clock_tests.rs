use chrono::{DateTime, Duration, TimeZone, Utc};
use rofficetracker::core::clock::{CompletionClock, Progress, TICK_INTERVAL_MS, WORKDAY_MS};
use rofficetracker::core::events::TrackerEvent;
use rofficetracker::core::tracker::Tracker;
use rofficetracker::db::store::MemoryStore;
use rofficetracker::models::state::AppState;

mod common;
use common::gps_tracker;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 10, 24, 7, 0, 0).unwrap()
}

fn active_since(start: DateTime<Utc>) -> AppState {
    AppState {
        is_setup: true,
        is_active: true,
        start_time: Some(start),
        ..AppState::initial()
    }
}

fn count_completions<I>(clock: &mut CompletionClock, state: &AppState, polls: I) -> usize
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    polls
        .into_iter()
        .filter_map(|now| clock.poll(state, now))
        .filter(|e| matches!(e, TrackerEvent::WorkdayComplete { .. }))
        .count()
}

#[test]
fn test_fires_once_at_one_second_resolution() {
    let mut clock = CompletionClock::default();
    let state = active_since(t0());

    let start = WORKDAY_MS as i64 / 1000 - 30;
    let polls = (start..start + 600).map(|s| t0() + Duration::seconds(s));
    assert_eq!(count_completions(&mut clock, &state, polls), 1);
}

#[test]
fn test_fires_with_elapsed_at_target() {
    let mut clock = CompletionClock::default();
    let state = active_since(t0());

    assert!(clock.poll(&state, t0() + Duration::milliseconds(WORKDAY_MS as i64 - 1)).is_none());
    let event = clock
        .poll(&state, t0() + Duration::milliseconds(WORKDAY_MS as i64))
        .expect("should fire at the target");
    assert_eq!(
        event,
        TrackerEvent::WorkdayComplete {
            elapsed_ms: WORKDAY_MS,
            target_ms: WORKDAY_MS,
            at: t0() + Duration::milliseconds(WORKDAY_MS as i64),
        }
    );
}

#[test]
fn test_dense_polling_does_not_refire() {
    let mut clock = CompletionClock::default();
    let state = active_since(t0());

    let base = WORKDAY_MS as i64 - 500;
    let polls = (0..40).map(|i| t0() + Duration::milliseconds(base + i * 100));
    assert_eq!(count_completions(&mut clock, &state, polls), 1);
}

#[test]
fn test_late_tick_still_fires() {
    let mut clock = CompletionClock::default();
    let state = active_since(t0());

    // the tick that crosses the target arrives well past the window
    assert!(clock.poll(&state, t0() + Duration::milliseconds(WORKDAY_MS as i64 - 1)).is_none());
    let late = WORKDAY_MS as i64 + TICK_INTERVAL_MS as i64 + 250;
    assert!(clock.poll(&state, t0() + Duration::milliseconds(late)).is_some());
}

#[test]
fn test_session_already_past_target_stays_quiet() {
    let mut clock = CompletionClock::default();
    let state = active_since(t0());

    let polls = (0..60).map(|s| t0() + Duration::hours(10) + Duration::seconds(s));
    assert_eq!(count_completions(&mut clock, &state, polls), 0);
}

#[test]
fn test_idle_never_fires() {
    let mut clock = CompletionClock::default();
    let state = AppState::initial();
    let polls = (0..10).map(|s| t0() + Duration::hours(9) + Duration::seconds(s));
    assert_eq!(count_completions(&mut clock, &state, polls), 0);
}

#[test]
fn test_refires_in_next_session() {
    let mut tracker = gps_tracker();
    let mut fired = 0;

    for day in 0..2 {
        let start = t0() + Duration::days(day);
        tracker.start_session(start).unwrap();

        for s in (WORKDAY_MS as i64 / 1000 - 3)..(WORKDAY_MS as i64 / 1000 + 120) {
            if tracker.tick(start + Duration::seconds(s)).is_some() {
                fired += 1;
            }
        }

        tracker
            .stop_session(start + Duration::hours(9) + Duration::minutes(5))
            .unwrap();
        assert!(tracker.tick(start + Duration::hours(10)).is_none());
    }

    assert_eq!(fired, 2);
    assert_eq!(tracker.state().history.len(), 2);
}

#[test]
fn test_custom_target() {
    let mut tracker = Tracker::open(MemoryStore::new()).with_workday_target(30_600_000);
    tracker.complete_setup(None).unwrap();
    tracker.start_session(t0()).unwrap();

    assert!(tracker.tick(t0() + Duration::minutes(509)).is_none());
    let event = tracker.tick(t0() + Duration::minutes(510)).unwrap();
    let (title, body) = event.notification().unwrap();
    assert_eq!(title, "Workday Complete!");
    assert_eq!(body, "You have reached 8h 30m.");
}

#[test]
fn test_default_target_notification() {
    let event = TrackerEvent::WorkdayComplete {
        elapsed_ms: WORKDAY_MS,
        target_ms: WORKDAY_MS,
        at: t0(),
    };
    assert_eq!(
        event.notification(),
        Some(("Workday Complete!", "You have reached 9 hours.".to_string()))
    );
}

#[test]
fn test_progress_with_huge_target_has_no_expected_end() {
    let state = active_since(t0());
    let now = t0() + Duration::hours(2);

    let progress = Progress::project(&state, now, 100_000_000_000 * 3_600_000);
    assert_eq!(progress.elapsed_ms, 7_200_000);
    assert!(progress.expected_end.is_none());
    assert!(progress.percentage < 1.0);

    let progress = Progress::project(&state, now, u64::MAX);
    assert!(progress.expected_end.is_none());
    assert_eq!(progress.remaining_ms, u64::MAX - 7_200_000);
}

#[test]
fn test_poll_with_max_target_stays_quiet() {
    let mut clock = CompletionClock::new(u64::MAX, TICK_INTERVAL_MS);
    let state = active_since(t0());
    assert!(clock.poll(&state, t0() + Duration::hours(10)).is_none());
}
