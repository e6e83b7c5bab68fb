use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use proptest::prelude::*;
use rofficetracker::core::distance::distance;
use rofficetracker::core::history::HistoryLedger;
use rofficetracker::core::tracker::Tracker;
use rofficetracker::db::store::{MemoryStore, StateStore};
use rofficetracker::models::location::{Coordinates, OfficeLocation};
use rofficetracker::models::mode::TrackerMode;
use rofficetracker::models::session::DailySession;
use rofficetracker::models::state::AppState;

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 6, 0, 0).unwrap()
}

fn coords() -> impl Strategy<Value = Coordinates> {
    (-90.0f64..=90.0, -180.0f64..=180.0).prop_map(|(lat, lng)| Coordinates::new(lat, lng))
}

#[derive(Debug, Clone, Copy)]
enum Op {
    Start,
    Stop,
}

fn ops() -> impl Strategy<Value = Vec<(Op, u32)>> {
    prop::collection::vec(
        (prop_oneof![Just(Op::Start), Just(Op::Stop)], 0u32..3_600_000),
        0..40,
    )
}

fn state_strategy() -> impl Strategy<Value = AppState> {
    let office = prop::option::of(
        (coords(), 0.0f64..5_000.0, "[A-Za-z ]{0,12}")
            .prop_map(|(at, radius, name)| OfficeLocation::new(name, at, radius)),
    );
    let history = prop::collection::vec((0u32..3_000, 0u64..86_400_000), 0..10).prop_map(|v| {
        let base = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        HistoryLedger::from(
            v.into_iter()
                .map(|(d, ms)| DailySession::new(base + chrono::Days::new(d as u64), ms))
                .collect::<Vec<_>>(),
        )
    });
    let start = prop::option::of(0i64..4_000_000_000_000);

    (any::<bool>(), any::<bool>(), office, start, history).prop_map(
        |(is_setup, gps, office_location, start, history)| {
            let start_time = start.and_then(DateTime::from_timestamp_millis);
            AppState {
                is_setup,
                mode: if gps { TrackerMode::Gps } else { TrackerMode::Manual },
                office_location,
                is_active: start_time.is_some(),
                start_time,
                history,
            }
        },
    )
}

proptest! {
    #[test]
    fn prop_distance_identity_and_symmetry(a in coords(), b in coords()) {
        prop_assert_eq!(distance(a, a), 0.0);
        let ab = distance(a, b);
        let ba = distance(b, a);
        prop_assert!(ab >= 0.0);
        prop_assert!((ab - ba).abs() <= 1e-6 * ab.max(1.0));
    }

    #[test]
    fn prop_start_stop_parity(ops in ops()) {
        let mut tracker = Tracker::open(MemoryStore::new());
        tracker.complete_setup(None).unwrap();

        let mut now = t0();
        let mut expected_active = false;
        let mut expected_entries = 0usize;
        let mut started_at = None;

        for (op, gap) in ops {
            now += Duration::milliseconds(gap as i64);
            match op {
                Op::Start => {
                    let effective = tracker.start_session(now).unwrap().is_some();
                    prop_assert_eq!(effective, !expected_active);
                    if effective {
                        expected_active = true;
                        started_at = Some(now);
                    }
                }
                Op::Stop => {
                    let effective = tracker.stop_session(now).unwrap().is_some();
                    prop_assert_eq!(effective, expected_active);
                    if effective {
                        expected_active = false;
                        expected_entries += 1;
                        let last = tracker.state().history.last().unwrap();
                        let start = started_at.take().unwrap();
                        prop_assert_eq!(last.duration_ms, (now - start).num_milliseconds() as u64);
                    }
                }
            }

            let state = tracker.state();
            prop_assert_eq!(state.is_active, expected_active);
            prop_assert_eq!(state.is_active, state.start_time.is_some());
            prop_assert_eq!(state.history.len(), expected_entries);
        }
    }

    #[test]
    fn prop_repeated_calls_are_idempotent(gap in 0i64..86_400_000) {
        let mut tracker = Tracker::open(MemoryStore::new());
        tracker.complete_setup(None).unwrap();

        tracker.start_session(t0()).unwrap();
        let once = tracker.state().clone();
        tracker.start_session(t0() + Duration::milliseconds(gap)).unwrap();
        prop_assert_eq!(tracker.state(), &once);

        tracker.stop_session(t0() + Duration::milliseconds(gap)).unwrap();
        let stopped = tracker.state().clone();
        tracker.stop_session(t0() + Duration::milliseconds(gap * 2)).unwrap();
        prop_assert_eq!(tracker.state(), &stopped);
    }

    #[test]
    fn prop_snapshot_round_trip(state in state_strategy()) {
        let mut store = MemoryStore::new();
        store.save(&state).unwrap();
        prop_assert_eq!(store.load().unwrap(), Some(state));
    }
}
