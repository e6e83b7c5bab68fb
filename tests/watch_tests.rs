use chrono::Utc;
use rofficetracker::core::events::{StartTrigger, TrackerEvent};
use rofficetracker::core::notifier::SilentNotifier;
use rofficetracker::core::watch::{WatchSettings, run_watch};
use rofficetracker::geo::replay::{ReplaySampler, parse_reading};
use rofficetracker::geo::sampler::{Delivery, GeoSampler, WatchOptions, current_position};
use rofficetracker::models::geo::GeoError;
use std::time::Duration;

mod common;
use common::{RecordingNotifier, count_starts, gps_tracker};

fn fast_settings() -> WatchSettings {
    WatchSettings {
        tick: Duration::from_millis(10),
        max_ticks: None,
        stop_when_drained: true,
    }
}

#[test]
fn test_parse_reading_variants() {
    let now = Utc::now();

    assert!(parse_reading("", now).is_none());
    assert!(parse_reading("   # comment", now).is_none());

    let fix = parse_reading(r#"{"lat": 1.5, "lng": -2.25}"#, now)
        .unwrap()
        .unwrap();
    assert_eq!((fix.latitude, fix.longitude, fix.accuracy), (1.5, -2.25, 0.0));
    assert_eq!(fix.timestamp, now);

    let stamped = parse_reading(
        r#"{"latitude": 1.0, "longitude": 2.0, "accuracy": 4.0, "timestamp": 1698130800000}"#,
        now,
    )
    .unwrap()
    .unwrap();
    assert_eq!(stamped.timestamp.timestamp_millis(), 1_698_130_800_000);

    assert_eq!(
        parse_reading(r#"{"error": "User denied Geolocation"}"#, now).unwrap(),
        Err(GeoError::PermissionDenied)
    );
    assert_eq!(
        parse_reading(r#"{"error": "Timeout expired"}"#, now).unwrap(),
        Err(GeoError::Timeout)
    );

    let garbage = parse_reading("lat=1,lng=2", now).unwrap();
    assert!(matches!(garbage, Err(GeoError::Other(msg)) if msg.starts_with("malformed sample")));
}

#[test]
fn test_watch_applies_readings_in_order() {
    let mut tracker = gps_tracker();
    let mut sampler = ReplaySampler::from_lines([
        r#"{"lat": 0.05, "lng": 0.0}"#,
        r#"{"error": "position unavailable"}"#,
        r#"{"lat": 0.0003, "lng": 0.0}"#,
        r#"{"lat": 0.0001, "lng": 0.0}"#,
        r#"{"lat": 0.05, "lng": 0.0}"#,
    ]);
    let notifier = RecordingNotifier::default();
    let mut seen = Vec::new();

    let summary = run_watch(
        &mut tracker,
        &mut sampler,
        &WatchOptions::default(),
        &fast_settings(),
        &notifier,
        |e| seen.push(e.clone()),
    )
    .unwrap();

    assert_eq!(summary.readings, 5);
    assert_eq!(summary.errors, 1);
    assert_eq!(count_starts(&summary.events), 1);
    assert_eq!(summary.notifications, 1);
    assert_eq!(seen, summary.events);
    assert!(matches!(
        summary.events[0],
        TrackerEvent::SessionStarted {
            trigger: StartTrigger::Geofence,
            ..
        }
    ));
    assert_eq!(notifier.titles(), vec!["Welcome to Office".to_string()]);

    // session survives the final outside reading
    assert!(tracker.state().is_active);
    assert_eq!(tracker.geo_status().last_lat, Some(0.05));
    assert!(tracker.geo_status().last_error.is_none());
}

#[test]
fn test_watch_stops_after_max_ticks() {
    let mut tracker = gps_tracker();
    let mut sampler = ReplaySampler::from_lines(Vec::<String>::new());
    let settings = WatchSettings {
        tick: Duration::from_millis(5),
        max_ticks: Some(3),
        stop_when_drained: false,
    };

    let summary = run_watch(
        &mut tracker,
        &mut sampler,
        &WatchOptions::default(),
        &settings,
        &SilentNotifier,
        |_| {},
    )
    .unwrap();

    assert_eq!(summary.ticks, 3);
    assert_eq!(summary.readings, 0);
    assert!(summary.events.is_empty());
}

#[test]
fn test_watch_with_zero_ticks_returns_immediately() {
    let mut tracker = gps_tracker();
    let mut sampler = ReplaySampler::from_lines(vec![r#"{"lat": 0.0, "lng": 0.0}"#.to_string()]);
    let settings = WatchSettings {
        tick: Duration::from_secs(60),
        max_ticks: Some(0),
        stop_when_drained: false,
    };

    let started = std::time::Instant::now();
    let summary = run_watch(
        &mut tracker,
        &mut sampler,
        &WatchOptions::default(),
        &settings,
        &SilentNotifier,
        |_| {},
    )
    .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(summary.ticks, 0);
    assert_eq!(summary.readings, 0);
    assert!(!tracker.state().is_active);
}

#[test]
fn test_watch_reports_sampler_timeout() {
    let mut tracker = gps_tracker();
    let mut sampler = ReplaySampler::from_lines([r#"{"lat": 0.05, "lng": 0.0}"#])
        .with_interval(Duration::from_millis(400));
    let options = WatchOptions {
        timeout: Duration::from_millis(50),
        ..WatchOptions::default()
    };
    let settings = WatchSettings {
        tick: Duration::from_millis(20),
        max_ticks: Some(10),
        stop_when_drained: false,
    };

    let summary = run_watch(
        &mut tracker,
        &mut sampler,
        &options,
        &settings,
        &SilentNotifier,
        |_| {},
    )
    .unwrap();

    assert_eq!(summary.readings, 1);
    assert!(summary.errors >= 1);
    assert!(tracker.geo_status().has_fix());
    assert_eq!(
        tracker.geo_status().last_error.as_deref(),
        Some("timed out waiting for a position fix")
    );
}

#[test]
fn test_watch_file_source_missing() {
    let mut sampler = ReplaySampler::from_file("/definitely/not/here.jsonl");
    assert!(sampler.watch(&WatchOptions::default()).is_err());
}

#[test]
fn test_cancel_is_idempotent() {
    let mut sampler = ReplaySampler::from_lines([r#"{"lat": 0.0, "lng": 0.0}"#])
        .with_interval(Duration::from_secs(5));
    let mut handle = sampler.watch(&WatchOptions::default()).unwrap();

    handle.cancel();
    handle.cancel();
    assert!(handle.is_cancelled());
    assert!(matches!(
        handle.next_within(Duration::from_millis(10)),
        Delivery::Closed
    ));
}

#[test]
fn test_new_watch_cancels_previous() {
    let mut sampler = ReplaySampler::from_lines([r#"{"lat": 0.0, "lng": 0.0}"#]);
    let first = sampler.watch(&WatchOptions::default()).unwrap();
    let second = sampler.watch(&WatchOptions::default()).unwrap();

    assert!(first.is_cancelled());
    assert!(!second.is_cancelled());
}

#[test]
fn test_current_position_skips_errors() {
    let mut sampler = ReplaySampler::from_lines([
        r#"{"error": "position unavailable"}"#,
        r#"{"lat": 45.0, "lng": 9.0, "accuracy": 7.0}"#,
        r#"{"lat": 46.0, "lng": 10.0}"#,
    ]);
    let fix = current_position(&mut sampler, &WatchOptions::default()).unwrap();
    assert_eq!((fix.latitude, fix.longitude, fix.accuracy), (45.0, 9.0, 7.0));

    let mut failing = ReplaySampler::from_lines([r#"{"error": "permission denied"}"#]);
    let err = current_position(&mut failing, &WatchOptions::default()).unwrap_err();
    assert!(err.to_string().contains("location permission denied"));
}
