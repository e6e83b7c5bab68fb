use super::open_tracker;
use crate::config::Config;
use crate::core::clock::Progress;
use crate::errors::AppResult;
use crate::models::state::AppState;
use crate::ui::messages::{header, warning};
use crate::utils::colors::{GREEN, GREY, RESET};
use crate::utils::date::today;
use crate::utils::time::{describe_target, format_clock_time, format_hm, format_hms};
use chrono::Utc;

pub fn handle(cfg: &Config) -> AppResult<()> {
    let tracker = open_tracker(cfg)?;
    let state = tracker.state();
    let progress = tracker.progress(Utc::now());

    header("rOfficeTracker status");

    if !state.is_setup {
        warning("Not set up yet: run `setup --lat <LAT> --lng <LNG>`, `setup --here` or `setup --skip`.");
    }

    println!("Mode         : {}", state.mode.label());
    print_office(state);
    print_session(state, &progress);

    let today = today();
    let today_ms: u64 = state
        .history
        .iter()
        .filter(|s| s.date == today)
        .map(|s| s.duration_ms)
        .sum();
    println!(
        "Today        : {} recorded, target {}",
        format_hms(today_ms),
        describe_target(progress.target_ms)
    );
    println!("Sessions     : {}", state.history.len());

    Ok(())
}

fn print_office(state: &AppState) {
    match &state.office_location {
        Some(office) => {
            println!(
                "Office       : {} ({:.6}, {:.6})",
                office.name, office.latitude, office.longitude
            );
            let geofence = if state.geofence_armed() { "armed" } else { "inert" };
            println!(
                "Geofence     : radius {}m, {}",
                office.radius_meters, geofence
            );
        }
        None => println!("Office       : {}not configured{}", GREY, RESET),
    }
}

fn print_session(state: &AppState, progress: &Progress) {
    let Some(start) = state.active_since() else {
        println!("Session      : {}idle{}", GREY, RESET);
        return;
    };

    println!(
        "Session      : {}ACTIVE{} since {}",
        GREEN,
        RESET,
        format_clock_time(start)
    );
    println!("Elapsed      : {}", format_hms(progress.elapsed_ms));
    println!("Remaining    : {}", format_hm(progress.remaining_ms));
    println!("Progress     : {:.1}%", progress.percentage);
    if let Some(end) = progress.expected_end {
        println!("Expected end : {}", format_clock_time(end));
    }
    if progress.is_complete() {
        println!("{}Workday complete!{}", GREEN, RESET);
    }
}
