//! `start` and `stop`.

use super::{announce, notifier, open_tracker};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, warning};
use crate::utils::time::{format_clock_time, format_hms};
use chrono::Utc;

pub fn start(cfg: &Config) -> AppResult<()> {
    let mut tracker = open_tracker(cfg)?;

    if !tracker.state().is_setup {
        warning(AppError::NotSetup);
        return Ok(());
    }

    let now = Utc::now();
    match tracker.start_session(now)? {
        Some(event) => announce(&event, &notifier(cfg)),
        None => {
            if let Some(since) = tracker.state().active_since() {
                info(format!(
                    "Session already running since {} ({} elapsed)",
                    format_clock_time(since),
                    format_hms(tracker.elapsed_ms(now))
                ));
            }
        }
    }

    Ok(())
}

pub fn stop(cfg: &Config) -> AppResult<()> {
    let mut tracker = open_tracker(cfg)?;

    match tracker.stop_session(Utc::now())? {
        Some(event) => announce(&event, &notifier(cfg)),
        None => info("No active session."),
    }

    Ok(())
}
