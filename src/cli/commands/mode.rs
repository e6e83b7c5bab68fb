use super::{announce, notifier, open_tracker};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::mode::TrackerMode;
use crate::ui::messages::{info, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Mode { mode } = cmd {
        let mode = TrackerMode::from_code(mode).ok_or_else(|| AppError::InvalidMode(mode.clone()))?;
        let mut tracker = open_tracker(cfg)?;

        match tracker.set_mode(mode)? {
            Some(event) => announce(&event, &notifier(cfg)),
            None => info(format!("Mode already {}", mode.label())),
        }

        let state = tracker.state();
        if mode.is_gps() && !state.geofence_armed() {
            warning("No office location set: GPS mode stays inert until `setup` assigns one.");
        }
        if !mode.is_gps() && state.is_active {
            info("The running session continues; stop it with `stop`.");
        }
    }

    Ok(())
}
