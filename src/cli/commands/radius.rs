use super::{announce, notifier, open_tracker};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::{info, warning};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Radius { toggle, set } = cmd {
        let mut tracker = open_tracker(cfg)?;

        if tracker.state().office_location.is_none() {
            warning("No office location configured: run `setup --lat <LAT> --lng <LNG>` first.");
            return Ok(());
        }

        let event = if *toggle {
            tracker.toggle_radius(cfg.default_radius, cfg.alternate_radius)?
        } else if let Some(radius) = set {
            tracker.set_radius(*radius)?
        } else {
            None
        };

        match event {
            Some(event) => announce(&event, &notifier(cfg)),
            None => {
                if let Some(office) = &tracker.state().office_location {
                    info(format!("Geofence radius: {}m", office.radius_meters));
                }
            }
        }
    }

    Ok(())
}
