use super::{announce, notifier, open_tracker};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::geo::replay::ReplaySampler;
use crate::geo::sampler::{WatchOptions, current_position};
use crate::models::location::{Coordinates, OfficeLocation};
use crate::ui::messages::info;

const DEFAULT_OFFICE_NAME: &str = "My Office";

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Setup {
        lat,
        lng,
        radius,
        name,
        here,
        samples,
        skip,
    } = cmd
    {
        let radius = radius.unwrap_or(cfg.default_radius);
        if !radius.is_finite() || radius < 0.0 {
            return Err(AppError::InvalidRadius(radius.to_string()));
        }
        let name = name.clone().unwrap_or_else(|| DEFAULT_OFFICE_NAME.to_string());

        let location = if *skip {
            None
        } else if *here {
            let mut sampler = ReplaySampler::from_arg(samples.as_deref().unwrap_or("-"));
            let fix = current_position(&mut sampler, &WatchOptions::from_config(cfg))?;
            info(format!(
                "Using current position {:.6}, {:.6} (±{:.0}m)",
                fix.latitude, fix.longitude, fix.accuracy
            ));
            Some(OfficeLocation::new(name, fix.coordinates(), radius))
        } else {
            let (Some(lat), Some(lng)) = (lat, lng) else {
                return Err(AppError::InvalidCoordinates(
                    "missing --lat/--lng (or use --here / --skip)".into(),
                ));
            };
            let at = Coordinates::new(*lat, *lng);
            if !at.is_valid() {
                return Err(AppError::InvalidCoordinates(format!("{}, {}", lat, lng)));
            }
            Some(OfficeLocation::new(name, at, radius))
        };

        let mut tracker = open_tracker(cfg)?;
        match tracker.complete_setup(location)? {
            Some(event) => announce(&event, &notifier(cfg)),
            None => info("Setup unchanged."),
        }
        info(format!("Mode: {}", tracker.state().mode.label()));
    }

    Ok(())
}
