use super::{announce, notifier, open_tracker, print_geo_status};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::geo::{GeoError, GeoReading, GeoSample};
use chrono::Utc;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Sample {
        lat,
        lng,
        accuracy,
        error,
    } = cmd
    {
        let now = Utc::now();
        let reading: GeoReading = match (error, lat, lng) {
            (Some(msg), _, _) => Err(GeoError::from_message(msg)),
            (None, Some(lat), Some(lng)) => Ok(GeoSample::new(*lat, *lng, *accuracy, now)),
            _ => {
                return Err(AppError::InvalidCoordinates(
                    "missing --lat/--lng (or use --error)".into(),
                ));
            }
        };

        let mut tracker = open_tracker(cfg)?;
        if let Some(event) = tracker.apply_geo_reading(reading, now)? {
            announce(&event, &notifier(cfg));
        }

        print_geo_status(tracker.geo_status(), tracker.state());
    }

    Ok(())
}
