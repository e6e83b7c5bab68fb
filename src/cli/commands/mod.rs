//! One handler per subcommand, plus the plumbing they share.

pub mod config;
pub mod history;
pub mod init;
pub mod log;
pub mod mode;
pub mod radius;
pub mod reset;
pub mod sample;
pub mod session;
pub mod setup;
pub mod status;
pub mod watch;

use crate::config::Config;
use crate::core::events::TrackerEvent;
use crate::core::notifier::{TerminalNotifier, dispatch};
use crate::core::tracker::Tracker;
use crate::db::store::SqliteStore;
use crate::errors::AppResult;
use crate::models::geo::GeoStatus;
use crate::models::state::AppState;
use crate::ui::messages::{info, success, warning};
use crate::utils::colors::{GREEN, RESET, YELLOW};

/// Open the configured database and load the tracker from it.
pub(crate) fn open_tracker(cfg: &Config) -> AppResult<Tracker<SqliteStore>> {
    let store = SqliteStore::open(&cfg.database)?;
    let target = cfg.workday_target_ms()?;
    Ok(Tracker::open(store).with_clock(target, cfg.tick_interval_ms))
}

pub(crate) fn notifier(cfg: &Config) -> TerminalNotifier {
    TerminalNotifier::new(cfg.notifications)
}

/// Print a committed event and forward its notification, if any.
pub(crate) fn announce(event: &TrackerEvent, notifier: &TerminalNotifier) {
    success(event);
    dispatch(notifier, event);
}

/// Live position block shown after readings are applied.
pub(crate) fn print_geo_status(geo: &GeoStatus, state: &AppState) {
    match geo.position() {
        Some(pos) => {
            let accuracy = geo
                .accuracy_meters
                .map(|a| format!(" ±{:.0}m", a))
                .unwrap_or_default();
            info(format!(
                "Position  : {:.6}, {:.6}{}",
                pos.latitude, pos.longitude, accuracy
            ));
        }
        None => info("Position  : no fix yet"),
    }

    match (geo.distance_to_office_meters, &state.office_location) {
        (Some(dist), Some(office)) => {
            let (color, label) = if dist <= office.radius_meters {
                (GREEN, "inside")
            } else {
                (YELLOW, "outside")
            };
            info(format!(
                "Geofence  : {:.0}m from {} ({}{}{}, radius {}m)",
                dist, office.name, color, label, RESET, office.radius_meters
            ));
        }
        _ if state.office_location.is_none() => info("Geofence  : no office location"),
        _ => {}
    }

    if let Some(err) = &geo.last_error {
        warning(format!("GPS error : {}", err));
    }
}
