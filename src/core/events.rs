use crate::models::location::OfficeLocation;
use crate::models::mode::TrackerMode;
use crate::models::session::DailySession;
use crate::utils::time::{describe_target, format_clock_time, format_hms};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// What started a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StartTrigger {
    Manual,
    Geofence,
}

/// Every effective state change of the tracker produces one event.
/// Redundant calls (start while active, stop while idle, ...) produce none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TrackerEvent {
    SessionStarted {
        trigger: StartTrigger,
        at: DateTime<Utc>,
        /// Distance from the office when a geofence entry caused the start.
        distance_meters: Option<f64>,
    },
    SessionStopped {
        session: DailySession,
        at: DateTime<Utc>,
    },
    WorkdayComplete {
        elapsed_ms: u64,
        target_ms: u64,
        at: DateTime<Utc>,
    },
    ModeChanged {
        mode: TrackerMode,
    },
    OfficeLocationSet {
        location: Option<OfficeLocation>,
    },
    StateReset {
        discarded_sessions: usize,
    },
}

impl TrackerEvent {
    /// Notification to show for this event, if it deserves one.
    pub fn notification(&self) -> Option<(&'static str, String)> {
        match self {
            TrackerEvent::SessionStarted {
                trigger: StartTrigger::Geofence,
                ..
            } => Some((
                "Welcome to Office",
                "Tracking started automatically.".to_string(),
            )),
            TrackerEvent::WorkdayComplete { target_ms, .. } => Some((
                "Workday Complete!",
                format!("You have reached {}.", describe_target(*target_ms)),
            )),
            _ => None,
        }
    }

    /// (operation, target, message) triple for the audit log.
    pub fn audit_entry(&self) -> (&'static str, String, String) {
        match self {
            TrackerEvent::SessionStarted {
                trigger,
                at,
                distance_meters,
            } => {
                let target = match trigger {
                    StartTrigger::Manual => "manual",
                    StartTrigger::Geofence => "geofence",
                };
                let message = match distance_meters {
                    Some(d) => format!("Session started at {} ({:.0}m from office)", at.to_rfc3339(), d),
                    None => format!("Session started at {}", at.to_rfc3339()),
                };
                ("start", target.to_string(), message)
            }
            TrackerEvent::SessionStopped { session, .. } => (
                "stop",
                session.date_str(),
                format!("Session recorded: {} ms", session.duration_ms),
            ),
            TrackerEvent::WorkdayComplete { elapsed_ms, at, .. } => (
                "complete",
                String::new(),
                format!("Workday target reached after {} ms at {}", elapsed_ms, at.to_rfc3339()),
            ),
            TrackerEvent::ModeChanged { mode } => {
                ("mode", mode.code().to_string(), format!("Mode set to {}", mode.code()))
            }
            TrackerEvent::OfficeLocationSet { location: Some(loc) } => (
                "setup",
                loc.name.clone(),
                format!(
                    "Office at {:.6},{:.6} radius {}m",
                    loc.latitude, loc.longitude, loc.radius_meters
                ),
            ),
            TrackerEvent::OfficeLocationSet { location: None } => (
                "setup",
                String::new(),
                "Setup completed without office location".to_string(),
            ),
            TrackerEvent::StateReset { discarded_sessions } => (
                "reset",
                String::new(),
                format!("All data reset ({} sessions discarded)", discarded_sessions),
            ),
        }
    }
}

impl fmt::Display for TrackerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerEvent::SessionStarted {
                trigger: StartTrigger::Manual,
                at,
                ..
            } => write!(f, "Session started at {}", format_clock_time(*at)),
            TrackerEvent::SessionStarted {
                trigger: StartTrigger::Geofence,
                at,
                distance_meters,
            } => {
                write!(f, "Session started at {} (entered office geofence", format_clock_time(*at))?;
                if let Some(d) = distance_meters {
                    write!(f, ", {:.0}m from office", d)?;
                }
                write!(f, ")")
            }
            TrackerEvent::SessionStopped { session, .. } => write!(
                f,
                "Session stopped: {} recorded for {}",
                format_hms(session.duration_ms),
                session.date_str()
            ),
            TrackerEvent::WorkdayComplete { target_ms, .. } => {
                write!(f, "Workday target reached ({})", describe_target(*target_ms))
            }
            TrackerEvent::ModeChanged { mode } => write!(f, "Mode set to {}", mode.label()),
            TrackerEvent::OfficeLocationSet { location: Some(loc) } => write!(
                f,
                "Office set: {} ({:.6}, {:.6}), radius {}m",
                loc.name, loc.latitude, loc.longitude, loc.radius_meters
            ),
            TrackerEvent::OfficeLocationSet { location: None } => {
                write!(f, "Setup completed without office location (manual mode)")
            }
            TrackerEvent::StateReset { discarded_sessions } => write!(
                f,
                "All data reset ({} sessions discarded)",
                discarded_sessions
            ),
        }
    }
}
