use serde::{Deserialize, Serialize};

/// How sessions get started.
///
/// `Gps` lets a geofence entry start the session; `Manual` only reacts to
/// explicit start/stop commands. Stopping is always manual.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackerMode {
    #[serde(rename = "GPS")]
    Gps,
    #[default]
    #[serde(rename = "MANUAL")]
    Manual,
}

impl TrackerMode {
    pub fn code(&self) -> &'static str {
        match self {
            TrackerMode::Gps => "GPS",
            TrackerMode::Manual => "MANUAL",
        }
    }

    /// Label shown on the status screen.
    pub fn label(&self) -> &'static str {
        match self {
            TrackerMode::Gps => "GPS AUTO",
            TrackerMode::Manual => "MANUAL MODE",
        }
    }

    /// Helper: convert input code from CLI (lowercase or uppercase)
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_uppercase().as_str() {
            "GPS" | "AUTO" | "G" => Some(TrackerMode::Gps),
            "MANUAL" | "M" => Some(TrackerMode::Manual),
            _ => None,
        }
    }

    pub fn is_gps(&self) -> bool {
        matches!(self, TrackerMode::Gps)
    }
}
