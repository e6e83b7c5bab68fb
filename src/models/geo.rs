use super::location::Coordinates;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A normalized position fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoSample {
    pub latitude: f64,
    pub longitude: f64,
    /// Reported accuracy radius in meters.
    pub accuracy: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl GeoSample {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            timestamp,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Transport-level failures reported by the position sampler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoError {
    #[error("location permission denied")]
    PermissionDenied,

    #[error("position unavailable")]
    PositionUnavailable,

    #[error("timed out waiting for a position fix")]
    Timeout,

    #[error("{0}")]
    Other(String),
}

impl GeoError {
    /// Map a free-form error message (e.g. from a replay file) to a variant.
    pub fn from_message(msg: &str) -> Self {
        let lower = msg.trim().to_lowercase();
        if lower.contains("permission") || lower.contains("denied") {
            GeoError::PermissionDenied
        } else if lower.contains("timeout") || lower.contains("timed out") {
            GeoError::Timeout
        } else if lower.contains("unavailable") || lower.contains("no signal") {
            GeoError::PositionUnavailable
        } else {
            GeoError::Other(msg.trim().to_string())
        }
    }
}

/// What the sampler delivers: a fix or an error.
pub type GeoReading = Result<GeoSample, GeoError>;

/// Ephemeral view of the latest position, never persisted.
///
/// A failed reading only sets `last_error`; the last good position and
/// distance stay visible until a new fix replaces them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoStatus {
    pub last_lat: Option<f64>,
    pub last_lng: Option<f64>,
    pub accuracy_meters: Option<f64>,
    pub distance_to_office_meters: Option<f64>,
    pub last_error: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl GeoStatus {
    pub fn record_fix(&mut self, sample: &GeoSample, distance_to_office: Option<f64>) {
        self.last_lat = Some(sample.latitude);
        self.last_lng = Some(sample.longitude);
        self.accuracy_meters = Some(sample.accuracy);
        self.distance_to_office_meters = distance_to_office;
        self.last_error = None;
        self.updated_at = Some(sample.timestamp);
    }

    pub fn record_error(&mut self, err: &GeoError) {
        self.last_error = Some(err.to_string());
    }

    pub fn has_fix(&self) -> bool {
        self.last_lat.is_some() && self.last_lng.is_some()
    }

    pub fn position(&self) -> Option<Coordinates> {
        match (self.last_lat, self.last_lng) {
            (Some(lat), Some(lng)) => Some(Coordinates::new(lat, lng)),
            _ => None,
        }
    }
}
