use serde::{Deserialize, Serialize};

/// Geofence radius assigned when the office is captured from the current position.
pub const DEFAULT_RADIUS_METERS: f64 = 100.0;

/// Second value of the 100m/500m radius toggle.
pub const ALTERNATE_RADIUS_METERS: f64 = 500.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// True when both components are finite and inside the WGS84 ranges.
    /// The distance engine does not require this; CLI input does.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// The office the geofence is centred on.
///
/// Serialized with the field name `radius` to keep the persisted snapshot
/// layout stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(rename = "radius")]
    pub radius_meters: f64,
}

impl OfficeLocation {
    pub fn new(name: impl Into<String>, at: Coordinates, radius_meters: f64) -> Self {
        Self {
            name: name.into(),
            latitude: at.latitude,
            longitude: at.longitude,
            radius_meters,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    pub fn with_radius(&self, radius_meters: f64) -> Self {
        Self {
            radius_meters,
            ..self.clone()
        }
    }

    /// Radius the toggle switches to: `alternate` when currently on `primary`,
    /// `primary` for any other value.
    pub fn toggled_radius(&self, primary: f64, alternate: f64) -> f64 {
        if self.radius_meters == primary {
            alternate
        } else {
            primary
        }
    }
}
