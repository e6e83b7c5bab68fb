//! Great-circle distance on a spherical earth (haversine).

use crate::models::location::Coordinates;

/// Mean earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Distance in meters between two coordinates.
///
/// Pure and symmetric; identical points yield 0. Out-of-range latitudes or
/// longitudes are not rejected, the formula is applied as-is.
pub fn distance(a: Coordinates, b: Coordinates) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    // rounding can push h marginally past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_degree_of_latitude() {
        let d = distance(Coordinates::new(0.0, 0.0), Coordinates::new(1.0, 0.0));
        assert!((d - 111_194.9).abs() < 1.0, "got {d}");
    }

    #[test]
    fn test_antipodes_are_half_circumference() {
        let d = distance(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 180.0));
        let half = std::f64::consts::PI * EARTH_RADIUS_METERS;
        assert!((d - half).abs() < 1e-3);
    }

    #[test]
    fn test_symmetric_and_zero_on_identity() {
        let a = Coordinates::new(45.4642, 9.19);
        let b = Coordinates::new(45.4654, 9.1859);
        assert_eq!(distance(a, a), 0.0);
        assert!((distance(a, b) - distance(b, a)).abs() < 1e-9);
    }
}
