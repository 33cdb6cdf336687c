//! Great-circle distance.
//!
//! Only the places filter measures ground distance this way; route geometry
//! deliberately stays planar.

use crate::coordinate::Coordinate;

/// Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance between two coordinates in meters.
pub fn haversine_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let point = Coordinate::new(47.66, -2.97);
        assert!(haversine_meters(&point, &point) < 0.001, "Same point should have ~0 distance");
    }

    #[test]
    fn test_haversine_known_distance() {
        // Vannes (47.66, -2.76) to Brest (48.39, -4.49), roughly 150 km apart.
        let dist = haversine_meters(&Coordinate::new(47.66, -2.76), &Coordinate::new(48.39, -4.49));
        assert!(dist > 140_000.0 && dist < 160_000.0, "Vannes to Brest should be ~150km, got {}", dist);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = Coordinate::new(36.1, -115.1);
        let b = Coordinate::new(36.2, -115.2);
        assert!((haversine_meters(&a, &b) - haversine_meters(&b, &a)).abs() < 1e-6);
    }
}
