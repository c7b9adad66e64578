//! Great-circle distance between geographic coordinates.
//!
//! The school geofence is a circle around a fixed reference point. Distance
//! from that point is computed server-side with the haversine formula;
//! student coordinates are used for this calculation only and are never
//! persisted.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean Earth radius in meters.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GeoPoint {
    /// Latitude in decimal degrees, -90 to 90.
    #[schema(example = -6.2)]
    pub latitude: f64,

    /// Longitude in decimal degrees, -180 to 180.
    #[schema(example = 106.816)]
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both coordinates are inside their valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// Great-circle distance between two points in meters.
///
/// Uses the haversine formula, which is accurate to within a few meters over
/// the distances this system cares about (a school campus, well under 10 km).
/// Symmetric in its arguments; zero when the points coincide.
#[must_use]
pub fn distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_zero_for_identical_points() {
        let p = GeoPoint::new(-6.2, 106.816);
        assert_eq!(distance_meters(p, p), 0.0);
    }

    #[test]
    fn test_distance_is_symmetric() {
        let a = GeoPoint::new(-6.2, 106.816);
        let b = GeoPoint::new(-6.21, 106.82);
        assert_eq!(distance_meters(a, b), distance_meters(b, a));
    }

    #[test]
    fn test_known_distance_one_degree_latitude() {
        // One degree of latitude is roughly 111.2 km.
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(1.0, 0.0);
        let d = distance_meters(a, b);
        assert!((d - 111_195.0).abs() < 100.0, "got {d}");
    }

    #[test]
    fn test_short_campus_scale_distance() {
        // ~100 m north of the reference point (0.0009 degrees latitude).
        let a = GeoPoint::new(-6.2, 106.816);
        let b = GeoPoint::new(-6.2009, 106.816);
        let d = distance_meters(a, b);
        assert!((d - 100.0).abs() < 5.0, "got {d}");
    }

    #[test]
    fn test_point_range_validation() {
        assert!(GeoPoint::new(-6.2, 106.816).is_valid());
        assert!(GeoPoint::new(90.0, 180.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -180.5).is_valid());
    }
}
