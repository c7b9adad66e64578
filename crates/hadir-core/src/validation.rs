//! Geofence + accuracy classification for a single location sample.
//!
//! Called only when a student explicitly presses check-in or check-out.
//! The sample's coordinates are consumed here and never stored; the only
//! things that outlive the call are the status, the rounded distance, and a
//! message suitable for showing to the student.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::geo::{distance_meters, GeoPoint};

/// GPS readings with accuracy above this are untrustworthy outright.
const MAX_TRUSTED_ACCURACY_METERS: f64 = 100.0;

/// Width of the borderline band beyond the valid radius.
const BORDERLINE_TOLERANCE_METERS: f64 = 50.0;

/// Accuracy required for a borderline reading to earn human review instead
/// of rejection.
const BORDERLINE_ACCURACY_METERS: f64 = 50.0;

/// A single GPS sample supplied by the student's device.
///
/// Ephemeral: consumed by [`classify`] and dropped.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct LocationSample {
    /// Latitude in decimal degrees.
    #[schema(example = -6.2)]
    pub latitude: f64,

    /// Longitude in decimal degrees.
    #[schema(example = 106.816)]
    pub longitude: f64,

    /// Reported GPS accuracy radius in meters. Non-negative.
    #[schema(example = 20.0, minimum = 0.0)]
    pub accuracy_meters: f64,
}

impl LocationSample {
    /// The sample's position, without the accuracy.
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// The school's geofence: a reference point plus a valid radius.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct SiteConfig {
    /// The school's reference position.
    pub reference_point: GeoPoint,

    /// Radius around the reference point considered on-site, in meters.
    #[schema(example = 100.0, exclusive_minimum = 0.0)]
    pub valid_radius_meters: f64,
}

/// Outcome of classifying one check-in or check-out sample.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationStatus {
    /// Inside the geofence with a trustworthy reading.
    Valid,
    /// Ambiguous reading; needs teacher review.
    LowAccuracy,
    /// Clearly outside the geofence.
    Invalid,
}

/// Result of validating one location sample against the site geofence.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "status": "VALID",
    "distance_meters": 42,
    "message": "Location verified. Distance from school: 42m"
}))]
pub struct ValidationResult {
    /// Three-way classification outcome.
    pub status: ValidationStatus,

    /// Distance from the school reference point, rounded to whole meters.
    #[schema(example = 42)]
    pub distance_meters: i64,

    /// Human-readable explanation for the student.
    #[schema(example = "Location verified. Distance from school: 42m")]
    pub message: String,
}

/// Classify a location sample against the site geofence.
///
/// Decision order matters; the first matching rule wins:
///
/// 1. Accuracy worse than 100 m cannot be trusted even if the coordinates
///    happen to land inside the radius.
/// 2. Inside the valid radius is `VALID`.
/// 3. Up to 50 m outside the radius with accuracy no worse than 50 m is a
///    genuine borderline case (standing near the gate); a teacher confirms
///    it rather than the system rejecting it.
/// 4. Everything else is `INVALID`.
#[must_use]
pub fn classify(sample: &LocationSample, site: &SiteConfig) -> ValidationResult {
    let distance = distance_meters(sample.point(), site.reference_point);
    let rounded = distance.round() as i64;

    let (status, message) = if sample.accuracy_meters > MAX_TRUSTED_ACCURACY_METERS {
        (
            ValidationStatus::LowAccuracy,
            format!(
                "GPS accuracy is poor ({}m). Try again or contact your teacher.",
                sample.accuracy_meters.round() as i64
            ),
        )
    } else if distance <= site.valid_radius_meters {
        (
            ValidationStatus::Valid,
            format!("Location verified. Distance from school: {rounded}m"),
        )
    } else if distance <= site.valid_radius_meters + BORDERLINE_TOLERANCE_METERS
        && sample.accuracy_meters <= BORDERLINE_ACCURACY_METERS
    {
        (
            ValidationStatus::LowAccuracy,
            format!("You are {rounded}m from school. Teacher verification required."),
        )
    } else {
        (
            ValidationStatus::Invalid,
            format!(
                "Location is too far from school ({rounded}m). Valid radius: {}m",
                site.valid_radius_meters.round() as i64
            ),
        )
    };

    ValidationResult {
        status,
        distance_meters: rounded,
        message,
    }
}
