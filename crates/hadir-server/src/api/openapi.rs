//! OpenAPI specification generation for the hadir API.
//!
//! The document is served at `/api/openapi.json` and consumed by client
//! generators and by anyone integrating a school information system against
//! this service.

use axum::Json;
use utoipa::OpenApi;

// Import all the handler modules to reference their types
use super::attendance::{CheckRequest, CheckResponse, TodayResponse};
use super::config::{
    ConfigResponse, UpdateClassWindowsRequest, UpdateConfigResponse, UpdateSiteRequest,
    UpdateWindowsRequest,
};
use super::error::ErrorResponse;
use super::health::HealthResponse;
use super::teacher::{ValidateRequest, ValidateResponse};

/// Serve the OpenAPI specification as JSON.
///
/// This endpoint is available at `/api/openapi.json` and returns the complete
/// OpenAPI 3.0 specification for the hadir API.
pub async fn get_openapi_spec() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Returns the OpenAPI specification as a string (for writing to file).
/// Used by the gen-openapi binary.
#[allow(dead_code)]
#[must_use]
pub fn get_openapi_json() -> String {
    ApiDoc::openapi()
        .to_pretty_json()
        .expect("Failed to serialize OpenAPI spec")
}

/// Main OpenAPI document structure for hadir.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "hadir API",
        version = "0.1.0",
        description = r#"
# hadir API

hadir validates student attendance by geofence proximity and time windows,
with teacher review of anything ambiguous.

## Overview

1. **Check-in / Check-out**: A student submits one GPS sample per action.
   The sample is classified against the school geofence (VALID, LOW_ACCURACY,
   or INVALID) and discarded; coordinates are never stored.
2. **Daily verdict**: The pair of classifications reduces to one status per
   day: FULL_PRESENT, PARTIAL_PRESENT, or NEEDS_VERIFICATION.
3. **Teacher validation**: Teachers can overwrite the verdict for any record,
   any number of times.

## Time handling

All windows and the daily record key are evaluated in WITA (UTC+8, a fixed
offset), regardless of server locale.

## Privacy

Location samples exist only for the duration of a request. Only the
validation status and the rounded distance from school are persisted.
"#,
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "/", description = "Local hadir server")
    ),
    tags(
        (
            name = "system",
            description = "Health checks and system status"
        ),
        (
            name = "attendance",
            description = "Geofence-validated check-in and check-out"
        ),
        (
            name = "teacher",
            description = "Manual validation of escalated attendance records"
        ),
        (
            name = "config",
            description = "School geofence, attendance windows, and class overrides"
        )
    ),
    paths(
        // Health endpoints
        super::health::health_check,
        // Attendance endpoints
        super::attendance::check_in,
        super::attendance::check_out,
        super::attendance::today,
        // Teacher endpoints
        super::teacher::validate,
        // Config endpoints
        super::config::get_config,
        super::config::update_site,
        super::config::update_windows,
        super::config::update_class_windows,
    ),
    components(
        schemas(
            // Error types
            ErrorResponse,
            // Health types
            HealthResponse,
            // Attendance types
            CheckRequest,
            CheckResponse,
            TodayResponse,
            // Teacher types
            ValidateRequest,
            ValidateResponse,
            // Config types
            ConfigResponse,
            UpdateSiteRequest,
            UpdateWindowsRequest,
            UpdateClassWindowsRequest,
            UpdateConfigResponse,
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_generation() {
        let spec = ApiDoc::openapi();
        assert_eq!(spec.info.title, "hadir API");
        assert!(!spec.paths.paths.is_empty());
    }

    #[test]
    fn test_openapi_json_serialization() {
        let json = get_openapi_json();
        assert!(json.contains("\"openapi\":"));
        assert!(json.contains("\"hadir API\""));
    }
}
