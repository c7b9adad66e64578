//! Configuration API endpoints.
//!
//! Provides endpoints for reading and updating system configuration
//! including the school geofence, default attendance windows, and
//! per-class window overrides.

use axum::extract::{Path, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use hadir_core::{ClassConfig, GeoPoint, SiteConfig, TimeWindow};

use crate::api::error::{ApiError, ApiResult};
use crate::state::SharedState;

/// Creates the config router with all endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", get(get_config))
        .route("/site", put(update_site))
        .route("/windows", put(update_windows))
        .route("/classes/{class_id}/windows", put(update_class_windows))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Current configuration response.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConfigResponse {
    /// School geofence, absent until configured.
    pub site: Option<SiteConfig>,

    /// Site-wide default check-in window.
    pub check_in_window: TimeWindow,

    /// Site-wide default check-out window.
    pub check_out_window: TimeWindow,

    /// Known classes with their overrides.
    pub classes: Vec<ClassConfig>,
}

/// Request to update the school geofence.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({
    "latitude": -6.2,
    "longitude": 106.816,
    "valid_radius_meters": 100.0
}))]
pub struct UpdateSiteRequest {
    /// School latitude in decimal degrees.
    #[schema(example = -6.2)]
    pub latitude: f64,

    /// School longitude in decimal degrees.
    #[schema(example = 106.816)]
    pub longitude: f64,

    /// Valid radius around the school in meters.
    #[schema(example = 100.0, exclusive_minimum = 0.0)]
    pub valid_radius_meters: f64,
}

/// Request to update the site-wide default windows.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({
    "check_in": { "start": "06:30", "end": "08:00" },
    "check_out": { "start": "14:00", "end": "16:00" }
}))]
pub struct UpdateWindowsRequest {
    /// New default check-in window.
    pub check_in: TimeWindow,

    /// New default check-out window.
    pub check_out: TimeWindow,
}

/// Request to update one class's window overrides.
///
/// A `null` field clears the override so the class falls back to the site
/// default.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateClassWindowsRequest {
    /// Check-in window override.
    pub check_in: Option<TimeWindow>,

    /// Check-out window override.
    pub check_out: Option<TimeWindow>,
}

/// Response after a configuration update.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateConfigResponse {
    /// Whether the update was saved.
    pub success: bool,

    /// The configuration after the update.
    pub config: ConfigResponse,
}

// ============================================================================
// Handlers
// ============================================================================

fn config_response(state: &crate::state::AppState) -> ConfigResponse {
    ConfigResponse {
        site: state.config.site,
        check_in_window: state.config.windows.check_in,
        check_out_window: state.config.windows.check_out,
        classes: state.config.classes.clone(),
    }
}

fn save_config(state: &crate::state::AppState) -> Result<(), ApiError> {
    state.save_config().map_err(|e| ApiError::InternalError {
        error_code: "CONFIG_SAVE_FAILED".to_string(),
        message: "Failed to save configuration".to_string(),
        details: Some(e.to_string()),
    })
}

/// Get current configuration.
#[utoipa::path(
    get,
    path = "/config",
    tag = "config",
    operation_id = "getConfig",
    summary = "Get current configuration",
    description = "Returns the current configuration including the school \
        geofence, default windows, and per-class overrides.",
    responses(
        (status = 200, description = "Configuration retrieved", body = ConfigResponse)
    )
)]
pub async fn get_config(State(state): State<SharedState>) -> ApiResult<Json<ConfigResponse>> {
    let state_guard = state.read().await;
    Ok(Json(config_response(&state_guard)))
}

/// Update the school geofence.
#[utoipa::path(
    put,
    path = "/config/site",
    tag = "config",
    operation_id = "updateSite",
    summary = "Update the school geofence",
    description = "Sets the school reference point and valid radius. All \
        location validation is blocked until this has been configured once.",
    request_body = UpdateSiteRequest,
    responses(
        (status = 200, description = "Site updated", body = UpdateConfigResponse),
        (status = 400, description = "Coordinates or radius out of range")
    )
)]
pub async fn update_site(
    State(state): State<SharedState>,
    Json(request): Json<UpdateSiteRequest>,
) -> ApiResult<Json<UpdateConfigResponse>> {
    let reference_point = GeoPoint::new(request.latitude, request.longitude);
    if !reference_point.is_valid() {
        return Err(ApiError::BadRequest {
            error_code: "INVALID_COORDINATES".to_string(),
            message: "Latitude must be in [-90, 90] and longitude in [-180, 180]".to_string(),
        });
    }
    if request.valid_radius_meters <= 0.0 {
        return Err(ApiError::BadRequest {
            error_code: "INVALID_RADIUS".to_string(),
            message: "Valid radius must be positive".to_string(),
        });
    }

    let mut state_guard = state.write().await;
    state_guard.config.site = Some(SiteConfig {
        reference_point,
        valid_radius_meters: request.valid_radius_meters,
    });
    save_config(&state_guard)?;

    Ok(Json(UpdateConfigResponse {
        success: true,
        config: config_response(&state_guard),
    }))
}

/// Update the site-wide default windows.
#[utoipa::path(
    put,
    path = "/config/windows",
    tag = "config",
    operation_id = "updateWindows",
    summary = "Update default attendance windows",
    description = "Sets the site-wide default check-in and check-out \
        windows. Windows must not be inverted; they never wrap past midnight.",
    request_body = UpdateWindowsRequest,
    responses(
        (status = 200, description = "Windows updated", body = UpdateConfigResponse),
        (status = 400, description = "Inverted window")
    )
)]
pub async fn update_windows(
    State(state): State<SharedState>,
    Json(request): Json<UpdateWindowsRequest>,
) -> ApiResult<Json<UpdateConfigResponse>> {
    for (name, window) in [("check_in", request.check_in), ("check_out", request.check_out)] {
        if !window.is_valid() {
            return Err(invalid_window(name));
        }
    }

    let mut state_guard = state.write().await;
    state_guard.config.windows.check_in = request.check_in;
    state_guard.config.windows.check_out = request.check_out;
    save_config(&state_guard)?;

    Ok(Json(UpdateConfigResponse {
        success: true,
        config: config_response(&state_guard),
    }))
}

/// Update one class's window overrides.
#[utoipa::path(
    put,
    path = "/config/classes/{class_id}/windows",
    tag = "config",
    operation_id = "updateClassWindows",
    summary = "Update a class's attendance windows",
    description = "Sets or clears the check-in/check-out overrides for one \
        class. Cleared overrides fall back to the site defaults.",
    params(
        ("class_id" = u32, Path, description = "The class to update")
    ),
    request_body = UpdateClassWindowsRequest,
    responses(
        (status = 200, description = "Class windows updated", body = UpdateConfigResponse),
        (status = 400, description = "Inverted window"),
        (status = 404, description = "Unknown class")
    )
)]
pub async fn update_class_windows(
    State(state): State<SharedState>,
    Path(class_id): Path<u32>,
    Json(request): Json<UpdateClassWindowsRequest>,
) -> ApiResult<Json<UpdateConfigResponse>> {
    for window in [request.check_in, request.check_out].into_iter().flatten() {
        if !window.is_valid() {
            return Err(invalid_window("class window"));
        }
    }

    let mut state_guard = state.write().await;
    let class = state_guard
        .config
        .classes
        .iter_mut()
        .find(|c| c.id == class_id)
        .ok_or_else(|| ApiError::NotFound {
            error_code: "CLASS_NOT_FOUND".to_string(),
            message: format!("Class not found: {class_id}"),
        })?;

    class.check_in = request.check_in;
    class.check_out = request.check_out;
    save_config(&state_guard)?;

    Ok(Json(UpdateConfigResponse {
        success: true,
        config: config_response(&state_guard),
    }))
}

fn invalid_window(field: &str) -> ApiError {
    ApiError::BadRequest {
        error_code: "INVALID_WINDOW".to_string(),
        message: format!("{field}: window end must not precede its start"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_site_request_deserialization() {
        let json = r#"{"latitude": -6.2, "longitude": 106.816, "valid_radius_meters": 100.0}"#;
        let request: UpdateSiteRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.valid_radius_meters, 100.0);
    }

    #[test]
    fn test_update_windows_request_deserialization() {
        let json = r#"{
            "check_in": { "start": "06:30", "end": "08:00" },
            "check_out": { "start": "14:00", "end": "16:00" }
        }"#;
        let request: UpdateWindowsRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.check_in.start.to_string(), "06:30");
        assert!(request.check_in.is_valid());
    }

    #[test]
    fn test_config_response_serialization() {
        let response = ConfigResponse {
            site: None,
            check_in_window: TimeWindow {
                start: hadir_core::ClockTime::new(6, 0).unwrap(),
                end: hadir_core::ClockTime::new(9, 0).unwrap(),
            },
            check_out_window: TimeWindow {
                start: hadir_core::ClockTime::new(14, 0).unwrap(),
                end: hadir_core::ClockTime::new(17, 0).unwrap(),
            },
            classes: Vec::new(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"site\":null"));
        assert!(json.contains("\"06:00\""));
    }
}
