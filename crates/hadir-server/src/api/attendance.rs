//! Attendance API endpoints.
//!
//! Students check in when they arrive at school and check out when they
//! leave. Each action submits one GPS sample which is validated against the
//! school geofence and the class time window, then discarded; only the
//! validation outcome is stored.

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use hadir_core::{AttendanceRecord, CheckOutcome, LocationSample, TimeWindow, ValidationResult};

use crate::api::error::{ApiError, ApiResult};
use crate::state::SharedState;

/// Creates the attendance router with all endpoints.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/check-in", post(check_in))
        .route("/check-out", post(check_out))
        .route("/today", get(today))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for a check-in or check-out attempt.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({
    "user_id": 17,
    "latitude": -6.2001,
    "longitude": 106.8161,
    "accuracy_meters": 18.5
}))]
pub struct CheckRequest {
    /// The student performing the action.
    #[schema(example = 17)]
    pub user_id: u64,

    /// Device latitude in decimal degrees.
    #[schema(example = -6.2001)]
    pub latitude: f64,

    /// Device longitude in decimal degrees.
    #[schema(example = 106.8161)]
    pub longitude: f64,

    /// Reported GPS accuracy in meters.
    #[schema(example = 18.5, minimum = 0.0)]
    pub accuracy_meters: f64,
}

impl CheckRequest {
    /// The submitted sample, after boundary validation. An accuracy radius
    /// cannot be negative, and NaN or infinite values would slip through the
    /// classifier's threshold comparisons.
    fn sample(&self) -> Result<LocationSample, ApiError> {
        if !self.accuracy_meters.is_finite() || self.accuracy_meters < 0.0 {
            return Err(ApiError::BadRequest {
                error_code: "INVALID_ACCURACY".to_string(),
                message: "Accuracy must be a non-negative number of meters".to_string(),
            });
        }
        Ok(LocationSample {
            latitude: self.latitude,
            longitude: self.longitude,
            accuracy_meters: self.accuracy_meters,
        })
    }
}

/// Response after a successful check-in or check-out.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckResponse {
    /// Whether the attempt was applied.
    #[schema(example = true)]
    pub success: bool,

    /// Geofence classification of the submitted sample.
    pub validation: ValidationResult,

    /// The daily record after the attempt.
    pub attendance: AttendanceRecord,
}

impl From<CheckOutcome> for CheckResponse {
    fn from(outcome: CheckOutcome) -> Self {
        Self {
            success: true,
            validation: outcome.validation,
            attendance: outcome.record,
        }
    }
}

/// Query parameters for the today endpoint.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct TodayQuery {
    /// The student whose record to fetch.
    #[param(example = 17)]
    pub user_id: u64,
}

/// A student's attendance state for the current WITA day.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TodayResponse {
    /// Today's date in WITA, `YYYY-MM-DD`.
    #[schema(example = "2025-03-03")]
    pub date: String,

    /// The student's class name, when enrolled.
    #[schema(example = "Grade 7A")]
    pub class_name: Option<String>,

    /// Effective check-in window for the student.
    pub check_in_window: Option<TimeWindow>,

    /// Effective check-out window for the student.
    pub check_out_window: Option<TimeWindow>,

    /// Today's record, absent until the first check-in or check-out.
    pub attendance: Option<AttendanceRecord>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Check in at school.
///
/// Validates the submitted GPS sample against the school geofence and the
/// class's check-in window, then records the arrival.
#[utoipa::path(
    post,
    path = "/attendance/check-in",
    tag = "attendance",
    operation_id = "checkIn",
    summary = "Check in at school",
    description = "Validates one GPS sample against the school geofence and \
        the class check-in window, records the arrival, and returns the \
        updated daily record. Coordinates are never stored. A location that \
        is too far away is still recorded (as INVALID) and escalated to the \
        teacher; only precondition failures are rejected.",
    request_body = CheckRequest,
    responses(
        (status = 200, description = "Check-in recorded", body = CheckResponse),
        (status = 400, description = "Invalid accuracy, no class assigned, or outside the check-in window"),
        (status = 409, description = "Already checked in today"),
        (status = 424, description = "School site not configured")
    )
)]
pub async fn check_in(
    State(state): State<SharedState>,
    Json(request): Json<CheckRequest>,
) -> ApiResult<Json<CheckResponse>> {
    let state_guard = state.write().await;

    let outcome = state_guard.manager.attempt_check_in(
        &state_guard.config,
        request.user_id,
        &request.sample()?,
    )?;

    Ok(Json(outcome.into()))
}

/// Check out from school.
///
/// Symmetric to check-in, with one asymmetry: checking out without any
/// check-in recorded today creates the record with a final status of
/// `NEEDS_VERIFICATION` regardless of the sample's classification.
#[utoipa::path(
    post,
    path = "/attendance/check-out",
    tag = "attendance",
    operation_id = "checkOut",
    summary = "Check out from school",
    description = "Validates one GPS sample against the school geofence and \
        the class check-out window, records the departure, and returns the \
        updated daily record. A departure without a recorded arrival is \
        always escalated to teacher verification.",
    request_body = CheckRequest,
    responses(
        (status = 200, description = "Check-out recorded", body = CheckResponse),
        (status = 400, description = "Invalid accuracy, no class assigned, or outside the check-out window"),
        (status = 409, description = "Already checked out today"),
        (status = 424, description = "School site not configured")
    )
)]
pub async fn check_out(
    State(state): State<SharedState>,
    Json(request): Json<CheckRequest>,
) -> ApiResult<Json<CheckResponse>> {
    let state_guard = state.write().await;

    let outcome = state_guard.manager.attempt_check_out(
        &state_guard.config,
        request.user_id,
        &request.sample()?,
    )?;

    let mut response = CheckResponse::from(outcome);
    if response.attendance.check_in_time.is_none() {
        response.validation.message =
            format!("{} (Teacher verification needed: no check-in recorded)",
                response.validation.message);
    }

    Ok(Json(response))
}

/// Get a student's attendance state for today.
#[utoipa::path(
    get,
    path = "/attendance/today",
    tag = "attendance",
    operation_id = "getToday",
    summary = "Get today's attendance state",
    description = "Returns the student's record for the current WITA day (if \
        any), plus the effective check-in/check-out windows for their class.",
    params(TodayQuery),
    responses(
        (status = 200, description = "State retrieved", body = TodayResponse)
    )
)]
pub async fn today(
    State(state): State<SharedState>,
    Query(query): Query<TodayQuery>,
) -> ApiResult<Json<TodayResponse>> {
    let state_guard = state.read().await;

    let class = state_guard.config.class_for_user(query.user_id);
    let attendance = state_guard.manager.today(query.user_id)?;

    Ok(Json(TodayResponse {
        date: state_guard.manager.current_date(),
        class_name: class.map(|c| c.name.clone()),
        check_in_window: class.map(|c| state_guard.config.check_in_window(c)),
        check_out_window: class.map(|c| state_guard.config.check_out_window(c)),
        attendance,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_request_deserialization() {
        let json = r#"{"user_id": 17, "latitude": -6.2, "longitude": 106.816, "accuracy_meters": 20.0}"#;
        let request: CheckRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.user_id, 17);
        assert_eq!(request.sample().unwrap().accuracy_meters, 20.0);
    }

    #[test]
    fn test_negative_or_non_finite_accuracy_is_rejected() {
        let mut request = CheckRequest {
            user_id: 17,
            latitude: -6.2,
            longitude: 106.816,
            accuracy_meters: -5.0,
        };
        assert!(matches!(
            request.sample(),
            Err(ApiError::BadRequest { .. })
        ));

        request.accuracy_meters = f64::NAN;
        assert!(request.sample().is_err());

        request.accuracy_meters = f64::INFINITY;
        assert!(request.sample().is_err());

        request.accuracy_meters = 0.0;
        assert!(request.sample().is_ok());
    }

    #[test]
    fn test_today_response_serialization() {
        let response = TodayResponse {
            date: "2025-03-03".to_string(),
            class_name: Some("Grade 7A".to_string()),
            check_in_window: None,
            check_out_window: None,
            attendance: None,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"date\":\"2025-03-03\""));
        assert!(json.contains("Grade 7A"));
    }
}
