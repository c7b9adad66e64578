//! Teacher validation API endpoints.
//!
//! Teachers review records the automatic classifier escalated (low GPS
//! accuracy, borderline distance, missing check-in) and set the final
//! verdict manually. The override is privileged: it applies from any state
//! and simply overwrites on repeated application.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use hadir_core::{AttendanceRecord, AttendanceStatus};

use crate::api::error::ApiResult;
use crate::state::SharedState;

/// Creates the teacher router with all endpoints.
pub fn router() -> Router<SharedState> {
    Router::new().route("/validate", post(validate))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for a teacher validation.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[schema(example = json!({
    "attendance_id": "8f3c1a52-9d4e-4f7a-b1c0-5a6d7e8f9a0b",
    "teacher_id": 3,
    "final_status": "FULL_PRESENT",
    "note": "Was at the school clinic during check-in"
}))]
pub struct ValidateRequest {
    /// The record to validate.
    pub attendance_id: Uuid,

    /// The teacher performing the validation.
    #[schema(example = 3)]
    pub teacher_id: u64,

    /// The verdict to set, bypassing the automatic reconciler.
    pub final_status: AttendanceStatus,

    /// Optional note explaining the decision.
    #[schema(example = "Was at the school clinic during check-in")]
    pub note: Option<String>,
}

/// Response after a successful validation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateResponse {
    /// Whether the validation was applied.
    #[schema(example = true)]
    pub success: bool,

    /// The record after the override.
    pub attendance: AttendanceRecord,
}

// ============================================================================
// Handlers
// ============================================================================

/// Manually validate an attendance record.
///
/// Overwrites the final status, marks the record teacher-validated, and
/// stamps who validated it and when. Repeating the call overwrites the
/// previous validation.
#[utoipa::path(
    post,
    path = "/teacher/validate",
    tag = "teacher",
    operation_id = "validateAttendance",
    summary = "Manually validate an attendance record",
    description = "Sets the final status of a record unconditionally, \
        bypassing the automatic reconciler. Usable from any record state, \
        any number of times; each call overwrites the previous validation.",
    request_body = ValidateRequest,
    responses(
        (status = 200, description = "Validation applied", body = ValidateResponse),
        (status = 404, description = "Attendance record not found")
    )
)]
pub async fn validate(
    State(state): State<SharedState>,
    Json(request): Json<ValidateRequest>,
) -> ApiResult<Json<ValidateResponse>> {
    let state_guard = state.write().await;

    let attendance = state_guard.manager.teacher_override(
        request.attendance_id,
        request.final_status,
        request.note,
        request.teacher_id,
    )?;

    Ok(Json(ValidateResponse {
        success: true,
        attendance,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_request_deserialization() {
        let json = r#"{
            "attendance_id": "8f3c1a52-9d4e-4f7a-b1c0-5a6d7e8f9a0b",
            "teacher_id": 3,
            "final_status": "FULL_PRESENT"
        }"#;
        let request: ValidateRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.teacher_id, 3);
        assert_eq!(request.final_status, AttendanceStatus::FullPresent);
        assert!(request.note.is_none());
    }
}
