//! HTTP API routes and handlers.
//!
//! This module contains all HTTP endpoint implementations organized by domain:
//! - `attendance` - Check-in, check-out, and today's record
//! - `teacher` - Manual validation of attendance records
//! - `config` - Geofence, window, and class configuration
//! - `health` - Service health checks
//! - `error` - API error types
//! - `openapi` - OpenAPI specification generation

use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa_swagger_ui::{Config, SwaggerUi};

use crate::state::SharedState;

pub mod attendance;
pub mod config;
pub mod error;
pub mod health;
pub mod openapi;
pub mod teacher;

// Re-export commonly used types
#[allow(unused_imports)]
pub use error::{ApiError, ApiResult, ErrorResponse};

// Re-export OpenAPI utilities for the gen-openapi binary
#[allow(unused_imports)]
pub use openapi::get_openapi_json;

/// Creates the combined API router with all endpoints.
///
/// # Route Structure
///
/// ```text
/// /health                      - Health check
/// /api
/// ├── /attendance
/// │   ├── /check-in            - Record an arrival
/// │   ├── /check-out           - Record a departure
/// │   └── /today               - Today's record and windows
/// ├── /teacher/validate        - Manual validation
/// ├── /config                  - Geofence, windows, class overrides
/// └── /openapi.json            - OpenAPI specification
/// /swagger-ui                  - Interactive API documentation
/// ```
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").config(Config::new(["/api/openapi.json"])))
        .nest("/health", health::router())
        .nest(
            "/api",
            Router::new()
                // OpenAPI spec at /api/openapi.json
                .route("/openapi.json", get(openapi::get_openapi_spec))
                // Attendance actions
                .nest("/attendance", attendance::router())
                // Teacher validation
                .nest("/teacher", teacher::router())
                // Configuration management
                .nest("/config", config::router()),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::attendance::CheckResponse;
    use crate::state::AppState;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use hadir_core::{
        AttendanceStatus, ClassConfig, ClockTime, Enrollment, GeoPoint, HadirConfig, SiteConfig,
        TimeWindow, ValidationStatus,
    };
    use serde_json::json;

    const STUDENT: u64 = 17;

    fn all_day() -> TimeWindow {
        TimeWindow::new(
            ClockTime::new(0, 0).unwrap(),
            ClockTime::new(23, 59).unwrap(),
        )
        .unwrap()
    }

    /// A server over tempdir-backed state. Both windows span the whole day
    /// so the wall clock cannot gate these requests.
    fn server() -> (tempfile::TempDir, TestServer) {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.toml");

        let mut config = HadirConfig {
            site: Some(SiteConfig {
                reference_point: GeoPoint::new(-6.200, 106.816),
                valid_radius_meters: 100.0,
            }),
            ..HadirConfig::default()
        };
        config.windows.check_in = all_day();
        config.windows.check_out = all_day();
        config.classes.push(ClassConfig {
            id: 1,
            name: "Grade 7A".to_string(),
            check_in: None,
            check_out: None,
        });
        config.enrollments.push(Enrollment {
            user_id: STUDENT,
            class_id: 1,
        });
        config.save(&config_path).unwrap();

        let state = AppState::with_paths(config_path, dir.path().join("data"))
            .unwrap()
            .into_shared();
        let server = TestServer::new(create_router(state)).unwrap();
        (dir, server)
    }

    fn on_site_body(user_id: u64) -> serde_json::Value {
        json!({
            "user_id": user_id,
            "latitude": -6.200,
            "longitude": 106.816,
            "accuracy_meters": 20.0
        })
    }

    #[tokio::test]
    async fn test_check_in_round_trip_through_router() {
        let (_dir, server) = server();

        let response = server
            .post("/api/attendance/check-in")
            .json(&on_site_body(STUDENT))
            .await;
        response.assert_status_ok();

        let body: CheckResponse = response.json();
        assert!(body.success);
        assert_eq!(body.validation.status, ValidationStatus::Valid);
        assert_eq!(body.attendance.user_id, STUDENT);
        assert_eq!(body.attendance.final_status, AttendanceStatus::PartialPresent);

        // The same day rejects a second check-in.
        let duplicate = server
            .post("/api/attendance/check-in")
            .json(&on_site_body(STUDENT))
            .await;
        duplicate.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_unenrolled_user_is_a_bad_request() {
        let (_dir, server) = server();
        let response = server
            .post("/api/attendance/check-in")
            .json(&on_site_body(999))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_negative_accuracy_is_a_bad_request() {
        let (_dir, server) = server();
        let response = server
            .post("/api/attendance/check-in")
            .json(&json!({
                "user_id": STUDENT,
                "latitude": -6.200,
                "longitude": 106.816,
                "accuracy_meters": -5.0
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);

        // The rejected sample left nothing behind.
        let today = server
            .get("/api/attendance/today")
            .add_query_param("user_id", STUDENT)
            .await;
        today.assert_status_ok();
        assert!(today.json::<serde_json::Value>()["attendance"].is_null());
    }

    #[tokio::test]
    async fn test_health_reports_site_configured() {
        let (_dir, server) = server();
        let response = server.get("/health").await;
        response.assert_status_ok();

        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["site_configured"], true);
    }
}
