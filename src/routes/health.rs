//! Health and liveness endpoints.
//!
//! `/health` reports whether the last capture succeeded; `/test` only proves
//! the process can answer HTTP.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::camera::CameraStatus;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub camera: CameraStatus,
    pub source: &'static str,
    pub last_capture: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
}

/// Health check handler.
///
/// Always 200 while the server runs; camera trouble is reported in the body
/// so a dead sensor does not get the web server restarted.
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "running",
        camera: state.camera.status(),
        source: state.camera.source_name(),
        last_capture: state.camera.last_capture(),
        timestamp: Utc::now(),
    })
}

#[derive(Debug, Serialize)]
pub struct TestReply {
    pub message: &'static str,
}

/// Liveness probe.
pub async fn test() -> Json<TestReply> {
    Json(TestReply {
        message: "Camera server is running",
    })
}
