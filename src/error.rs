use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::camera::CameraError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Camera(#[from] CameraError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Camera(CameraError::Timeout(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Camera(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            AppError::NotFound(_) => self.to_string(),
            AppError::Camera(e) => {
                tracing::error!(error = %e, "Capture failed");
                format!("Failed to capture image: {}", e)
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
