//! Frame endpoint polled by the viewer page.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// HTTP-date format for `Last-Modified`.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Capture handler.
///
/// Returns the current frame as `image/jpeg`. The page's `t` query parameter
/// only defeats browser caching and is not read here.
#[instrument(name = "capture::capture", skip(state))]
pub async fn capture(State(state): State<AppState>) -> Result<Response, AppError> {
    let frame = state.camera.capture().await?;
    let last_modified = frame.captured_at.format(HTTP_DATE_FORMAT).to_string();

    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (header::LAST_MODIFIED, last_modified),
        ],
        frame.data,
    )
        .into_response())
}
