//! Request ID middleware for correlating logs with requests.
//!
//! Every request gets a UUID v4 and a tracing span covering its whole
//! lifecycle. The ID is echoed back in the `x-request-id` response header so a
//! browser's network tab can be matched against server logs.

use std::time::Instant;

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request ID, available to handlers through request extensions.
#[derive(Clone, Copy, Debug)]
pub struct RequestId(pub Uuid);

/// Outermost layer: assigns the request ID and opens the request span.
pub async fn request_id_layer(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    let start = Instant::now();
    request.extensions_mut().insert(RequestId(request_id));

    async move {
        let mut response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        // The page polls once a second, so successful requests log at debug.
        if response.status().is_success() {
            tracing::debug!(status = response.status().as_u16(), duration_ms, "Request completed");
        } else {
            tracing::info!(status = response.status().as_u16(), duration_ms, "Request completed");
        }

        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        response
    }
    .instrument(span)
    .await
}
