//! HTTP route handlers.
//!
//! The viewer page may be cached briefly; frames and health reports never are.
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request, allowing correlation of all logs within a request.

pub mod capture;
pub mod health;

use axum::{
    http::{
        header::{HeaderValue, CACHE_CONTROL},
        Method, Uri,
    },
    middleware,
    routing::get,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::{CACHE_CONTROL_CAPTURE, CACHE_CONTROL_NO_STORE, CACHE_CONTROL_PAGE};
use crate::error::AppError;
use crate::middleware::request_id_layer;
use crate::page::{self, CAPTURE_PATH};
use crate::state::AppState;

/// Frames and health reports may be fetched by viewers hosted on other origins.
fn cross_origin_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers(Any)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}

/// Creates the Axum router with all routes and cache headers.
pub fn create_router(state: AppState) -> Router {
    let page_routes = Router::new().route("/", get(page::index)).layer(
        SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_PAGE),
        ),
    );

    // Frames - never cached, every poll must reach the camera. Overriding also
    // covers error responses so a failed frame is not replayed.
    let capture_routes = Router::new()
        .route(CAPTURE_PATH, get(capture::capture))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_CAPTURE),
        ));

    let health_routes = Router::new()
        .route("/health", get(health::health))
        .route("/test", get(health::test))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_NO_STORE),
        ));

    let api_routes = Router::new()
        .merge(capture_routes)
        .merge(health_routes)
        .layer(cross_origin_layer());

    Router::new()
        .merge(page_routes)
        .merge(api_routes)
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
