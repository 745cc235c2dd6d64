//! camview: a live-refreshing web viewer for a network camera.
//!
//! Serves a constant viewer page at `/` whose script reloads `/capture` once a
//! second, and answers `/capture` with a JPEG from the configured frame source.

pub mod camera;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod page;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::create_router;
pub use state::AppState;
