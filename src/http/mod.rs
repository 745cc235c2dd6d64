//! HTTP server module.
//!
//! Binds the configured address and serves plain HTTP until SIGTERM/SIGINT,
//! then drains in-flight requests. TLS is left to a reverse proxy.

mod server;
mod shutdown;

pub use server::{start_server, ServerError};
