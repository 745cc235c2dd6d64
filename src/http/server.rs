//! HTTP server startup logic.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::HttpServerConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid http.host or http.port: {0}")]
    Address(#[from] std::net::AddrParseError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}

/// Parse the listen address from the `[http]` section.
pub fn listen_addr(config: &HttpServerConfig) -> Result<SocketAddr, ServerError> {
    // Bracket bare IPv6 literals so "::" parses.
    let host = if config.host.contains(':') && !config.host.starts_with('[') {
        format!("[{}]", config.host)
    } else {
        config.host.clone()
    };
    Ok(format!("{}:{}", host, config.port).parse()?)
}

/// Start the HTTP server.
///
/// This function blocks until the server shuts down.
pub async fn start_server(app: Router, config: &HttpServerConfig) -> Result<(), ServerError> {
    let addr = listen_addr(config)?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    tracing::info!("Starting server at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    tracing::info!("Server stopped");
    Ok(())
}
