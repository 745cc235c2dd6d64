//! camview: a live camera viewer.
//!
//! This is the application entry point. It initializes tracing, loads configuration
//! from a TOML file, builds the frame source, sets up the Axum router, and starts
//! the HTTP server.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use camview::camera::Camera;
use camview::config::{AppConfig, LogFormat, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use camview::http::start_server;
use camview::{create_router, AppState};

/// camview: serve a live-refreshing camera page
#[derive(Parser, Debug)]
#[command(name = "camview", version, about)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    /// Log level filter (e.g., "camview=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Configuration comes first so the log format is known before tracing starts
    let config = AppConfig::load(&args.config)?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));
    match config.logging.log_format() {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!(path = %args.config, "Loaded configuration");

    let camera = Camera::from_config(&config.camera)?;
    tracing::info!(
        source = camera.source_name(),
        width = config.camera.width,
        height = config.camera.height,
        timeout_ms = config.camera.capture_timeout_ms,
        "Camera configured"
    );

    // Warm up so /health reflects the source before the first viewer connects
    if let Err(e) = camera.capture().await {
        tracing::warn!(error = %e, "Initial capture failed, will retry on request");
    }

    let app = create_router(AppState::new(camera));

    start_server(app, &config.http).await?;

    Ok(())
}
