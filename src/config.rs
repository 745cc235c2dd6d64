//! Configuration loading and constants.
//!
//! Loads application configuration from TOML files and defines constants for
//! HTTP cache headers, capture defaults, logging format, and default paths.
//! `AppConfig` is the root configuration struct containing all settings.

use const_format::formatcp;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// =============================================================================
// HTTP Response Cache Control
// =============================================================================
// The viewer page never changes at runtime, so browsers and proxies may keep it
// briefly. Captured frames must never be cached: the page relies on every
// request reaching the camera.

/// Viewer page - constant content
pub const HTTP_CACHE_PAGE_MAX_AGE: u32 = 60;

pub const CACHE_CONTROL_PAGE: &str = formatcp!("public, max-age={}", HTTP_CACHE_PAGE_MAX_AGE);

pub const CACHE_CONTROL_CAPTURE: &str = "no-store, no-cache, must-revalidate, max-age=0";

/// Health and test endpoints - always fresh for liveness probes
pub const CACHE_CONTROL_NO_STORE: &str = "no-store";

// =============================================================================
// Capture Defaults
// =============================================================================

/// Default frame width in pixels
pub const DEFAULT_FRAME_WIDTH: u32 = 640;

/// Default frame height in pixels
pub const DEFAULT_FRAME_HEIGHT: u32 = 480;

/// Largest accepted frame side in pixels. JPEG itself stops at 65535, and a
/// synthesized frame is allocated whole on every capture.
pub const MAX_FRAME_DIMENSION: u32 = 8192;

/// Default JPEG quality (1-100)
pub const DEFAULT_JPEG_QUALITY: u8 = 80;

/// Upper bound on a single capture before the request fails
pub const DEFAULT_CAPTURE_TIMEOUT_MS: u64 = 2000;

// =============================================================================
// Default Paths and Strings
// =============================================================================

/// Default configuration file path
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Default log filter when RUST_LOG is not set
pub const DEFAULT_LOG_FILTER: &str = "camview=debug,tower_http=info";

/// Default log format (text or json)
pub const DEFAULT_LOG_FORMAT: &str = "text";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub http: HttpServerConfig,
    /// Frame source configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8080
    }
}

/// Where frames come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Synthesized gradient frames, no hardware required
    TestPattern,
    /// A JPEG file kept up to date by an external capture tool
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "CameraConfig::default_source")]
    pub source: SourceKind,
    /// JPEG file to serve (required for the `file` source)
    pub path: Option<PathBuf>,
    #[serde(default = "CameraConfig::default_width")]
    pub width: u32,
    #[serde(default = "CameraConfig::default_height")]
    pub height: u32,
    #[serde(default = "CameraConfig::default_jpeg_quality")]
    pub jpeg_quality: u8,
    #[serde(default = "CameraConfig::default_capture_timeout")]
    pub capture_timeout_ms: u64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            source: Self::default_source(),
            path: None,
            width: Self::default_width(),
            height: Self::default_height(),
            jpeg_quality: Self::default_jpeg_quality(),
            capture_timeout_ms: Self::default_capture_timeout(),
        }
    }
}

impl CameraConfig {
    fn default_source() -> SourceKind {
        SourceKind::TestPattern
    }
    fn default_width() -> u32 {
        DEFAULT_FRAME_WIDTH
    }
    fn default_height() -> u32 {
        DEFAULT_FRAME_HEIGHT
    }
    fn default_jpeg_quality() -> u8 {
        DEFAULT_JPEG_QUALITY
    }
    fn default_capture_timeout() -> u64 {
        DEFAULT_CAPTURE_TIMEOUT_MS
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.source == SourceKind::File && self.path.is_none() {
            return Err(ConfigError::Validation(
                "camera.path is required when camera.source = \"file\"".to_string(),
            ));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Validation(format!(
                "camera.width and camera.height must be non-zero (got {}x{})",
                self.width, self.height
            )));
        }
        if self.width > MAX_FRAME_DIMENSION || self.height > MAX_FRAME_DIMENSION {
            return Err(ConfigError::Validation(format!(
                "camera.width and camera.height must be at most {} (got {}x{})",
                MAX_FRAME_DIMENSION, self.width, self.height
            )));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Validation(format!(
                "camera.jpeg_quality must be between 1 and 100 (got {})",
                self.jpeg_quality
            )));
        }
        if self.capture_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "camera.capture_timeout_ms must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log format: "text" (human-readable, default) or "json" (structured)
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LoggingConfig {
    fn default_format() -> String {
        DEFAULT_LOG_FORMAT.to_string()
    }

    /// Parsed log format. Unknown values were rejected at load time.
    pub fn log_format(&self) -> LogFormat {
        if self.format.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;

        config.camera.validate()?;

        let format = config.logging.format.to_ascii_lowercase();
        if format != "text" && format != "json" {
            return Err(ConfigError::Validation(format!(
                "logging.format must be \"text\" or \"json\" (got \"{}\")",
                config.logging.format
            )));
        }

        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
