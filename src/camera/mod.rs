//! Frame capture.
//!
//! A [`FrameSource`] produces one encoded JPEG per call. [`Camera`] wraps a
//! source with a capture timeout and tracks whether the last capture worked,
//! which is what the health endpoint reports. A failed capture is not fatal:
//! the viewer page asks again on its next tick, and the source is retried then.

mod file;
mod pattern;

use std::path::PathBuf;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{CameraConfig, ConfigError, SourceKind};

pub use file::FileSource;
pub use pattern::TestPattern;

/// JPEG start-of-image marker.
pub const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// JPEG end-of-image marker.
pub const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];

/// One encoded JPEG frame.
#[derive(Debug, Clone)]
pub struct Frame {
    pub data: Bytes,
    pub captured_at: DateTime<Utc>,
}

impl Frame {
    /// Wrap JPEG bytes, rejecting anything that is not a complete JPEG.
    ///
    /// A file read while the capture tool is still writing it has the start
    /// marker but not the end marker; that frame is refused so the next poll
    /// gets a whole one.
    pub fn jpeg(data: impl Into<Bytes>, captured_at: DateTime<Utc>) -> Result<Self, CameraError> {
        let data = data.into();
        if data.is_empty() {
            return Err(CameraError::Empty);
        }
        if !data.starts_with(&JPEG_SOI) {
            return Err(CameraError::NotJpeg);
        }
        if data.len() < JPEG_SOI.len() + JPEG_EOI.len() || !data.ends_with(&JPEG_EOI) {
            return Err(CameraError::Truncated(data.len()));
        }
        Ok(Self { data, captured_at })
    }
}

/// Anything that can produce a JPEG frame on demand.
#[async_trait]
pub trait FrameSource: Send + Sync {
    /// Short name used in logs and the health report.
    fn name(&self) -> &'static str;

    async fn capture(&self) -> Result<Frame, CameraError>;
}

#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("Failed to read frame from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Frame is empty")]
    Empty,

    #[error("Frame is not a JPEG image")]
    NotJpeg,

    #[error("Frame is truncated ({0} bytes, no end-of-image marker)")]
    Truncated(usize),

    #[error("Failed to encode frame: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Capture timed out after {0:?}")]
    Timeout(Duration),

    #[error("Capture task failed: {0}")]
    Task(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraStatus {
    Available,
    Unavailable,
}

#[derive(Debug)]
struct CaptureState {
    status: CameraStatus,
    last_capture: Option<DateTime<Utc>>,
}

/// A frame source plus capture bookkeeping, shared by all handlers.
pub struct Camera {
    source: Box<dyn FrameSource>,
    timeout: Duration,
    state: RwLock<CaptureState>,
}

impl Camera {
    pub fn new(source: Box<dyn FrameSource>, timeout: Duration) -> Self {
        Self {
            source,
            timeout,
            state: RwLock::new(CaptureState {
                status: CameraStatus::Unavailable,
                last_capture: None,
            }),
        }
    }

    /// Build the camera described by the `[camera]` config section.
    pub fn from_config(config: &CameraConfig) -> Result<Self, ConfigError> {
        let source: Box<dyn FrameSource> = match config.source {
            SourceKind::TestPattern => Box::new(TestPattern::new(
                config.width,
                config.height,
                config.jpeg_quality,
            )),
            SourceKind::File => {
                let path = config.path.clone().ok_or_else(|| {
                    ConfigError::Validation("camera.path is required for the file source".into())
                })?;
                Box::new(FileSource::new(path))
            }
        };
        Ok(Self::new(
            source,
            Duration::from_millis(config.capture_timeout_ms),
        ))
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    pub fn status(&self) -> CameraStatus {
        self.state.read().unwrap_or_else(|e| e.into_inner()).status
    }

    /// Timestamp of the most recent successful capture.
    pub fn last_capture(&self) -> Option<DateTime<Utc>> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .last_capture
    }

    /// Capture a frame, bounded by the configured timeout.
    pub async fn capture(&self) -> Result<Frame, CameraError> {
        let result = match tokio::time::timeout(self.timeout, self.source.capture()).await {
            Ok(result) => result,
            Err(_) => Err(CameraError::Timeout(self.timeout)),
        };

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        match &result {
            Ok(frame) => {
                if state.status == CameraStatus::Unavailable {
                    tracing::info!(source = self.source.name(), "Camera available");
                }
                state.status = CameraStatus::Available;
                state.last_capture = Some(frame.captured_at);
                tracing::debug!(bytes = frame.data.len(), "Captured frame");
            }
            Err(e) => {
                if state.status == CameraStatus::Available {
                    tracing::warn!(source = self.source.name(), error = %e, "Camera unavailable");
                }
                state.status = CameraStatus::Unavailable;
            }
        }

        result
    }
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("source", &self.source.name())
            .field("timeout", &self.timeout)
            .field("status", &self.status())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Source whose failure can be toggled from the test.
    struct Flaky {
        failing: AtomicBool,
    }

    #[async_trait]
    impl FrameSource for Flaky {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn capture(&self) -> Result<Frame, CameraError> {
            if self.failing.load(Ordering::SeqCst) {
                Err(CameraError::Empty)
            } else {
                Frame::jpeg(vec![0xFF, 0xD8, 0xFF, 0xD9], Utc::now())
            }
        }
    }

    struct Stalled;

    #[async_trait]
    impl FrameSource for Stalled {
        fn name(&self) -> &'static str {
            "stalled"
        }

        async fn capture(&self) -> Result<Frame, CameraError> {
            std::future::pending::<Result<Frame, CameraError>>().await
        }
    }

    #[test]
    fn test_frame_rejects_non_jpeg() {
        assert!(matches!(Frame::jpeg(Vec::new(), Utc::now()), Err(CameraError::Empty)));
        assert!(matches!(
            Frame::jpeg(b"\x89PNG".to_vec(), Utc::now()),
            Err(CameraError::NotJpeg)
        ));
        assert!(Frame::jpeg(vec![0xFF, 0xD8, 0xFF, 0xD9], Utc::now()).is_ok());
    }

    #[test]
    fn test_frame_rejects_torn_jpeg() {
        assert!(matches!(
            Frame::jpeg(vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00], Utc::now()),
            Err(CameraError::Truncated(5))
        ));
        // Start marker alone must not double as the end marker.
        assert!(matches!(
            Frame::jpeg(vec![0xFF, 0xD8], Utc::now()),
            Err(CameraError::Truncated(2))
        ));
    }

    #[tokio::test]
    async fn test_status_follows_last_capture() {
        let camera = Camera::new(
            Box::new(Flaky {
                failing: AtomicBool::new(false),
            }),
            Duration::from_secs(1),
        );
        assert_eq!(camera.status(), CameraStatus::Unavailable);
        assert!(camera.last_capture().is_none());

        let frame = camera.capture().await.unwrap();
        assert_eq!(camera.status(), CameraStatus::Available);
        assert_eq!(camera.last_capture(), Some(frame.captured_at));
    }

    #[tokio::test]
    async fn test_recovers_after_failure() {
        let source = std::sync::Arc::new(Flaky {
            failing: AtomicBool::new(true),
        });

        struct Shared(std::sync::Arc<Flaky>);

        #[async_trait]
        impl FrameSource for Shared {
            fn name(&self) -> &'static str {
                self.0.name()
            }
            async fn capture(&self) -> Result<Frame, CameraError> {
                self.0.capture().await
            }
        }

        let camera = Camera::new(Box::new(Shared(source.clone())), Duration::from_secs(1));
        assert!(camera.capture().await.is_err());
        assert_eq!(camera.status(), CameraStatus::Unavailable);

        source.failing.store(false, Ordering::SeqCst);
        assert!(camera.capture().await.is_ok());
        assert_eq!(camera.status(), CameraStatus::Available);
    }

    #[tokio::test]
    async fn test_capture_times_out() {
        let camera = Camera::new(Box::new(Stalled), Duration::from_millis(50));
        let err = camera.capture().await.unwrap_err();
        assert!(matches!(err, CameraError::Timeout(_)));
        assert_eq!(camera.status(), CameraStatus::Unavailable);
    }

    #[test]
    fn test_from_config_picks_source() {
        let config = CameraConfig::default();
        let camera = Camera::from_config(&config).unwrap();
        assert_eq!(camera.source_name(), "test_pattern");

        let config = CameraConfig {
            source: SourceKind::File,
            path: Some(PathBuf::from("/tmp/frame.jpg")),
            ..CameraConfig::default()
        };
        let camera = Camera::from_config(&config).unwrap();
        assert_eq!(camera.source_name(), "file");
    }
}
