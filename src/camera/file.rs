//! Frames from a JPEG file on disk.
//!
//! Pairs with an external capture tool (`fswebcam`, `libcamera-still`, a
//! firmware upload handler) that keeps overwriting the same file. Each capture
//! reads whatever is there now.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{CameraError, Frame, FrameSource};

#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_error(&self, source: std::io::Error) -> CameraError {
        CameraError::Read {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl FrameSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn capture(&self) -> Result<Frame, CameraError> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| self.read_error(e))?;

        // The file's mtime is when the frame was taken, not when we read it.
        let captured_at = tokio::fs::metadata(&self.path)
            .await
            .and_then(|meta| meta.modified())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        Frame::jpeg(data, captured_at)
    }
}
