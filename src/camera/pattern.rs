//! Synthesized frames for running without camera hardware.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};

use super::{CameraError, Frame, FrameSource};

/// Moving diagonal gradient. Each capture shifts the gradient so successive
/// frames are visibly different in the viewer.
#[derive(Debug)]
pub struct TestPattern {
    width: u32,
    height: u32,
    quality: u8,
    sequence: AtomicU64,
}

impl TestPattern {
    pub fn new(width: u32, height: u32, quality: u8) -> Self {
        Self {
            width,
            height,
            quality,
            sequence: AtomicU64::new(0),
        }
    }
}

fn render(width: u32, height: u32, quality: u8, sequence: u64) -> Result<Vec<u8>, CameraError> {
    let shift = (sequence.wrapping_mul(8) % 256) as u32;
    let image = RgbImage::from_fn(width, height, |x, y| {
        let r = ((x * 255 / width.max(1)) + shift) % 256;
        let g = ((y * 255 / height.max(1)) + shift) % 256;
        let b = (((x + y) * 255 / (width + height).max(1)) + 255 - shift) % 256;
        Rgb([r as u8, g as u8, b as u8])
    });

    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, quality).encode_image(&image)?;
    Ok(buf)
}

#[async_trait]
impl FrameSource for TestPattern {
    fn name(&self) -> &'static str {
        "test_pattern"
    }

    async fn capture(&self) -> Result<Frame, CameraError> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let (width, height, quality) = (self.width, self.height, self.quality);

        let data = tokio::task::spawn_blocking(move || render(width, height, quality, sequence))
            .await
            .map_err(|e| CameraError::Task(e.to_string()))??;

        Frame::jpeg(data, Utc::now())
    }
}
