// SPDX-License-Identifier: GPL-3.0-only

//! JPEG encoding of captured frames

use crate::backends::camera::types::CameraFrame;
use crate::constants::photo::DEFAULT_JPEG_QUALITY;
use crate::errors::PhotoError;
use std::sync::Arc;
use tracing::{debug, info};

/// Encoded JPEG ready for storage
#[derive(Debug)]
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Photo encoder
#[derive(Debug, Clone, Copy)]
pub struct PhotoEncoder {
    quality: u8,
}

impl PhotoEncoder {
    /// Encoder with the given JPEG quality (0-100)
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.min(100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode a frame off the async runtime
    pub async fn encode(&self, frame: Arc<CameraFrame>) -> Result<EncodedImage, PhotoError> {
        let encoder = *self;
        tokio::task::spawn_blocking(move || encoder.encode_blocking(&frame))
            .await
            .map_err(|e| PhotoError::EncodingFailed(format!("Encoding task error: {}", e)))?
    }

    /// RGBA frame to JPEG (alpha dropped)
    pub fn encode_blocking(&self, frame: &CameraFrame) -> Result<EncodedImage, PhotoError> {
        if frame.width == 0 || frame.height == 0 || !frame.is_complete() {
            return Err(PhotoError::EncodingFailed(format!(
                "incomplete {}x{} frame ({} bytes, stride {})",
                frame.width,
                frame.height,
                frame.data.len(),
                frame.stride
            )));
        }

        info!(
            width = frame.width,
            height = frame.height,
            quality = self.quality,
            "Encoding JPEG"
        );

        let rgb = frame.packed_rgb();
        let mut data = Vec::new();
        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut data, self.quality);
        encoder.encode(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)?;

        debug!(size = data.len(), "Encoding complete");
        Ok(EncodedImage {
            data,
            width: frame.width,
            height: frame.height,
        })
    }
}

impl Default for PhotoEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodes_jpeg_magic() {
        let frame = CameraFrame::from_rgba(4, 2, vec![200; 4 * 2 * 4]);
        let encoded = PhotoEncoder::default().encode_blocking(&frame).unwrap();
        assert_eq!(&encoded.data[..2], &[0xFF, 0xD8]);
        assert_eq!((encoded.width, encoded.height), (4, 2));
    }

    #[test]
    fn test_rejects_truncated_frame() {
        let mut frame = CameraFrame::from_rgba(4, 4, vec![0; 64]);
        frame.data = Arc::from(vec![0u8; 8]);
        assert!(matches!(
            PhotoEncoder::default().encode_blocking(&frame),
            Err(PhotoError::EncodingFailed(_))
        ));
    }

    #[test]
    fn test_quality_is_capped() {
        assert_eq!(PhotoEncoder::new(150).quality(), 100);
    }
}
