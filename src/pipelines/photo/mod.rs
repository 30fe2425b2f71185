// SPDX-License-Identifier: MPL-2.0

//! Async photo capture pipeline
//!
//! ```text
//! CaptureEndpoint → latest frame → JPEG encoding → PhotoStorage
//!       ↓
//! Preview continues uninterrupted
//! ```
//!
//! Encoding and disk I/O run on the blocking pool, so the UI thread only
//! sees the final `Result`.

pub mod encoding;

pub use encoding::{EncodedImage, PhotoEncoder};

use crate::backends::camera::CaptureEndpoint;
use crate::backends::camera::types::CameraFrame;
use crate::errors::AppError;
use crate::storage::{PhotoStorage, StorageReference, display_name_for};
use chrono::{DateTime, Local};
use std::sync::Arc;
use tracing::info;

/// Capture → encode → save
#[derive(Debug, Clone, Copy, Default)]
pub struct PhotoPipeline {
    encoder: PhotoEncoder,
}

impl PhotoPipeline {
    /// Pipeline encoding at `quality` (0-100)
    pub fn new(quality: u8) -> Self {
        Self {
            encoder: PhotoEncoder::new(quality),
        }
    }

    /// Take the endpoint's latest frame and persist it.
    ///
    /// Fails when the endpoint is no longer bound or has not produced a
    /// frame yet.
    pub async fn capture(
        &self,
        endpoint: &CaptureEndpoint,
        storage: &PhotoStorage,
        taken_at: DateTime<Local>,
    ) -> Result<StorageReference, AppError> {
        let frame = endpoint.grab_frame()?;
        info!(
            generation = endpoint.generation(),
            device = %endpoint.device_name(),
            "Capturing photo"
        );
        self.capture_and_save(frame, storage, taken_at).await
    }

    /// Encode `frame` and store it under the display name for `taken_at`
    pub async fn capture_and_save(
        &self,
        frame: Arc<CameraFrame>,
        storage: &PhotoStorage,
        taken_at: DateTime<Local>,
    ) -> Result<StorageReference, AppError> {
        let encoded = self.encoder.encode(frame).await?;
        let reference = storage
            .save_jpeg(display_name_for(&taken_at), encoded.data)
            .await?;
        Ok(reference)
    }
}
