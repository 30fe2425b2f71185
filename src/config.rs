// SPDX-License-Identifier: GPL-3.0-only

use crate::backends::camera::CameraFacing;
use crate::constants::photo::{DEFAULT_JPEG_QUALITY, MIN_JPEG_QUALITY};
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::error;

/// User configuration. Read at startup and watched for changes; the
/// application itself never writes it.
#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Camera selected when the camera screen is created
    pub default_facing: CameraFacing,
    /// Overrides `<Pictures>/Kamera` as the photo directory
    pub photo_directory: Option<PathBuf>,
    /// JPEG quality (0-100)
    pub jpeg_quality: u8,
    /// Mirror the front camera preview horizontally (selfie mode)
    pub mirror_front_preview: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_facing: CameraFacing::Back,
            photo_directory: None,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            mirror_front_preview: true,
        }
    }
}

impl Config {
    /// Load the configuration of `app_id`.
    ///
    /// Falls back to the defaults when the config store cannot be opened.
    /// The handler is returned so callers can keep watching for changes.
    pub fn load(app_id: &str) -> (Option<cosmic_config::Config>, Config) {
        match cosmic_config::Config::new(app_id, Self::VERSION) {
            Ok(handler) => {
                let config = match Self::get_entry(&handler) {
                    Ok(config) => config,
                    Err((errors, config)) => {
                        error!(?errors, "Errors loading config");
                        config
                    }
                };
                (Some(handler), config)
            }
            Err(err) => {
                error!(%err, "Failed to create config handler");
                (None, Config::default())
            }
        }
    }

    /// JPEG quality clamped to the range the encoder produces usable output for
    pub fn effective_jpeg_quality(&self) -> u8 {
        self.jpeg_quality.clamp(MIN_JPEG_QUALITY, 100)
    }
}
