// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for camera operations
//!
//! - Listing available cameras
//! - Taking a photo through the same capture session and photo pipeline
//!   the application uses

use chrono::Local;
use cosmic::Application;
use futures::channel::mpsc;
use kamera::app::AppModel;
use kamera::backends::camera::{
    BindRequest, CameraFacing, CameraProvider, CaptureEndpoint, FrameReceiver,
};
use kamera::config::Config;
use kamera::constants::{pipeline, timing};
use kamera::fl;
use kamera::flash::{self, FlashDevice, FlashMode};
use kamera::pipelines::photo::PhotoPipeline;
use kamera::storage::PhotoStorage;
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn facing_label(facing: Option<CameraFacing>) -> String {
    match facing {
        Some(CameraFacing::Front) => fl!("camera-facing-front"),
        Some(CameraFacing::Back) => fl!("camera-facing-back"),
        None => "-".to_string(),
    }
}

/// List all available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let provider = CameraProvider::with_default_backend();
    let cameras = provider.backend().enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);
        println!("      Path:   {}", camera.path);
        println!("      Facing: {}", facing_label(camera.facing));
        println!();
    }

    Ok(())
}

/// Wait until the session has produced a frame and the warm-up has passed
fn wait_for_frame(endpoint: &CaptureEndpoint, frames: &mut FrameReceiver) -> bool {
    let start = Instant::now();
    let timeout = Duration::from_secs(timing::CLI_FRAME_TIMEOUT_SECS);
    let warmup = Duration::from_millis(timing::CLI_WARMUP_MS);

    while start.elapsed() < timeout {
        // Nobody renders a preview here; keep the channel drained
        while let Ok(Some(_)) = frames.try_next() {}

        if endpoint.grab_frame().is_ok() && start.elapsed() > warmup {
            return true;
        }
        std::thread::sleep(Duration::from_millis(16));
    }

    endpoint.grab_frame().is_ok()
}

/// `--output` wins over the configured photo directory
fn photo_storage(output: Option<PathBuf>, config: &Config) -> PhotoStorage {
    match output {
        Some(dir) => PhotoStorage::new(dir),
        None => PhotoStorage::from_config(config.photo_directory.as_deref()),
    }
}

/// Take a photo with the camera facing `facing`
pub fn take_photo(
    facing: CameraFacing,
    output: Option<PathBuf>,
    use_flash: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    gstreamer::init()?;

    let (_, config) = Config::load(AppModel::APP_ID);
    let storage = photo_storage(output, &config);
    let photo_pipeline = PhotoPipeline::new(config.effective_jpeg_quality());

    let provider = CameraProvider::with_default_backend();
    let request = BindRequest {
        generation: 1,
        facing,
        flash: FlashMode::from_enabled(use_flash),
    };

    let (sender, mut frames) = mpsc::channel(pipeline::FRAME_CHANNEL_CAPACITY);
    let endpoint = provider.bind(&request, sender)?;
    println!("Using camera: {}", endpoint.device_name());

    println!("Capturing...");
    if !wait_for_frame(&endpoint, &mut frames) {
        provider.unbind_all();
        return Err("Failed to capture frame from camera".into());
    }

    let flash_devices = if endpoint.flash().is_on() {
        FlashDevice::discover()
    } else {
        Vec::new()
    };
    if !flash_devices.is_empty() {
        flash::all_on(&flash_devices);
        std::thread::sleep(Duration::from_millis(timing::FLASH_DURATION_MS));
    }

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(photo_pipeline.capture(&endpoint, &storage, Local::now()));

    flash::all_off(&flash_devices);
    provider.unbind_all();

    let reference = result?;
    println!("Photo saved: {}", reference.path().display());
    println!("URI: {}", reference.uri());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_photo_storage_uses_configured_directory() {
        let config = Config {
            photo_directory: Some(PathBuf::from("/srv/photos")),
            ..Config::default()
        };
        assert_eq!(
            photo_storage(None, &config).directory(),
            Path::new("/srv/photos")
        );
    }

    #[test]
    fn test_output_overrides_configured_directory() {
        let config = Config {
            photo_directory: Some(PathBuf::from("/srv/photos")),
            ..Config::default()
        };
        let storage = photo_storage(Some(PathBuf::from("/tmp/shots")), &config);
        assert_eq!(storage.directory(), Path::new("/tmp/shots"));
    }
}
