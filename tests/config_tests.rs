// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use kamera::Config;
use kamera::backends::camera::CameraFacing;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert_eq!(config.default_facing, CameraFacing::Back);
    assert!(config.photo_directory.is_none());
    assert!(
        config.mirror_front_preview,
        "Front preview should be mirrored by default"
    );
}

#[test]
fn test_jpeg_quality_is_clamped() {
    let mut config = Config::default();
    assert_eq!(config.effective_jpeg_quality(), 92);

    config.jpeg_quality = 0;
    assert_eq!(config.effective_jpeg_quality(), 10);

    config.jpeg_quality = 255;
    assert_eq!(config.effective_jpeg_quality(), 100);
}
