// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

/// Photo storage constants
pub mod storage {
    /// Subdirectory of the XDG Pictures directory that receives photos
    pub const PHOTO_SUBDIRECTORY: &str = "Kamera";

    /// chrono format for photo display names (`yyyyMMdd_HHmmss`)
    pub const DISPLAY_NAME_FORMAT: &str = "%Y%m%d_%H%M%S";

    /// MIME type of every captured photo
    pub const JPEG_MIME_TYPE: &str = "image/jpeg";

    /// File extension matching [`JPEG_MIME_TYPE`]
    pub const JPEG_EXTENSION: &str = "jpg";

    /// Upper bound on ` (n)` suffixes tried when a display name is taken
    pub const MAX_NAME_COLLISIONS: u32 = 99;
}

/// Photo encoding constants
pub mod photo {
    /// Default JPEG quality (0-100)
    pub const DEFAULT_JPEG_QUALITY: u8 = 92;

    /// Lowest JPEG quality accepted from the configuration
    pub const MIN_JPEG_QUALITY: u8 = 10;
}

/// Camera pipeline constants
pub mod pipeline {
    /// Maximum buffers queued in the appsink before old frames are dropped
    pub const MAX_BUFFERS: u32 = 2;

    /// Capacity of the frame channel between the pipeline and the UI
    pub const FRAME_CHANNEL_CAPACITY: usize = 4;

    /// Pixel format requested from videoconvert for preview and capture
    pub const OUTPUT_FORMAT: &str = "RGBA";
}

/// Timing constants
pub mod timing {
    /// Seconds to wait for the pipeline to reach PLAYING
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// Seconds to wait for the pipeline to reach NULL
    pub const STOP_TIMEOUT_SECS: u64 = 2;

    /// Log frame statistics every N frames
    pub const FRAME_LOG_INTERVAL: u64 = 120;

    /// How long the flash overlay and LEDs stay on before the frame is grabbed
    pub const FLASH_DURATION_MS: u64 = 1000;

    /// CLI: time to let auto exposure settle before taking the photo
    pub const CLI_WARMUP_MS: u64 = 500;

    /// CLI: give up when no frame arrives within this many seconds
    pub const CLI_FRAME_TIMEOUT_SECS: u64 = 5;
}

/// UI constants
pub mod ui {
    /// Fixed height of the last-photo thumbnail
    pub const THUMBNAIL_HEIGHT: f32 = 120.0;

    /// Padding around the thumbnail
    pub const THUMBNAIL_PADDING: u16 = 8;

    /// Outer diameter of the capture button
    pub const CAPTURE_BUTTON_OUTER: f32 = 64.0;

    /// Inner diameter of the capture button
    pub const CAPTURE_BUTTON_INNER: f32 = 52.0;

    /// Size of the flip/flash/gallery icons
    pub const CONTROL_ICON_SIZE: u16 = 24;

    /// Padding of the controls row
    pub const CONTROLS_PADDING: u16 = 16;

    /// Minimum window size
    pub const MIN_WINDOW_WIDTH: f32 = 360.0;
    pub const MIN_WINDOW_HEIGHT: f32 = 480.0;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_matches_mime_type() {
        assert!(storage::JPEG_MIME_TYPE.ends_with("jpeg"));
        assert_eq!(storage::JPEG_EXTENSION, "jpg");
    }

    #[test]
    fn test_default_quality_in_range() {
        assert!(photo::DEFAULT_JPEG_QUALITY >= photo::MIN_JPEG_QUALITY);
        assert!(photo::DEFAULT_JPEG_QUALITY <= 100);
    }
}
