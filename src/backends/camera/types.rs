// SPDX-License-Identifier: MPL-2.0

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;

/// Which way the selected camera points
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraFacing {
    #[default]
    Back,
    Front,
}

impl CameraFacing {
    /// The opposite camera
    pub fn flipped(self) -> Self {
        match self {
            CameraFacing::Back => CameraFacing::Front,
            CameraFacing::Front => CameraFacing::Back,
        }
    }

    /// Parse a libcamera location property (`api.libcamera.location`).
    ///
    /// `external` cameras have no facing and yield `None`.
    pub fn from_location(location: &str) -> Option<Self> {
        match location.trim().to_ascii_lowercase().as_str() {
            "front" => Some(CameraFacing::Front),
            "back" => Some(CameraFacing::Back),
            _ => None,
        }
    }
}

impl fmt::Display for CameraFacing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraFacing::Back => write!(f, "back"),
            CameraFacing::Front => write!(f, "front"),
        }
    }
}

impl FromStr for CameraFacing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_location(s).ok_or_else(|| format!("unknown camera facing '{s}' (front, back)"))
    }
}

/// Camera device discovered by a backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Human readable name (`node.description`)
    pub name: String,
    /// Backend specific path, e.g. `pipewire-serial-2146`
    pub path: String,
    /// PipeWire node id, used for metadata queries
    pub metadata_path: Option<String>,
    /// Mounting position, when the system reports one
    pub facing: Option<CameraFacing>,
}

/// A single RGBA frame from the preview pipeline
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Bytes per row, may include padding
    pub stride: u32,
    /// RGBA pixels, `stride * height` bytes
    pub data: Arc<[u8]>,
    /// When the frame left the pipeline
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Build a frame from tightly packed RGBA pixels
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            stride: width * 4,
            data: Arc::from(data),
            captured_at: Instant::now(),
        }
    }

    /// Whether `data` holds at least `stride * height` bytes
    pub fn is_complete(&self) -> bool {
        self.stride >= self.width * 4
            && self.data.len() >= self.stride as usize * self.height as usize
    }

    /// RGBA pixels with row padding removed
    pub fn packed_rgba(&self) -> Vec<u8> {
        let row_bytes = self.width as usize * 4;
        let stride = self.stride as usize;
        if stride == row_bytes {
            return self.data[..row_bytes * self.height as usize].to_vec();
        }

        let mut out = Vec::with_capacity(row_bytes * self.height as usize);
        for row in self.data.chunks(stride).take(self.height as usize) {
            out.extend_from_slice(&row[..row_bytes]);
        }
        out
    }

    /// RGB pixels (alpha dropped, padding removed)
    pub fn packed_rgb(&self) -> Vec<u8> {
        let stride = self.stride as usize;
        let mut out = Vec::with_capacity(self.width as usize * self.height as usize * 3);
        for row in self.data.chunks(stride).take(self.height as usize) {
            for px in row[..self.width as usize * 4].chunks_exact(4) {
                out.extend_from_slice(&px[..3]);
            }
        }
        out
    }
}

/// Frame receiver type for preview streams
pub type FrameReceiver = futures::channel::mpsc::Receiver<Arc<CameraFrame>>;

/// Frame sender type for preview streams
pub type FrameSender = futures::channel::mpsc::Sender<Arc<CameraFrame>>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone)]
pub enum BackendError {
    /// Failed to initialize backend
    InitializationFailed(String),
    /// Camera device not found
    DeviceNotFound(String),
    /// Other errors
    Other(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_twice_is_identity() {
        let facing = CameraFacing::default();
        assert_eq!(facing, CameraFacing::Back);
        assert_eq!(facing.flipped(), CameraFacing::Front);
        assert_eq!(facing.flipped().flipped(), facing);
    }

    #[test]
    fn test_location_parsing() {
        assert_eq!(CameraFacing::from_location("front"), Some(CameraFacing::Front));
        assert_eq!(CameraFacing::from_location("Back"), Some(CameraFacing::Back));
        assert_eq!(CameraFacing::from_location("external"), None);
        assert!("sideways".parse::<CameraFacing>().is_err());
    }

    #[test]
    fn test_packed_rgb_strips_padding_and_alpha() {
        // 2x2 frame with 4 bytes of padding per row
        let data = vec![
            1, 2, 3, 255, 4, 5, 6, 255, 0, 0, 0, 0, //
            7, 8, 9, 255, 10, 11, 12, 255, 0, 0, 0, 0,
        ];
        let frame = CameraFrame {
            width: 2,
            height: 2,
            stride: 12,
            data: Arc::from(data),
            captured_at: Instant::now(),
        };
        assert!(frame.is_complete());
        assert_eq!(frame.packed_rgb(), vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        assert_eq!(frame.packed_rgba().len(), 16);
    }

    #[test]
    fn test_truncated_frame_is_incomplete() {
        let frame = CameraFrame {
            width: 4,
            height: 4,
            stride: 16,
            data: Arc::from(vec![0u8; 10]),
            captured_at: Instant::now(),
        };
        assert!(!frame.is_complete());
    }
}
