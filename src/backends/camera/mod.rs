// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! ```text
//! ┌─────────────────────┐
//! │   UI Layer (App)    │
//! └──────────┬──────────┘
//!            │ BindRequest / CaptureEndpoint
//!            ▼
//! ┌─────────────────────┐
//! │   CameraProvider    │  ← at most one bound session
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │ CameraBackend Trait │
//! └──────────┬──────────┘
//!            │
//!            ▼
//!       ┌────────┐
//!       │PipeWire│
//!       └────────┘
//! ```

pub mod pipewire;
pub mod provider;
pub mod types;

pub use provider::{
    BindRequest, BindingGuard, CameraProvider, CaptureEndpoint, FrameSink, LatestFrame,
};
pub use types::*;

/// A camera backend: discovers devices and opens live preview streams
pub trait CameraBackend: Send + Sync {
    /// Enumerate available cameras on this backend
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Start streaming `device` into `sink`.
    ///
    /// The stream keeps running until the returned handle is stopped or
    /// dropped.
    fn open_preview(
        &self,
        device: &CameraDevice,
        sink: FrameSink,
    ) -> BackendResult<Box<dyn PreviewStream>>;

    /// Short backend identifier for logs
    fn name(&self) -> &'static str;

    /// Check if this backend is available on the current system
    fn is_available(&self) -> bool;
}

/// A running preview pipeline owned by a capture session
pub trait PreviewStream: Send {
    /// Stop streaming and release the camera
    fn stop(self: Box<Self>) -> BackendResult<()>;
}

/// Get the platform camera backend (PipeWire)
pub fn get_backend() -> Box<dyn CameraBackend> {
    Box::new(pipewire::PipeWireBackend::new())
}

/// Pick the device for `facing`.
///
/// Devices reporting the requested facing win. Otherwise the back camera
/// falls back to the first device not known to be a front camera, and the
/// front camera to the last device not known to be a back camera (laptop
/// webcams usually report no location at all). As a last resort the first
/// device is used so a single camera is always selectable.
pub fn select_camera(devices: &[CameraDevice], facing: CameraFacing) -> Option<&CameraDevice> {
    if let Some(exact) = devices.iter().find(|d| d.facing == Some(facing)) {
        return Some(exact);
    }

    let opposite = Some(facing.flipped());
    let fallback = match facing {
        CameraFacing::Back => devices.iter().find(|d| d.facing != opposite),
        CameraFacing::Front => devices.iter().rev().find(|d| d.facing != opposite),
    };

    fallback.or_else(|| devices.first())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(name: &str, facing: Option<CameraFacing>) -> CameraDevice {
        CameraDevice {
            name: name.to_string(),
            path: format!("pipewire-{name}"),
            metadata_path: None,
            facing,
        }
    }

    #[test]
    fn test_exact_facing_wins() {
        let devices = vec![
            device("front", Some(CameraFacing::Front)),
            device("back", Some(CameraFacing::Back)),
        ];
        assert_eq!(select_camera(&devices, CameraFacing::Back).unwrap().name, "back");
        assert_eq!(select_camera(&devices, CameraFacing::Front).unwrap().name, "front");
    }

    #[test]
    fn test_unknown_locations_split_first_and_last() {
        let devices = vec![device("usb-a", None), device("usb-b", None)];
        assert_eq!(select_camera(&devices, CameraFacing::Back).unwrap().name, "usb-a");
        assert_eq!(select_camera(&devices, CameraFacing::Front).unwrap().name, "usb-b");
    }

    #[test]
    fn test_single_front_camera_serves_both() {
        let devices = vec![device("selfie", Some(CameraFacing::Front))];
        assert_eq!(select_camera(&devices, CameraFacing::Back).unwrap().name, "selfie");
    }

    #[test]
    fn test_no_devices() {
        assert!(select_camera(&[], CameraFacing::Back).is_none());
    }
}
