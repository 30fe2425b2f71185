// SPDX-License-Identifier: MPL-2.0

//! Hardware-free camera backend shared by the integration tests

#![allow(dead_code)]

use kamera::backends::camera::{
    BackendError, BackendResult, CameraBackend, CameraDevice, CameraFacing, CameraFrame,
    FrameSink, PreviewStream,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Observable state of a [`FakeBackend`], kept after the backend is boxed
#[derive(Default)]
pub struct FakeState {
    /// Sinks of every preview opened, in order
    pub sinks: Mutex<Vec<FrameSink>>,
    /// Devices preview was opened for, in order
    pub opened: Mutex<Vec<String>>,
    /// Number of previews stopped
    pub stopped: AtomicUsize,
}

impl FakeState {
    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn stopped(&self) -> usize {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Push a frame into the most recently opened preview
    pub fn push_frame(&self, frame: CameraFrame) -> bool {
        let sinks = self.sinks.lock().unwrap();
        sinks.last().expect("no preview opened").push(frame)
    }

    /// Push a frame into the preview opened `index`-th
    pub fn push_frame_to(&self, index: usize, frame: CameraFrame) -> bool {
        let sinks = self.sinks.lock().unwrap();
        sinks[index].push(frame)
    }
}

pub struct FakeBackend {
    devices: Vec<CameraDevice>,
    fail_open: bool,
    state: Arc<FakeState>,
}

impl FakeBackend {
    pub fn new(devices: Vec<CameraDevice>) -> (Self, Arc<FakeState>) {
        let state = Arc::new(FakeState::default());
        let backend = Self {
            devices,
            fail_open: false,
            state: Arc::clone(&state),
        };
        (backend, state)
    }

    /// A front and a back camera
    pub fn phone() -> (Self, Arc<FakeState>) {
        Self::new(vec![
            device("Back Camera", Some(CameraFacing::Back)),
            device("Front Camera", Some(CameraFacing::Front)),
        ])
    }

    /// Every `open_preview` fails
    pub fn failing(devices: Vec<CameraDevice>) -> (Self, Arc<FakeState>) {
        let (mut backend, state) = Self::new(devices);
        backend.fail_open = true;
        (backend, state)
    }
}

impl CameraBackend for FakeBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        self.devices.clone()
    }

    fn open_preview(
        &self,
        device: &CameraDevice,
        sink: FrameSink,
    ) -> BackendResult<Box<dyn PreviewStream>> {
        if self.fail_open {
            return Err(BackendError::InitializationFailed(format!(
                "cannot open {}",
                device.name
            )));
        }
        self.state.opened.lock().unwrap().push(device.name.clone());
        self.state.sinks.lock().unwrap().push(sink);
        Ok(Box::new(FakeStream {
            state: Arc::clone(&self.state),
        }))
    }

    fn name(&self) -> &'static str {
        "fake"
    }

    fn is_available(&self) -> bool {
        true
    }
}

struct FakeStream {
    state: Arc<FakeState>,
}

impl PreviewStream for FakeStream {
    fn stop(self: Box<Self>) -> BackendResult<()> {
        self.state.stopped.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub fn device(name: &str, facing: Option<CameraFacing>) -> CameraDevice {
    CameraDevice {
        name: name.to_string(),
        path: format!("fake-{}", name.to_lowercase().replace(' ', "-")),
        metadata_path: None,
        facing,
    }
}

/// Solid gray RGBA frame
pub fn gray_frame(width: u32, height: u32) -> CameraFrame {
    CameraFrame::from_rgba(width, height, vec![128; (width * height * 4) as usize])
}
