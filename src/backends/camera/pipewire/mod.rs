// SPDX-License-Identifier: MPL-2.0

//! PipeWire camera backend
//!
//! Cameras are enumerated through `pw-cli` and streamed with GStreamer's
//! `pipewiresrc`, which also works from inside the Flatpak sandbox once the
//! camera portal has granted access.

mod enumeration;
mod pipeline;

pub use enumeration::{
    VideoSourceNode, enumerate_pipewire_cameras, is_pipewire_available, parse_location,
    parse_video_sources,
};
pub use pipeline::{PipeWirePipeline, launch_description};

use super::types::*;
use super::{CameraBackend, FrameSink, PreviewStream};
use tracing::info;

/// PipeWire backend implementation
#[derive(Debug, Default)]
pub struct PipeWireBackend;

impl PipeWireBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for PipeWireBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        match enumerate_pipewire_cameras() {
            Some(cameras) => cameras,
            None => {
                info!("PipeWire enumeration returned None");
                Vec::new()
            }
        }
    }

    fn open_preview(
        &self,
        device: &CameraDevice,
        sink: FrameSink,
    ) -> BackendResult<Box<dyn PreviewStream>> {
        let pipeline = PipeWirePipeline::new(device, sink)?;
        Ok(Box::new(pipeline))
    }

    fn name(&self) -> &'static str {
        "pipewire"
    }

    fn is_available(&self) -> bool {
        is_pipewire_available()
    }
}
