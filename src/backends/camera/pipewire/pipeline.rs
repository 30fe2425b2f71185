// SPDX-License-Identifier: MPL-2.0

//! PipeWire GStreamer pipeline for camera preview and capture
//!
//! `pipewiresrc ! videoconvert ! video/x-raw,format=RGBA ! appsink`

use super::super::types::*;
use super::super::{FrameSink, PreviewStream};
use crate::constants::{pipeline, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Build the `pipewiresrc` source properties for a device path
fn source_properties(device_path: &str) -> String {
    if device_path.is_empty() {
        // PipeWire picks the default camera
        String::new()
    } else if let Some(serial) = device_path.strip_prefix("pipewire-serial-") {
        format!("target-object={} ", serial)
    } else if let Some(node_id) = device_path.strip_prefix("pipewire-") {
        format!("target-object={} ", node_id)
    } else if device_path.starts_with("/dev/video") {
        format!("path=v4l2:{} ", device_path)
    } else {
        warn!(device_path, "Unknown device path format, using path property");
        format!("path={} ", device_path)
    }
}

/// Full launch description for a device
pub fn launch_description(device_path: &str) -> String {
    format!(
        "pipewiresrc {}do-timestamp=true ! videoconvert ! video/x-raw,format={} ! \
         appsink name=sink",
        source_properties(device_path),
        pipeline::OUTPUT_FORMAT
    )
}

/// PipeWire camera pipeline
pub struct PipeWirePipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
}

impl PipeWirePipeline {
    /// Create and start a pipeline streaming `device` into `sink`
    pub fn new(device: &CameraDevice, sink: FrameSink) -> BackendResult<Self> {
        info!(device = %device.name, path = %device.path, "Creating PipeWire pipeline");

        gstreamer::init().map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        let description = launch_description(&device.path);
        debug!(%description, "Launching pipeline");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| BackendError::InitializationFailed("Not a pipeline".to_string()))?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to cast appsink".to_string())
            })?;

        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        let frame_counter = Arc::new(AtomicU64::new(0));
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_num = frame_counter.fetch_add(1, Ordering::Relaxed);
                    let log_this = frame_num % timing::FRAME_LOG_INTERVAL == 0;

                    let sample = appsink.pull_sample().map_err(|e| {
                        if log_this {
                            error!(frame = frame_num, error = ?e, "Failed to pull sample");
                        }
                        gstreamer::FlowError::Eos
                    })?;
                    let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                    if buffer.flags().contains(gstreamer::BufferFlags::CORRUPTED) {
                        if log_this {
                            warn!(frame = frame_num, "Buffer marked as corrupted, skipping frame");
                        }
                        return Ok(gstreamer::FlowSuccess::Ok);
                    }

                    let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;
                    let video_info =
                        VideoInfo::from_caps(caps).map_err(|_| gstreamer::FlowError::Error)?;
                    let map = buffer
                        .map_readable()
                        .map_err(|_| gstreamer::FlowError::Error)?;

                    let frame = CameraFrame {
                        width: video_info.width(),
                        height: video_info.height(),
                        stride: video_info.stride()[0] as u32,
                        data: Arc::from(map.as_slice()),
                        captured_at: Instant::now(),
                    };

                    if log_this {
                        debug!(
                            frame = frame_num,
                            width = frame.width,
                            height = frame.height,
                            stride = frame.stride,
                            "Preview frame"
                        );
                    }

                    if sink.push(frame) {
                        Ok(gstreamer::FlowSuccess::Ok)
                    } else {
                        // Session unbound, stop pulling
                        Err(gstreamer::FlowError::Flushing)
                    }
                })
                .build(),
        );

        pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            BackendError::InitializationFailed(format!("Failed to start pipeline: {}", e))
        })?;

        let (result, state, pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, pending = ?pending, "Pipeline state");
        if result.is_err() {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(BackendError::InitializationFailed(format!(
                "Pipeline failed to start for {}",
                device.name
            )));
        }
        if state != gstreamer::State::Playing {
            warn!("Pipeline is not in PLAYING state yet");
        }

        info!("PipeWire camera pipeline running");
        Ok(Self { pipeline, appsink })
    }

    fn shut_down(&self) -> BackendResult<()> {
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());
        self.pipeline
            .set_state(gstreamer::State::Null)
            .map_err(|e| BackendError::Other(format!("Failed to stop pipeline: {}", e)))?;

        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        match result {
            Ok(_) => info!(state = ?state, "PipeWire pipeline stopped"),
            Err(e) => debug!(error = ?e, state = ?state, "Pipeline state change had issues"),
        }
        Ok(())
    }
}

impl PreviewStream for PipeWirePipeline {
    fn stop(self: Box<Self>) -> BackendResult<()> {
        // Drop runs the same shutdown again; setting Null twice is harmless
        self.shut_down()
    }
}

impl Drop for PipeWirePipeline {
    fn drop(&mut self) {
        if let Err(e) = self.shut_down() {
            warn!(error = %e, "Failed to stop pipeline on drop");
        }
    }
}
