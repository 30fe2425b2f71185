// SPDX-License-Identifier: GPL-3.0-only

//! Camera session handlers
//!
//! Flipping the camera, session bind results and preview frames.

use crate::app::state::{AppModel, Message};
use crate::backends::camera::CameraFacing;
use crate::backends::camera::CaptureEndpoint;
use crate::backends::camera::types::CameraFrame;
use cosmic::Task;
use cosmic::widget;
use std::sync::Arc;
use tracing::{debug, error};

/// RGBA pixels for the preview, mirrored horizontally when requested
pub(crate) fn preview_pixels(frame: &CameraFrame, mirror: bool) -> Vec<u8> {
    let mut pixels = frame.packed_rgba();
    if mirror {
        let row_bytes = frame.width as usize * 4;
        for row in pixels.chunks_exact_mut(row_bytes) {
            let width = row.len() / 4;
            for x in 0..width / 2 {
                let (left, right) = (x * 4, (width - 1 - x) * 4);
                for c in 0..4 {
                    row.swap(left + c, right + c);
                }
            }
        }
    }
    pixels
}

impl AppModel {
    pub(crate) fn handle_flip_camera(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(screen) = self.screen.as_mut() else {
            return Task::none();
        };

        let was_flashing = screen.flash_active();
        let request = screen.flip_camera();
        debug!(generation = request.generation, "Rebinding after flip");
        if was_flashing {
            // The flip cancelled the pending flash capture
            crate::flash::all_off(&self.flash_devices);
        }
        // Keep the old frame off screen while the other camera starts
        self.preview = None;
        Task::none()
    }

    pub(crate) fn handle_session_bound(
        &mut self,
        endpoint: CaptureEndpoint,
    ) -> Task<cosmic::Action<Message>> {
        if let Some(screen) = self.screen.as_mut() {
            screen.session_bound(endpoint);
        }
        Task::none()
    }

    pub(crate) fn handle_session_bind_failed(
        &mut self,
        generation: u64,
        error: String,
    ) -> Task<cosmic::Action<Message>> {
        if let Some(screen) = self.screen.as_mut()
            && screen.session_failed(generation, error.clone())
        {
            error!(generation, %error, "Camera unavailable");
            self.preview = None;
        }
        Task::none()
    }

    pub(crate) fn handle_camera_frame(
        &mut self,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        let Some(screen) = self.screen.as_ref() else {
            return Task::none();
        };
        if !screen.is_bound() || !frame.is_complete() {
            return Task::none();
        }

        let mirror =
            self.config.mirror_front_preview && screen.facing() == CameraFacing::Front;
        let pixels = preview_pixels(&frame, mirror);
        self.preview = Some(widget::image::Handle::from_rgba(
            frame.width,
            frame.height,
            pixels,
        ));
        Task::none()
    }
}
