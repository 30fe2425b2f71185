// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The `update()` dispatcher routes each message to a handler method in the
//! `handlers` submodules:
//!
//! - `handlers::permission`: camera permission answer
//! - `handlers::camera`: flipping, session binding, preview frames
//! - `handlers::capture`: flash, capture, saved photos, thumbnail
//! - `handlers::system`: toasts, config, URLs, context drawer

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== Permission =====
            Message::PermissionResolved(outcome) => self.handle_permission_resolved(outcome),

            // ===== Camera Session =====
            Message::FlipCamera => self.handle_flip_camera(),
            Message::SessionBound(endpoint) => self.handle_session_bound(endpoint),
            Message::SessionBindFailed { generation, error } => {
                self.handle_session_bind_failed(generation, error)
            }
            Message::CameraFrame(frame) => self.handle_camera_frame(frame),

            // ===== Capture =====
            Message::ToggleFlash => self.handle_toggle_flash(),
            Message::Capture => self.handle_capture(),
            Message::FlashComplete(token) => self.handle_flash_complete(token),
            Message::PhotoSaved(result) => self.handle_photo_saved(result),

            // ===== Thumbnail =====
            Message::ThumbnailLoaded { reference, result } => {
                self.handle_thumbnail_loaded(reference, result)
            }
            Message::OpenLastPhoto => self.handle_open_last_photo(),

            // ===== System =====
            Message::CloseToast(id) => self.handle_close_toast(id),
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),
        }
    }
}
