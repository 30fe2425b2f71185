// SPDX-License-Identifier: GPL-3.0-only

//! Camera permission handlers

use crate::app::screen::CameraScreen;
use crate::app::state::{AppModel, Message};
use crate::permission::{self, PermissionOutcome};
use cosmic::Task;
use tracing::{info, warn};

impl AppModel {
    /// Issue the one camera access request of this session
    pub(crate) fn request_permission(&mut self) -> Task<cosmic::Action<Message>> {
        if !self.permission.begin_request() {
            return Task::none();
        }

        info!("Requesting camera access");
        Task::perform(permission::request_camera_access(), |outcome| {
            cosmic::Action::App(Message::PermissionResolved(outcome))
        })
    }

    pub(crate) fn handle_permission_resolved(
        &mut self,
        outcome: PermissionOutcome,
    ) -> Task<cosmic::Action<Message>> {
        if !self.permission.resolve(outcome) {
            warn!(?outcome, "Ignoring repeated permission answer");
            return Task::none();
        }

        if outcome.is_granted() {
            info!(facing = %self.config.default_facing, "Camera access granted");
            self.screen = Some(CameraScreen::new(self.config.default_facing));
        } else {
            info!("Camera access denied");
        }
        Task::none()
    }
}
