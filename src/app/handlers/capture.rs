// SPDX-License-Identifier: GPL-3.0-only

//! Capture handlers
//!
//! Handles the flash toggle, photo capture, save results and the last photo
//! thumbnail.

use crate::app::screen::{CaptureAction, Notification};
use crate::app::state::{AppModel, Message};
use crate::backends::camera::CaptureEndpoint;
use crate::constants::timing;
use crate::fl;
use crate::flash;
use crate::storage::{self, StorageReference, Thumbnail};
use cosmic::Task;
use cosmic::widget::{self, toaster::Toast};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

impl AppModel {
    /// Create a delayed task that sends a message after the specified milliseconds
    pub(crate) fn delay_task(millis: u64, message: Message) -> Task<cosmic::Action<Message>> {
        Task::perform(
            async move {
                tokio::time::sleep(tokio::time::Duration::from_millis(millis)).await;
                message
            },
            cosmic::Action::App,
        )
    }

    pub(crate) fn handle_toggle_flash(&mut self) -> Task<cosmic::Action<Message>> {
        if let Some(screen) = self.screen.as_mut() {
            screen.toggle_flash();
        }
        Task::none()
    }

    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(screen) = self.screen.as_mut() else {
            return Task::none();
        };

        match screen.request_capture() {
            Some(CaptureAction::Capture(endpoint)) => self.capture_photo(endpoint),
            Some(CaptureAction::FlashFirst(token)) => {
                info!(token, duration_ms = timing::FLASH_DURATION_MS, "Firing flash before capture");
                flash::all_on(&self.flash_devices);
                Self::delay_task(timing::FLASH_DURATION_MS, Message::FlashComplete(token))
            }
            None => {
                debug!("No capture endpoint bound, ignoring capture");
                Task::none()
            }
        }
    }

    pub(crate) fn handle_flash_complete(&mut self, token: u64) -> Task<cosmic::Action<Message>> {
        let Some(endpoint) = self
            .screen
            .as_mut()
            .and_then(|screen| screen.flash_complete(token))
        else {
            // Cancelled flash; a newer one may still be lighting the scene
            return Task::none();
        };

        // The overlay is gone; grab the still before the LEDs go dark
        let task = self.capture_photo(endpoint);
        flash::all_off(&self.flash_devices);
        task
    }

    /// Grab the latest frame now and save it in the background
    fn capture_photo(&self, endpoint: CaptureEndpoint) -> Task<cosmic::Action<Message>> {
        let taken_at = chrono::Local::now();
        let frame = match endpoint.grab_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!(error = %e, "Nothing to capture");
                return Task::done(cosmic::Action::App(Message::PhotoSaved(Err(e.to_string()))));
            }
        };

        let pipeline = self.photo_pipeline;
        let storage = self.storage.clone();
        Task::perform(
            async move {
                pipeline
                    .capture_and_save(frame, &storage, taken_at)
                    .await
                    .map_err(|e| e.to_string())
            },
            |result| cosmic::Action::App(Message::PhotoSaved(result)),
        )
    }

    pub(crate) fn handle_photo_saved(
        &mut self,
        result: Result<StorageReference, String>,
    ) -> Task<cosmic::Action<Message>> {
        let Some(screen) = self.screen.as_mut() else {
            return Task::none();
        };

        let saved = result.as_ref().ok().cloned();
        let notification = screen.photo_saved(result);
        let text = match notification {
            Notification::PhotoSaved => fl!("photo-saved"),
            Notification::PhotoFailed => fl!("photo-save-failed"),
        };
        let toast = self.toasts.push(Toast::new(text)).map(cosmic::Action::App);

        match saved {
            Some(reference) => Task::batch([toast, Self::load_thumbnail_task(reference)]),
            None => toast,
        }
    }

    fn load_thumbnail_task(reference: StorageReference) -> Task<cosmic::Action<Message>> {
        Task::perform(
            async move {
                let result = storage::load_thumbnail(reference.clone())
                    .await
                    .map(Arc::new)
                    .map_err(|e| e.to_string());
                (reference, result)
            },
            |(reference, result)| {
                cosmic::Action::App(Message::ThumbnailLoaded { reference, result })
            },
        )
    }

    pub(crate) fn handle_thumbnail_loaded(
        &mut self,
        reference: StorageReference,
        result: Result<Arc<Thumbnail>, String>,
    ) -> Task<cosmic::Action<Message>> {
        // Decodes can finish out of order; only the last saved photo is shown
        if !self
            .screen
            .as_ref()
            .is_some_and(|screen| screen.is_last_saved(&reference))
        {
            debug!(path = %reference.path().display(), "Dropping outdated thumbnail");
            return Task::none();
        }

        match result {
            Ok(thumbnail) => {
                self.thumbnail = Some(widget::image::Handle::from_rgba(
                    thumbnail.width,
                    thumbnail.height,
                    thumbnail.rgba.clone(),
                ));
            }
            Err(e) => {
                // Keep the reference, just hide the thumbnail
                error!(error = %e, "Failed to decode last photo");
                self.thumbnail = None;
            }
        }
        Task::none()
    }

    pub(crate) fn handle_open_last_photo(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(reference) = self.screen.as_ref().and_then(|s| s.last_saved()) else {
            return Task::none();
        };

        if let Err(e) = open::that_detached(reference.path()) {
            error!(path = %reference.path().display(), error = %e, "Failed to open photo");
        }
        Task::none()
    }
}
