// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Handles toasts, configuration updates, external URLs and the context
//! drawer.

use crate::app::state::{AppModel, ContextPage, Message};
use crate::config::Config;
use crate::pipelines::photo::PhotoPipeline;
use crate::storage::PhotoStorage;
use cosmic::Task;
use cosmic::widget;
use tracing::{error, info};

impl AppModel {
    pub(crate) fn handle_close_toast(&mut self, id: widget::ToastId) -> Task<cosmic::Action<Message>> {
        self.toasts.remove(id);
        Task::none()
    }

    pub(crate) fn handle_update_config(&mut self, config: Config) -> Task<cosmic::Action<Message>> {
        if config == self.config {
            return Task::none();
        }

        info!(?config, "Configuration changed");
        if config.photo_directory != self.config.photo_directory {
            self.storage = PhotoStorage::from_config(config.photo_directory.as_deref());
        }
        self.photo_pipeline = PhotoPipeline::new(config.effective_jpeg_quality());
        // default_facing only applies to the next camera screen
        self.config = config;
        Task::none()
    }

    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }
}
