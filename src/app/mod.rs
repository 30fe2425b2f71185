// SPDX-License-Identifier: MPL-2.0

//! Main application module for Kamera
//!
//! # Architecture
//!
//! - `state`: Application state types (AppModel, Message, ContextPage)
//! - `screen`: Camera screen controller (selection, flash, session, last photo)
//! - `view`: Main view rendering
//! - `update`: Message dispatch to `handlers`

mod handlers;
pub mod screen;
mod state;
mod update;
mod view;

use crate::backends::camera::{BindRequest, BindingGuard, CameraProvider};
use crate::config::Config;
use crate::constants::pipeline::FRAME_CHANNEL_CAPACITY;
use crate::fl;
use crate::flash::FlashDevice;
use crate::pipelines::photo::PhotoPipeline;
use crate::storage::PhotoStorage;
use cosmic::app::context_drawer;
use cosmic::iced::Subscription;
use cosmic::widget::{self, about::About, toaster::Toasts};
use cosmic::{Element, Task};
pub use screen::{CameraScreen, CaptureAction, Notification, SessionState};
pub use state::{AppModel, ContextPage, Message};
use std::sync::Arc;
use tracing::{error, info, warn};

const APP_ICON: &[u8] =
    include_bytes!("../../resources/icons/hicolor/scalable/apps/io.github.kamera.Kamera.svg");

/// Capture session subscription for one bind request.
///
/// Binds on the blocking pool, reports the endpoint, then forwards preview
/// frames until iced drops the subscription (new bind request or teardown).
/// The guard held here unbinds the session when that happens.
fn capture_session(provider: Arc<CameraProvider>, request: BindRequest) -> Subscription<Message> {
    use cosmic::iced::futures::{SinkExt, StreamExt};

    Subscription::run_with_id(
        ("capture-session", request.generation),
        cosmic::iced::stream::channel(FRAME_CHANNEL_CAPACITY, move |mut output| async move {
            let generation = request.generation;
            let (sender, mut frames) = futures::channel::mpsc::channel(FRAME_CHANNEL_CAPACITY);

            let binder = Arc::clone(&provider);
            let bound = tokio::task::spawn_blocking(move || binder.bind(&request, sender)).await;
            let endpoint = match bound {
                Ok(Ok(endpoint)) => endpoint,
                Ok(Err(e)) => {
                    let _ = output
                        .send(Message::SessionBindFailed {
                            generation,
                            error: e.to_string(),
                        })
                        .await;
                    return;
                }
                Err(e) => {
                    let _ = output
                        .send(Message::SessionBindFailed {
                            generation,
                            error: format!("bind task failed: {e}"),
                        })
                        .await;
                    return;
                }
            };

            let _guard = BindingGuard::new(provider, generation);
            if output.send(Message::SessionBound(endpoint)).await.is_err() {
                return;
            }

            while let Some(frame) = frames.next().await {
                // Drop preview frames while the UI is busy, the latest one wins
                if let Err(e) = output.try_send(Message::CameraFrame(frame))
                    && e.is_disconnected()
                {
                    info!(generation, "Capture session subscription closed");
                    break;
                }
            }
            info!(generation, "Preview stream ended");
        }),
    )
}

impl cosmic::Application for AppModel {
    /// The async executor that will be used to run your application's commands.
    type Executor = cosmic::executor::Default;

    /// Data that your application receives to its init method.
    type Flags = ();

    /// Messages which the application and its widgets will emit.
    type Message = Message;

    /// Unique identifier in RDNN (reverse domain name notation) format.
    const APP_ID: &'static str = "io.github.kamera.Kamera";

    fn core(&self) -> &cosmic::Core {
        &self.core
    }

    fn core_mut(&mut self) -> &mut cosmic::Core {
        &mut self.core
    }

    /// Initializes the application with any given flags and startup commands.
    fn init(
        core: cosmic::Core,
        _flags: Self::Flags,
    ) -> (Self, Task<cosmic::Action<Self::Message>>) {
        let about = About::default()
            .name(fl!("app-title"))
            .icon(widget::icon::from_svg_bytes(APP_ICON))
            .version(env!("GIT_VERSION"))
            .license(env!("CARGO_PKG_LICENSE"));

        // Load configuration (read-only, never written back)
        let (config_handler, config) = Config::load(Self::APP_ID);

        if let Err(e) = gstreamer::init() {
            error!(error = %e, "Failed to initialize GStreamer");
        }

        let provider = CameraProvider::with_default_backend();
        if !provider.backend().is_available() {
            warn!(backend = provider.backend().name(), "Camera backend not available");
        }

        let storage = PhotoStorage::from_config(config.photo_directory.as_deref());
        info!(path = %storage.directory().display(), "Photo directory");

        let mut app = AppModel {
            core,
            context_page: ContextPage::default(),
            about,
            photo_pipeline: PhotoPipeline::new(config.effective_jpeg_quality()),
            config,
            config_handler,
            permission: Default::default(),
            screen: None,
            provider: Arc::new(provider),
            storage,
            flash_devices: FlashDevice::discover(),
            preview: None,
            thumbnail: None,
            toasts: Toasts::new(Message::CloseToast),
        };

        let permission_task = app.request_permission();
        (app, permission_task)
    }

    /// Elements to pack at the end of the header bar.
    fn header_end(&self) -> Vec<Element<'_, Self::Message>> {
        vec![
            widget::button::icon(widget::icon::from_name("help-about-symbolic"))
                .on_press(Message::ToggleContextPage(ContextPage::About))
                .into(),
        ]
    }

    /// Display a context drawer if the context page is requested.
    fn context_drawer(&self) -> Option<context_drawer::ContextDrawer<'_, Self::Message>> {
        if !self.core.window.show_context {
            return None;
        }

        Some(match self.context_page {
            ContextPage::About => context_drawer::about(
                &self.about,
                |url| Message::LaunchUrl(url.to_string()),
                Message::ToggleContextPage(ContextPage::About),
            ),
        })
    }

    /// Describes the interface based on the current state of the application model.
    fn view(&self) -> Element<'_, Self::Message> {
        self.view()
    }

    /// Register subscriptions for this application.
    fn subscription(&self) -> Subscription<Self::Message> {
        let config_sub = self
            .core()
            .watch_config::<Config>(Self::APP_ID)
            .map(|update| Message::UpdateConfig(update.config));

        let session_sub = match self.screen.as_ref().and_then(CameraScreen::bind_request) {
            Some(request) => capture_session(Arc::clone(&self.provider), request),
            None => Subscription::none(),
        };

        Subscription::batch([config_sub, session_sub])
    }

    fn update(&mut self, message: Self::Message) -> Task<cosmic::Action<Self::Message>> {
        self.update(message)
    }

    /// Tear the camera screen down and release the device before exiting
    fn on_app_exit(&mut self) -> Option<Self::Message> {
        if let Some(screen) = self.screen.as_mut() {
            screen.teardown();
        }
        crate::flash::all_off(&self.flash_devices);
        self.provider.unbind_all();
        None
    }
}
