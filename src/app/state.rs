// SPDX-License-Identifier: GPL-3.0-only

//! Application state and messages

use super::screen::CameraScreen;
use crate::backends::camera::types::CameraFrame;
use crate::backends::camera::{CameraProvider, CaptureEndpoint};
use crate::config::Config;
use crate::flash::FlashDevice;
use crate::permission::{PermissionGate, PermissionOutcome};
use crate::pipelines::photo::PhotoPipeline;
use crate::storage::{PhotoStorage, StorageReference, Thumbnail};
use cosmic::cosmic_config;
use cosmic::widget::{self, about::About, toaster::Toasts};
use std::sync::Arc;

/// Pages shown in the context drawer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContextPage {
    #[default]
    About,
}

/// The application model stores app-specific state used to describe its
/// interface and drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Handler kept alive so config changes keep being delivered
    pub config_handler: Option<cosmic_config::Config>,

    /// Single-shot camera permission
    pub permission: PermissionGate,
    /// Present once permission is granted
    pub screen: Option<CameraScreen>,

    /// Binds capture sessions, shared with the session subscription
    pub provider: Arc<CameraProvider>,
    pub storage: PhotoStorage,
    pub photo_pipeline: PhotoPipeline,
    pub flash_devices: Vec<FlashDevice>,

    /// Latest preview frame, ready to draw
    pub preview: Option<widget::image::Handle>,
    /// Decoded last saved photo
    pub thumbnail: Option<widget::image::Handle>,

    pub toasts: Toasts<Message>,
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    /// The portal answered the camera access request
    PermissionResolved(PermissionOutcome),

    // Camera session
    FlipCamera,
    SessionBound(CaptureEndpoint),
    SessionBindFailed { generation: u64, error: String },
    CameraFrame(Arc<CameraFrame>),

    // Capture
    ToggleFlash,
    Capture,
    /// The flash with this token has been on long enough
    FlashComplete(u64),
    PhotoSaved(Result<StorageReference, String>),

    // Thumbnail
    /// Decoded thumbnail of `reference`
    ThumbnailLoaded {
        reference: StorageReference,
        result: Result<Arc<Thumbnail>, String>,
    },
    OpenLastPhoto,

    // System
    CloseToast(widget::ToastId),
    UpdateConfig(Config),
    LaunchUrl(String),
    ToggleContextPage(ContextPage),
}
