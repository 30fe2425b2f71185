// SPDX-License-Identifier: GPL-3.0-only

//! Camera screen controller
//!
//! Holds everything the camera screen knows: the camera selection, the flash
//! toggle, the bound session and the last saved photo. It performs no I/O;
//! the application turns its return values into tasks and subscriptions.

use crate::backends::camera::{BindRequest, CameraFacing, CaptureEndpoint};
use crate::flash::FlashMode;
use crate::storage::StorageReference;
use tracing::{debug, info, warn};

/// Lifecycle of the screen's capture session
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// Nothing bound (screen torn down)
    #[default]
    Unbound,
    /// Bind requested, waiting for the provider
    Binding(BindRequest),
    /// Live preview and capture endpoint
    Bound(CaptureEndpoint),
    /// The last bind failed; the next flip retries
    Failed { generation: u64, error: String },
}

/// What the application should do for a capture tap
#[derive(Debug, Clone)]
pub enum CaptureAction {
    /// Take the photo now
    Capture(CaptureEndpoint),
    /// Fire the flash first; the photo is taken when `flash_complete` is
    /// called with this token
    FlashFirst(u64),
}

/// Result notification for a finished capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    PhotoSaved,
    PhotoFailed,
}

#[derive(Debug)]
pub struct CameraScreen {
    facing: CameraFacing,
    flash_enabled: bool,
    last_saved: Option<StorageReference>,
    session: SessionState,
    /// Request the capture session subscription runs for
    active_request: Option<BindRequest>,
    next_generation: u64,
    flash_active: bool,
    /// Token of the running flash and the endpoint it was fired for
    pending_flash_capture: Option<(u64, CaptureEndpoint)>,
    next_flash_token: u64,
    captures_in_flight: u32,
}

impl CameraScreen {
    /// Create the screen and request the initial bind
    pub fn new(facing: CameraFacing) -> Self {
        let mut screen = Self {
            facing,
            flash_enabled: false,
            last_saved: None,
            session: SessionState::Unbound,
            active_request: None,
            next_generation: 1,
            flash_active: false,
            pending_flash_capture: None,
            next_flash_token: 1,
            captures_in_flight: 0,
        };
        screen.request_bind();
        screen
    }

    fn request_bind(&mut self) -> BindRequest {
        let request = BindRequest {
            generation: self.next_generation,
            facing: self.facing,
            flash: FlashMode::from_enabled(self.flash_enabled),
        };
        self.next_generation += 1;

        // A flash waiting on the old session has nothing to capture anymore
        self.flash_active = false;
        self.pending_flash_capture = None;

        self.active_request = Some(request);
        self.session = SessionState::Binding(request);
        debug!(generation = request.generation, facing = %request.facing, "Bind requested");
        request
    }

    pub fn facing(&self) -> CameraFacing {
        self.facing
    }

    pub fn flash_enabled(&self) -> bool {
        self.flash_enabled
    }

    pub fn last_saved(&self) -> Option<&StorageReference> {
        self.last_saved.as_ref()
    }

    /// Whether `reference` is the photo the thumbnail should show
    pub fn is_last_saved(&self, reference: &StorageReference) -> bool {
        self.last_saved.as_ref() == Some(reference)
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// The bind the capture session subscription should hold
    pub fn bind_request(&self) -> Option<BindRequest> {
        self.active_request
    }

    /// Endpoint of the bound session
    pub fn endpoint(&self) -> Option<&CaptureEndpoint> {
        match &self.session {
            SessionState::Bound(endpoint) => Some(endpoint),
            _ => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.endpoint().is_some()
    }

    pub fn bind_failed(&self) -> bool {
        matches!(self.session, SessionState::Failed { .. })
    }

    /// White overlay shown while the flash fires
    pub fn flash_active(&self) -> bool {
        self.flash_active
    }

    pub fn is_capturing(&self) -> bool {
        self.captures_in_flight > 0 || self.flash_active
    }

    /// Switch between front and back; always rebinds
    pub fn flip_camera(&mut self) -> BindRequest {
        self.facing = self.facing.flipped();
        info!(facing = %self.facing, "Flipping camera");
        self.request_bind()
    }

    /// Toggle the flash. The bound session keeps the flash mode it was bound
    /// with; the new value applies from the next bind.
    pub fn toggle_flash(&mut self) -> bool {
        self.flash_enabled = !self.flash_enabled;
        debug!(flash_enabled = self.flash_enabled, "Flash toggled");
        self.flash_enabled
    }

    /// The provider bound a session. Stale generations are ignored.
    pub fn session_bound(&mut self, endpoint: CaptureEndpoint) -> bool {
        match &self.session {
            SessionState::Binding(request) if request.generation == endpoint.generation() => {
                info!(
                    generation = endpoint.generation(),
                    device = %endpoint.device_name(),
                    "Capture session bound"
                );
                self.session = SessionState::Bound(endpoint);
                true
            }
            _ => {
                debug!(generation = endpoint.generation(), "Ignoring stale session");
                false
            }
        }
    }

    /// A bind failed. The screen stays usable; flipping retries.
    pub fn session_failed(&mut self, generation: u64, error: String) -> bool {
        let current = self.active_request.map(|r| r.generation);
        if current != Some(generation) {
            debug!(generation, "Ignoring failure of a stale bind");
            return false;
        }

        warn!(generation, %error, "Capture session bind failed");
        self.active_request = None;
        self.session = SessionState::Failed { generation, error };
        true
    }

    /// Handle a capture tap. `None` when no endpoint is bound (or a flash
    /// capture is already running).
    pub fn request_capture(&mut self) -> Option<CaptureAction> {
        if self.flash_active {
            return None;
        }
        let endpoint = self.endpoint()?.clone();

        if endpoint.flash().is_on() {
            let token = self.next_flash_token;
            self.next_flash_token += 1;
            self.flash_active = true;
            self.pending_flash_capture = Some((token, endpoint));
            Some(CaptureAction::FlashFirst(token))
        } else {
            self.captures_in_flight += 1;
            Some(CaptureAction::Capture(endpoint))
        }
    }

    /// The flash fired with `token` has been on long enough; returns the
    /// endpoint to capture from. Timers of cancelled flashes are ignored.
    pub fn flash_complete(&mut self, token: u64) -> Option<CaptureEndpoint> {
        match &self.pending_flash_capture {
            Some((pending, _)) if *pending == token => {}
            _ => {
                debug!(token, "Ignoring stale flash timer");
                return None;
            }
        }
        let (_, endpoint) = self.pending_flash_capture.take()?;
        self.flash_active = false;
        self.captures_in_flight += 1;
        Some(endpoint)
    }

    /// Record the outcome of a capture. Failures never touch the last saved
    /// reference.
    pub fn photo_saved(&mut self, result: Result<StorageReference, String>) -> Notification {
        self.captures_in_flight = self.captures_in_flight.saturating_sub(1);
        match result {
            Ok(reference) => {
                info!(path = %reference.path().display(), "Last saved photo updated");
                self.last_saved = Some(reference);
                Notification::PhotoSaved
            }
            Err(error) => {
                warn!(%error, "Photo capture failed");
                Notification::PhotoFailed
            }
        }
    }

    /// Drop the session; the subscription unbinds it when it goes away
    pub fn teardown(&mut self) {
        self.active_request = None;
        self.session = SessionState::Unbound;
        self.flash_active = false;
        self.pending_flash_capture = None;
    }
}
