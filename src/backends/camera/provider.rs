// SPDX-License-Identifier: GPL-3.0-only

//! Process-wide camera binder
//!
//! The provider owns the single live capture session. Binding a new session
//! always tears the previous one down first, under the provider lock, so the
//! camera device is never opened twice.

use super::types::{BackendError, BackendResult, CameraFacing, CameraFrame, FrameSender};
use super::{CameraBackend, PreviewStream, select_camera};
use crate::constants::timing;
use crate::errors::{AppError, CameraError, PhotoError};
use crate::flash::FlashMode;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

/// What to bind: the camera selection and flash setting at bind time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindRequest {
    /// Monotonic bind counter; newer requests supersede older ones
    pub generation: u64,
    pub facing: CameraFacing,
    pub flash: FlashMode,
}

/// Most recent frame of a session, shared between the pipeline and the
/// capture endpoint
#[derive(Clone, Default)]
pub struct LatestFrame(Arc<Mutex<Option<Arc<CameraFrame>>>>);

impl LatestFrame {
    fn slot(&self) -> MutexGuard<'_, Option<Arc<CameraFrame>>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn store(&self, frame: Arc<CameraFrame>) {
        *self.slot() = Some(frame);
    }

    pub fn get(&self) -> Option<Arc<CameraFrame>> {
        self.slot().clone()
    }

    fn clear(&self) {
        *self.slot() = None;
    }
}

/// Where a preview pipeline delivers its frames.
///
/// Every frame updates the capture endpoint's latest-frame slot and is
/// offered to the UI channel without blocking; the UI copy is dropped when
/// the channel is full.
#[derive(Clone)]
pub struct FrameSink {
    latest: LatestFrame,
    // One sender for all clones; a cloned sender gets its own queue slot
    sender: Arc<Mutex<FrameSender>>,
    live: Arc<AtomicBool>,
    delivered: Arc<AtomicU64>,
}

impl FrameSink {
    pub fn new(latest: LatestFrame, sender: FrameSender, live: Arc<AtomicBool>) -> Self {
        Self {
            latest,
            sender: Arc::new(Mutex::new(sender)),
            live,
            delivered: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Deliver a frame. Returns false once the session is unbound.
    pub fn push(&self, frame: CameraFrame) -> bool {
        if !self.live.load(Ordering::Acquire) {
            return false;
        }

        let frame = Arc::new(frame);
        self.latest.store(Arc::clone(&frame));

        let count = self.delivered.fetch_add(1, Ordering::Relaxed);
        let sent = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .try_send(frame);
        if let Err(e) = sent
            && count % timing::FRAME_LOG_INTERVAL == 0
        {
            debug!(frame = count, error = ?e, "Preview frame dropped (channel full)");
        }
        true
    }
}

/// The capture side of a bound session.
///
/// Cloned into photo tasks; once the session is unbound every clone reports
/// [`CameraError::NotBound`].
#[derive(Clone)]
pub struct CaptureEndpoint {
    generation: u64,
    device_name: String,
    facing: CameraFacing,
    flash: FlashMode,
    live: Arc<AtomicBool>,
    latest: LatestFrame,
}

impl CaptureEndpoint {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn facing(&self) -> CameraFacing {
        self.facing
    }

    /// Flash mode frozen when the session was bound
    pub fn flash(&self) -> FlashMode {
        self.flash
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    /// Most recent frame of the live session
    pub fn grab_frame(&self) -> Result<Arc<CameraFrame>, AppError> {
        if !self.is_live() {
            return Err(CameraError::NotBound.into());
        }
        self.latest
            .get()
            .ok_or_else(|| PhotoError::NoFrameAvailable.into())
    }
}

impl fmt::Debug for CaptureEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureEndpoint")
            .field("generation", &self.generation)
            .field("device_name", &self.device_name)
            .field("facing", &self.facing)
            .field("flash", &self.flash)
            .field("live", &self.is_live())
            .finish()
    }
}

struct CaptureSession {
    generation: u64,
    device_name: String,
    live: Arc<AtomicBool>,
    latest: LatestFrame,
    stream: Box<dyn PreviewStream>,
}

impl CaptureSession {
    fn close(self) {
        self.live.store(false, Ordering::Release);
        self.latest.clear();
        info!(generation = self.generation, device = %self.device_name, "Unbinding capture session");
        if let Err(e) = self.stream.stop() {
            warn!(generation = self.generation, error = %e, "Preview stream did not stop cleanly");
        }
    }
}

#[derive(Default)]
struct ProviderState {
    session: Option<CaptureSession>,
    newest_generation: u64,
}

/// Binds camera sessions, at most one at a time
pub struct CameraProvider {
    backend: Box<dyn CameraBackend>,
    state: Mutex<ProviderState>,
}

impl CameraProvider {
    pub fn new(backend: Box<dyn CameraBackend>) -> Self {
        Self {
            backend,
            state: Mutex::new(ProviderState::default()),
        }
    }

    /// Provider on top of the platform backend
    pub fn with_default_backend() -> Self {
        Self::new(super::get_backend())
    }

    pub fn backend(&self) -> &dyn CameraBackend {
        self.backend.as_ref()
    }

    fn state(&self) -> MutexGuard<'_, ProviderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind a new session for `request`, streaming preview frames to `frames`.
    ///
    /// Any currently bound session is unbound first. Requests older than the
    /// newest one seen are rejected, so a slow bind that finishes late cannot
    /// replace a newer session. Blocking; call it off the UI thread.
    pub fn bind(&self, request: &BindRequest, frames: FrameSender) -> BackendResult<CaptureEndpoint> {
        let mut state = self.state();

        if request.generation < state.newest_generation {
            debug!(
                generation = request.generation,
                newest = state.newest_generation,
                "Ignoring superseded bind request"
            );
            return Err(BackendError::Other(format!(
                "bind request {} superseded by {}",
                request.generation, state.newest_generation
            )));
        }
        state.newest_generation = request.generation;

        if let Some(previous) = state.session.take() {
            previous.close();
        }

        let devices = self.backend.enumerate_cameras();
        let device = select_camera(&devices, request.facing)
            .cloned()
            .ok_or_else(|| BackendError::DeviceNotFound(format!("no {} camera", request.facing)))?;

        info!(
            generation = request.generation,
            facing = %request.facing,
            flash = ?request.flash,
            device = %device.name,
            backend = self.backend.name(),
            "Binding capture session"
        );

        let live = Arc::new(AtomicBool::new(true));
        let latest = LatestFrame::default();
        let sink = FrameSink::new(latest.clone(), frames, Arc::clone(&live));

        let stream = match self.backend.open_preview(&device, sink) {
            Ok(stream) => stream,
            Err(e) => {
                live.store(false, Ordering::Release);
                warn!(device = %device.name, error = %e, "Failed to open preview");
                return Err(e);
            }
        };

        state.session = Some(CaptureSession {
            generation: request.generation,
            device_name: device.name.clone(),
            live: Arc::clone(&live),
            latest: latest.clone(),
            stream,
        });

        Ok(CaptureEndpoint {
            generation: request.generation,
            device_name: device.name,
            facing: request.facing,
            flash: request.flash,
            live,
            latest,
        })
    }

    /// Unbind the session of `generation`. Returns false when another (or no)
    /// session is bound.
    pub fn unbind(&self, generation: u64) -> bool {
        let mut state = self.state();
        match state.session.as_ref() {
            Some(session) if session.generation == generation => {
                if let Some(session) = state.session.take() {
                    session.close();
                }
                true
            }
            _ => false,
        }
    }

    /// Unbind whatever is bound
    pub fn unbind_all(&self) {
        if let Some(session) = self.state().session.take() {
            session.close();
        }
    }

    /// Generation of the bound session, if any
    pub fn bound_generation(&self) -> Option<u64> {
        self.state().session.as_ref().map(|s| s.generation)
    }
}

/// Unbinds its session when dropped, tying the session to the scope that
/// owns the guard
pub struct BindingGuard {
    provider: Arc<CameraProvider>,
    generation: u64,
}

impl BindingGuard {
    pub fn new(provider: Arc<CameraProvider>, generation: u64) -> Self {
        Self {
            provider,
            generation,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl Drop for BindingGuard {
    fn drop(&mut self) {
        if self.provider.unbind(self.generation) {
            debug!(generation = self.generation, "Session released by its scope");
        }
    }
}
