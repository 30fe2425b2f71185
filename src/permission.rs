// SPDX-License-Identifier: GPL-3.0-only

//! Camera permission gate
//!
//! Camera access is requested exactly once per launch through the XDG
//! desktop portal (`org.freedesktop.portal.Camera.AccessCamera`). The answer
//! is kept for the rest of the session; a denial is final.

use crate::errors::PermissionError;
use futures::StreamExt;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, info, warn};
use zbus::zvariant::{OwnedObjectPath, OwnedValue, Value};

const PORTAL_DESTINATION: &str = "org.freedesktop.portal.Desktop";
const PORTAL_PATH: &str = "/org/freedesktop/portal/desktop";
const CAMERA_INTERFACE: &str = "org.freedesktop.portal.Camera";
const REQUEST_INTERFACE: &str = "org.freedesktop.portal.Request";

/// Present in every Flatpak sandbox
const FLATPAK_INFO: &str = "/.flatpak-info";

/// Answer to the camera access request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionOutcome {
    Granted,
    Denied,
}

impl PermissionOutcome {
    pub fn is_granted(self) -> bool {
        self == PermissionOutcome::Granted
    }
}

/// Single-shot permission state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PermissionGate {
    #[default]
    NotRequested,
    Pending,
    Resolved(PermissionOutcome),
}

impl PermissionGate {
    /// Mark the request as issued. True only the first time.
    pub fn begin_request(&mut self) -> bool {
        if *self == PermissionGate::NotRequested {
            *self = PermissionGate::Pending;
            true
        } else {
            false
        }
    }

    /// Record the answer. Later answers are ignored.
    pub fn resolve(&mut self, outcome: PermissionOutcome) -> bool {
        match self {
            PermissionGate::Resolved(_) => false,
            _ => {
                *self = PermissionGate::Resolved(outcome);
                true
            }
        }
    }

    pub fn outcome(&self) -> Option<PermissionOutcome> {
        match self {
            PermissionGate::Resolved(outcome) => Some(*outcome),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, PermissionGate::NotRequested | PermissionGate::Pending)
    }

    /// Only a granted request shows the camera screen
    pub fn shows_camera_screen(&self) -> bool {
        self.outcome().is_some_and(PermissionOutcome::is_granted)
    }
}

/// Ask the portal for camera access.
///
/// Without a reachable portal, host applications talk to PipeWire directly
/// and are granted access; inside a sandbox they are denied.
pub async fn request_camera_access() -> PermissionOutcome {
    match portal_access_camera().await {
        Ok(outcome) => {
            info!(?outcome, "Camera permission answered by portal");
            outcome
        }
        Err(PermissionError::PortalUnavailable(reason)) => {
            let outcome = fallback_outcome(is_sandboxed());
            warn!(%reason, ?outcome, "Camera portal unavailable");
            outcome
        }
        Err(e) => {
            warn!(error = %e, "Camera permission request failed");
            PermissionOutcome::Denied
        }
    }
}

/// Outcome used when no portal answers
pub fn fallback_outcome(sandboxed: bool) -> PermissionOutcome {
    if sandboxed {
        PermissionOutcome::Denied
    } else {
        PermissionOutcome::Granted
    }
}

pub fn is_sandboxed() -> bool {
    Path::new(FLATPAK_INFO).exists()
}

/// Map a portal response code (0 success, 1 cancelled, 2 other)
pub fn outcome_from_response(code: u32) -> PermissionOutcome {
    if code == 0 {
        PermissionOutcome::Granted
    } else {
        PermissionOutcome::Denied
    }
}

/// Object path of the portal request for `sender` and `token`
pub fn request_path(sender: &str, token: &str) -> String {
    let sender = sender.trim_start_matches(':').replace('.', "_");
    format!("{PORTAL_PATH}/request/{sender}/{token}")
}

fn next_handle_token() -> String {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    format!(
        "kamera_{}_{}",
        std::process::id(),
        COUNTER.fetch_add(1, Ordering::Relaxed)
    )
}

fn is_missing_service(err: &zbus::Error) -> bool {
    match err {
        zbus::Error::MethodError(name, _, _) => matches!(
            name.as_str(),
            "org.freedesktop.DBus.Error.ServiceUnknown"
                | "org.freedesktop.DBus.Error.UnknownMethod"
                | "org.freedesktop.DBus.Error.UnknownInterface"
                | "org.freedesktop.DBus.Error.UnknownObject"
        ),
        _ => false,
    }
}

async fn portal_access_camera() -> Result<PermissionOutcome, PermissionError> {
    let connection = zbus::Connection::session()
        .await
        .map_err(|e| PermissionError::PortalUnavailable(e.to_string()))?;

    let sender = connection
        .unique_name()
        .map(|name| name.to_string())
        .ok_or_else(|| PermissionError::PortalUnavailable("no unique bus name".to_string()))?;
    let token = next_handle_token();
    let expected_path = request_path(&sender, &token);

    // Subscribe before calling so a fast answer is not missed
    let request = zbus::Proxy::new(
        &connection,
        PORTAL_DESTINATION,
        expected_path.clone(),
        REQUEST_INTERFACE,
    )
    .await?;
    let mut responses = request.receive_signal("Response").await?;

    let camera = zbus::Proxy::new(&connection, PORTAL_DESTINATION, PORTAL_PATH, CAMERA_INTERFACE)
        .await?;

    let mut options: HashMap<&str, Value> = HashMap::new();
    options.insert("handle_token", Value::new(token.as_str()));

    let handle: OwnedObjectPath = match camera.call("AccessCamera", &(options,)).await {
        Ok(handle) => handle,
        Err(e) if is_missing_service(&e) => {
            return Err(PermissionError::PortalUnavailable(e.to_string()));
        }
        Err(e) => return Err(e.into()),
    };
    debug!(handle = %handle.as_str(), "Camera access requested");

    if handle.as_str() != expected_path {
        // Old portals pick their own handle path
        let request =
            zbus::Proxy::new(&connection, PORTAL_DESTINATION, handle, REQUEST_INTERFACE).await?;
        responses = request.receive_signal("Response").await?;
    }

    let message = responses.next().await.ok_or(PermissionError::NoResponse)?;
    let (code, _results): (u32, HashMap<String, OwnedValue>) = message
        .body()
        .deserialize()
        .map_err(|e| PermissionError::RequestFailed(e.to_string()))?;

    Ok(outcome_from_response(code))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_path_escapes_sender() {
        assert_eq!(
            request_path(":1.42", "kamera_1_0"),
            "/org/freedesktop/portal/desktop/request/1_42/kamera_1_0"
        );
    }

    #[test]
    fn test_response_codes() {
        assert_eq!(outcome_from_response(0), PermissionOutcome::Granted);
        assert_eq!(outcome_from_response(1), PermissionOutcome::Denied);
        assert_eq!(outcome_from_response(2), PermissionOutcome::Denied);
    }

    #[test]
    fn test_handle_tokens_are_unique() {
        assert_ne!(next_handle_token(), next_handle_token());
    }
}
