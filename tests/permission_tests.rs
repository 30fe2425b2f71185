// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the camera permission gate

use kamera::permission::{
    PermissionGate, PermissionOutcome, fallback_outcome, outcome_from_response,
};

#[test]
fn test_gate_requests_once() {
    let mut gate = PermissionGate::default();
    assert!(!gate.shows_camera_screen());

    assert!(gate.begin_request());
    assert!(gate.is_pending());
    assert!(!gate.begin_request(), "a second request must not be issued");
}

#[test]
fn test_gate_granted_shows_camera() {
    let mut gate = PermissionGate::default();
    gate.begin_request();

    assert!(gate.resolve(PermissionOutcome::Granted));
    assert_eq!(gate.outcome(), Some(PermissionOutcome::Granted));
    assert!(gate.shows_camera_screen());
}

#[test]
fn test_gate_denied_is_final() {
    let mut gate = PermissionGate::default();
    gate.begin_request();

    assert!(gate.resolve(PermissionOutcome::Denied));
    assert!(!gate.shows_camera_screen());

    // Later answers do not reopen the gate
    assert!(!gate.resolve(PermissionOutcome::Granted));
    assert_eq!(gate.outcome(), Some(PermissionOutcome::Denied));
    assert!(!gate.begin_request());
}

#[test]
fn test_portal_fallback() {
    assert_eq!(fallback_outcome(false), PermissionOutcome::Granted);
    assert_eq!(fallback_outcome(true), PermissionOutcome::Denied);
}

#[test]
fn test_portal_response_codes() {
    assert!(outcome_from_response(0).is_granted());
    assert!(!outcome_from_response(1).is_granted());
    assert!(!outcome_from_response(2).is_granted());
}
