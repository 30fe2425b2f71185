// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the capture session provider

mod common;

use common::{FakeBackend, device, gray_frame};
use futures::channel::mpsc;
use kamera::backends::camera::{
    BackendError, BindRequest, BindingGuard, CameraFacing, CameraProvider,
};
use kamera::errors::{AppError, CameraError, PhotoError};
use kamera::flash::FlashMode;
use std::sync::Arc;

fn request(generation: u64, facing: CameraFacing) -> BindRequest {
    BindRequest {
        generation,
        facing,
        flash: FlashMode::Off,
    }
}

#[test]
fn test_bind_selects_requested_facing() {
    let (backend, state) = FakeBackend::phone();
    let provider = CameraProvider::new(Box::new(backend));

    let (tx, _rx) = mpsc::channel(4);
    let endpoint = provider.bind(&request(1, CameraFacing::Front), tx).unwrap();

    assert_eq!(endpoint.device_name(), "Front Camera");
    assert_eq!(endpoint.facing(), CameraFacing::Front);
    assert_eq!(provider.bound_generation(), Some(1));
    assert_eq!(state.opened(), vec!["Front Camera".to_string()]);
}

#[test]
fn test_rebind_unbinds_previous_session() {
    let (backend, state) = FakeBackend::phone();
    let provider = CameraProvider::new(Box::new(backend));

    let (tx, _rx1) = mpsc::channel(4);
    let first = provider.bind(&request(1, CameraFacing::Back), tx).unwrap();
    let (tx, _rx2) = mpsc::channel(4);
    let second = provider.bind(&request(2, CameraFacing::Front), tx).unwrap();

    assert!(!first.is_live(), "old endpoint must be dead after rebind");
    assert!(second.is_live());
    assert_eq!(state.stopped(), 1);
    assert_eq!(provider.bound_generation(), Some(2));

    // The old pipeline is told to stop delivering
    assert!(!state.push_frame_to(0, gray_frame(2, 2)));
    assert!(state.push_frame_to(1, gray_frame(2, 2)));
}

#[test]
fn test_superseded_bind_is_rejected() {
    let (backend, state) = FakeBackend::phone();
    let provider = CameraProvider::new(Box::new(backend));

    let (tx, _rx) = mpsc::channel(4);
    provider.bind(&request(3, CameraFacing::Back), tx).unwrap();
    let (tx, _rx) = mpsc::channel(4);
    let late = provider.bind(&request(2, CameraFacing::Front), tx);

    assert!(late.is_err());
    assert_eq!(provider.bound_generation(), Some(3));
    assert_eq!(state.stopped(), 0);
}

#[test]
fn test_grab_frame_lifecycle() {
    let (backend, state) = FakeBackend::phone();
    let provider = CameraProvider::new(Box::new(backend));

    let (tx, _rx) = mpsc::channel(4);
    let endpoint = provider.bind(&request(1, CameraFacing::Back), tx).unwrap();

    assert!(matches!(
        endpoint.grab_frame(),
        Err(AppError::Photo(PhotoError::NoFrameAvailable))
    ));

    state.push_frame(gray_frame(4, 2));
    let frame = endpoint.grab_frame().unwrap();
    assert_eq!((frame.width, frame.height), (4, 2));

    assert!(provider.unbind(1));
    assert!(matches!(
        endpoint.grab_frame(),
        Err(AppError::Camera(CameraError::NotBound))
    ));
}

#[test]
fn test_frames_reach_ui_channel_without_blocking() {
    let (backend, state) = FakeBackend::phone();
    let provider = CameraProvider::new(Box::new(backend));

    let (tx, mut rx) = mpsc::channel(0);
    let endpoint = provider.bind(&request(1, CameraFacing::Back), tx).unwrap();

    // Channel is full after the first frame; later ones are dropped for the
    // UI but still reach the endpoint
    for _ in 0..5 {
        assert!(state.push_frame(gray_frame(2, 2)));
    }
    assert!(rx.try_next().unwrap().is_some());
    assert!(endpoint.grab_frame().is_ok());
}

#[test]
fn test_unbind_ignores_other_generation() {
    let (backend, state) = FakeBackend::phone();
    let provider = CameraProvider::new(Box::new(backend));

    let (tx, _rx) = mpsc::channel(4);
    provider.bind(&request(2, CameraFacing::Back), tx).unwrap();

    assert!(!provider.unbind(1));
    assert_eq!(provider.bound_generation(), Some(2));
    assert!(provider.unbind(2));
    assert_eq!(provider.bound_generation(), None);
    assert_eq!(state.stopped(), 1);
}

#[test]
fn test_binding_guard_unbinds_on_drop() {
    let (backend, state) = FakeBackend::phone();
    let provider = Arc::new(CameraProvider::new(Box::new(backend)));

    let (tx, _rx) = mpsc::channel(4);
    let endpoint = provider.bind(&request(1, CameraFacing::Back), tx).unwrap();
    let guard = BindingGuard::new(Arc::clone(&provider), 1);
    assert_eq!(guard.generation(), 1);

    drop(guard);
    assert!(!endpoint.is_live());
    assert_eq!(provider.bound_generation(), None);
    assert_eq!(state.stopped(), 1);
}

#[test]
fn test_stale_guard_leaves_newer_session_bound() {
    let (backend, _state) = FakeBackend::phone();
    let provider = Arc::new(CameraProvider::new(Box::new(backend)));

    let (tx, _rx) = mpsc::channel(4);
    provider.bind(&request(1, CameraFacing::Back), tx).unwrap();
    let old_guard = BindingGuard::new(Arc::clone(&provider), 1);

    let (tx, _rx) = mpsc::channel(4);
    let endpoint = provider.bind(&request(2, CameraFacing::Front), tx).unwrap();
    drop(old_guard);

    assert!(endpoint.is_live());
    assert_eq!(provider.bound_generation(), Some(2));
}

#[test]
fn test_bind_without_devices_fails() {
    let (backend, _state) = FakeBackend::new(Vec::new());
    let provider = CameraProvider::new(Box::new(backend));

    let (tx, _rx) = mpsc::channel(4);
    let result = provider.bind(&request(1, CameraFacing::Back), tx);

    assert!(matches!(result, Err(BackendError::DeviceNotFound(_))));
    assert_eq!(provider.bound_generation(), None);
}

#[test]
fn test_open_failure_leaves_nothing_bound() {
    let (backend, _state) =
        FakeBackend::failing(vec![device("Back Camera", Some(CameraFacing::Back))]);
    let provider = CameraProvider::new(Box::new(backend));

    let (tx, _rx) = mpsc::channel(4);
    let result = provider.bind(&request(1, CameraFacing::Back), tx);

    assert!(matches!(result, Err(BackendError::InitializationFailed(_))));
    assert_eq!(provider.bound_generation(), None);
}

#[test]
fn test_endpoint_keeps_flash_mode_of_bind() {
    let (backend, _state) = FakeBackend::phone();
    let provider = CameraProvider::new(Box::new(backend));

    let (tx, _rx) = mpsc::channel(4);
    let endpoint = provider
        .bind(
            &BindRequest {
                generation: 1,
                facing: CameraFacing::Back,
                flash: FlashMode::On,
            },
            tx,
        )
        .unwrap();

    assert_eq!(endpoint.flash(), FlashMode::On);
}
