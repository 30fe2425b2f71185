// SPDX-License-Identifier: MPL-2.0

//! Integration tests for photo storage and the photo pipeline

mod common;

use chrono::{Local, TimeZone};
use common::{FakeBackend, gray_frame};
use futures::channel::mpsc;
use kamera::backends::camera::{BindRequest, CameraFacing, CameraProvider};
use kamera::constants::storage::JPEG_MIME_TYPE;
use kamera::errors::{AppError, PhotoError};
use kamera::flash::FlashMode;
use kamera::pipelines::photo::PhotoPipeline;
use kamera::storage::{self, PhotoStorage};
use std::sync::Arc;

#[test]
fn test_same_second_names_get_suffix() {
    let dir = tempfile::tempdir().unwrap();
    let storage = PhotoStorage::new(dir.path().join("Kamera"));

    let first = storage
        .create_entry("20250101_120000", JPEG_MIME_TYPE, b"one")
        .unwrap();
    let second = storage
        .create_entry("20250101_120000", JPEG_MIME_TYPE, b"two")
        .unwrap();
    let third = storage
        .create_entry("20250101_120000", JPEG_MIME_TYPE, b"three")
        .unwrap();

    assert!(first.path().ends_with("20250101_120000.jpg"));
    assert!(second.path().ends_with("20250101_120000 (1).jpg"));
    assert!(third.path().ends_with("20250101_120000 (2).jpg"));

    // Nothing was overwritten
    assert_eq!(std::fs::read(first.path()).unwrap(), b"one");
    assert_eq!(std::fs::read(second.path()).unwrap(), b"two");
    assert_eq!(second.display_name(), "20250101_120000");
    assert_eq!(second.mime_type(), JPEG_MIME_TYPE);
}

#[tokio::test]
async fn test_pipeline_saves_decodable_jpeg() {
    let dir = tempfile::tempdir().unwrap();
    let storage = PhotoStorage::new(dir.path());
    let pipeline = PhotoPipeline::new(90);
    let taken_at = Local.with_ymd_and_hms(2025, 6, 1, 8, 30, 15).unwrap();

    let reference = pipeline
        .capture_and_save(Arc::new(gray_frame(16, 8)), &storage, taken_at)
        .await
        .unwrap();

    assert!(reference.path().ends_with("20250601_083015.jpg"));
    assert_eq!(reference.mime_type(), "image/jpeg");

    let thumbnail = storage::load_thumbnail(reference).await.unwrap();
    assert_eq!((thumbnail.width, thumbnail.height), (16, 8));
    assert_eq!(thumbnail.rgba.len(), 16 * 8 * 4);
}

#[tokio::test]
async fn test_thumbnail_of_corrupt_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let storage = PhotoStorage::new(dir.path());
    let reference = storage
        .create_entry("20250101_000000", JPEG_MIME_TYPE, b"not a jpeg")
        .unwrap();

    assert!(storage::load_thumbnail(reference).await.is_err());
}

#[tokio::test]
async fn test_capture_from_endpoint() {
    let (backend, state) = FakeBackend::phone();
    let provider = CameraProvider::new(Box::new(backend));
    let (tx, _rx) = mpsc::channel(4);
    let endpoint = provider
        .bind(
            &BindRequest {
                generation: 1,
                facing: CameraFacing::Back,
                flash: FlashMode::Off,
            },
            tx,
        )
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let storage = PhotoStorage::new(dir.path());
    let pipeline = PhotoPipeline::default();

    let before_frame = pipeline.capture(&endpoint, &storage, Local::now()).await;
    assert!(matches!(
        before_frame,
        Err(AppError::Photo(PhotoError::NoFrameAvailable))
    ));

    state.push_frame(gray_frame(8, 8));
    let reference = pipeline
        .capture(&endpoint, &storage, Local::now())
        .await
        .unwrap();
    assert!(reference.path().exists());

    provider.unbind_all();
    assert!(pipeline.capture(&endpoint, &storage, Local::now()).await.is_err());
    // Failed captures leave no files behind
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
