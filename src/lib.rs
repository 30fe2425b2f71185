// SPDX-License-Identifier: MPL-2.0

//! Kamera - a minimal camera application for the COSMIC desktop
//!
//! The app asks for camera access once, then shows a live preview with
//! controls to flip between the front and back camera, toggle the flash and
//! take a photo. The most recent photo is shown as a thumbnail.
//!
//! # Architecture
//!
//! - [`app`]: Application model, camera screen controller and UI
//! - [`backends`]: Camera backend abstraction and the capture session binder
//! - [`permission`]: Camera access gate (XDG camera portal)
//! - [`pipelines`]: Photo capture pipeline (JPEG encoding)
//! - [`storage`]: Photo storage and thumbnail loading
//! - [`flash`]: Flash mode and flash LED control
//! - [`config`]: User configuration handling

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod flash;
pub mod i18n;
pub mod permission;
pub mod pipelines;
pub mod storage;

// Re-export commonly used types
pub use app::{AppModel, Message};
pub use config::Config;
