// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for camera capture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  App Layer                   │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │          CameraProvider (one session)        │
//! │              ┌──────────────────┐            │
//! │              │  Camera backend  │            │
//! │              │    (PipeWire)    │            │
//! │              └──────────────────┘            │
//! └─────────────────────────────────────────────┘
//! ```

pub mod camera;
