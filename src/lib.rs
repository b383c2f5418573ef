// SPDX-License-Identifier: GPL-3.0-only

//! phantom-control - profile-based control and live preview for high-speed
//! cameras
//!
//! The camera itself sits behind the [`backends::camera::CameraAdapter`]
//! trait; everything above it is profile management and a capture loop.
//!
//! # Architecture
//!
//! - [`profiles`]: named acquisition profiles and operator-input parsing
//! - [`controller`]: applies profiles to the camera, records edits
//! - [`backends`]: camera adapter boundary, session ownership, synthetic
//!   device
//! - [`media`]: frame format conversion
//! - [`pipelines`]: the background preview capture loop
//! - [`terminal`]: the ratatui control surface
//!
//! Settings writes flow control surface -> controller -> session; the preview
//! loop reads frames from the same session concurrently, serialized inside
//! [`backends::camera::CameraSession`].

pub mod backends;
pub mod constants;
pub mod controller;
pub mod errors;
pub mod media;
pub mod pipelines;
pub mod profiles;
pub mod terminal;

// Re-export commonly used types
pub use backends::camera::{
    CameraAdapter, CameraFrame, CameraSession, PixelFormat, Resolution, SyntheticCamera,
};
pub use controller::{ApplyStatus, ProfileController};
pub use errors::{AppError, AppResult, CameraError, ProfileError};
pub use pipelines::preview::{CaptureState, PreviewController, PreviewSink, WatchSink};
pub use profiles::{Profile, ProfileSettings, ProfileStore};
