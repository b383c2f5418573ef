// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer
//!
//! Hardware access lives behind the [`camera::CameraAdapter`] trait so the
//! controller and the preview pipeline never touch a vendor SDK directly.

pub mod camera;
