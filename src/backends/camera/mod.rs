// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! The vendor SDK is hidden behind the [`CameraAdapter`] trait: connection,
//! register programming and frame acquisition all happen on the other side of
//! it. The application only ever talks to a [`session::CameraSession`], which
//! serializes adapter access between the control surface and the capture
//! thread.

pub mod session;
pub mod synthetic;
pub mod types;

pub use session::CameraSession;
pub use synthetic::SyntheticCamera;
pub use types::{CameraFrame, PixelFormat, Resolution};

use crate::errors::CameraResult;

/// Boundary interface to the camera hardware
///
/// Implementations are exclusive owners of the underlying device handle.
/// `read_frame` blocks with hardware-determined latency; setters take effect
/// on the next acquired frame. Callers must not interleave calls from
/// multiple threads — [`CameraSession`] provides that serialization.
pub trait CameraAdapter: Send {
    /// Program the sensor readout resolution
    fn set_resolution(&mut self, resolution: Resolution) -> CameraResult<()>;

    /// Program the acquisition rate in frames per second
    fn set_frame_rate(&mut self, frame_rate: f64) -> CameraResult<()>;

    /// Program the exposure time in microseconds
    fn set_exposure(&mut self, exposure_us: f64) -> CameraResult<()>;

    /// Currently programmed resolution
    fn resolution(&self) -> Resolution;

    /// Currently programmed frame rate
    fn frame_rate(&self) -> f64;

    /// Currently programmed exposure
    fn exposure(&self) -> f64;

    /// Acquire one live frame, blocking until the sensor delivers it
    fn read_frame(&mut self) -> CameraResult<CameraFrame>;

    /// Release the device handle
    ///
    /// Called exactly once per connection; the session enforces this.
    fn close(&mut self) -> CameraResult<()>;
}
