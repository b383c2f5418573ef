// SPDX-License-Identifier: GPL-3.0-only

//! Camera session lifecycle
//!
//! The session owns the live adapter and is the only way the rest of the
//! application reaches it. A single mutex serializes settings writes from the
//! control surface against frame reads from the capture thread, so hardware
//! calls are never interleaved from two execution contexts. No timeout is
//! applied to adapter calls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{error, info};

use super::types::{CameraFrame, Resolution};
use super::CameraAdapter;
use crate::errors::{CameraError, CameraResult};

struct SessionInner {
    adapter: Mutex<Box<dyn CameraAdapter>>,
    closed: AtomicBool,
}

/// Shared handle to the live camera connection
///
/// Cloning is cheap; all clones refer to the same adapter. The session is
/// closed exactly once — explicitly via [`CameraSession::close`], or when the
/// last handle is dropped.
#[derive(Clone)]
pub struct CameraSession {
    inner: Arc<SessionInner>,
}

impl CameraSession {
    /// Wrap a connected adapter in a session
    pub fn new(adapter: Box<dyn CameraAdapter>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                adapter: Mutex::new(adapter),
                closed: AtomicBool::new(false),
            }),
        }
    }

    fn adapter(&self) -> CameraResult<MutexGuard<'_, Box<dyn CameraAdapter>>> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(CameraError::Closed);
        }
        // A poisoned lock means a panic mid-hardware-call; treat as disconnect
        self.inner
            .adapter
            .lock()
            .map_err(|_| CameraError::Disconnected)
    }

    /// Program the sensor readout resolution
    pub fn set_resolution(&self, resolution: Resolution) -> CameraResult<()> {
        self.adapter()?.set_resolution(resolution)
    }

    /// Program the acquisition rate
    pub fn set_frame_rate(&self, frame_rate: f64) -> CameraResult<()> {
        self.adapter()?.set_frame_rate(frame_rate)
    }

    /// Program the exposure time
    pub fn set_exposure(&self, exposure_us: f64) -> CameraResult<()> {
        self.adapter()?.set_exposure(exposure_us)
    }

    /// Acquire one live frame, blocking until the sensor delivers it
    pub fn read_frame(&self) -> CameraResult<CameraFrame> {
        self.adapter()?.read_frame()
    }

    /// Whether the session has been closed
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Release the camera
    ///
    /// Idempotent. Adapter close failures are logged and ignored — shutdown
    /// proceeds regardless.
    pub fn close(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        info!("Closing camera session");
        match self.inner.adapter.lock() {
            Ok(mut adapter) => {
                if let Err(e) = adapter.close() {
                    error!(error = %e, "Failed to close camera cleanly");
                }
            }
            Err(_) => error!("Camera adapter lock poisoned during close"),
        }
    }
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            if let Ok(adapter) = self.adapter.get_mut() {
                if let Err(e) = adapter.close() {
                    error!(error = %e, "Failed to close camera cleanly on drop");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct CloseCounting {
        closes: Arc<AtomicUsize>,
    }

    impl CameraAdapter for CloseCounting {
        fn set_resolution(&mut self, _: Resolution) -> CameraResult<()> {
            Ok(())
        }
        fn set_frame_rate(&mut self, _: f64) -> CameraResult<()> {
            Ok(())
        }
        fn set_exposure(&mut self, _: f64) -> CameraResult<()> {
            Ok(())
        }
        fn resolution(&self) -> Resolution {
            Resolution::new(1, 1)
        }
        fn frame_rate(&self) -> f64 {
            1.0
        }
        fn exposure(&self) -> f64 {
            1.0
        }
        fn read_frame(&mut self) -> CameraResult<CameraFrame> {
            Err(CameraError::Disconnected)
        }
        fn close(&mut self) -> CameraResult<()> {
            self.closes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn test_close_is_idempotent() {
        let closes = Arc::new(AtomicUsize::new(0));
        let session = CameraSession::new(Box::new(CloseCounting {
            closes: Arc::clone(&closes),
        }));

        session.close();
        session.close();
        assert_eq!(closes.load(Ordering::SeqCst), 1);
        assert!(session.is_closed());
    }

    #[test]
    fn test_calls_after_close_fail() {
        let closes = Arc::new(AtomicUsize::new(0));
        let session = CameraSession::new(Box::new(CloseCounting {
            closes: Arc::clone(&closes),
        }));

        session.close();
        assert!(matches!(
            session.set_frame_rate(100.0),
            Err(CameraError::Closed)
        ));
        assert!(matches!(session.read_frame(), Err(CameraError::Closed)));
    }

    #[test]
    fn test_drop_closes_once() {
        let closes = Arc::new(AtomicUsize::new(0));
        {
            let session = CameraSession::new(Box::new(CloseCounting {
                closes: Arc::clone(&closes),
            }));
            let _clone = session.clone();
        }
        assert_eq!(closes.load(Ordering::SeqCst), 1);
    }
}
