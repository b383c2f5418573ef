// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the preview capture loop over the public API

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use phantom_control::errors::CameraResult;
use phantom_control::{
    AppError, AppResult, CameraAdapter, CameraError, CameraFrame, CameraSession, CaptureState,
    PixelFormat, PreviewController, PreviewSink, Resolution, WatchSink,
};

/// Serves a fixed number of frames, then reports a disconnect
struct FiniteCamera {
    remaining: usize,
    sequence: u64,
}

impl CameraAdapter for FiniteCamera {
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
        Resolution::new(4, 4)
    }
    fn frame_rate(&self) -> f64 {
        1000.0
    }
    fn exposure(&self) -> f64 {
        100.0
    }
    fn read_frame(&mut self) -> CameraResult<CameraFrame> {
        if self.remaining == 0 {
            return Err(CameraError::Disconnected);
        }
        self.remaining -= 1;
        let frame = CameraFrame {
            width: 4,
            height: 4,
            stride: 4,
            format: PixelFormat::Gray8,
            sequence: self.sequence,
            data: vec![128u8; 16].into(),
        };
        self.sequence += 1;
        Ok(frame)
    }
    fn close(&mut self) -> CameraResult<()> {
        Ok(())
    }
}

struct CountingSink {
    presented: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
}

impl PreviewSink for CountingSink {
    fn present(&mut self, frame: CameraFrame) -> AppResult<()> {
        if frame.format != PixelFormat::Rgb24 {
            return Err(AppError::Preview("expected RGB frames".to_string()));
        }
        self.presented.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
    fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_finite_feed_renders_every_frame_then_stops() {
    let session = CameraSession::new(Box::new(FiniteCamera {
        remaining: 8,
        sequence: 0,
    }));
    let presented = Arc::new(AtomicUsize::new(0));
    let closed = Arc::new(AtomicUsize::new(0));

    let mut preview = PreviewController::start(
        session.clone(),
        Box::new(CountingSink {
            presented: Arc::clone(&presented),
            closed: Arc::clone(&closed),
        }),
    );
    preview.join();

    assert_eq!(presented.load(Ordering::SeqCst), 8);
    assert_eq!(closed.load(Ordering::SeqCst), 1);
    assert_eq!(preview.state(), CaptureState::Stopped);
    assert!(!preview.is_running());

    // Session is still usable after the preview died; closing it is clean
    session.close();
    assert!(session.is_closed());
}

#[test]
fn test_shutdown_order_join_then_close() {
    let session = CameraSession::new(Box::new(FiniteCamera {
        remaining: usize::MAX,
        sequence: 0,
    }));
    let (sink, frames) = WatchSink::channel();
    let mut preview = PreviewController::start(session.clone(), Box::new(sink));

    // Wait until at least one frame reaches the display slot
    let mut waited = Duration::ZERO;
    while frames.borrow().is_none() && waited < Duration::from_secs(2) {
        std::thread::sleep(Duration::from_millis(5));
        waited += Duration::from_millis(5);
    }
    assert!(frames.borrow().is_some(), "no frame arrived");

    preview.stop();
    assert_eq!(preview.state(), CaptureState::Stopped);
    // The sink publishes an empty slot on close
    assert!(frames.borrow().is_none());

    session.close();
    assert!(matches!(session.read_frame(), Err(CameraError::Closed)));
}
