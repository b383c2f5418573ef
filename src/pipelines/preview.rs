// SPDX-License-Identifier: GPL-3.0-only

//! Live preview capture loop
//!
//! A background thread continuously pulls frames from the camera session,
//! converts them to RGB and presents them to a [`PreviewSink`]. The loop runs
//! the state machine Running -> Stopping -> Stopped: stopping is explicit via
//! an atomic stop signal observed each iteration, and the thread is joined
//! before the session may be closed, so a frame read can never race the
//! camera teardown. Any acquisition, conversion or presentation error
//! terminates the loop; there is no retry.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::backends::camera::{CameraFrame, CameraSession};
use crate::errors::AppResult;
use crate::media::convert::gray8_to_rgb24;

/// Where converted preview frames go
pub trait PreviewSink: Send {
    /// Present one frame; an error terminates the preview loop
    fn present(&mut self, frame: CameraFrame) -> AppResult<()>;

    /// Release the sink's resources; called exactly once when the loop exits
    fn close(&mut self);
}

/// Sink that publishes the latest frame into a watch slot for the UI
pub struct WatchSink {
    tx: watch::Sender<Option<CameraFrame>>,
}

impl WatchSink {
    /// Create the sink and the receiver half the UI polls
    pub fn channel() -> (Self, watch::Receiver<Option<CameraFrame>>) {
        let (tx, rx) = watch::channel(None);
        (Self { tx }, rx)
    }
}

impl PreviewSink for WatchSink {
    fn present(&mut self, frame: CameraFrame) -> AppResult<()> {
        self.tx
            .send(Some(frame))
            .map_err(|_| crate::errors::AppError::Preview("display receiver gone".to_string()))
    }

    fn close(&mut self) {
        let _ = self.tx.send(None);
    }
}

/// Capture loop lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    /// Pulling frames
    Running,
    /// Stop requested, loop finishing its current iteration
    Stopping,
    /// Loop exited and the sink is released
    Stopped,
}

impl CaptureState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => CaptureState::Running,
            1 => CaptureState::Stopping,
            _ => CaptureState::Stopped,
        }
    }
}

/// Controller for the preview capture thread
///
/// Dropping the controller stops the loop and joins the thread.
pub struct PreviewController {
    thread_handle: Option<JoinHandle<()>>,
    stop_signal: Arc<AtomicBool>,
    state: Arc<AtomicU8>,
}

impl PreviewController {
    /// Spawn the capture thread
    pub fn start(session: CameraSession, mut sink: Box<dyn PreviewSink>) -> Self {
        let stop_signal = Arc::new(AtomicBool::new(false));
        let state = Arc::new(AtomicU8::new(CaptureState::Running as u8));

        let stop = Arc::clone(&stop_signal);
        let thread_state = Arc::clone(&state);

        info!("Starting preview capture loop");
        let thread_handle = thread::spawn(move || {
            debug!("Preview thread started");

            loop {
                if stop.load(Ordering::SeqCst) {
                    debug!("Preview stop signal received");
                    break;
                }

                let frame = match session.read_frame() {
                    Ok(frame) => frame,
                    Err(e) => {
                        error!(error = %e, "Frame acquisition failed, stopping preview");
                        break;
                    }
                };

                let rgb = match gray8_to_rgb24(&frame) {
                    Ok(rgb) => rgb,
                    Err(e) => {
                        error!(error = %e, "Frame conversion failed, stopping preview");
                        break;
                    }
                };

                if let Err(e) = sink.present(rgb) {
                    error!(error = %e, "Frame presentation failed, stopping preview");
                    break;
                }
            }

            sink.close();
            thread_state.store(CaptureState::Stopped as u8, Ordering::SeqCst);
            info!("Preview capture loop exited");
        });

        Self {
            thread_handle: Some(thread_handle),
            stop_signal,
            state,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> CaptureState {
        CaptureState::from_u8(self.state.load(Ordering::SeqCst))
    }

    /// Whether the capture thread is still alive
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Signal the loop to stop (non-blocking)
    pub fn request_stop(&self) {
        debug!("Requesting preview stop");
        self.stop_signal.store(true, Ordering::SeqCst);
        let _ = self.state.compare_exchange(
            CaptureState::Running as u8,
            CaptureState::Stopping as u8,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }

    /// Stop the loop and wait for the thread to finish
    pub fn stop(&mut self) {
        self.request_stop();
        self.join();
    }

    /// Wait for the thread without sending a stop signal
    pub fn join(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            debug!("Waiting for preview thread to finish");
            if handle.join().is_err() {
                warn!("Preview thread panicked");
                self.state
                    .store(CaptureState::Stopped as u8, Ordering::SeqCst);
            }
        }
    }
}

impl Drop for PreviewController {
    fn drop(&mut self) {
        if self.thread_handle.is_some() {
            debug!("PreviewController dropped, stopping loop");
            self.stop();
        }
    }
}
