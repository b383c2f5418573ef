// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic camera backend
//!
//! Stands in for real hardware: generates a moving gradient test pattern at
//! the programmed resolution, blocks one frame interval per read, and rejects
//! out-of-range settings the way a driver would. Useful for development and
//! for exercising the full control path without a camera attached.

use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use super::types::{CameraFrame, PixelFormat, Resolution};
use super::CameraAdapter;
use crate::constants::sensor;
use crate::errors::{CameraError, CameraResult};

/// Synthetic camera device
pub struct SyntheticCamera {
    index: usize,
    resolution: Resolution,
    frame_rate: f64,
    exposure_us: f64,
    sequence: u64,
    closed: bool,
}

impl SyntheticCamera {
    /// Connect to the synthetic device at `index`
    ///
    /// Fails with [`CameraError::NotFound`] for indices past the emulated
    /// device count, mirroring SDK enumeration behavior.
    pub fn connect(index: usize) -> CameraResult<Self> {
        if index >= sensor::DEVICE_COUNT {
            return Err(CameraError::NotFound(index));
        }

        info!(index, "Connected to synthetic camera");
        Ok(Self {
            index,
            resolution: Resolution::new(1024, 768),
            frame_rate: 100.0,
            exposure_us: 1000.0,
            sequence: 0,
            closed: false,
        })
    }

    fn ensure_open(&self) -> CameraResult<()> {
        if self.closed {
            Err(CameraError::Disconnected)
        } else {
            Ok(())
        }
    }

    /// Brightness scale derived from the programmed exposure
    fn gain(&self) -> f64 {
        (self.exposure_us / sensor::NOMINAL_EXPOSURE_US).min(1.0)
    }
}

impl CameraAdapter for SyntheticCamera {
    fn set_resolution(&mut self, resolution: Resolution) -> CameraResult<()> {
        self.ensure_open()?;
        if resolution.width == 0
            || resolution.height == 0
            || resolution.width > sensor::MAX_WIDTH
            || resolution.height > sensor::MAX_HEIGHT
        {
            return Err(CameraError::SettingRejected {
                control: "resolution",
                reason: format!(
                    "{} outside sensor range 1x1..{}x{}",
                    resolution,
                    sensor::MAX_WIDTH,
                    sensor::MAX_HEIGHT
                ),
            });
        }

        debug!(index = self.index, %resolution, "Resolution programmed");
        self.resolution = resolution;
        Ok(())
    }

    fn set_frame_rate(&mut self, frame_rate: f64) -> CameraResult<()> {
        self.ensure_open()?;
        if !frame_rate.is_finite()
            || frame_rate < sensor::MIN_FRAME_RATE
            || frame_rate > sensor::MAX_FRAME_RATE
        {
            return Err(CameraError::SettingRejected {
                control: "frame_rate",
                reason: format!(
                    "{} fps outside {}..{} fps",
                    frame_rate,
                    sensor::MIN_FRAME_RATE,
                    sensor::MAX_FRAME_RATE
                ),
            });
        }

        debug!(index = self.index, frame_rate, "Frame rate programmed");
        self.frame_rate = frame_rate;
        Ok(())
    }

    fn set_exposure(&mut self, exposure_us: f64) -> CameraResult<()> {
        self.ensure_open()?;
        // Exposure cannot exceed the frame interval at the current rate
        let frame_interval_us = 1_000_000.0 / self.frame_rate;
        if !exposure_us.is_finite()
            || exposure_us < sensor::MIN_EXPOSURE_US
            || exposure_us > frame_interval_us
        {
            return Err(CameraError::SettingRejected {
                control: "exposure",
                reason: format!(
                    "{} us outside {}..{:.0} us at {} fps",
                    exposure_us,
                    sensor::MIN_EXPOSURE_US,
                    frame_interval_us,
                    self.frame_rate
                ),
            });
        }

        debug!(index = self.index, exposure_us, "Exposure programmed");
        self.exposure_us = exposure_us;
        Ok(())
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn frame_rate(&self) -> f64 {
        self.frame_rate
    }

    fn exposure(&self) -> f64 {
        self.exposure_us
    }

    fn read_frame(&mut self) -> CameraResult<CameraFrame> {
        self.ensure_open()?;

        // Emulate the sensor's blocking cadence
        let interval = Duration::from_secs_f64(1.0 / self.frame_rate);
        thread::sleep(interval.min(sensor::MAX_FRAME_INTERVAL));

        let width = self.resolution.width;
        let height = self.resolution.height;
        let gain = self.gain();
        let phase = self.sequence.wrapping_mul(3);

        let mut data = vec![0u8; self.resolution.pixels()];
        for y in 0..height as usize {
            let row = y * width as usize;
            for x in 0..width as usize {
                let value = (x + y).wrapping_add(phase as usize) & 0xff;
                data[row + x] = (value as f64 * gain) as u8;
            }
        }

        let frame = CameraFrame {
            width,
            height,
            stride: width,
            format: PixelFormat::Gray8,
            sequence: self.sequence,
            data: data.into(),
        };
        self.sequence += 1;
        Ok(frame)
    }

    fn close(&mut self) -> CameraResult<()> {
        self.ensure_open()?;
        info!(index = self.index, "Synthetic camera closed");
        self.closed = true;
        Ok(())
    }
}
