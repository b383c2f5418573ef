// SPDX-License-Identifier: GPL-3.0-only

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Sensor readout geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel count, useful for buffer sizing
    pub fn pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Pixel format of a captured or converted frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Single channel, 8 bits per pixel (sensor output)
    Gray8,
    /// Packed RGB, 24 bits per pixel (display representation)
    Rgb24,
}

impl PixelFormat {
    /// Bytes per pixel for this format
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb24 => 3,
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::Gray8 => write!(f, "Gray8"),
            PixelFormat::Rgb24 => write!(f, "RGB24"),
        }
    }
}

/// A single captured frame
///
/// Pixel data is reference counted so frames can be handed from the capture
/// thread to the display without copying.
#[derive(Clone)]
pub struct CameraFrame {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Bytes per row (may exceed `width * bytes_per_pixel`)
    pub stride: u32,
    /// Pixel format of `data`
    pub format: PixelFormat,
    /// Monotonic frame counter, assigned by the adapter
    pub sequence: u64,
    /// Raw pixel data
    pub data: Arc<[u8]>,
}

impl CameraFrame {
    /// Access the raw pixel bytes
    pub fn data_slice(&self) -> &[u8] {
        &self.data
    }

    /// Minimum buffer length implied by the frame geometry
    ///
    /// Rows are `stride` bytes apart but only the first `width * bpp` bytes
    /// of each row carry pixels, so the final row may end short of a full
    /// stride. A frame whose stride is narrower than its row payload can
    /// never satisfy this bound with `stride * height` bytes.
    pub fn expected_len(&self) -> usize {
        if self.height == 0 {
            return 0;
        }
        let row_payload = self.width as usize * self.format.bytes_per_pixel() as usize;
        (self.height as usize - 1) * self.stride as usize + row_payload.max(self.stride as usize)
    }
}

// CameraFrame carries a large buffer; keep Debug output to the geometry.
impl fmt::Debug for CameraFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CameraFrame({}x{} {} seq={} {} bytes)",
            self.width,
            self.height,
            self.format,
            self.sequence,
            self.data.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_display() {
        assert_eq!(Resolution::new(1024, 768).to_string(), "1024x768");
    }

    #[test]
    fn test_frame_expected_len_uses_stride() {
        let frame = CameraFrame {
            width: 4,
            height: 2,
            stride: 8,
            format: PixelFormat::Gray8,
            sequence: 0,
            data: vec![0u8; 16].into(),
        };
        assert_eq!(frame.expected_len(), 16);
    }

    #[test]
    fn test_frame_expected_len_with_stride_narrower_than_width() {
        // Malformed geometry: rows overlap, so the payload still dictates
        // the bound and a stride * height buffer is too short
        let frame = CameraFrame {
            width: 8,
            height: 1,
            stride: 4,
            format: PixelFormat::Gray8,
            sequence: 0,
            data: vec![0u8; 4].into(),
        };
        assert_eq!(frame.expected_len(), 8);
        assert!(frame.data.len() < frame.expected_len());
    }

    #[test]
    fn test_frame_expected_len_zero_height() {
        let frame = CameraFrame {
            width: 4,
            height: 0,
            stride: 4,
            format: PixelFormat::Gray8,
            sequence: 0,
            data: vec![0u8; 0].into(),
        };
        assert_eq!(frame.expected_len(), 0);
    }
}
