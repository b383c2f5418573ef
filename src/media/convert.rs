// SPDX-License-Identifier: GPL-3.0-only

//! Gray to RGB expansion
//!
//! The sensor delivers single-channel frames; the display path wants packed
//! three-channel data. Luma is replicated per channel, input stride is
//! honored, output rows are dense.

use crate::backends::camera::{CameraFrame, PixelFormat};
use crate::errors::ConvertError;

/// Expand a Gray8 frame into a packed RGB24 frame
pub fn gray8_to_rgb24(frame: &CameraFrame) -> Result<CameraFrame, ConvertError> {
    if frame.format != PixelFormat::Gray8 {
        return Err(ConvertError::UnsupportedFormat(frame.format.to_string()));
    }

    let data = frame.data_slice();
    let expected = frame.expected_len();
    if data.len() < expected {
        return Err(ConvertError::Truncated {
            expected,
            actual: data.len(),
        });
    }

    let width = frame.width as usize;
    let height = frame.height as usize;
    let stride = frame.stride as usize;

    let mut rgb = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        let row = &data[y * stride..y * stride + width];
        for &luma in row {
            rgb.extend_from_slice(&[luma, luma, luma]);
        }
    }

    Ok(CameraFrame {
        width: frame.width,
        height: frame.height,
        stride: frame.width * PixelFormat::Rgb24.bytes_per_pixel(),
        format: PixelFormat::Rgb24,
        sequence: frame.sequence,
        data: rgb.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray_frame(width: u32, height: u32, stride: u32, data: Vec<u8>) -> CameraFrame {
        CameraFrame {
            width,
            height,
            stride,
            format: PixelFormat::Gray8,
            sequence: 7,
            data: data.into(),
        }
    }

    #[test]
    fn test_luma_replicated_per_channel() {
        let frame = gray_frame(2, 1, 2, vec![10, 200]);
        let rgb = gray8_to_rgb24(&frame).unwrap();

        assert_eq!(rgb.format, PixelFormat::Rgb24);
        assert_eq!(rgb.stride, 6);
        assert_eq!(rgb.sequence, 7);
        assert_eq!(rgb.data_slice(), &[10, 10, 10, 200, 200, 200]);
    }

    #[test]
    fn test_stride_padding_skipped() {
        // 2x2 image with stride 4: two padding bytes per row
        let frame = gray_frame(2, 2, 4, vec![1, 2, 0xee, 0xee, 3, 4, 0xee, 0xee]);
        let rgb = gray8_to_rgb24(&frame).unwrap();

        assert_eq!(rgb.data_slice(), &[1, 1, 1, 2, 2, 2, 3, 3, 3, 4, 4, 4]);
    }

    #[test]
    fn test_truncated_input_rejected() {
        let frame = gray_frame(4, 4, 4, vec![0; 8]);
        let err = gray8_to_rgb24(&frame).unwrap_err();
        assert_eq!(
            err,
            ConvertError::Truncated {
                expected: 16,
                actual: 8
            }
        );
    }

    #[test]
    fn test_stride_narrower_than_width_rejected() {
        // An adapter bug can declare rows shorter than the pixel payload;
        // that must surface as the typed error, not an out-of-bounds read
        let frame = gray_frame(8, 1, 4, vec![0; 4]);
        let err = gray8_to_rgb24(&frame).unwrap_err();
        assert_eq!(
            err,
            ConvertError::Truncated {
                expected: 8,
                actual: 4
            }
        );
    }

    #[test]
    fn test_rgb_input_rejected() {
        let mut frame = gray_frame(1, 1, 3, vec![0, 0, 0]);
        frame.format = PixelFormat::Rgb24;
        assert!(matches!(
            gray8_to_rgb24(&frame),
            Err(ConvertError::UnsupportedFormat(_))
        ));
    }
}
