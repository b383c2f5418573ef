// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the camera controller

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for adapter-facing calls
pub type CameraResult<T> = Result<T, CameraError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Profile store / operator-input errors
    Profile(ProfileError),
    /// Frame conversion errors
    Convert(ConvertError),
    /// Preview pipeline errors
    Preview(String),
    /// Generic error with message
    Other(String),
}

/// Camera-specific errors
#[derive(Debug, Clone)]
pub enum CameraError {
    /// No camera at the requested index
    NotFound(usize),
    /// Camera initialization failed
    ConnectFailed(String),
    /// Camera disconnected during operation
    Disconnected,
    /// Session was already closed
    Closed,
    /// A setting was rejected by the hardware or driver
    SettingRejected {
        /// Which control was rejected (e.g. "resolution")
        control: &'static str,
        /// Driver-supplied reason
        reason: String,
    },
}

/// Profile store and operator-input errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    /// Name is not a key in the profile store
    UnknownProfile(String),
    /// Resolution field could not be parsed as "(w, h)" or "w,h"
    Resolution(String),
    /// Frame rate field is not a positive number
    FrameRate(String),
    /// Exposure field is not a positive number
    Exposure(String),
}

/// Frame conversion errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertError {
    /// Source frame is not in a convertible pixel format
    UnsupportedFormat(String),
    /// Source buffer is shorter than the declared geometry requires
    Truncated {
        /// Bytes required by width/height/stride
        expected: usize,
        /// Bytes actually present
        actual: usize,
    },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Profile(e) => write!(f, "Profile error: {}", e),
            AppError::Convert(e) => write!(f, "Conversion error: {}", e),
            AppError::Preview(msg) => write!(f, "Preview error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::NotFound(index) => write!(f, "No camera at index {}", index),
            CameraError::ConnectFailed(msg) => write!(f, "Failed to connect: {}", msg),
            CameraError::Disconnected => write!(f, "Camera disconnected"),
            CameraError::Closed => write!(f, "Camera session is closed"),
            CameraError::SettingRejected { control, reason } => {
                write!(f, "{} rejected: {}", control, reason)
            }
        }
    }
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::UnknownProfile(name) => write!(f, "Unknown profile: {}", name),
            ProfileError::Resolution(input) => {
                write!(f, "Invalid resolution {:?} (expected \"(w, h)\")", input)
            }
            ProfileError::FrameRate(input) => write!(
                f,
                "Invalid frame rate {:?} (expected a positive number)",
                input
            ),
            ProfileError::Exposure(input) => write!(
                f,
                "Invalid exposure {:?} (expected a positive number)",
                input
            ),
        }
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertError::UnsupportedFormat(format) => {
                write!(f, "Unsupported source format: {}", format)
            }
            ConvertError::Truncated { expected, actual } => write!(
                f,
                "Frame truncated: expected {} bytes, got {}",
                expected, actual
            ),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for ProfileError {}
impl std::error::Error for ConvertError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<ProfileError> for AppError {
    fn from(err: ProfileError) -> Self {
        AppError::Profile(err)
    }
}

impl From<ConvertError> for AppError {
    fn from(err: ConvertError) -> Self {
        AppError::Convert(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}
