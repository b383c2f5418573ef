// SPDX-License-Identifier: GPL-3.0-only

//! Hardcoded defaults and limits
//!
//! There is no persisted configuration: profile defaults, sensor limits and
//! key bindings all live here.

use std::time::Duration;

/// Default log file, created in the working directory
pub const DEFAULT_LOG_FILE: &str = "phantom-control.log";

/// Default tracing filter when RUST_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Profile applied at startup and preselected in the profile list
pub const DEFAULT_PROFILE: &str = "Profile 1";

/// Built-in acquisition profiles: name, (width, height), frame rate (fps),
/// exposure (microseconds). The store is seeded with these at startup.
pub const DEFAULT_PROFILES: [(&str, (u32, u32), f64, f64); 3] = [
    ("Profile 1", (1024, 768), 100.0, 1000.0),
    ("Profile 2", (640, 480), 200.0, 500.0),
    ("Profile 3", (1920, 1080), 50.0, 2000.0),
];

/// Window title shown above the preview pane
pub const PREVIEW_TITLE: &str = "Live Feed";

/// How long the UI event loop waits for input before redrawing
pub const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Filename prefix for saved snapshots
pub const SNAPSHOT_PREFIX: &str = "IMG_";

/// Synthetic sensor limits, enforced by the adapter rather than the store
/// so that out-of-range saves surface the same way real driver rejections do.
pub mod sensor {
    /// Number of synthetic devices that `connect` will accept
    pub const DEVICE_COUNT: usize = 1;

    /// Maximum sensor width in pixels
    pub const MAX_WIDTH: u32 = 2560;

    /// Maximum sensor height in pixels
    pub const MAX_HEIGHT: u32 = 1600;

    /// Slowest supported acquisition rate in fps
    pub const MIN_FRAME_RATE: f64 = 1.0;

    /// Fastest supported acquisition rate in fps
    pub const MAX_FRAME_RATE: f64 = 10_000.0;

    /// Shortest supported exposure in microseconds
    pub const MIN_EXPOSURE_US: f64 = 1.0;

    /// Reference exposure at which the test pattern renders full brightness
    pub const NOMINAL_EXPOSURE_US: f64 = 2000.0;

    /// Longest a synthetic frame read will block, regardless of frame rate
    pub const MAX_FRAME_INTERVAL: std::time::Duration =
        std::time::Duration::from_millis(100);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profiles_within_sensor_limits() {
        for (name, (width, height), frame_rate, exposure) in DEFAULT_PROFILES {
            assert!(width > 0 && width <= sensor::MAX_WIDTH, "{name} width");
            assert!(height > 0 && height <= sensor::MAX_HEIGHT, "{name} height");
            assert!(
                frame_rate >= sensor::MIN_FRAME_RATE && frame_rate <= sensor::MAX_FRAME_RATE,
                "{name} frame rate"
            );
            // Exposure must fit within one frame interval
            assert!(
                exposure >= sensor::MIN_EXPOSURE_US && exposure <= 1_000_000.0 / frame_rate,
                "{name} exposure"
            );
        }
    }

    #[test]
    fn test_default_profile_is_seeded() {
        assert!(
            DEFAULT_PROFILES.iter().any(|(name, ..)| *name == DEFAULT_PROFILE),
            "default profile must be one of the seeded profiles"
        );
    }

    #[test]
    fn test_profile_names_unique() {
        for (i, (a, ..)) in DEFAULT_PROFILES.iter().enumerate() {
            for (b, ..) in DEFAULT_PROFILES.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
