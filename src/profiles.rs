// SPDX-License-Identifier: GPL-3.0-only

//! Acquisition profiles
//!
//! A profile bundles the three settings an operator edits: resolution, frame
//! rate and exposure. The store keeps a fixed set of named profiles in
//! insertion order (the control surface lists them in that order) and tracks
//! which one is active. Profiles live in memory only — nothing is persisted.

use serde::{Deserialize, Serialize};

use crate::backends::camera::Resolution;
use crate::constants::DEFAULT_PROFILES;
use crate::errors::ProfileError;

/// The settings triple pushed to the camera when a profile is applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileSettings {
    /// Sensor readout resolution
    pub resolution: Resolution,
    /// Acquisition rate in frames per second
    pub frame_rate: f64,
    /// Exposure time in microseconds
    pub exposure: f64,
}

impl ProfileSettings {
    /// Parse operator input from the three text fields
    ///
    /// Range checking against the sensor is deliberately not done here; the
    /// adapter rejects what the hardware cannot do. Only structural validity
    /// (parseable, positive) is enforced, and a failure leaves all state
    /// untouched.
    pub fn parse(resolution: &str, frame_rate: &str, exposure: &str) -> Result<Self, ProfileError> {
        Ok(Self {
            resolution: parse_resolution(resolution)?,
            frame_rate: parse_frame_rate(frame_rate)?,
            exposure: parse_exposure(exposure)?,
        })
    }
}

/// A named settings bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Unique key, shown in the profile list
    pub name: String,
    /// The settings triple
    pub settings: ProfileSettings,
}

/// In-memory profile table with exactly one active entry
#[derive(Debug, Clone)]
pub struct ProfileStore {
    profiles: Vec<Profile>,
    active: usize,
}

impl ProfileStore {
    /// Seed the store with the built-in defaults; the first entry is active
    pub fn with_defaults() -> Self {
        let profiles = DEFAULT_PROFILES
            .iter()
            .map(|&(name, (width, height), frame_rate, exposure)| Profile {
                name: name.to_string(),
                settings: ProfileSettings {
                    resolution: Resolution::new(width, height),
                    frame_rate,
                    exposure,
                },
            })
            .collect();

        Self {
            profiles,
            active: 0,
        }
    }

    /// Profile names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(|p| p.name.as_str())
    }

    /// Number of profiles
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the store holds no profiles (never true after seeding)
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Look up a profile's settings by name
    pub fn get(&self, name: &str) -> Option<&ProfileSettings> {
        self.profiles
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.settings)
    }

    /// The currently active profile
    pub fn active(&self) -> &Profile {
        &self.profiles[self.active]
    }

    /// Name of the currently active profile
    pub fn active_name(&self) -> &str {
        &self.profiles[self.active].name
    }

    /// Reassign the active-profile reference
    pub fn set_active(&mut self, name: &str) -> Result<(), ProfileError> {
        match self.profiles.iter().position(|p| p.name == name) {
            Some(index) => {
                self.active = index;
                Ok(())
            }
            None => Err(ProfileError::UnknownProfile(name.to_string())),
        }
    }

    /// Overwrite the active profile's settings in place
    ///
    /// Other entries are untouched.
    pub fn update_active(&mut self, settings: ProfileSettings) {
        self.profiles[self.active].settings = settings;
    }
}

/// Parse a resolution string
///
/// Tolerant of the `"(1280, 720)"` form the fields are pre-filled with as
/// well as bare `"1280,720"`, with arbitrary whitespace.
pub fn parse_resolution(input: &str) -> Result<Resolution, ProfileError> {
    let trimmed = input.trim().trim_start_matches('(').trim_end_matches(')');
    let err = || ProfileError::Resolution(input.to_string());

    let (width_s, height_s) = trimmed.split_once(',').ok_or_else(err)?;
    let width: u32 = width_s.trim().parse().map_err(|_| err())?;
    let height: u32 = height_s.trim().parse().map_err(|_| err())?;

    if width == 0 || height == 0 {
        return Err(err());
    }
    Ok(Resolution::new(width, height))
}

/// Parse a frame rate field as a positive number of fps
pub fn parse_frame_rate(input: &str) -> Result<f64, ProfileError> {
    parse_positive(input).ok_or_else(|| ProfileError::FrameRate(input.to_string()))
}

/// Parse an exposure field as a positive number of microseconds
pub fn parse_exposure(input: &str) -> Result<f64, ProfileError> {
    parse_positive(input).ok_or_else(|| ProfileError::Exposure(input.to_string()))
}

fn parse_positive(input: &str) -> Option<f64> {
    let value: f64 = input.trim().parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_seeded_in_order() {
        let store = ProfileStore::with_defaults();
        assert_eq!(
            store.names().collect::<Vec<_>>(),
            vec!["Profile 1", "Profile 2", "Profile 3"]
        );
        assert_eq!(store.active_name(), "Profile 1");
    }

    #[test]
    fn test_profile_2_frame_rate_is_200() {
        let mut store = ProfileStore::with_defaults();
        store.set_active("Profile 2").unwrap();
        assert_eq!(store.active().settings.frame_rate, 200.0);
    }

    #[test]
    fn test_set_active_unknown_name() {
        let mut store = ProfileStore::with_defaults();
        let err = store.set_active("Profile 9").unwrap_err();
        assert_eq!(err, ProfileError::UnknownProfile("Profile 9".to_string()));
        assert_eq!(store.active_name(), "Profile 1");
    }

    #[test]
    fn test_update_active_leaves_others_untouched() {
        let mut store = ProfileStore::with_defaults();
        store.set_active("Profile 3").unwrap();
        let before_1 = store.get("Profile 1").copied().unwrap();
        let before_2 = store.get("Profile 2").copied().unwrap();

        store.update_active(ProfileSettings {
            resolution: Resolution::new(100, 100),
            frame_rate: 30.0,
            exposure: 10.0,
        });

        assert_eq!(store.get("Profile 1"), Some(&before_1));
        assert_eq!(store.get("Profile 2"), Some(&before_2));
        let updated = store.get("Profile 3").unwrap();
        assert_eq!(updated.resolution, Resolution::new(100, 100));
        assert_eq!(updated.frame_rate, 30.0);
        assert_eq!(updated.exposure, 10.0);
    }

    #[test]
    fn test_parse_resolution_with_parentheses() {
        assert_eq!(
            parse_resolution("(1280, 720)").unwrap(),
            Resolution::new(1280, 720)
        );
    }

    #[test]
    fn test_parse_resolution_bare() {
        assert_eq!(
            parse_resolution("1280,720").unwrap(),
            Resolution::new(1280, 720)
        );
    }

    #[test]
    fn test_parse_resolution_extra_whitespace() {
        assert_eq!(
            parse_resolution("  ( 1280 ,  720 )  ").unwrap(),
            Resolution::new(1280, 720)
        );
    }

    #[test]
    fn test_parse_resolution_rejects_garbage() {
        assert!(parse_resolution("abc").is_err());
        assert!(parse_resolution("1280").is_err());
        assert!(parse_resolution("1280,").is_err());
        assert!(parse_resolution("0,480").is_err());
        assert!(parse_resolution("-640,480").is_err());
    }

    #[test]
    fn test_parse_rates_positive_only() {
        assert_eq!(parse_frame_rate(" 200 ").unwrap(), 200.0);
        assert_eq!(parse_exposure("500.5").unwrap(), 500.5);
        assert!(parse_frame_rate("0").is_err());
        assert!(parse_frame_rate("-30").is_err());
        assert!(parse_frame_rate("fast").is_err());
        assert!(parse_exposure("NaN").is_err());
        assert!(parse_exposure("inf").is_err());
    }

    #[test]
    fn test_settings_parse_failure_is_typed() {
        assert!(matches!(
            ProfileSettings::parse("(100,100)", "abc", "10"),
            Err(ProfileError::FrameRate(_))
        ));
        assert!(matches!(
            ProfileSettings::parse("oops", "30", "10"),
            Err(ProfileError::Resolution(_))
        ));
    }
}
