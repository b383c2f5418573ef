// SPDX-License-Identifier: GPL-3.0-only

//! Profile controller
//!
//! Glue between the control surface and the camera: applies a named profile
//! to the session and folds operator edits back into the store. Statuses are
//! returned to the caller so failures reach the status bar instead of only
//! the log.

use tracing::{debug, error, info};

use crate::backends::camera::CameraSession;
use crate::errors::{CameraError, ProfileError};
use crate::profiles::{ProfileSettings, ProfileStore};

/// Outcome of an apply, surfaced in the control surface status bar
#[derive(Debug, Clone)]
pub enum ApplyStatus {
    /// All three settings reached the camera
    Applied {
        /// Name of the profile that was applied
        profile: String,
    },
    /// The active-profile reference advanced but the settings push failed
    ///
    /// The push stops at the first rejected setting; attributes after it keep
    /// their previous hardware values. The pointer is deliberately not rolled
    /// back — this matches the long-standing behavior of the tool.
    AppliedWithErrors {
        /// Name of the profile that is now active
        profile: String,
        /// The first adapter failure encountered
        error: CameraError,
    },
}

impl ApplyStatus {
    /// One-line summary for the status bar
    pub fn message(&self) -> String {
        match self {
            ApplyStatus::Applied { profile } => format!("Applied {}", profile),
            ApplyStatus::AppliedWithErrors { profile, error } => {
                format!("{} active, but {}", profile, error)
            }
        }
    }

    /// Whether the push fully succeeded
    pub fn is_clean(&self) -> bool {
        matches!(self, ApplyStatus::Applied { .. })
    }
}

/// Applies profiles to the camera session and records operator edits
pub struct ProfileController {
    store: ProfileStore,
    session: CameraSession,
}

impl ProfileController {
    pub fn new(store: ProfileStore, session: CameraSession) -> Self {
        Self { store, session }
    }

    /// Read access to the profile table for the control surface
    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Make `name` the active profile and push its settings to the camera
    ///
    /// The settings are pushed as one adapter call per attribute, in the
    /// order resolution, frame rate, exposure. An unknown name fails without
    /// touching anything; an adapter failure is logged and carried in the
    /// returned status while the active-profile reference stays advanced.
    pub fn apply(&mut self, name: &str) -> Result<ApplyStatus, ProfileError> {
        self.store.set_active(name)?;
        let settings = self.store.active().settings;

        debug!(
            profile = name,
            settings = %serde_json::json!(settings),
            "Applying profile"
        );

        match self.push_settings(&settings) {
            Ok(()) => {
                info!(profile = name, "Profile applied");
                Ok(ApplyStatus::Applied {
                    profile: name.to_string(),
                })
            }
            Err(e) => {
                error!(profile = name, error = %e, "Failed to apply profile");
                Ok(ApplyStatus::AppliedWithErrors {
                    profile: name.to_string(),
                    error: e,
                })
            }
        }
    }

    /// Overwrite the active profile with `settings` and re-apply it
    ///
    /// Only the active entry changes; every other profile is untouched.
    pub fn update(&mut self, settings: ProfileSettings) -> Result<ApplyStatus, ProfileError> {
        let name = self.store.active_name().to_string();
        self.store.update_active(settings);
        info!(
            profile = %name,
            settings = %serde_json::json!(settings),
            "Profile updated"
        );
        self.apply(&name)
    }

    fn push_settings(&self, settings: &ProfileSettings) -> Result<(), CameraError> {
        self.session.set_resolution(settings.resolution)?;
        self.session.set_frame_rate(settings.frame_rate)?;
        self.session.set_exposure(settings.exposure)?;
        Ok(())
    }
}
