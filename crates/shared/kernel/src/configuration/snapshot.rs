use super::{ConfigurationError, ConfigurationErrorExt};
use art_domain::settings::Settings;
use serde::{Deserialize, Serialize};

/// The part of a [`Configuration`](super::Configuration) that can cross a process
/// boundary.
///
/// Only the settings value travels. Providers, storage and the scheduler hold live
/// resources and are reconstructed on the receiving side; `scheduler_installed` tells
/// it whether the sender ran with a scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationSnapshot {
    pub settings: Settings,
    pub scheduler_installed: bool,
}

impl ConfigurationSnapshot {
    /// # Errors
    /// Returns [`ConfigurationError::Snapshot`] if encoding fails.
    pub fn to_json(&self) -> Result<String, ConfigurationError> {
        serde_json::to_string(self).context("Encoding configuration snapshot")
    }

    /// # Errors
    /// Returns [`ConfigurationError::Snapshot`] if `json` is not a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(json).context("Decoding configuration snapshot")
    }
}
