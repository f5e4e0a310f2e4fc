//! Settings sync configuration.
//!
//! Loaded from a JSON file; every field is optional and falls back to its
//! default.
//!
//! ```json
//! { "settings_sync_enabled": true, "legacy_fallback": true }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use settings_sync_protocol::{CapabilityFlag, SyncConfig};

use crate::error::{Result, SettingsSyncError};

/// Configuration for settings sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsSyncConfig {
    /// Initial state of the capability flag selecting the current protocol.
    pub settings_sync_enabled: bool,
    /// Run the legacy protocol while the flag is off.
    pub legacy_fallback: bool,
}

impl Default for SettingsSyncConfig {
    fn default() -> Self {
        Self {
            settings_sync_enabled: false,
            legacy_fallback: true,
        }
    }
}

impl SettingsSyncConfig {
    /// Parse from a JSON string.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| SettingsSyncError::Config(e.to_string()))
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path)?;
        let config = Self::from_json(&body)?;
        tracing::debug!(path = %path.display(), ?config, "loaded settings sync config");
        Ok(config)
    }

    /// A fresh capability flag initialised from this config.
    pub fn flag(&self) -> CapabilityFlag {
        CapabilityFlag::new(self.settings_sync_enabled)
    }

    /// Session options derived from this config.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            legacy_fallback: self.legacy_fallback,
        }
    }
}
