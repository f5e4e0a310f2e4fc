//! Log output for hosts that do not install their own subscriber.

use tracing_subscriber::EnvFilter;

use crate::error::{Result, SettingsSyncError};

/// Install a formatting subscriber filtered by `RUST_LOG`, defaulting to
/// `info` for this crate family.
///
/// Fails if a global subscriber is already set.
pub fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("settings_sync=info,settings_sync_protocol=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|e| SettingsSyncError::Config(format!("logging: {e}")))
}
