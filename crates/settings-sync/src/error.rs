//! Error types for the settings sync facade.

use settings_sync_protocol::SyncError;
use settings_sync_store::StoreError;
use thiserror::Error;

/// Errors that can occur when configuring or running settings sync.
#[derive(Debug, Error)]
pub enum SettingsSyncError {
    /// Sync attempt failed.
    #[error("sync error: {0}")]
    Sync(#[from] SyncError),

    /// Storage error outside of a sync attempt.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be parsed or applied.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for settings sync operations.
pub type Result<T> = std::result::Result<T, SettingsSyncError>;
