//! Error types for the sync module.
//!
//! Only attempt-level failures are errors. Per-field problems found while
//! reconciling a response are recorded in the
//! [`SyncReport`](crate::report::SyncReport) instead.

use thiserror::Error;

/// Errors that abort a sync attempt.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(String),

    /// Message could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Store operation failed.
    #[error("store error: {0}")]
    Store(#[from] settings_sync_store::StoreError),

    /// A stored value did not fit its setting.
    #[error("setting error: {0}")]
    Core(#[from] settings_sync_core::CoreError),

    /// Sync was cancelled before a response arrived.
    #[error("sync cancelled")]
    Cancelled,
}

/// Result type for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;
