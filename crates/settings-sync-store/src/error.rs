//! Error types for the store module.

use settings_sync_core::CoreError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Value does not fit the setting's kind.
    #[error("type mismatch: {0}")]
    TypeMismatch(#[from] CoreError),

    /// A lock guarding the store was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    Poisoned,

    /// Failure reported by an external persistence backend.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
