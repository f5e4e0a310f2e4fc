//! Error types for the settings sync core.

use thiserror::Error;

use crate::types::SettingKind;

/// Core errors for setting lookup and typing.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown setting key: {0}")]
    UnknownKey(String),

    #[error("setting {key} expects a {expected} value, got {actual}")]
    KindMismatch {
        key: &'static str,
        expected: SettingKind,
        actual: SettingKind,
    },
}
