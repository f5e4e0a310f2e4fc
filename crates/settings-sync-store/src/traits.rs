//! SettingStore trait: the interface sync needs from local persistence.
//!
//! The store owns every setting's value, its local modification instant, and
//! its needs-sync marker. Sync reads and writes through it and never keeps a
//! copy across calls.

use chrono::{DateTime, Utc};
use settings_sync_core::{SettingKey, SettingValue};

use crate::error::Result;

/// A setting as read from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoredSetting {
    pub value: SettingValue,
    /// When the value was last changed locally. `None` if never tracked.
    pub modified_at: Option<DateTime<Utc>>,
}

/// Local persistence for synchronizable settings.
///
/// Each field is independent: a `set` touches exactly one key and there is
/// no cross-key transaction.
///
/// # Design Notes
///
/// - `get` always yields a value; a setting that was never written reports
///   its registry default.
/// - `set(.., needs_sync = true)` records a local modification (stamping
///   `modified_at`) and marks the key dirty.
/// - `set(.., needs_sync = false)` records a value that is known to match the
///   server, and clears the dirty marker.
/// - Implementations reject a value whose kind does not match the key.
pub trait SettingStore: Send + Sync {
    /// Read a setting's current value and local modification instant.
    fn get(&self, key: SettingKey) -> Result<StoredSetting>;

    /// Write a setting's value.
    fn set(&self, key: SettingKey, value: SettingValue, needs_sync: bool) -> Result<()>;
}

/// Extension trait for common store patterns.
pub trait SettingStoreExt: SettingStore {
    /// Read every registered setting, in registry order.
    fn snapshot(&self) -> Result<Vec<(SettingKey, StoredSetting)>> {
        SettingKey::all()
            .map(|key| self.get(key).map(|stored| (key, stored)))
            .collect()
    }

    /// Record a change made by the user.
    fn set_local(&self, key: SettingKey, value: SettingValue) -> Result<()> {
        self.set(key, value, true)
    }
}

impl<S: SettingStore + ?Sized> SettingStoreExt for S {}
