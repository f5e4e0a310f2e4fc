//! In-memory implementation of the SettingStore trait.
//!
//! Primarily for tests and for embedding hosts that persist settings
//! elsewhere. Starts with every registered setting at its default value, with
//! no local modification on record.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use settings_sync_core::{CoreError, SettingKey, SettingValue};

use crate::error::{Result, StoreError};
use crate::traits::{SettingStore, StoredSetting};

/// Source of "now" for local modification stamps.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<HashMap<SettingKey, Entry>>,
    clock: Clock,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    value: SettingValue,
    modified_at: Option<DateTime<Utc>>,
    needs_sync: bool,
}

impl MemoryStore {
    /// Create a store holding registry defaults.
    pub fn new() -> Self {
        let entries = SettingKey::all()
            .map(|key| {
                let entry = Entry {
                    value: key.default_value(),
                    modified_at: None,
                    needs_sync: false,
                };
                (key, entry)
            })
            .collect();

        Self {
            inner: RwLock::new(entries),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the clock used to stamp local modifications.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Overwrite a setting's full state, including its modification stamp.
    ///
    /// Used to set up fixtures; normal writes go through [`SettingStore::set`].
    pub fn seed(
        &self,
        key: SettingKey,
        value: SettingValue,
        modified_at: Option<DateTime<Utc>>,
        needs_sync: bool,
    ) -> Result<()> {
        check_kind(key, &value)?;
        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        inner.insert(
            key,
            Entry {
                value,
                modified_at,
                needs_sync,
            },
        );
        Ok(())
    }

    /// Whether the key has local changes not yet confirmed by the server.
    pub fn needs_sync(&self, key: SettingKey) -> Result<bool> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(inner.get(&key).map(|e| e.needs_sync).unwrap_or(false))
    }

    /// All keys currently marked as needing sync, in registry order.
    pub fn pending_keys(&self) -> Result<Vec<SettingKey>> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(SettingKey::all()
            .filter(|key| inner.get(key).map(|e| e.needs_sync).unwrap_or(false))
            .collect())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStore")
            .field("entries", &self.inner)
            .finish_non_exhaustive()
    }
}

impl SettingStore for MemoryStore {
    fn get(&self, key: SettingKey) -> Result<StoredSetting> {
        let inner = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        let stored = match inner.get(&key) {
            Some(entry) => StoredSetting {
                value: entry.value,
                modified_at: entry.modified_at,
            },
            None => StoredSetting {
                value: key.default_value(),
                modified_at: None,
            },
        };
        Ok(stored)
    }

    fn set(&self, key: SettingKey, value: SettingValue, needs_sync: bool) -> Result<()> {
        check_kind(key, &value)?;
        let now = if needs_sync { Some((self.clock)()) } else { None };

        let mut inner = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        let entry = inner.entry(key).or_insert(Entry {
            value,
            modified_at: None,
            needs_sync,
        });
        entry.value = value;
        entry.needs_sync = needs_sync;
        if now.is_some() {
            entry.modified_at = now;
        }

        tracing::trace!(key = %key, ?value, needs_sync, "setting written");
        Ok(())
    }
}

fn check_kind(key: SettingKey, value: &SettingValue) -> Result<()> {
    if value.kind() != key.kind() {
        return Err(StoreError::TypeMismatch(CoreError::KindMismatch {
            key: key.wire_name(),
            expected: key.kind(),
            actual: value.kind(),
        }));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::SettingStoreExt;
    use chrono::TimeZone;
    use settings_sync_core::PodcastsSortType;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_memory_store_defaults() {
        let store = MemoryStore::new();
        let skip_back = store.get(SettingKey::SkipBack).unwrap();
        assert_eq!(skip_back.value, SettingValue::Seconds(10));
        assert_eq!(skip_back.modified_at, None);
        assert!(store.pending_keys().unwrap().is_empty());
    }

    #[test]
    fn test_local_set_stamps_and_marks_dirty() {
        let store = MemoryStore::new().with_clock(fixed_time);
        store.set_local(SettingKey::SkipForward, SettingValue::Seconds(45)).unwrap();

        let stored = store.get(SettingKey::SkipForward).unwrap();
        assert_eq!(stored.value, SettingValue::Seconds(45));
        assert_eq!(stored.modified_at, Some(fixed_time()));
        assert!(store.needs_sync(SettingKey::SkipForward).unwrap());
        assert_eq!(store.pending_keys().unwrap(), vec![SettingKey::SkipForward]);
    }

    #[test]
    fn test_synced_set_clears_dirty_keeps_stamp() {
        let store = MemoryStore::new().with_clock(fixed_time);
        store.set_local(SettingKey::SkipForward, SettingValue::Seconds(45)).unwrap();
        store.set(SettingKey::SkipForward, SettingValue::Seconds(60), false).unwrap();

        let stored = store.get(SettingKey::SkipForward).unwrap();
        assert_eq!(stored.value, SettingValue::Seconds(60));
        assert_eq!(stored.modified_at, Some(fixed_time()));
        assert!(!store.needs_sync(SettingKey::SkipForward).unwrap());
    }

    #[test]
    fn test_set_rejects_wrong_kind() {
        let store = MemoryStore::new();
        let err = store
            .set(SettingKey::MarketingOptIn, SettingValue::Seconds(1), true)
            .unwrap_err();
        assert!(matches!(err, StoreError::TypeMismatch(_)));
        assert_eq!(
            store.get(SettingKey::MarketingOptIn).unwrap().value,
            SettingValue::Flag(false)
        );
    }

    #[test]
    fn test_seed_and_snapshot() {
        let store = MemoryStore::new();
        store
            .seed(
                SettingKey::PodcastsSortOrder,
                SettingValue::PodcastsSort(PodcastsSortType::NameAToZ),
                Some(fixed_time()),
                true,
            )
            .unwrap();

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.len(), SettingKey::all().count());
        let (key, sort) = snapshot[SettingKey::PodcastsSortOrder as usize];
        assert_eq!(key, SettingKey::PodcastsSortOrder);
        assert_eq!(sort.modified_at, Some(fixed_time()));
        assert_eq!(store.pending_keys().unwrap(), vec![SettingKey::PodcastsSortOrder]);
    }
}
