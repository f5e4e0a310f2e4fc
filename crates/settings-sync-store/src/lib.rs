//! # Settings Sync Store
//!
//! Storage abstraction for settings sync. Provides the [`SettingStore`] trait
//! that the sync protocol reads from and writes to, plus an in-memory
//! implementation.
//!
//! ## Key Types
//!
//! - [`SettingStore`] - get/set interface with an explicit needs-sync flag
//! - [`StoredSetting`] - A value plus its local modification instant
//! - [`MemoryStore`] - In-memory store, seeded with registry defaults
//!
//! ## Usage
//!
//! ```rust
//! use settings_sync_core::{SettingKey, SettingValue};
//! use settings_sync_store::{MemoryStore, SettingStore, SettingStoreExt};
//!
//! let store = MemoryStore::new();
//! store.set_local(SettingKey::SkipBack, SettingValue::Seconds(15)).unwrap();
//!
//! let stored = store.get(SettingKey::SkipBack).unwrap();
//! assert_eq!(stored.value, SettingValue::Seconds(15));
//! assert!(stored.modified_at.is_some());
//! ```

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::{Clock, MemoryStore};
pub use traits::{SettingStore, SettingStoreExt, StoredSetting};
