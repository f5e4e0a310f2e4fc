//! # Settings Sync
//!
//! The unified API for synchronizing user settings between a device and an
//! account service.
//!
//! ## Overview
//!
//! Settings are reconciled by last modification time instead of always
//! pushing or always pulling:
//!
//! - **Store**: the host's persisted settings, behind [`store::SettingStore`]
//! - **Codec**: typed values to and from their wire form
//! - **Protocol**: request building, per-key last-writer-wins reconciliation,
//!   and the deprecated legacy exchange, selected by a capability flag
//! - **Job**: one attempt, collapsed to success or failure for the scheduler
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use settings_sync::{JobOutcome, SettingsSyncConfig, SettingsSyncJob};
//! use settings_sync::protocol::MemoryServer;
//! use settings_sync::store::MemoryStore;
//!
//! async fn example() {
//!     let config = SettingsSyncConfig::load("settings-sync.json").unwrap_or_default();
//!     let flag = config.flag();
//!
//!     let job = SettingsSyncJob::new(
//!         Arc::new(MemoryStore::new()),
//!         Arc::new(MemoryServer::new()),
//!         flag,
//!         &config,
//!     );
//!
//!     if job.run().await == JobOutcome::Failed {
//!         // let the scheduler retry
//!     }
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `settings_sync::core` - Setting keys, values, codec
//! - `settings_sync::store` - Store trait and in-memory store
//! - `settings_sync::protocol` - Messages, transport, reconciliation

pub mod config;
pub mod error;
pub mod job;
pub mod logging;

// Re-export component crates
pub use settings_sync_core as core;
pub use settings_sync_protocol as protocol;
pub use settings_sync_store as store;

// Re-export main types for convenience
pub use config::SettingsSyncConfig;
pub use error::{Result, SettingsSyncError};
pub use job::{JobOutcome, SettingsSyncJob};
pub use logging::init_logging;

pub use settings_sync_core::{SettingKey, SettingValue};
pub use settings_sync_protocol::{CapabilityFlag, SettingsTransport, SyncReport};
pub use settings_sync_store::{SettingStore, SettingStoreExt};
