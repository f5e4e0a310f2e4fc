//! # Settings Sync Protocol
//!
//! Reconciles synchronizable settings between a device and the account
//! service, resolving conflicts by last modification time.
//!
//! ## Overview
//!
//! Two protocols co-exist, selected per attempt by a [`CapabilityFlag`]:
//!
//! - **Current**: every known setting is sent with its local modification
//!   instant. The server answers with its own value and instant per key, and
//!   the client adopts a server value only when it is stamped, well formed,
//!   and not older than the local change.
//! - **Legacy** (deprecated): a fixed subset of values is sent without
//!   timestamps, and the client applies whatever the server marks `changed`.
//!
//! ## Key Properties
//!
//! - **Per-key isolation**: a malformed or stale entry skips only that key
//! - **Forward compatible**: unknown response keys are logged and ignored
//! - **Coarse failure**: only transport, store, and encoding errors fail an
//!   attempt
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use settings_sync_protocol::{CapabilityFlag, MemoryServer, SyncConfig, SyncSession};
//! use settings_sync_store::MemoryStore;
//!
//! async fn example() {
//!     let store = Arc::new(MemoryStore::new());
//!     let server = Arc::new(MemoryServer::new());
//!     let flag = CapabilityFlag::new(true);
//!
//!     let session = SyncSession::new(store, server, flag, SyncConfig::default());
//!     let report = session.run().await.unwrap();
//!     println!("adopted {} settings", report.adopted());
//! }
//! ```
//!
//! ## Message Flow
//!
//! ```text
//! Device                                  Account service
//!   |-- {key: {value, modifiedAt?}} ------------->|
//!   |<------------- {key: {value, modifiedAt?}} --|
//!   |  reconcile per key (last writer wins)       |
//! ```

pub mod builder;
pub mod error;
pub mod flag;
pub mod legacy;
pub mod messages;
pub mod protocol;
pub mod reconcile;
pub mod report;
pub mod transport;

pub use builder::build_request;
pub use error::{Result, SyncError};
pub use flag::CapabilityFlag;
pub use legacy::{apply_legacy_response, build_legacy_request, LEGACY_KEYS};
pub use messages::{
    instant, ChangeSetRequest, ChangeSetResponse, LegacyEntry, LegacySettingsRequest,
    LegacySettingsResponse, RequestEntry, ResponseEntry,
};
pub use protocol::{CurrentProtocol, LegacyProtocol, SyncConfig, SyncSession, SyncStrategy};
pub use reconcile::{reconcile, reconcile_entry, server_wins};
pub use report::{KeyOutcome, Protocol, SyncReport};
pub use transport::{
    memory::MemoryServer, memory::ScriptedTransport, memory::ServerSetting, SettingsTransport,
};
