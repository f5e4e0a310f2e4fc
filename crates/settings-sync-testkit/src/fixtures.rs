//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use settings_sync::{SettingsSyncConfig, SettingsSyncJob};
use settings_sync_core::{SettingKey, SettingValue};
use settings_sync_protocol::{instant, CapabilityFlag, MemoryServer, SyncConfig, SyncSession};
use settings_sync_store::{MemoryStore, SettingStore, SettingStoreExt};

/// The instant every fixture clock starts at.
pub const EPOCH: &str = "2024-01-01T00:00:00.000Z";

/// Parse an RFC 3339 instant, panicking on malformed input.
pub fn at(raw: &str) -> DateTime<Utc> {
    instant::parse(raw).unwrap_or_else(|| panic!("bad fixture instant: {raw}"))
}

/// One device: a store with a controllable clock, talking to a server.
pub struct TestFixture {
    pub store: Arc<MemoryStore>,
    pub server: Arc<MemoryServer>,
    pub flag: CapabilityFlag,
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl TestFixture {
    /// A device with the current protocol enabled and its own server.
    pub fn new() -> Self {
        Self::with_server(Arc::new(MemoryServer::new()), true)
    }

    /// A device that still runs the legacy protocol.
    pub fn legacy() -> Self {
        Self::with_server(Arc::new(MemoryServer::new()), false)
    }

    /// A device sharing an existing server.
    pub fn with_server(server: Arc<MemoryServer>, enabled: bool) -> Self {
        let now = Arc::new(Mutex::new(at(EPOCH)));
        let clock = Arc::clone(&now);
        let store = MemoryStore::new()
            .with_clock(move || *clock.lock().unwrap_or_else(|poisoned| poisoned.into_inner()));

        Self {
            store: Arc::new(store),
            server,
            flag: CapabilityFlag::new(enabled),
            now,
        }
    }

    /// The device clock's current reading.
    pub fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Move the device clock.
    pub fn set_now(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = now;
    }

    /// Move the device clock forward.
    pub fn advance(&self, by: Duration) {
        let next = self.now() + by;
        self.set_now(next);
    }

    /// Record a user edit at the current clock reading.
    pub fn edit(&self, key: SettingKey, value: SettingValue) {
        self.store
            .set_local(key, value)
            .expect("fixture store rejected edit");
    }

    /// Current local value of a setting.
    pub fn value(&self, key: SettingKey) -> SettingValue {
        self.store.get(key).expect("fixture store read failed").value
    }

    /// Current local modification instant of a setting.
    pub fn modified_at(&self, key: SettingKey) -> Option<DateTime<Utc>> {
        self.store
            .get(key)
            .expect("fixture store read failed")
            .modified_at
    }

    pub fn needs_sync(&self, key: SettingKey) -> bool {
        self.store
            .needs_sync(key)
            .expect("fixture store read failed")
    }

    /// A session over this device's store and server.
    pub fn session(&self) -> SyncSession<MemoryStore, MemoryServer> {
        SyncSession::new(
            Arc::clone(&self.store),
            Arc::clone(&self.server),
            self.flag.clone(),
            SyncConfig::default(),
        )
    }

    /// A scheduler job over this device's store and server.
    pub fn job(&self) -> SettingsSyncJob<MemoryStore, MemoryServer> {
        let config = SettingsSyncConfig {
            settings_sync_enabled: self.flag.is_enabled(),
            ..Default::default()
        };
        SettingsSyncJob::new(
            Arc::clone(&self.store),
            Arc::clone(&self.server),
            self.flag.clone(),
            &config,
        )
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create several devices on one shared server, all on the current protocol.
pub fn multi_device_fixtures(count: usize) -> Vec<TestFixture> {
    let server = Arc::new(MemoryServer::new());
    (0..count)
        .map(|_| TestFixture::with_server(Arc::clone(&server), true))
        .collect()
}
