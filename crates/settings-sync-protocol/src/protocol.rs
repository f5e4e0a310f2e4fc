//! Sync orchestration.
//!
//! One attempt is a single linear pass: choose a protocol, build the request,
//! await the transport, reconcile. The protocol is chosen once, from the
//! capability flag, and the two strategies share no code path so the legacy
//! one can be removed on its own.
//!
//! ```text
//! Start ──flag on──▶ CurrentProtocol ──▶ build ─▶ change_settings ─▶ reconcile ─┐
//!   │                                                                          ├─▶ Ok / Err
//!   └───flag off──▶ LegacyProtocol  ──▶ build ─▶ legacy_named_settings ─▶ apply ┘
//! ```

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::Instrument;

use settings_sync_store::SettingStore;

use crate::builder::build_request;
use crate::error::{Result, SyncError};
use crate::flag::CapabilityFlag;
use crate::legacy::{apply_legacy_response, build_legacy_request};
use crate::reconcile::reconcile;
use crate::report::{Protocol, SyncReport};
use crate::transport::SettingsTransport;

/// One way of running a sync attempt.
#[async_trait]
pub trait SyncStrategy: Send + Sync {
    fn protocol(&self) -> Protocol;

    async fn run(
        &self,
        store: &dyn SettingStore,
        transport: &dyn SettingsTransport,
    ) -> Result<SyncReport>;
}

/// Named, typed, timestamped change-set protocol.
#[derive(Debug, Clone)]
pub struct CurrentProtocol {
    flag: CapabilityFlag,
}

impl CurrentProtocol {
    pub fn new(flag: CapabilityFlag) -> Self {
        Self { flag }
    }
}

#[async_trait]
impl SyncStrategy for CurrentProtocol {
    fn protocol(&self) -> Protocol {
        Protocol::Current
    }

    /// Run the change-set exchange.
    ///
    /// # Panics
    ///
    /// In debug builds, if the capability flag is off. Release builds log an
    /// error and return an empty report without touching the network or the
    /// store.
    async fn run(
        &self,
        store: &dyn SettingStore,
        transport: &dyn SettingsTransport,
    ) -> Result<SyncReport> {
        if !self.flag.is_enabled() {
            if cfg!(debug_assertions) {
                panic!("current settings protocol invoked while settings sync is disabled");
            }
            tracing::error!("current settings protocol invoked while settings sync is disabled");
            return Ok(SyncReport::new(Protocol::Current));
        }

        let request = build_request(store)?;
        let mut report = SyncReport::new(Protocol::Current);
        report.sent_count = request.len();

        let response = transport.change_settings(request).await?;
        tracing::debug!(entries = response.len(), "received change-set response");

        reconcile(store, &response, &mut report)?;
        Ok(report)
    }
}

/// Deprecated values-only protocol.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyProtocol;

#[async_trait]
impl SyncStrategy for LegacyProtocol {
    fn protocol(&self) -> Protocol {
        Protocol::Legacy
    }

    async fn run(
        &self,
        store: &dyn SettingStore,
        transport: &dyn SettingsTransport,
    ) -> Result<SyncReport> {
        let request = build_legacy_request(store)?;
        let mut report = SyncReport::new(Protocol::Legacy);
        report.sent_count = crate::legacy::LEGACY_KEYS.len();

        let response = transport.legacy_named_settings(request).await?;
        tracing::debug!(entries = response.len(), "received legacy settings response");

        apply_legacy_response(store, &response, &mut report)?;
        Ok(report)
    }
}

/// Configuration for sync behavior.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Run the legacy protocol when the capability flag is off. When false, a
    /// disabled flag makes the attempt a no-op.
    pub legacy_fallback: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            legacy_fallback: true,
        }
    }
}

/// Drives sync attempts against one store and transport.
///
/// Attempts are not serialized against each other; callers must not run two
/// at once on the same store.
pub struct SyncSession<S: SettingStore, T: SettingsTransport> {
    store: Arc<S>,
    transport: Arc<T>,
    flag: CapabilityFlag,
    config: SyncConfig,
}

impl<S: SettingStore, T: SettingsTransport> SyncSession<S, T> {
    pub fn new(store: Arc<S>, transport: Arc<T>, flag: CapabilityFlag, config: SyncConfig) -> Self {
        Self {
            store,
            transport,
            flag,
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Pick the strategy for an attempt. Reads the flag exactly once.
    pub fn select_strategy(&self) -> Option<Box<dyn SyncStrategy>> {
        if self.flag.is_enabled() {
            Some(Box::new(CurrentProtocol::new(self.flag.clone())))
        } else if self.config.legacy_fallback {
            Some(Box::new(LegacyProtocol))
        } else {
            None
        }
    }

    /// Run one sync attempt.
    ///
    /// Per-key problems are recorded in the report. Only transport, store, or
    /// encoding failures return `Err`. Keys applied before a failure stay
    /// applied.
    pub async fn run(&self) -> Result<SyncReport> {
        let Some(strategy) = self.select_strategy() else {
            tracing::info!("settings sync disabled, skipping");
            return Ok(SyncReport::new(Protocol::Disabled));
        };

        let span = tracing::info_span!("settings_sync", protocol = %strategy.protocol());
        let report = strategy
            .run(self.store.as_ref(), self.transport.as_ref())
            .instrument(span)
            .await?;

        tracing::info!(
            protocol = %report.protocol,
            sent = report.sent_count,
            adopted = report.adopted(),
            skipped = report.skipped(),
            "settings sync complete"
        );
        Ok(report)
    }

    /// Run one sync attempt, abandoning it if `cancel` resolves first.
    ///
    /// Reconciliation never yields, so a cancelled attempt leaves the store
    /// exactly as it was.
    pub async fn run_until<C>(&self, cancel: C) -> Result<SyncReport>
    where
        C: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = cancel => {
                tracing::info!("settings sync cancelled");
                Err(SyncError::Cancelled)
            }
            result = self.run() => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{ChangeSetResponse, LegacyEntry, LegacySettingsResponse, ResponseEntry};
    use crate::report::KeyOutcome;
    use crate::transport::memory::ScriptedTransport;
    use settings_sync_core::{SettingKey, SettingValue};
    use settings_sync_store::MemoryStore;

    fn session(
        transport: ScriptedTransport,
        enabled: bool,
    ) -> SyncSession<MemoryStore, ScriptedTransport> {
        SyncSession::new(
            Arc::new(MemoryStore::new()),
            Arc::new(transport),
            CapabilityFlag::new(enabled),
            SyncConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_flag_on_runs_current_protocol() {
        let transport = ScriptedTransport::new().with_change_response(
            ChangeSetResponse::new()
                .with_entry("skipBack", ResponseEntry::stamped(15, "2024-01-01T00:00:00Z")),
        );
        let session = session(transport, true);

        let report = session.run().await.unwrap();
        assert_eq!(report.protocol, Protocol::Current);
        assert_eq!(report.sent_count, SettingKey::all().count());
        assert_eq!(report.outcome("skipBack"), Some(KeyOutcome::Adopted));
        assert_eq!(session.transport().change_requests().await.len(), 1);
        assert!(session.transport().legacy_requests().await.is_empty());
        assert_eq!(
            session.store().get(SettingKey::SkipBack).unwrap().value,
            SettingValue::Seconds(15)
        );
    }

    #[tokio::test]
    async fn test_flag_off_runs_legacy_protocol() {
        let transport = ScriptedTransport::new().with_legacy_response(
            LegacySettingsResponse::new().with_entry("skipForward", LegacyEntry::changed(20)),
        );
        let session = session(transport, false);

        let report = session.run().await.unwrap();
        assert_eq!(report.protocol, Protocol::Legacy);
        assert!(session.transport().change_requests().await.is_empty());
        assert_eq!(session.transport().legacy_requests().await.len(), 1);
        assert_eq!(
            session.store().get(SettingKey::SkipForward).unwrap().value,
            SettingValue::Seconds(20)
        );
    }

    #[tokio::test]
    async fn test_flag_off_without_fallback_is_noop() {
        let session = SyncSession::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ScriptedTransport::new()),
            CapabilityFlag::new(false),
            SyncConfig {
                legacy_fallback: false,
            },
        );

        let report = session.run().await.unwrap();
        assert_eq!(report.protocol, Protocol::Disabled);
        assert_eq!(session.transport().call_count().await, 0);
    }

    #[tokio::test]
    async fn test_transport_failure_fails_attempt() {
        let session = session(ScriptedTransport::new().failing("timeout"), true);
        let err = session.run().await.unwrap_err();
        assert!(matches!(err, SyncError::Transport(_)));
    }

    #[tokio::test]
    async fn test_cancel_before_response_leaves_store_untouched() {
        let transport = ScriptedTransport::new().with_change_response(
            ChangeSetResponse::new()
                .with_entry("skipBack", ResponseEntry::stamped(15, "2024-01-01T00:00:00Z")),
        );
        let session = session(transport, true);

        let err = session.run_until(std::future::ready(())).await.unwrap_err();
        assert!(matches!(err, SyncError::Cancelled));
        assert_eq!(session.transport().call_count().await, 0);
        assert_eq!(
            session.store().get(SettingKey::SkipBack).unwrap().value,
            SettingValue::Seconds(10)
        );
    }

    #[tokio::test]
    async fn test_pending_cancel_lets_attempt_finish() {
        let transport = ScriptedTransport::new().with_change_response(
            ChangeSetResponse::new()
                .with_entry("skipBack", ResponseEntry::stamped(15, "2024-01-01T00:00:00Z")),
        );
        let session = session(transport, true);

        let report = session.run_until(std::future::pending()).await.unwrap();
        assert_eq!(report.outcome("skipBack"), Some(KeyOutcome::Adopted));
        assert_eq!(
            session.store().get(SettingKey::SkipBack).unwrap().value,
            SettingValue::Seconds(15)
        );
    }

    #[cfg(debug_assertions)]
    #[tokio::test]
    #[should_panic(expected = "settings sync is disabled")]
    async fn test_current_protocol_guard_panics_in_debug() {
        let store = MemoryStore::new();
        let transport = ScriptedTransport::new();
        let strategy = CurrentProtocol::new(CapabilityFlag::new(false));
        let _ = strategy.run(&store, &transport).await;
    }

    #[cfg(not(debug_assertions))]
    #[tokio::test]
    async fn test_current_protocol_guard_is_noop_in_release() {
        let store = MemoryStore::new();
        let transport = ScriptedTransport::new();
        let strategy = CurrentProtocol::new(CapabilityFlag::new(false));

        let report = strategy.run(&store, &transport).await.unwrap();
        assert!(report.outcomes.is_empty());
        assert_eq!(transport.call_count().await, 0);
    }
}
