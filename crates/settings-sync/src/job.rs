//! The unit of work a background scheduler runs.
//!
//! A job runs one sync attempt and collapses the result to
//! [`JobOutcome`]. Per-key skips inside reconciliation are not failures;
//! retry policy belongs to the scheduler.

use std::sync::Arc;

use settings_sync_protocol::{CapabilityFlag, SettingsTransport, SyncReport, SyncSession};
use settings_sync_store::SettingStore;

use crate::config::SettingsSyncConfig;
use crate::error::Result;

/// What the scheduler learns from a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Succeeded,
    Failed,
}

/// A settings sync job bound to a store, a transport, and a capability flag.
pub struct SettingsSyncJob<S: SettingStore, T: SettingsTransport> {
    session: SyncSession<S, T>,
}

impl<S: SettingStore, T: SettingsTransport> SettingsSyncJob<S, T> {
    pub fn new(
        store: Arc<S>,
        transport: Arc<T>,
        flag: CapabilityFlag,
        config: &SettingsSyncConfig,
    ) -> Self {
        Self {
            session: SyncSession::new(store, transport, flag, config.sync_config()),
        }
    }

    pub fn session(&self) -> &SyncSession<S, T> {
        &self.session
    }

    /// Run one attempt and return its report.
    pub async fn try_run(&self) -> Result<SyncReport> {
        Ok(self.session.run().await?)
    }

    /// Run one attempt, reporting only success or failure.
    pub async fn run(&self) -> JobOutcome {
        self.run_with(|_| Ok(())).await
    }

    /// Run one attempt, then hand the report to `after`.
    ///
    /// The job fails if either the attempt or the hook fails.
    pub async fn run_with<F>(&self, after: F) -> JobOutcome
    where
        F: FnOnce(&SyncReport) -> anyhow::Result<()>,
    {
        let report = match self.try_run().await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(error = %e, "settings sync failed");
                return JobOutcome::Failed;
            }
        };

        match after(&report) {
            Ok(()) => JobOutcome::Succeeded,
            Err(e) => {
                tracing::error!("settings sync post-processing failed: {e:#}");
                JobOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;
    use settings_sync_protocol::{MemoryServer, Protocol, ScriptedTransport};
    use settings_sync_store::MemoryStore;

    fn config(enabled: bool) -> SettingsSyncConfig {
        SettingsSyncConfig {
            settings_sync_enabled: enabled,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_job_succeeds() {
        let config = config(true);
        let job = SettingsSyncJob::new(
            Arc::new(MemoryStore::new()),
            Arc::new(MemoryServer::new()),
            config.flag(),
            &config,
        );
        assert_eq!(job.run().await, JobOutcome::Succeeded);
    }

    #[tokio::test]
    async fn test_transport_error_fails_job() {
        let config = config(true);
        let job = SettingsSyncJob::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ScriptedTransport::new().failing("503")),
            config.flag(),
            &config,
        );
        assert_eq!(job.run().await, JobOutcome::Failed);
    }

    #[tokio::test]
    async fn test_hook_error_fails_job() {
        let config = config(false);
        let job = SettingsSyncJob::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ScriptedTransport::new()),
            config.flag(),
            &config,
        );

        let outcome = job
            .run_with(|report| {
                assert_eq!(report.protocol, Protocol::Legacy);
                Err(anyhow::anyhow!("disk full")).context("recording last sync time")
            })
            .await;
        assert_eq!(outcome, JobOutcome::Failed);
    }

    #[tokio::test]
    async fn test_flag_flip_applies_to_next_attempt() {
        let config = config(false);
        let flag = config.flag();
        let job = SettingsSyncJob::new(
            Arc::new(MemoryStore::new()),
            Arc::new(ScriptedTransport::new()),
            flag.clone(),
            &config,
        );

        assert_eq!(job.try_run().await.unwrap().protocol, Protocol::Legacy);
        flag.set_enabled(true);
        assert_eq!(job.try_run().await.unwrap().protocol, Protocol::Current);
    }
}
