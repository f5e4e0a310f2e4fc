//! Last-writer-wins reconciliation of a change-set response.
//!
//! Each response key is handled independently. A key is adopted only when
//! all of these hold:
//!
//! 1. The value decodes for the key's kind.
//! 2. The server supplied a modification instant.
//! 3. That instant parses.
//! 4. The local modification instant is absent, or not strictly after the
//!    server's.
//!
//! The rule is asymmetric on purpose. A missing server instant blocks
//! adoption because recency cannot be judged. A missing local instant does
//! not, because local history may be incomplete after a fresh install or
//! migration.
//!
//! Adopted values are written with needs-sync cleared. Store failures abort
//! the attempt; every other problem only skips the key.

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use settings_sync_core::SettingKey;
use settings_sync_store::SettingStore;

use crate::error::Result;
use crate::messages::{instant, ChangeSetResponse, ResponseEntry};
use crate::report::{KeyOutcome, SyncReport};

/// Apply a change-set response to the store, recording each key's outcome.
pub fn reconcile<S: SettingStore + ?Sized>(
    store: &S,
    response: &ChangeSetResponse,
    report: &mut SyncReport,
) -> Result<()> {
    for (name, entry) in response.iter() {
        let outcome = match SettingKey::from_wire_name(name) {
            Some(key) => reconcile_entry(store, key, entry)?,
            None => {
                error!(key = name, "ignoring unknown setting in sync response");
                KeyOutcome::UnknownKey
            }
        };
        report.record(name, outcome);
    }
    Ok(())
}

/// Decide and apply a single known key.
pub fn reconcile_entry<S: SettingStore + ?Sized>(
    store: &S,
    key: SettingKey,
    entry: &ResponseEntry,
) -> Result<KeyOutcome> {
    let Some(value) = key.descriptor().decode(&entry.value) else {
        error!(key = %key, raw = %entry.value, "invalid value in sync response");
        return Ok(KeyOutcome::SkippedInvalid);
    };

    let Some(raw_modified_at) = entry.modified_at.as_ref() else {
        info!(key = %key, "no modification time in sync response, not updating");
        return Ok(KeyOutcome::SkippedNoTimestamp);
    };

    let Some(server_modified_at) = raw_modified_at.as_str().and_then(instant::parse) else {
        error!(
            key = %key,
            server_modified_at = %raw_modified_at,
            "unparseable modification time in sync response"
        );
        return Ok(KeyOutcome::SkippedUnparseableTimestamp);
    };

    let local = store.get(key)?;
    if !server_wins(local.modified_at, server_modified_at) {
        info!(
            key = %key,
            local_modified_at = ?local.modified_at,
            %server_modified_at,
            "local setting is newer than server, not updating"
        );
        return Ok(KeyOutcome::SkippedStale);
    }

    store.set(key, value, false)?;
    debug!(key = %key, ?value, "adopted server setting");
    Ok(KeyOutcome::Adopted)
}

/// Whether a stamped server value replaces the local one.
///
/// Local wins only when it has an instant strictly after the server's.
pub fn server_wins(local: Option<DateTime<Utc>>, server: DateTime<Utc>) -> bool {
    match local {
        Some(local) => local <= server,
        None => true,
    }
}
