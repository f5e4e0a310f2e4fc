//! Deprecated values-only settings protocol.
//!
//! Kept while the capability flag rolls out. It covers a fixed subset of
//! settings, sends no timestamps, and trusts the server's `changed` marker
//! instead of comparing modification times. Nothing outside this module and
//! [`LegacyProtocol`](crate::protocol::LegacyProtocol) depends on it.

use serde_json::Value;
use tracing::{debug, error};

use settings_sync_core::{wire_integer, PodcastsSortType, SettingKey, SettingValue, WireValue};
use settings_sync_store::SettingStore;

use crate::error::Result;
use crate::messages::{LegacyEntry, LegacySettingsRequest, LegacySettingsResponse};
use crate::report::{KeyOutcome, SyncReport};

/// Settings the legacy endpoint knows about.
pub const LEGACY_KEYS: [SettingKey; 5] = [
    SettingKey::SkipForward,
    SettingKey::SkipBack,
    SettingKey::MarketingOptIn,
    SettingKey::FreeGiftAcknowledged,
    SettingKey::PodcastsSortOrder,
];

/// Read the legacy subset into the flat request body.
pub fn build_legacy_request<S: SettingStore + ?Sized>(store: &S) -> Result<LegacySettingsRequest> {
    let encoded = |key: SettingKey| -> Result<WireValue> {
        let stored = store.get(key)?;
        Ok(key.descriptor().encode(&stored.value)?)
    };

    Ok(LegacySettingsRequest {
        skip_forward: encoded(SettingKey::SkipForward)?,
        skip_back: encoded(SettingKey::SkipBack)?,
        marketing_opt_in: encoded(SettingKey::MarketingOptIn)?,
        free_gift_acknowledgement: encoded(SettingKey::FreeGiftAcknowledged)?,
        grid_order: encoded(SettingKey::PodcastsSortOrder)?,
    })
}

/// Apply every entry the server marked as changed.
pub fn apply_legacy_response<S: SettingStore + ?Sized>(
    store: &S,
    response: &LegacySettingsResponse,
    report: &mut SyncReport,
) -> Result<()> {
    for (name, entry) in response.iter() {
        let outcome = apply_legacy_entry(store, name, entry)?;
        report.record(name, outcome);
    }
    Ok(())
}

fn apply_legacy_entry<S: SettingStore + ?Sized>(
    store: &S,
    name: &str,
    entry: &LegacyEntry,
) -> Result<KeyOutcome> {
    let Some(key) = LEGACY_KEYS.into_iter().find(|k| k.wire_name() == name) else {
        error!(key = name, "ignoring unknown setting in legacy sync response");
        return Ok(KeyOutcome::UnknownKey);
    };

    if !entry.changed {
        return Ok(KeyOutcome::Unchanged);
    }

    let value = match &entry.value {
        Value::Number(_) => {
            let number = wire_integer(&entry.value);
            match key {
                SettingKey::SkipForward | SettingKey::SkipBack => number
                    .and_then(|n| i32::try_from(n).ok())
                    .map(SettingValue::Seconds),
                SettingKey::PodcastsSortOrder => number
                    .and_then(PodcastsSortType::from_server_id)
                    .map(SettingValue::PodcastsSort),
                _ => None,
            }
        }
        Value::Bool(b) => match key {
            SettingKey::MarketingOptIn | SettingKey::FreeGiftAcknowledged => {
                Some(SettingValue::Flag(*b))
            }
            _ => None,
        },
        _ => None,
    };

    let Some(value) = value else {
        error!(key = %key, raw = %entry.value, "invalid value in legacy sync response");
        return Ok(KeyOutcome::Rejected);
    };

    store.set(key, value, false)?;
    debug!(key = %key, ?value, "applied legacy server setting");
    Ok(KeyOutcome::Adopted)
}
