//! Wire message types for both settings endpoints.
//!
//! The change-set endpoint exchanges named entries carrying a value and an
//! optional ISO-8601 modification instant. The legacy endpoint takes a flat
//! object of five fields and answers with `{value, changed}` per key.
//!
//! Inbound values stay as raw JSON until reconciliation decodes them per key,
//! so a malformed field only affects that field.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use settings_sync_core::WireValue;

/// Timestamp formatting for the wire.
pub mod instant {
    use super::*;
    use serde::{Deserializer, Serializer};

    /// Format an instant as RFC 3339 UTC with millisecond precision.
    pub fn format(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Parse an RFC 3339 instant with any offset. `None` if malformed.
    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|at| at.with_timezone(&Utc))
    }

    pub fn serialize_opt<S: Serializer>(
        at: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match at {
            Some(at) => serializer.serialize_str(&format(at)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize_opt<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid instant: {raw}"))),
            None => Ok(None),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Change-set endpoint
// ─────────────────────────────────────────────────────────────────────────────

/// One outbound setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEntry {
    pub value: WireValue,
    /// Absent when there is no local modification on record.
    #[serde(
        rename = "modifiedAt",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "instant::serialize_opt",
        deserialize_with = "instant::deserialize_opt"
    )]
    pub modified_at: Option<DateTime<Utc>>,
}

/// Snapshot of local settings sent to the change-set endpoint.
///
/// Keyed by wire name. Serializes as a plain JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSetRequest {
    entries: BTreeMap<String, RequestEntry>,
}

impl ChangeSetRequest {
    pub fn from_entries(entries: impl IntoIterator<Item = (String, RequestEntry)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&RequestEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RequestEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One inbound setting, as the server sent it.
///
/// Deserializes from any JSON value so one malformed entry cannot fail the
/// whole response. A non-object entry reads as an entry with a `null` value
/// and no instant. A `null` instant reads as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct ResponseEntry {
    /// Raw value; decoded per key during reconciliation.
    pub value: Value,
    /// Raw modification instant; parsed during reconciliation.
    #[serde(rename = "modifiedAt", skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<Value>,
}

impl ResponseEntry {
    /// An entry with a modification instant.
    pub fn stamped(value: impl Into<Value>, modified_at: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            modified_at: Some(Value::String(modified_at.into())),
        }
    }

    /// An entry without a modification instant.
    pub fn unstamped(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            modified_at: None,
        }
    }
}

impl From<Value> for ResponseEntry {
    fn from(raw: Value) -> Self {
        let Value::Object(mut fields) = raw else {
            return Self::unstamped(Value::Null);
        };
        Self {
            value: fields.remove("value").unwrap_or(Value::Null),
            modified_at: fields.remove("modifiedAt").filter(|at| !at.is_null()),
        }
    }
}

/// The server's view of each setting after applying a change-set.
///
/// May contain names this client does not know.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSetResponse {
    entries: BTreeMap<String, ResponseEntry>,
}

impl ChangeSetResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a response body.
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    /// Add an entry, replacing any previous one with the same name.
    pub fn with_entry(mut self, name: impl Into<String>, entry: ResponseEntry) -> Self {
        self.entries.insert(name.into(), entry);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ResponseEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResponseEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Legacy endpoint
// ─────────────────────────────────────────────────────────────────────────────

/// Flat request body for the legacy endpoint. Values only, no timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySettingsRequest {
    pub skip_forward: WireValue,
    pub skip_back: WireValue,
    pub marketing_opt_in: WireValue,
    pub free_gift_acknowledgement: WireValue,
    pub grid_order: WireValue,
}

/// One legacy response field.
///
/// Deserializes from any JSON value. A non-object entry, or a `changed`
/// marker that is not a boolean, reads as unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct LegacyEntry {
    pub value: Value,
    /// Whether the server's value differs from what the client sent.
    pub changed: bool,
}

impl From<Value> for LegacyEntry {
    fn from(raw: Value) -> Self {
        let Value::Object(mut fields) = raw else {
            return Self::unchanged(Value::Null);
        };
        Self {
            value: fields.remove("value").unwrap_or(Value::Null),
            changed: fields
                .remove("changed")
                .and_then(|changed| changed.as_bool())
                .unwrap_or(false),
        }
    }
}

impl LegacyEntry {
    pub fn changed(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            changed: true,
        }
    }

    pub fn unchanged(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            changed: false,
        }
    }
}

/// Legacy endpoint response, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LegacySettingsResponse {
    entries: BTreeMap<String, LegacyEntry>,
}

impl LegacySettingsResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        serde_json::from_str(body)
    }

    pub fn with_entry(mut self, name: impl Into<String>, entry: LegacyEntry) -> Self {
        self.entries.insert(name.into(), entry);
        self
    }

    pub fn get(&self, name: &str) -> Option<&LegacyEntry> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LegacyEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
