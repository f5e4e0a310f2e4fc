//! Per-attempt record of what happened to each key.

use std::collections::BTreeMap;
use std::fmt;

/// Which protocol an attempt ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Named, typed, timestamped change-set endpoint.
    Current,
    /// Flat values-only endpoint with `changed` markers.
    Legacy,
    /// Nothing ran: the capability flag is off and legacy fallback is disabled.
    Disabled,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Current => f.write_str("current"),
            Protocol::Legacy => f.write_str("legacy"),
            Protocol::Disabled => f.write_str("disabled"),
        }
    }
}

/// What reconciliation decided for a single response key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Local value replaced from the server.
    Adopted,
    /// Server sent no modification instant.
    SkippedNoTimestamp,
    /// Local modification is strictly newer.
    SkippedStale,
    /// Server value did not decode for the key's type.
    SkippedInvalid,
    /// Server modification instant did not parse.
    SkippedUnparseableTimestamp,
    /// Legacy entry reported `changed: false`.
    Unchanged,
    /// Legacy value had a primitive kind the key does not accept.
    Rejected,
    /// Key is not a setting this client knows.
    UnknownKey,
}

impl KeyOutcome {
    /// True for every outcome that left the store untouched.
    pub fn is_skip(self) -> bool {
        !matches!(self, KeyOutcome::Adopted)
    }
}

/// Result of a sync attempt.
///
/// The outcome a caller sees is binary; this report is for diagnostics and
/// tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Protocol that ran.
    pub protocol: Protocol,
    /// Number of settings sent to the server.
    pub sent_count: usize,
    /// Outcome per response key, by wire name.
    pub outcomes: BTreeMap<String, KeyOutcome>,
}

impl SyncReport {
    pub fn new(protocol: Protocol) -> Self {
        Self {
            protocol,
            sent_count: 0,
            outcomes: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, name: &str, outcome: KeyOutcome) {
        self.outcomes.insert(name.to_string(), outcome);
    }

    pub fn outcome(&self, name: &str) -> Option<KeyOutcome> {
        self.outcomes.get(name).copied()
    }

    /// Number of keys with the given outcome.
    pub fn count(&self, outcome: KeyOutcome) -> usize {
        self.outcomes.values().filter(|o| **o == outcome).count()
    }

    pub fn adopted(&self) -> usize {
        self.count(KeyOutcome::Adopted)
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.values().filter(|o| o.is_skip()).count()
    }
}
