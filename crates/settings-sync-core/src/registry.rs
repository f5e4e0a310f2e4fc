//! The static table of synchronizable settings.
//!
//! Each known setting is registered exactly once, with its wire name and its
//! default value (which also fixes its [`SettingKind`]). Adding a setting is a
//! new [`SettingKey`] variant plus one line in [`REGISTRY`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::codec::{self, WireValue};
use crate::error::CoreError;
use crate::types::{
    AutoArchiveAfterPlaying, AutoArchiveInactive, PodcastsSortType, SettingKind, SettingValue,
};

/// Every setting this client knows how to synchronize.
///
/// Variants are declared in the same order as [`REGISTRY`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SettingKey {
    SkipForward,
    SkipBack,
    MarketingOptIn,
    FreeGiftAcknowledged,
    PodcastsSortOrder,
    AutoArchiveAfterPlaying,
    AutoArchiveInactive,
    AutoArchiveIncludeStarred,
}

/// Registration entry for a single setting.
#[derive(Debug, Clone, Copy)]
pub struct SettingDescriptor {
    pub key: SettingKey,
    /// Stable identifier used on the wire.
    pub name: &'static str,
    pub kind: SettingKind,
    /// Value a fresh install starts with.
    pub default: SettingValue,
}

impl SettingDescriptor {
    const fn new(key: SettingKey, name: &'static str, default: SettingValue) -> Self {
        Self {
            key,
            name,
            kind: default.kind(),
            default,
        }
    }

    /// Decode a raw wire value for this setting.
    pub fn decode(&self, raw: &Value) -> Option<SettingValue> {
        codec::decode(self.kind, raw)
    }

    /// Encode a value for this setting.
    pub fn encode(&self, value: &SettingValue) -> Result<WireValue, CoreError> {
        if value.kind() != self.kind {
            return Err(CoreError::KindMismatch {
                key: self.name,
                expected: self.kind,
                actual: value.kind(),
            });
        }
        Ok(codec::encode(value))
    }
}

/// All synchronizable settings, in [`SettingKey`] declaration order.
pub static REGISTRY: [SettingDescriptor; 8] = [
    SettingDescriptor::new(SettingKey::SkipForward, "skipForward", SettingValue::Seconds(30)),
    SettingDescriptor::new(SettingKey::SkipBack, "skipBack", SettingValue::Seconds(10)),
    SettingDescriptor::new(SettingKey::MarketingOptIn, "marketingOptIn", SettingValue::Flag(false)),
    SettingDescriptor::new(
        SettingKey::FreeGiftAcknowledged,
        "freeGiftAcknowledgement",
        SettingValue::Flag(false),
    ),
    SettingDescriptor::new(
        SettingKey::PodcastsSortOrder,
        "gridOrder",
        SettingValue::PodcastsSort(PodcastsSortType::DateAddedOldestToNewest),
    ),
    SettingDescriptor::new(
        SettingKey::AutoArchiveAfterPlaying,
        "autoArchivePlayed",
        SettingValue::AutoArchiveAfterPlaying(AutoArchiveAfterPlaying::Never),
    ),
    SettingDescriptor::new(
        SettingKey::AutoArchiveInactive,
        "autoArchiveInactive",
        SettingValue::AutoArchiveInactive(AutoArchiveInactive::Never),
    ),
    SettingDescriptor::new(
        SettingKey::AutoArchiveIncludeStarred,
        "autoArchiveIncludeStarred",
        SettingValue::Flag(false),
    ),
];

impl SettingKey {
    /// Iterate every registered key.
    pub fn all() -> impl Iterator<Item = SettingKey> {
        REGISTRY.iter().map(|d| d.key)
    }

    /// The registration entry for this key.
    pub fn descriptor(self) -> &'static SettingDescriptor {
        &REGISTRY[self as usize]
    }

    pub fn wire_name(self) -> &'static str {
        self.descriptor().name
    }

    pub fn kind(self) -> SettingKind {
        self.descriptor().kind
    }

    pub fn default_value(self) -> SettingValue {
        self.descriptor().default
    }

    /// Resolve a wire name. Unknown names yield `None`.
    pub fn from_wire_name(name: &str) -> Option<SettingKey> {
        REGISTRY.iter().find(|d| d.name == name).map(|d| d.key)
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for SettingKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::from_wire_name(s).ok_or_else(|| CoreError::UnknownKey(s.to_string()))
    }
}
