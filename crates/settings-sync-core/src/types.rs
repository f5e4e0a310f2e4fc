//! Domain value types for synchronizable settings.
//!
//! Enumerated settings carry a stable wire number. For the auto-archive
//! policies this is the variant's index; podcast sort order instead uses a
//! server id that is independent of the client's own ordering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How long after an episode finishes playing before it is archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutoArchiveAfterPlaying {
    Never,
    AfterPlaying,
    Hours24,
    Days2,
    Weeks1,
}

impl AutoArchiveAfterPlaying {
    /// All variants, in wire-index order.
    pub const ALL: [Self; 5] = [
        Self::Never,
        Self::AfterPlaying,
        Self::Hours24,
        Self::Days2,
        Self::Weeks1,
    ];

    /// Position of this variant on the wire.
    pub fn index(self) -> i64 {
        self as i64
    }

    /// Look up a variant by wire index.
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

/// How long an unplayed episode may sit before it is archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutoArchiveInactive {
    Never,
    Hours24,
    Days2,
    Weeks1,
    Weeks2,
    Days30,
    Days90,
}

impl AutoArchiveInactive {
    /// All variants, in wire-index order.
    pub const ALL: [Self; 7] = [
        Self::Never,
        Self::Hours24,
        Self::Days2,
        Self::Weeks1,
        Self::Weeks2,
        Self::Days30,
        Self::Days90,
    ];

    /// Position of this variant on the wire.
    pub fn index(self) -> i64 {
        self as i64
    }

    /// Look up a variant by wire index.
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }
}

/// Ordering of the podcast grid.
///
/// The client id is what the local UI persists; the server id is what goes on
/// the wire. The two are deliberately not the same numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PodcastsSortType {
    DateAddedOldestToNewest,
    NameAToZ,
    EpisodeDateNewestToOldest,
    DragAndDrop,
}

impl PodcastsSortType {
    pub const ALL: [Self; 4] = [
        Self::DateAddedOldestToNewest,
        Self::NameAToZ,
        Self::EpisodeDateNewestToOldest,
        Self::DragAndDrop,
    ];

    /// Identifier used by local persistence.
    pub const fn client_id(self) -> i64 {
        match self {
            Self::DateAddedOldestToNewest => 0,
            Self::NameAToZ => 1,
            Self::EpisodeDateNewestToOldest => 5,
            Self::DragAndDrop => 6,
        }
    }

    /// Identifier used on the wire.
    pub const fn server_id(self) -> i64 {
        match self {
            Self::DateAddedOldestToNewest => 0,
            Self::NameAToZ => 1,
            Self::EpisodeDateNewestToOldest => 2,
            Self::DragAndDrop => 3,
        }
    }

    pub fn from_client_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.client_id() == id)
    }

    pub fn from_server_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.server_id() == id)
    }
}

/// The shape of a setting's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettingKind {
    /// Whole seconds (skip intervals).
    Seconds,
    /// Plain on/off switch.
    Flag,
    /// [`PodcastsSortType`], wire-encoded by server id.
    PodcastsSort,
    /// [`AutoArchiveAfterPlaying`], wire-encoded by index.
    AutoArchiveAfterPlaying,
    /// [`AutoArchiveInactive`], wire-encoded by index.
    AutoArchiveInactive,
}

impl fmt::Display for SettingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SettingKind::Seconds => "seconds",
            SettingKind::Flag => "flag",
            SettingKind::PodcastsSort => "podcasts-sort",
            SettingKind::AutoArchiveAfterPlaying => "auto-archive-after-playing",
            SettingKind::AutoArchiveInactive => "auto-archive-inactive",
        };
        f.write_str(name)
    }
}

/// A typed setting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettingValue {
    Seconds(i32),
    Flag(bool),
    PodcastsSort(PodcastsSortType),
    AutoArchiveAfterPlaying(AutoArchiveAfterPlaying),
    AutoArchiveInactive(AutoArchiveInactive),
}

impl SettingValue {
    /// The kind this value belongs to.
    pub const fn kind(&self) -> SettingKind {
        match self {
            SettingValue::Seconds(_) => SettingKind::Seconds,
            SettingValue::Flag(_) => SettingKind::Flag,
            SettingValue::PodcastsSort(_) => SettingKind::PodcastsSort,
            SettingValue::AutoArchiveAfterPlaying(_) => SettingKind::AutoArchiveAfterPlaying,
            SettingValue::AutoArchiveInactive(_) => SettingKind::AutoArchiveInactive,
        }
    }

    pub fn as_seconds(&self) -> Option<i32> {
        match self {
            SettingValue::Seconds(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            SettingValue::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_index_roundtrip() {
        for v in AutoArchiveAfterPlaying::ALL {
            assert_eq!(AutoArchiveAfterPlaying::from_index(v.index()), Some(v));
        }
        for v in AutoArchiveInactive::ALL {
            assert_eq!(AutoArchiveInactive::from_index(v.index()), Some(v));
        }
    }

    #[test]
    fn test_archive_index_out_of_range() {
        assert_eq!(AutoArchiveAfterPlaying::from_index(5), None);
        assert_eq!(AutoArchiveAfterPlaying::from_index(-1), None);
        assert_eq!(AutoArchiveInactive::from_index(7), None);
    }

    #[test]
    fn test_sort_type_ids_differ() {
        let sort = PodcastsSortType::EpisodeDateNewestToOldest;
        assert_eq!(sort.client_id(), 5);
        assert_eq!(sort.server_id(), 2);
        assert_eq!(PodcastsSortType::from_server_id(2), Some(sort));
        assert_eq!(PodcastsSortType::from_client_id(5), Some(sort));
        assert_eq!(PodcastsSortType::from_server_id(5), None);
    }

    #[test]
    fn test_value_kind() {
        assert_eq!(SettingValue::Seconds(10).kind(), SettingKind::Seconds);
        assert_eq!(SettingValue::Flag(true).kind(), SettingKind::Flag);
        assert_eq!(SettingValue::Flag(true).as_seconds(), None);
    }
}
