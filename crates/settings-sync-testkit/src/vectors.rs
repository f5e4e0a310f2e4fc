//! Golden test vectors for deterministic verification.
//!
//! These vectors pin the exact request bytes sent to both endpoints and the
//! per-key decisions made on known responses, so any other client speaking
//! the same protocol can be checked against them.

use settings_sync_core::{
    AutoArchiveAfterPlaying, AutoArchiveInactive, PodcastsSortType, SettingKey, SettingValue,
};
use settings_sync_protocol::{
    apply_legacy_response, build_legacy_request, build_request, instant, reconcile,
    ChangeSetResponse, KeyOutcome, LegacySettingsResponse, Protocol, SyncReport,
};
use settings_sync_store::{MemoryStore, SettingStore};

/// Local state of one setting: key, value, local modification instant.
pub type LocalState = (SettingKey, SettingValue, Option<&'static str>);

/// A request the client must produce byte for byte.
#[derive(Debug, Clone)]
pub struct RequestVector {
    pub name: &'static str,
    /// Settings to seed before building. Everything else stays at default.
    pub local: &'static [LocalState],
    /// Expected change-set body.
    pub expected_json: &'static str,
}

/// A response and what reconciling it must do.
#[derive(Debug, Clone)]
pub struct ResponseVector {
    pub name: &'static str,
    pub protocol: Protocol,
    pub local: &'static [LocalState],
    /// Response body as the server sent it.
    pub response_json: &'static str,
    /// Expected outcome per response key.
    pub outcomes: &'static [(&'static str, KeyOutcome)],
    /// Expected local values afterwards.
    pub expected: &'static [(SettingKey, SettingValue)],
}

/// Get all request vectors.
pub fn request_vectors() -> Vec<RequestVector> {
    vec![
        RequestVector {
            name: "Fresh install sends every default unstamped",
            local: &[],
            expected_json: concat!(
                r#"{"autoArchiveInactive":{"value":0},"#,
                r#""autoArchiveIncludeStarred":{"value":false},"#,
                r#""autoArchivePlayed":{"value":0},"#,
                r#""freeGiftAcknowledgement":{"value":false},"#,
                r#""gridOrder":{"value":0},"#,
                r#""marketingOptIn":{"value":false},"#,
                r#""skipBack":{"value":10},"#,
                r#""skipForward":{"value":30}}"#,
            ),
        },
        RequestVector {
            name: "Edited settings carry millisecond instants",
            local: &[
                (
                    SettingKey::PodcastsSortOrder,
                    SettingValue::PodcastsSort(PodcastsSortType::DragAndDrop),
                    Some("2024-06-01T12:30:00Z"),
                ),
                (
                    SettingKey::SkipForward,
                    SettingValue::Seconds(45),
                    Some("2024-06-01T00:00:00.250Z"),
                ),
                (
                    SettingKey::AutoArchiveInactive,
                    SettingValue::AutoArchiveInactive(AutoArchiveInactive::Days90),
                    Some("2024-06-01T02:00:00+02:00"),
                ),
            ],
            expected_json: concat!(
                r#"{"autoArchiveInactive":{"value":6,"modifiedAt":"2024-06-01T00:00:00.000Z"},"#,
                r#""autoArchiveIncludeStarred":{"value":false},"#,
                r#""autoArchivePlayed":{"value":0},"#,
                r#""freeGiftAcknowledgement":{"value":false},"#,
                r#""gridOrder":{"value":3,"modifiedAt":"2024-06-01T12:30:00.000Z"},"#,
                r#""marketingOptIn":{"value":false},"#,
                r#""skipBack":{"value":10},"#,
                r#""skipForward":{"value":45,"modifiedAt":"2024-06-01T00:00:00.250Z"}}"#,
            ),
        },
    ]
}

/// Get all legacy request vectors.
pub fn legacy_request_vectors() -> Vec<RequestVector> {
    vec![
        RequestVector {
            name: "Legacy defaults",
            local: &[],
            expected_json: concat!(
                r#"{"skipForward":30,"skipBack":10,"marketingOptIn":false,"#,
                r#""freeGiftAcknowledgement":false,"gridOrder":0}"#,
            ),
        },
        RequestVector {
            name: "Legacy sends no instants",
            local: &[
                (
                    SettingKey::MarketingOptIn,
                    SettingValue::Flag(true),
                    Some("2024-06-01T00:00:00Z"),
                ),
                (
                    SettingKey::PodcastsSortOrder,
                    SettingValue::PodcastsSort(PodcastsSortType::EpisodeDateNewestToOldest),
                    Some("2024-06-01T00:00:00Z"),
                ),
            ],
            expected_json: concat!(
                r#"{"skipForward":30,"skipBack":10,"marketingOptIn":true,"#,
                r#""freeGiftAcknowledgement":false,"gridOrder":2}"#,
            ),
        },
    ]
}

/// Get all response vectors.
pub fn response_vectors() -> Vec<ResponseVector> {
    vec![
        ResponseVector {
            name: "Unstamped local adopts stamped server value",
            protocol: Protocol::Current,
            local: &[],
            response_json: r#"{"skipBack":{"value":15,"modifiedAt":"2024-01-01T00:00:00Z"}}"#,
            outcomes: &[("skipBack", KeyOutcome::Adopted)],
            expected: &[(SettingKey::SkipBack, SettingValue::Seconds(15))],
        },
        ResponseVector {
            name: "Newer local value is kept",
            protocol: Protocol::Current,
            local: &[(
                SettingKey::SkipBack,
                SettingValue::Seconds(10),
                Some("2024-06-01T00:00:00Z"),
            )],
            response_json: r#"{"skipBack":{"value":15,"modifiedAt":"2024-01-01T00:00:00Z"}}"#,
            outcomes: &[("skipBack", KeyOutcome::SkippedStale)],
            expected: &[(SettingKey::SkipBack, SettingValue::Seconds(10))],
        },
        ResponseVector {
            name: "Equal instants go to the server",
            protocol: Protocol::Current,
            local: &[(
                SettingKey::SkipBack,
                SettingValue::Seconds(10),
                Some("2024-06-01T00:00:00Z"),
            )],
            response_json: r#"{"skipBack":{"value":15,"modifiedAt":"2024-06-01T00:00:00.000Z"}}"#,
            outcomes: &[("skipBack", KeyOutcome::Adopted)],
            expected: &[(SettingKey::SkipBack, SettingValue::Seconds(15))],
        },
        ResponseVector {
            name: "Unknown sort id without instant is ignored",
            protocol: Protocol::Current,
            local: &[],
            response_json: r#"{"gridOrder":{"value":999}}"#,
            outcomes: &[("gridOrder", KeyOutcome::SkippedInvalid)],
            expected: &[(
                SettingKey::PodcastsSortOrder,
                SettingValue::PodcastsSort(PodcastsSortType::DateAddedOldestToNewest),
            )],
        },
        ResponseVector {
            name: "Valid sort id without instant is ignored",
            protocol: Protocol::Current,
            local: &[],
            response_json: r#"{"gridOrder":{"value":3}}"#,
            outcomes: &[("gridOrder", KeyOutcome::SkippedNoTimestamp)],
            expected: &[(
                SettingKey::PodcastsSortOrder,
                SettingValue::PodcastsSort(PodcastsSortType::DateAddedOldestToNewest),
            )],
        },
        ResponseVector {
            name: "Bad entries do not block good ones",
            protocol: Protocol::Current,
            local: &[],
            response_json: concat!(
                r#"{"autoArchivePlayed":{"value":2,"modifiedAt":"last tuesday"},"#,
                r#""marketingOptIn":{"value":"yes","modifiedAt":"2024-01-01T00:00:00Z"},"#,
                r#""podcastColour":{"value":7,"modifiedAt":"2024-01-01T00:00:00Z"},"#,
                r#""skipForward":{"value":60.0,"modifiedAt":"2024-01-01T00:00:00Z"}}"#,
            ),
            outcomes: &[
                ("autoArchivePlayed", KeyOutcome::SkippedUnparseableTimestamp),
                ("marketingOptIn", KeyOutcome::SkippedInvalid),
                ("podcastColour", KeyOutcome::UnknownKey),
                ("skipForward", KeyOutcome::Adopted),
            ],
            expected: &[
                (
                    SettingKey::AutoArchiveAfterPlaying,
                    SettingValue::AutoArchiveAfterPlaying(AutoArchiveAfterPlaying::Never),
                ),
                (SettingKey::MarketingOptIn, SettingValue::Flag(false)),
                (SettingKey::SkipForward, SettingValue::Seconds(60)),
            ],
        },
        ResponseVector {
            name: "Malformed entries are skipped per key",
            protocol: Protocol::Current,
            local: &[],
            response_json: concat!(
                r#"{"newServerFeature":true,"#,
                r#""skipBack":{"value":15,"modifiedAt":"2024-01-01T00:00:00Z"},"#,
                r#""skipForward":{"value":45,"modifiedAt":1704067200}}"#,
            ),
            outcomes: &[
                ("newServerFeature", KeyOutcome::UnknownKey),
                ("skipBack", KeyOutcome::Adopted),
                ("skipForward", KeyOutcome::SkippedUnparseableTimestamp),
            ],
            expected: &[
                (SettingKey::SkipBack, SettingValue::Seconds(15)),
                (SettingKey::SkipForward, SettingValue::Seconds(30)),
            ],
        },
        ResponseVector {
            name: "Legacy changed entry is applied",
            protocol: Protocol::Legacy,
            local: &[],
            response_json: r#"{"skipForward":{"value":20,"changed":true}}"#,
            outcomes: &[("skipForward", KeyOutcome::Adopted)],
            expected: &[(SettingKey::SkipForward, SettingValue::Seconds(20))],
        },
        ResponseVector {
            name: "Legacy unchanged entry is a no-op",
            protocol: Protocol::Legacy,
            local: &[],
            response_json: r#"{"skipForward":{"value":20,"changed":false}}"#,
            outcomes: &[("skipForward", KeyOutcome::Unchanged)],
            expected: &[(SettingKey::SkipForward, SettingValue::Seconds(30))],
        },
        ResponseVector {
            name: "Legacy unknown key is flagged even when unchanged",
            protocol: Protocol::Legacy,
            local: &[],
            response_json: concat!(
                r#"{"podcastColour":{"value":1,"changed":false},"#,
                r#""skipBack":{"value":10,"changed":false}}"#,
            ),
            outcomes: &[
                ("podcastColour", KeyOutcome::UnknownKey),
                ("skipBack", KeyOutcome::Unchanged),
            ],
            expected: &[(SettingKey::SkipBack, SettingValue::Seconds(10))],
        },
        ResponseVector {
            name: "Legacy wrong primitive is rejected",
            protocol: Protocol::Legacy,
            local: &[],
            response_json: r#"{"marketingOptIn":{"value":1,"changed":true},"gridOrder":{"value":1,"changed":true}}"#,
            outcomes: &[
                ("gridOrder", KeyOutcome::Adopted),
                ("marketingOptIn", KeyOutcome::Rejected),
            ],
            expected: &[
                (
                    SettingKey::PodcastsSortOrder,
                    SettingValue::PodcastsSort(PodcastsSortType::NameAToZ),
                ),
                (SettingKey::MarketingOptIn, SettingValue::Flag(false)),
            ],
        },
    ]
}

/// Seed a fresh store with a vector's local state.
pub fn store_from_local(local: &[LocalState]) -> MemoryStore {
    let store = MemoryStore::new();
    for (key, value, modified_at) in local {
        let modified_at = modified_at.map(|raw| {
            instant::parse(raw).unwrap_or_else(|| panic!("bad vector instant: {raw}"))
        });
        store
            .seed(*key, *value, modified_at, modified_at.is_some())
            .expect("vector value matches key kind");
    }
    store
}

fn check_request(vector: &RequestVector, legacy: bool) -> (String, bool, String) {
    let store = store_from_local(vector.local);
    let json = if legacy {
        build_legacy_request(&store).and_then(|r| Ok(serde_json::to_string(&r)?))
    } else {
        build_request(&store).and_then(|r| Ok(serde_json::to_string(&r)?))
    };
    let json = json.unwrap_or_else(|e| format!("error: {e}"));
    (vector.name.to_string(), json == vector.expected_json, json)
}

fn check_response(vector: &ResponseVector) -> (String, bool, String) {
    let store = store_from_local(vector.local);
    let mut report = SyncReport::new(vector.protocol);

    let applied = match vector.protocol {
        Protocol::Legacy => LegacySettingsResponse::from_json(vector.response_json)
            .map_err(Into::into)
            .and_then(|response| apply_legacy_response(&store, &response, &mut report)),
        _ => ChangeSetResponse::from_json(vector.response_json)
            .map_err(Into::into)
            .and_then(|response| reconcile(&store, &response, &mut report)),
    };
    if let Err(e) = applied {
        return (vector.name.to_string(), false, format!("error: {e}"));
    }

    let outcomes_match = vector.outcomes.len() == report.outcomes.len()
        && vector
            .outcomes
            .iter()
            .all(|(name, outcome)| report.outcome(name) == Some(*outcome));
    let values_match = vector.expected.iter().all(|(key, value)| {
        store
            .get(*key)
            .map(|stored| stored.value == *value)
            .unwrap_or(false)
    });

    (
        vector.name.to_string(),
        outcomes_match && values_match,
        format!("{:?}", report.outcomes),
    )
}

/// Verify all golden vectors.
///
/// Returns `(name, matches, actual)` per vector.
pub fn verify_all_vectors() -> Vec<(String, bool, String)> {
    let requests = request_vectors().into_iter().map(|v| check_request(&v, false));
    let legacy = legacy_request_vectors()
        .into_iter()
        .map(|v| check_request(&v, true));
    let responses = response_vectors().into_iter().map(|v| check_response(&v));
    requests.chain(legacy).chain(responses).collect()
}
