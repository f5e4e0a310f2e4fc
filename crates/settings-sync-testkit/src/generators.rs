//! Proptest generators for property-based testing.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;

use settings_sync_core::{
    encode, AutoArchiveAfterPlaying, AutoArchiveInactive, PodcastsSortType, SettingKey,
    SettingKind, SettingValue,
};
use settings_sync_protocol::{instant, ResponseEntry};

/// Generate any registered setting key.
pub fn setting_key() -> impl Strategy<Value = SettingKey> {
    prop::sample::select(SettingKey::all().collect::<Vec<_>>())
}

/// Generate a valid value of the given kind.
pub fn value_of(kind: SettingKind) -> BoxedStrategy<SettingValue> {
    match kind {
        SettingKind::Seconds => any::<i32>().prop_map(SettingValue::Seconds).boxed(),
        SettingKind::Flag => any::<bool>().prop_map(SettingValue::Flag).boxed(),
        SettingKind::PodcastsSort => prop::sample::select(PodcastsSortType::ALL.to_vec())
            .prop_map(SettingValue::PodcastsSort)
            .boxed(),
        SettingKind::AutoArchiveAfterPlaying => {
            prop::sample::select(AutoArchiveAfterPlaying::ALL.to_vec())
                .prop_map(SettingValue::AutoArchiveAfterPlaying)
                .boxed()
        }
        SettingKind::AutoArchiveInactive => prop::sample::select(AutoArchiveInactive::ALL.to_vec())
            .prop_map(SettingValue::AutoArchiveInactive)
            .boxed(),
    }
}

/// Generate a key together with a valid value for it.
pub fn setting() -> impl Strategy<Value = (SettingKey, SettingValue)> {
    setting_key().prop_flat_map(|key| value_of(key.kind()).prop_map(move |value| (key, value)))
}

/// Generate a millisecond-precision instant between 2000 and 2100.
pub fn instant() -> impl Strategy<Value = DateTime<Utc>> {
    (946_684_800_000i64..4_102_444_800_000i64).prop_map(|millis| {
        Utc.timestamp_millis_opt(millis)
            .single()
            .expect("millis within chrono range")
    })
}

/// Generate a string that is not an RFC 3339 instant.
pub fn malformed_instant() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("2024-01-01".to_string()),
        Just("yesterday".to_string()),
        Just("2024-13-01T00:00:00Z".to_string()),
        "[a-z ]{1,16}",
    ]
}

/// Local state of one setting before a sync.
#[derive(Debug, Clone)]
pub struct LocalSetting {
    pub key: SettingKey,
    pub value: SettingValue,
    pub modified_at: Option<DateTime<Utc>>,
}

impl Arbitrary for LocalSetting {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (setting(), prop::option::of(instant()))
            .prop_map(|((key, value), modified_at)| LocalSetting {
                key,
                value,
                modified_at,
            })
            .boxed()
    }
}

/// Build a well-formed, stamped response entry for a value.
pub fn stamped_entry(value: &SettingValue, modified_at: &DateTime<Utc>) -> ResponseEntry {
    ResponseEntry::stamped(encode(value), instant::format(modified_at))
}
