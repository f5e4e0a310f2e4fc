//! Wire codec for setting values.
//!
//! Encoding is total: every [`SettingValue`] has a wire form. Decoding is
//! partial and signals malformed input by returning `None`, so a single bad
//! field never aborts a batch.
//!
//! ## Numeric coercion
//!
//! The wire carries JSON numbers, which may arrive as integers or floats
//! (`15` and `15.0` are both common). Integral fields accept any finite
//! number and truncate toward zero before range-checking.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{
    AutoArchiveAfterPlaying, AutoArchiveInactive, PodcastsSortType, SettingKind, SettingValue,
};

/// A value as it appears on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    Bool(bool),
    Number(i64),
}

impl From<WireValue> for Value {
    fn from(value: WireValue) -> Self {
        match value {
            WireValue::Bool(b) => Value::Bool(b),
            WireValue::Number(n) => Value::from(n),
        }
    }
}

/// Encode a typed value for the wire.
pub fn encode(value: &SettingValue) -> WireValue {
    match value {
        SettingValue::Seconds(secs) => WireValue::Number(i64::from(*secs)),
        SettingValue::Flag(b) => WireValue::Bool(*b),
        SettingValue::PodcastsSort(sort) => WireValue::Number(sort.server_id()),
        SettingValue::AutoArchiveAfterPlaying(v) => WireValue::Number(v.index()),
        SettingValue::AutoArchiveInactive(v) => WireValue::Number(v.index()),
    }
}

/// Decode a raw wire value as the given kind.
///
/// Returns `None` when the value has the wrong primitive type, is out of
/// range, or names an unknown enum variant.
pub fn decode(kind: SettingKind, raw: &Value) -> Option<SettingValue> {
    match kind {
        SettingKind::Flag => raw.as_bool().map(SettingValue::Flag),
        SettingKind::Seconds => wire_integer(raw)
            .and_then(|n| i32::try_from(n).ok())
            .map(SettingValue::Seconds),
        SettingKind::PodcastsSort => wire_integer(raw)
            .and_then(PodcastsSortType::from_server_id)
            .map(SettingValue::PodcastsSort),
        SettingKind::AutoArchiveAfterPlaying => wire_integer(raw)
            .and_then(AutoArchiveAfterPlaying::from_index)
            .map(SettingValue::AutoArchiveAfterPlaying),
        SettingKind::AutoArchiveInactive => wire_integer(raw)
            .and_then(AutoArchiveInactive::from_index)
            .map(SettingValue::AutoArchiveInactive),
    }
}

/// Coerce a JSON number to an integer.
///
/// Non-numbers, NaN/infinite floats, and values outside `i64` yield `None`.
pub fn wire_integer(raw: &Value) -> Option<i64> {
    let Value::Number(number) = raw else {
        return None;
    };
    if let Some(n) = number.as_i64() {
        return Some(n);
    }
    if number.is_u64() {
        // Larger than i64::MAX.
        return None;
    }
    let f = number.as_f64()?.trunc();
    if f.is_finite() && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_encode_sort_uses_server_id() {
        let value = SettingValue::PodcastsSort(PodcastsSortType::DragAndDrop);
        assert_eq!(encode(&value), WireValue::Number(3));
    }

    #[test]
    fn test_decode_seconds_from_float() {
        assert_eq!(
            decode(SettingKind::Seconds, &json!(15.0)),
            Some(SettingValue::Seconds(15))
        );
        assert_eq!(
            decode(SettingKind::Seconds, &json!(15.9)),
            Some(SettingValue::Seconds(15))
        );
    }

    #[test]
    fn test_decode_seconds_out_of_range() {
        assert_eq!(decode(SettingKind::Seconds, &json!(i64::MAX)), None);
        assert_eq!(decode(SettingKind::Seconds, &json!(u64::MAX)), None);
    }

    #[test]
    fn test_decode_wrong_primitive() {
        assert_eq!(decode(SettingKind::Flag, &json!(1)), None);
        assert_eq!(decode(SettingKind::Seconds, &json!(true)), None);
        assert_eq!(decode(SettingKind::Seconds, &json!("15")), None);
        assert_eq!(decode(SettingKind::PodcastsSort, &Value::Null), None);
    }

    #[test]
    fn test_decode_unknown_enum() {
        assert_eq!(decode(SettingKind::PodcastsSort, &json!(999)), None);
        assert_eq!(decode(SettingKind::AutoArchiveInactive, &json!(-1)), None);
        assert_eq!(decode(SettingKind::AutoArchiveAfterPlaying, &json!(5)), None);
    }

    #[test]
    fn test_decode_archive_by_index() {
        assert_eq!(
            decode(SettingKind::AutoArchiveInactive, &json!(5)),
            Some(SettingValue::AutoArchiveInactive(AutoArchiveInactive::Days30))
        );
    }

    #[test]
    fn test_wire_value_json_shape() {
        assert_eq!(serde_json::to_value(WireValue::Number(30)).unwrap(), json!(30));
        assert_eq!(serde_json::to_value(WireValue::Bool(false)).unwrap(), json!(false));
        assert_eq!(Value::from(WireValue::Number(7)), json!(7));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn integers_pass_through(n in any::<i64>()) {
                prop_assert_eq!(wire_integer(&json!(n)), Some(n));
            }

            #[test]
            fn seconds_survive_the_wire(secs in any::<i32>()) {
                let value = SettingValue::Seconds(secs);
                let raw = Value::from(encode(&value));
                prop_assert_eq!(decode(SettingKind::Seconds, &raw), Some(value));
            }

            #[test]
            fn strings_never_decode(raw in ".*") {
                prop_assert_eq!(decode(SettingKind::Seconds, &json!(raw)), None);
            }
        }
    }
}
