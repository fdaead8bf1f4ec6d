//! Second-precision UTC timestamp serialization.
//!
//! All timestamps on signable claims serialize as `%Y-%m-%dT%H:%M:%SZ`.
//! The literal `Z` suffix and second precision are part of the canonical
//! byte contract: any other rendering breaks cross-implementation
//! signature verification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// The canonical timestamp format.
pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Serialize a timestamp in canonical form.
pub fn serialize<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.format(FORMAT).to_string())
}

/// Deserialize a timestamp, accepting any RFC 3339 offset form.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(serde::de::Error::custom)
}

/// Serde support for `Option<DateTime<Utc>>` fields.
pub mod option {
    use super::FORMAT;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serialize an optional timestamp in canonical form.
    pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match dt {
            Some(dt) => serializer.serialize_some(&dt.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserialize an optional timestamp, accepting any RFC 3339 offset form.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: Option<String> = Option::deserialize(deserializer)?;
        match s {
            Some(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| Some(dt.with_timezone(&Utc)))
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super")]
        ts: chrono::DateTime<Utc>,
    }

    #[test]
    fn test_canonical_format_has_z_suffix_and_second_precision() {
        let w = Wrapper {
            ts: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
        };
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"ts":"2025-03-14T09:26:53Z"}"#);
    }

    #[test]
    fn test_parse_accepts_offset_forms() {
        let w: Wrapper = serde_json::from_str(r#"{"ts":"2025-03-14T10:26:53+01:00"}"#).unwrap();
        assert_eq!(
            w.ts,
            Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap()
        );
    }

    #[test]
    fn test_roundtrip() {
        let w = Wrapper {
            ts: Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap(),
        };
        let json = serde_json::to_string(&w).unwrap();
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ts, w.ts);
    }
}
