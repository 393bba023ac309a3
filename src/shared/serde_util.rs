//! Custom serde helpers for upstream wire formats.

/// Deserializes a Unix-millis `u64` into `DateTime<Utc>`.
///
/// Every streamed payload carries `time` as epoch milliseconds, never ISO 8601.
pub mod timestamp_ms {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        DateTime::<Utc>::from_timestamp_millis(millis as i64)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid timestamp: {}", millis)))
    }

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(value.timestamp_millis())
    }
}

/// Optional decimal that the upstream sends as `null` or omits entirely.
pub mod opt_decimal {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use std::str::FromStr;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.is_empty() => Ok(None),
            Some(s) => Decimal::from_str(&s)
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("Invalid decimal {s:?}: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use rust_decimal::Decimal;
    use serde::{Deserialize, Serialize};

    #[derive(Deserialize, Serialize)]
    struct Stamped {
        #[serde(with = "super::timestamp_ms")]
        time: DateTime<Utc>,
    }

    #[derive(Deserialize)]
    struct MaybePx {
        #[serde(default, deserialize_with = "super::opt_decimal::deserialize")]
        px: Option<Decimal>,
    }

    #[test]
    fn test_timestamp_ms_roundtrip() {
        let parsed: Stamped = serde_json::from_str(r#"{"time":1700000000123}"#).unwrap();
        assert_eq!(parsed.time.timestamp_millis(), 1_700_000_000_123);
        let json = serde_json::to_string(&parsed).unwrap();
        assert_eq!(json, r#"{"time":1700000000123}"#);
    }

    #[test]
    fn test_opt_decimal_null_and_missing() {
        let a: MaybePx = serde_json::from_str(r#"{"px":null}"#).unwrap();
        assert!(a.px.is_none());
        let b: MaybePx = serde_json::from_str(r#"{}"#).unwrap();
        assert!(b.px.is_none());
        let c: MaybePx = serde_json::from_str(r#"{"px":"101.5"}"#).unwrap();
        assert_eq!(c.px, Some(Decimal::new(1015, 1)));
    }
}
