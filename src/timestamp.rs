use std::{fmt, str::FromStr};

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

// Offset without a colon, e.g. `2025-08-05T20:38:54.549229+0000`.
const COMPACT_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// Marketplace timestamp.
///
/// The API emits both RFC 3339 (`...Z`, `...+00:00`) and a compact offset
/// form (`...+0000`); both are accepted. Serialization is always RFC 3339.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(pub DateTime<FixedOffset>);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().fixed_offset())
    }

    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    /// RFC 3339 with as many fractional digits as needed.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.fixed_offset())
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self(value)
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DateTime::parse_from_rfc3339(value)
            .or_else(|_| DateTime::parse_from_str(value, COMPACT_OFFSET_FORMAT))
            .map(Self)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| de::Error::custom(format!("cannot parse timestamp: {raw:?}")))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Timelike, Utc};

    use super::Timestamp;

    #[test]
    fn parses_rfc3339_nano() {
        let ts: Timestamp = "2025-08-05T20:38:54.549229Z".parse().expect("must parse");
        assert_eq!(ts.0.nanosecond(), 549_229_000);
        assert_eq!(ts.0.offset().local_minus_utc(), 0);
    }

    #[test]
    fn parses_compact_offset() {
        let ts: Timestamp = "2025-08-05T20:38:54.549229+0000".parse().expect("must parse");
        let expected: Timestamp = "2025-08-05T20:38:54.549229Z".parse().expect("must parse");
        assert_eq!(ts, expected);
    }

    #[test]
    fn rejects_garbage() {
        assert!("yesterday".parse::<Timestamp>().is_err());
        let err = serde_json::from_str::<Timestamp>("\"yesterday\"").expect_err("must fail");
        assert!(err.to_string().contains("cannot parse timestamp"));
    }

    #[test]
    fn serializes_as_rfc3339() {
        let ts = Timestamp::from(
            Utc.with_ymd_and_hms(2024, 4, 1, 5, 44, 13)
                .single()
                .expect("valid date"),
        );
        assert_eq!(
            serde_json::to_string(&ts).expect("must serialize"),
            "\"2024-04-01T05:44:13Z\""
        );
    }

    #[test]
    fn null_deserializes_into_none() {
        let ts: Option<Timestamp> = serde_json::from_str("null").expect("must parse");
        assert_eq!(ts, None);
    }
}
