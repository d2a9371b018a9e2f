//! Fixed-precision UTC timestamps.
//!
//! Every version carries a `createdAt` stamp rendered with exactly nine
//! fractional digits and a literal `Z`, so the canonical bytes of a record
//! never depend on the writer's locale or the clock's resolution.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::EncodingError;

/// Textual layout: `2025-10-13T20:25:32.722276000Z`.
const LAYOUT: &str = "%Y-%m-%dT%H:%M:%S%.9fZ";

/// A UTC instant with a fixed nanosecond text form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current instant.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Wrap an existing instant, normalizing to UTC.
    pub fn from_datetime<Tz: chrono::TimeZone>(dt: DateTime<Tz>) -> Self {
        Self(dt.with_timezone(&Utc))
    }

    /// Parse from the canonical text form (any RFC 3339 offset is accepted
    /// and normalized to UTC).
    pub fn parse(s: &str) -> Result<Self, EncodingError> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|_| EncodingError::Timestamp(s.to_string()))
    }

    /// This instant shifted by whole seconds. Useful for building chains
    /// with deterministic spacing in tests.
    pub fn plus_seconds(self, seconds: i64) -> Self {
        Self(self.0 + Duration::seconds(seconds))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(LAYOUT))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Timestamp::parse(&s).map_err(D::Error::custom)
    }
}

/// Time source capability consumed by the lifecycle controller.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_precision_text() {
        let ts = Timestamp::parse("2025-10-13T20:25:32.722276000Z").unwrap();
        assert_eq!(ts.to_string(), "2025-10-13T20:25:32.722276000Z");
    }

    #[test]
    fn test_coarse_input_widens_to_nanos() {
        let ts = Timestamp::parse("2025-10-13T20:25:32Z").unwrap();
        assert_eq!(ts.to_string(), "2025-10-13T20:25:32.000000000Z");
    }

    #[test]
    fn test_offset_normalized_to_utc() {
        let ts = Timestamp::parse("2025-10-13T22:25:32.722276000+02:00").unwrap();
        assert_eq!(ts.to_string(), "2025-10-13T20:25:32.722276000Z");
    }

    #[test]
    fn test_plus_seconds() {
        let ts = Timestamp::parse("2025-10-13T20:25:32.722276000Z").unwrap();
        assert_eq!(
            ts.plus_seconds(1).to_string(),
            "2025-10-13T20:25:33.722276000Z"
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let ts = Timestamp::parse("2025-10-13T20:25:32.722276000Z").unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2025-10-13T20:25:32.722276000Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }

    #[test]
    fn test_reject_garbage() {
        assert!(Timestamp::parse("not a timestamp").is_err());
    }
}
