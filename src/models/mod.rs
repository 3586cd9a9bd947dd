//! Wire models for the two Firestore collections.
//!
//! Documents in the store are schemaless; every field here defaults at
//! the deserialization boundary so downstream code works on fully
//! populated values instead of re-checking absence everywhere.

pub mod scan;
pub mod user;

use serde::{Deserialize, Serialize};

/// Point in time as the admin SDK serializes Firestore timestamps:
/// `{ "_seconds": ..., "_nanoseconds": ... }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    #[serde(rename = "_seconds")]
    pub seconds: i64,
    #[serde(rename = "_nanoseconds", default)]
    pub nanoseconds: u32,
}

impl Timestamp {
    pub fn new(seconds: i64) -> Self {
        Self {
            seconds,
            nanoseconds: 0,
        }
    }

    pub fn to_datetime(self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.seconds, self.nanoseconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn timestamp_deserializes_admin_sdk_shape() {
        let ts: Timestamp =
            serde_json::from_str(r#"{"_seconds":1700000000,"_nanoseconds":500}"#).unwrap();
        assert_eq!(ts.seconds, 1_700_000_000);
        assert_eq!(ts.nanoseconds, 500);
    }

    #[test]
    fn nanoseconds_default_to_zero() {
        let ts: Timestamp = serde_json::from_str(r#"{"_seconds":1700000000}"#).unwrap();
        assert_eq!(ts.nanoseconds, 0);
    }

    #[test]
    fn to_datetime_resolves_calendar_fields() {
        // 2023-11-14T22:13:20Z
        let dt = Timestamp::new(1_700_000_000).to_datetime().unwrap();
        assert_eq!(dt.year(), 2023);
        assert_eq!(dt.month(), 11);
    }
}
