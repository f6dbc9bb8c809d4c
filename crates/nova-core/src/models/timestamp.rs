//! Timestamp field codec.
//!
//! Written as RFC 3339. Read as either RFC 3339 or epoch milliseconds,
//! the shape used by documents from the browser build.

use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Wire {
    Millis(i64),
    Text(DateTime<Utc>),
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    value.serialize(serializer)
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    match Wire::deserialize(deserializer)? {
        Wire::Text(value) => Ok(value),
        Wire::Millis(ms) => DateTime::from_timestamp_millis(ms)
            .ok_or_else(|| D::Error::custom(format!("timestamp out of range: {ms}"))),
    }
}
