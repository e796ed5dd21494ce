//! Timestamp text codec for persisted entities.
//!
//! Timestamps are written as naive UTC with microsecond precision
//! (`2017-09-28T21:05:54.119427`). On read, RFC 3339 strings with an offset
//! are accepted as well and normalized to UTC.

use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use crate::error::TypeError;

/// Write format for persisted timestamps.
pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Current time truncated to what the text format can represent.
///
/// Truncating up front keeps a freshly created entity equal to its reloaded
/// copy.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

pub fn format(ts: &DateTime<Utc>) -> String {
    ts.format(FORMAT).to_string()
}

pub fn parse(value: &str) -> Result<DateTime<Utc>, TypeError> {
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(naive.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| TypeError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(ts))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}
