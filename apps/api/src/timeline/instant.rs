//! ISO-8601 instant handling for timeline envelopes.
//!
//! All instants are normalized to UTC. The wire form always carries
//! millisecond precision and a `Z` suffix, e.g. `2025-01-01T00:00:00.000Z`.
//! A generated date already in that form comes back byte-for-byte; any other
//! accepted form is rewritten into it.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TimelineError {
    #[error("'{0}' is not a valid ISO-8601 instant or YYYY-MM-DD date")]
    InvalidInstant(String),
}

/// Parses an RFC 3339 instant (any offset) or a bare calendar date.
/// Bare dates resolve to midnight UTC.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, TimelineError> {
    let raw = raw.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .ok_or_else(|| TimelineError::InvalidInstant(raw.to_string()))
}

pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Serde adapter for `DateTime<Utc>` fields in the camelCase timeline wire format.
pub mod iso_millis {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(instant: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_instant(instant))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_instant(&raw).map_err(serde::de::Error::custom)
    }
}
