//! Wall-clock time for observations and events.
//!
//! Timestamps are always UTC. Their text form is RFC 3339, which is what
//! storage adapters persist.

use chrono::{DateTime, Utc};

pub use chrono::ParseError;

/// UTC instant at which a value was observed or an event happened.
pub type Timestamp = DateTime<Utc>;

#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// RFC 3339 text form of `timestamp`.
#[must_use]
pub fn to_rfc3339(timestamp: Timestamp) -> String {
    timestamp.to_rfc3339()
}

/// Parse an RFC 3339 timestamp, normalizing any offset to UTC.
///
/// # Errors
///
/// Returns [`ParseError`] when `text` is not RFC 3339.
pub fn parse_rfc3339(text: &str) -> Result<Timestamp, ParseError> {
    DateTime::parse_from_rfc3339(text).map(|ts| ts.to_utc())
}
