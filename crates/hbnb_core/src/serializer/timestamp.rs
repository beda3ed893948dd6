//! Timestamp clock and ISO-8601 text form.
//!
//! # Invariants
//! - Clock values carry at most microsecond precision, so formatting and
//!   parsing round-trip exactly.
//! - Text form is naive UTC `YYYY-MM-DDTHH:MM:SS.ffffff`.

use chrono::{NaiveDateTime, SubsecRound, Utc};

/// Record timestamp type.
pub type Timestamp = NaiveDateTime;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";
// `%.f` also accepts a missing fractional part on parse.
const TIMESTAMP_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Current UTC time truncated to microseconds.
pub fn now() -> Timestamp {
    Utc::now().naive_utc().trunc_subsecs(6)
}

pub fn format_timestamp(value: &Timestamp) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(text: &str) -> Option<Timestamp> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_PARSE_FORMAT).ok()
}
