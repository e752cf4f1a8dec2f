//! Timestamp wire format.
//!
//! Timestamps travel as RFC 3339 UTC strings with second precision, e.g.
//! `2025-01-02T03:04:05Z`.

use chrono::{DateTime, SecondsFormat, Utc};

/// Formats a timestamp for the wire.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses a wire timestamp.
///
/// Unparsable input yields the Unix epoch instead of an error. Callers that
/// need strictness must check for the epoch themselves.
pub fn parse_timestamp(raw: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .unwrap_or_default()
}
