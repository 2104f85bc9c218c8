//! ISO-8601 parsing and RFC-822 formatting for feed dates.

use crate::error::PublishError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const RFC822_GMT: &str = "%a, %d %b %Y %H:%M:%S GMT";
const ISO8601_UTC: &str = "%Y-%m-%dT%H:%M:%SZ";

const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%dT%H:%M%z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO-8601 date or date-time. A trailing `Z` means UTC and so does
/// a missing offset; a bare date is midnight UTC.
pub fn parse_iso8601(raw: &str) -> Option<DateTime<Utc>> {
    // chrono skips whitespace before numeric fields; padded values are invalid
    if raw.starts_with(char::is_whitespace) || raw.ends_with(char::is_whitespace) {
        return None;
    }
    let normalized = match raw.strip_suffix('Z') {
        Some(head) => format!("{}+00:00", head),
        None => raw.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&normalized, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

pub fn format_rfc822(dt: &DateTime<Utc>) -> String {
    dt.format(RFC822_GMT).to_string()
}

/// Timestamp in the zero-padded form the feed sort relies on.
pub fn format_iso8601(dt: &DateTime<Utc>) -> String {
    dt.format(ISO8601_UTC).to_string()
}

/// Converts an episode's `pub_date` into the feed's `pubDate` text.
pub fn to_rfc822(raw: &str, episode_id: &str) -> Result<String, PublishError> {
    parse_iso8601(raw)
        .map(|dt| format_rfc822(&dt))
        .ok_or_else(|| PublishError::InvalidDate {
            id: episode_id.to_string(),
            value: raw.to_string(),
        })
}
