use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{DashError, DashResult};

/// Canonical date key layout used across event maps and tooltips.
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y, %I:%M:%S %p",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %H:%M:%S",
];

/// `Date.prototype.toString` layout once the trailing zone name is removed.
const JS_DATE_STRING_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

const NAIVE_DATE_FORMATS: &[&str] = &[
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%a %b %d %Y",
    "%b %d %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%d %B %Y",
];

/// Returns `true` when `input` is exactly `YYYY-MM-DD` shaped (digits only,
/// no range checks).
#[must_use]
pub fn is_date_key(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Normalizes a date-like string into a `YYYY-MM-DD` key.
///
/// Keys that already have the canonical shape are returned unchanged so an
/// already-correct key is never shifted by timezone handling. Everything else
/// is parsed and re-serialized in UTC.
pub fn normalize_date_key(input: &str) -> DashResult<String> {
    if is_date_key(input) {
        return Ok(input.to_owned());
    }
    let trimmed = input.trim();
    if is_date_key(trimmed) {
        return Ok(trimmed.to_owned());
    }
    parse_utc(trimmed)
        .map(date_key)
        .ok_or_else(|| DashError::InvalidDate(input.to_owned()))
}

/// Formats a UTC timestamp as a date key.
#[must_use]
pub fn date_key(time: DateTime<Utc>) -> String {
    time.format(DATE_KEY_FORMAT).to_string()
}

/// Parses a canonical (or normalizable) date key into a calendar date.
pub fn parse_date_key(input: &str) -> DashResult<NaiveDate> {
    let key = normalize_date_key(input)?;
    NaiveDate::parse_from_str(&key, DATE_KEY_FORMAT).map_err(|_| DashError::InvalidDate(key))
}

fn parse_utc(input: &str) -> Option<DateTime<Utc>> {
    if input.is_empty() {
        return None;
    }
    if let Some(millis) = parse_epoch_millis(input) {
        return Utc.timestamp_millis_opt(millis).single();
    }
    if let Ok(time) = DateTime::parse_from_rfc3339(input) {
        return Some(time.with_timezone(&Utc));
    }
    if let Ok(time) = DateTime::parse_from_rfc2822(input) {
        return Some(time.with_timezone(&Utc));
    }
    if let Ok(time) = DateTime::parse_from_str(strip_zone_name(input), JS_DATE_STRING_FORMAT) {
        return Some(time.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(time) = NaiveDateTime::parse_from_str(input, format) {
            return Some(time.and_utc());
        }
    }
    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return date.and_hms_opt(0, 0, 0).map(|time| time.and_utc());
        }
    }
    None
}

fn parse_epoch_millis(input: &str) -> Option<i64> {
    if input.len() < 9 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}

/// Drops a trailing ` (Eastern Standard Time)` style zone name.
fn strip_zone_name(input: &str) -> &str {
    match input.strip_suffix(')').and_then(|rest| rest.rsplit_once(" (")) {
        Some((head, _zone)) => head,
        None => input,
    }
}
