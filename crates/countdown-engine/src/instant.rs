//! Parsing of target/start instants from configuration strings.
//!
//! Accepted forms (surrounding whitespace ignored):
//!
//! - `2025-12-31`: midnight UTC
//! - `2025-12-31T23:59`: seconds default to zero
//! - `2025-12-31T23:59:59` and `2025-12-31T23:59:59.250`
//! - any of the time forms followed by `Z` or a `±HH:MM` offset
//!
//! A value without an offset is interpreted as UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::error::{CountdownError, Result};

/// Offset-bearing forms that RFC 3339 does not cover (no seconds).
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M%:z"];

/// Naive forms; `%.f` also matches an absent fraction.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an instant, returning `None` for anything unparseable.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use countdown_engine::instant::parse_instant;
///
/// assert_eq!(
///     parse_instant("2025-12-31T23:59"),
///     Some(Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 0).unwrap())
/// );
/// assert_eq!(parse_instant("next tuesday"), None);
/// ```
pub fn parse_instant(input: &str) -> Option<DateTime<Utc>> {
    try_parse_instant(input).ok()
}

/// Parse an instant, reporting why parsing failed.
///
/// # Errors
///
/// Returns [`CountdownError::InvalidDatetime`] if the input matches none of
/// the accepted forms or names an impossible date.
pub fn try_parse_instant(input: &str) -> Result<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return Err(CountdownError::InvalidDatetime("empty datetime".to_string()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| naive.and_utc())
            .ok_or_else(|| CountdownError::InvalidDatetime(format!("'{s}'")));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    let naive = s
        .strip_suffix('Z')
        .or_else(|| s.strip_suffix('z'))
        .unwrap_or(s);
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, fmt) {
            return Ok(dt.and_utc());
        }
    }

    Err(CountdownError::InvalidDatetime(format!(
        "'{s}': expected YYYY-MM-DD[THH:MM[:SS]][Z|±HH:MM]"
    )))
}

/// Render an instant as RFC 3339 with millisecond precision when needed.
pub fn format_rfc3339(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}
