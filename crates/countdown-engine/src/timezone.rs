//! Wall-clock → UTC normalization for named IANA timezones.
//!
//! A builder lets people enter an event time as it reads on a local clock in
//! some zone (`2026-12-31T23:59` in `Asia/Tokyo`). The configuration stores
//! UTC, so the wall clock has to be converted.
//!
//! The conversion uses offset inspection: read the wall-clock fields as if
//! they were UTC (the *reference*), render the reference in the zone, and
//! take the difference as the zone's offset. Subtracting the offset gives the
//! real instant. Near a DST transition the offset before and after the
//! transition can both apply (a fall-back fold) or neither can (a
//! spring-forward gap); [`Disambiguation`] decides those cases.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::{CountdownError, Result};

/// Zones offered by the builder, with friendly names.
pub const COMMON_TIMEZONES: &[(&str, &str)] = &[
    ("Pacific/Honolulu", "Hawaii"),
    ("America/Anchorage", "Alaska"),
    ("America/Los_Angeles", "Pacific Time (US & Canada)"),
    ("America/Denver", "Mountain Time (US & Canada)"),
    ("America/Chicago", "Central Time (US & Canada)"),
    ("America/New_York", "Eastern Time (US & Canada)"),
    ("America/Sao_Paulo", "Sao Paulo"),
    ("America/Argentina/Buenos_Aires", "Buenos Aires"),
    ("Atlantic/Cape_Verde", "Cape Verde"),
    ("UTC", "UTC"),
    ("Europe/London", "London, Dublin, Lisbon"),
    ("Europe/Paris", "Paris, Berlin, Amsterdam"),
    ("Europe/Helsinki", "Helsinki, Kyiv, Riga"),
    ("Europe/Moscow", "Moscow, St. Petersburg"),
    ("Asia/Dubai", "Dubai, Abu Dhabi"),
    ("Asia/Karachi", "Karachi, Islamabad"),
    ("Asia/Kolkata", "Mumbai, New Delhi"),
    ("Asia/Dhaka", "Dhaka"),
    ("Asia/Bangkok", "Bangkok, Hanoi, Jakarta"),
    ("Asia/Singapore", "Singapore, Kuala Lumpur"),
    ("Asia/Hong_Kong", "Hong Kong"),
    ("Asia/Shanghai", "Beijing, Shanghai"),
    ("Asia/Tokyo", "Tokyo, Osaka"),
    ("Asia/Seoul", "Seoul"),
    ("Australia/Sydney", "Sydney, Melbourne"),
    ("Pacific/Auckland", "Auckland, Wellington"),
];

/// Accepted wall-clock layouts (no offset).
const WALL_CLOCK_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// How to resolve a wall-clock time that maps to zero or two instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Disambiguation {
    /// Fold → the earlier instant; gap → the wall clock pushed forward by
    /// the gap length (02:30 in a 02:00→03:00 gap becomes 03:30).
    #[default]
    Compatible,
    /// Fold → the earlier instant; gap → the instant just before the jump
    /// (02:30 becomes 01:30 on the pre-transition offset).
    Earlier,
    /// Fold → the later instant; gap → same as [`Disambiguation::Compatible`].
    Later,
}

impl Disambiguation {
    /// Parse `compatible`, `earlier` or `later` (case-insensitive).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "compatible" => Some(Disambiguation::Compatible),
            "earlier" => Some(Disambiguation::Earlier),
            "later" => Some(Disambiguation::Later),
            _ => None,
        }
    }
}

/// Parse an IANA timezone name into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| CountdownError::InvalidTimezone(format!("'{}'", s)))
}

/// Parse a wall-clock string (`YYYY-MM-DDTHH:MM[:SS]`, `T` or space).
pub fn parse_wall_clock(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    WALL_CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// The zone's UTC offset at `instant`, found by rendering the instant in
/// the zone and comparing wall clocks.
pub fn offset_at(tz: &Tz, instant: DateTime<Utc>) -> TimeDelta {
    instant.with_timezone(tz).naive_local() - instant.naive_utc()
}

/// The wall-clock fields `instant` shows in `tz`.
pub fn wall_clock_in(tz: &Tz, instant: DateTime<Utc>) -> NaiveDateTime {
    instant.with_timezone(tz).naive_local()
}

/// Convert a wall-clock string in `timezone` to UTC using
/// [`Disambiguation::Compatible`].
///
/// Returns `None` if the wall clock cannot be parsed. An unknown timezone
/// falls back to a zero offset: the wall clock is taken as UTC.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use countdown_engine::timezone::local_to_utc;
///
/// let utc = local_to_utc("2026-01-27T12:00", "America/New_York").unwrap();
/// assert_eq!(utc, Utc.with_ymd_and_hms(2026, 1, 27, 17, 0, 0).unwrap());
/// ```
pub fn local_to_utc(wall_clock: &str, timezone: &str) -> Option<DateTime<Utc>> {
    local_to_utc_with(wall_clock, timezone, Disambiguation::default())
}

/// Convert a wall-clock string in `timezone` to UTC, resolving DST folds
/// and gaps with `policy`.
pub fn local_to_utc_with(
    wall_clock: &str,
    timezone: &str,
    policy: Disambiguation,
) -> Option<DateTime<Utc>> {
    let naive = parse_wall_clock(wall_clock)?;
    match parse_timezone(timezone) {
        Ok(tz) => Some(resolve_wall_clock(&tz, naive, policy)),
        Err(error) => {
            tracing::debug!(%error, "timezone lookup failed; using a zero offset");
            Some(naive.and_utc())
        }
    }
}

/// Resolve wall-clock fields in `tz` to a UTC instant.
///
/// Every transition that can affect the result lies within a day of the
/// reference, so the offsets a day either side bracket it. Each offset
/// yields a candidate instant; candidates that render back to the same wall
/// clock are valid. Two valid candidates mean a fold, none means a gap.
pub fn resolve_wall_clock(
    tz: &Tz,
    naive: NaiveDateTime,
    policy: Disambiguation,
) -> DateTime<Utc> {
    let reference = naive.and_utc();
    let day = TimeDelta::days(1);
    let offset_before = reference
        .checked_sub_signed(day)
        .map_or_else(|| offset_at(tz, reference), |at| offset_at(tz, at));
    let offset_after = reference
        .checked_add_signed(day)
        .map_or_else(|| offset_at(tz, reference), |at| offset_at(tz, at));

    let renders_back = |candidate: &DateTime<Utc>| wall_clock_in(tz, *candidate) == naive;

    let mut valid: Vec<DateTime<Utc>> = [reference - offset_before, reference - offset_after]
        .into_iter()
        .filter(renders_back)
        .collect();
    valid.sort();
    valid.dedup();

    match (valid.first(), valid.last()) {
        (Some(earlier), Some(later)) => match policy {
            Disambiguation::Later => *later,
            Disambiguation::Compatible | Disambiguation::Earlier => *earlier,
        },
        _ => match policy {
            Disambiguation::Earlier => reference - offset_after,
            Disambiguation::Compatible | Disambiguation::Later => reference - offset_before,
        },
    }
}

/// Offset label like `GMT-05:00` for `timezone` at `at`.
///
/// Unknown zones render as `GMT+00:00`.
pub fn gmt_offset_label(timezone: &str, at: DateTime<Utc>) -> String {
    let offset = parse_timezone(timezone)
        .map(|tz| offset_at(&tz, at))
        .unwrap_or_else(|_| TimeDelta::zero());
    format!("GMT{}", format_utc_offset(offset))
}

/// Format an instant the way it is stored in a countdown configuration:
/// UTC, second precision, no suffix (`2026-12-31T14:59:00`).
pub fn format_fragment_instant(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Format an offset as `+HH:MM` / `-HH:MM`.
fn format_utc_offset(offset: TimeDelta) -> String {
    let offset_secs = offset.num_seconds();
    let sign = if offset_secs >= 0 { "+" } else { "-" };
    let abs_secs = offset_secs.unsigned_abs();
    let hours = abs_secs / 3600;
    let minutes = (abs_secs % 3600) / 60;
    format!("{sign}{hours:02}:{minutes:02}")
}

// ── Tests ───────────────────────────────────────────────────────────────────
