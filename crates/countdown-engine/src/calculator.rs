//! Date calculator: how far apart two dates are, in each unit.
//!
//! Unlike [`crate::decompose`], these are independent totals (the same span
//! expressed as days, and again as hours, ...), with years and months
//! approximated as 365.25 and 30.44 days.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::units::{MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE, MS_PER_WEEK};

const MS_PER_AVG_YEAR: f64 = 365.25 * MS_PER_DAY as f64;
const MS_PER_AVG_MONTH: f64 = 30.44 * MS_PER_DAY as f64;

/// Whole-unit totals of the distance between two instants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanTotals {
    /// Signed distance in milliseconds (negative if `end` is before `start`).
    pub total_ms: i64,
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    /// Human-readable days/hours/minutes breakdown (e.g. "2 days, 3 hours").
    pub human_readable: String,
}

/// Compute totals for the absolute distance between `start` and `end`.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use countdown_engine::calculator::span_totals;
///
/// let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
/// let end = Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap();
/// let totals = span_totals(start, end);
/// assert_eq!(totals.days, 365);
/// assert_eq!(totals.weeks, 52);
/// assert_eq!(totals.years, 0); // 365 < 365.25
/// ```
pub fn span_totals(start: DateTime<Utc>, end: DateTime<Utc>) -> SpanTotals {
    let total_ms = (end - start).num_milliseconds();
    let abs_ms = total_ms.unsigned_abs();

    let days = (abs_ms / MS_PER_DAY as u64) as i64;
    let remainder = abs_ms % MS_PER_DAY as u64;
    let hour_part = (remainder / MS_PER_HOUR as u64) as i64;
    let minute_part = ((remainder % MS_PER_HOUR as u64) / MS_PER_MINUTE as u64) as i64;

    SpanTotals {
        total_ms,
        years: (abs_ms as f64 / MS_PER_AVG_YEAR).floor() as i64,
        months: (abs_ms as f64 / MS_PER_AVG_MONTH).floor() as i64,
        weeks: (abs_ms / MS_PER_WEEK as u64) as i64,
        days,
        hours: (abs_ms / MS_PER_HOUR as u64) as i64,
        minutes: (abs_ms / MS_PER_MINUTE as u64) as i64,
        human_readable: format_human_span(days, hour_part, minute_part),
    }
}

/// Format a human-readable span string.
fn format_human_span(days: i64, hours: i64, minutes: i64) -> String {
    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{} day{}", days, if days == 1 { "" } else { "s" }));
    }
    if hours > 0 {
        parts.push(format!(
            "{} hour{}",
            hours,
            if hours == 1 { "" } else { "s" }
        ));
    }
    if minutes > 0 || parts.is_empty() {
        parts.push(format!(
            "{} minute{}",
            minutes,
            if minutes == 1 { "" } else { "s" }
        ));
    }
    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 16, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_span_same_day() {
        let totals = span_totals(start(), start() + TimeDelta::hours(8));
        assert_eq!(totals.total_ms, 28_800_000);
        assert_eq!(totals.hours, 8);
        assert_eq!(totals.days, 0);
        assert_eq!(totals.minutes, 480);
    }

    #[test]
    fn test_span_totals_are_independent() {
        let totals = span_totals(start(), start() + TimeDelta::days(10));
        assert_eq!(totals.weeks, 1);
        assert_eq!(totals.days, 10);
        assert_eq!(totals.hours, 240);
        assert_eq!(totals.minutes, 14_400);
    }

    #[test]
    fn test_span_average_year_and_month() {
        let four_years = span_totals(start(), start() + TimeDelta::days(1461));
        assert_eq!(four_years.years, 4);
        assert_eq!(four_years.months, 47); // 1461 / 30.44 = 47.99

        let one_month = span_totals(start(), start() + TimeDelta::days(31));
        assert_eq!(one_month.months, 1);
    }

    #[test]
    fn test_span_negative_direction() {
        let totals = span_totals(start() + TimeDelta::days(2), start());
        assert_eq!(totals.total_ms, -172_800_000);
        assert_eq!(totals.days, 2);
    }

    #[test]
    fn test_span_human_readable() {
        let end = start() + TimeDelta::days(2) + TimeDelta::hours(3) + TimeDelta::minutes(15);
        assert_eq!(
            span_totals(start(), end).human_readable,
            "2 days, 3 hours, 15 minutes"
        );
        assert_eq!(span_totals(start(), start()).human_readable, "0 minutes");
        assert_eq!(
            span_totals(start(), start() + TimeDelta::days(1)).human_readable,
            "1 day"
        );
    }
}
