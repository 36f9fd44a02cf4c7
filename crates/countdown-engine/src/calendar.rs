//! Calendar field arithmetic on UTC instants.
//!
//! Years and months have no fixed length, so stepping by them is done on
//! the calendar fields. When the original day-of-month does not exist in the
//! target month the result is clamped to that month's last day:
//!
//! - `2024-02-29 + 1 year` → `2025-02-28`
//! - `2025-01-31 + 1 month` → `2025-02-28`
//! - `2024-01-31 + 1 month` → `2024-02-29`
//!
//! The time of day is preserved. Both functions take the instant by value
//! and return a new one.

use chrono::{DateTime, Months, Utc};

/// Add `years` calendar years, clamping Feb 29 to Feb 28 in non-leap years.
///
/// Returns `None` only if the result falls outside chrono's representable range.
pub fn add_years(instant: DateTime<Utc>, years: i32) -> Option<DateTime<Utc>> {
    add_months(instant, years.checked_mul(12)?)
}

/// Add `months` calendar months (negative values step backwards), clamping
/// the day to the last day of the resulting month.
///
/// Returns `None` only if the result falls outside chrono's representable range.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use countdown_engine::calendar::add_months;
///
/// let jan31 = Utc.with_ymd_and_hms(2025, 1, 31, 8, 0, 0).unwrap();
/// let feb = add_months(jan31, 1).unwrap();
/// assert_eq!(feb, Utc.with_ymd_and_hms(2025, 2, 28, 8, 0, 0).unwrap());
/// ```
pub fn add_months(instant: DateTime<Utc>, months: i32) -> Option<DateTime<Utc>> {
    let step = Months::new(months.unsigned_abs());
    if months >= 0 {
        instant.checked_add_months(step)
    } else {
        instant.checked_sub_months(step)
    }
}
