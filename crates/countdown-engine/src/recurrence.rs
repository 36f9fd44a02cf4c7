//! Recurring targets: advancing a base instant past "now".

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::calendar;
use crate::units::{MS_PER_DAY, MS_PER_WEEK};

/// How often a countdown target repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Recurrence {
    /// Parse a `recur` value. Missing or unrecognized values mean no recurrence.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("daily") => Recurrence::Daily,
            Some("weekly") => Recurrence::Weekly,
            Some("monthly") => Recurrence::Monthly,
            Some("yearly") => Recurrence::Yearly,
            _ => Recurrence::None,
        }
    }

    pub fn is_recurring(self) -> bool {
        self != Recurrence::None
    }

    pub fn name(self) -> &'static str {
        match self {
            Recurrence::None => "none",
            Recurrence::Daily => "daily",
            Recurrence::Weekly => "weekly",
            Recurrence::Monthly => "monthly",
            Recurrence::Yearly => "yearly",
        }
    }

    /// Fixed period length for daily and weekly schedules.
    fn fixed_period(self) -> Option<TimeDelta> {
        match self {
            Recurrence::Daily => Some(TimeDelta::milliseconds(MS_PER_DAY)),
            Recurrence::Weekly => Some(TimeDelta::milliseconds(MS_PER_WEEK)),
            _ => None,
        }
    }
}

/// The next occurrence of `base` strictly after the system clock.
pub fn next_occurrence(base: DateTime<Utc>, period: Recurrence) -> DateTime<Utc> {
    next_occurrence_at(Utc::now(), base, period)
}

/// The first occurrence of `base` repeated every `period` that is strictly
/// after `now`.
///
/// A `base` already in the future is returned as-is. With
/// [`Recurrence::None`] the base is returned unchanged even if it has passed.
///
/// Monthly and yearly schedules step one calendar period at a time from the
/// previous occurrence, so a base on the 31st settles on the clamped day
/// (Jan 31 → Feb 28 → Mar 28). Daily and weekly schedules jump directly to
/// the answer stepping would reach.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use countdown_engine::recurrence::{next_occurrence_at, Recurrence};
///
/// // Monday 09:00, checked on the following Wednesday.
/// let base = Utc.with_ymd_and_hms(2026, 10, 12, 9, 0, 0).unwrap();
/// let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
/// assert_eq!(
///     next_occurrence_at(now, base, Recurrence::Weekly),
///     Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap()
/// );
/// ```
pub fn next_occurrence_at(
    now: DateTime<Utc>,
    base: DateTime<Utc>,
    period: Recurrence,
) -> DateTime<Utc> {
    if base > now || !period.is_recurring() {
        return base;
    }

    if let Some(step) = period.fixed_period() {
        let step_ms = step.num_milliseconds();
        let behind_ms = (now - base).num_milliseconds();
        let periods = behind_ms / step_ms + 1;
        let jumped = TimeDelta::try_milliseconds(periods.saturating_mul(step_ms))
            .and_then(|delta| base.checked_add_signed(delta));
        if let Some(next) = jumped.filter(|next| *next > now) {
            return next;
        }
    }

    let mut next = base;
    while next <= now {
        let stepped = match period {
            Recurrence::Monthly => calendar::add_months(next, 1),
            Recurrence::Yearly => calendar::add_years(next, 1),
            Recurrence::Daily => next.checked_add_signed(TimeDelta::days(1)),
            Recurrence::Weekly => next.checked_add_signed(TimeDelta::weeks(1)),
            Recurrence::None => None,
        };
        match stepped {
            Some(stepped) => next = stepped,
            None => break,
        }
    }
    next
}
