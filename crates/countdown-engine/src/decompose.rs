//! Calendar-accurate decomposition of a time span into display units.
//!
//! Given "now", a target instant and a [`UnitSelection`], [`decompose_at`]
//! splits the span between them into per-unit integer counts:
//!
//! 1. **Calendar walk.** If years are selected, step the cursor one calendar
//!    year at a time while the step does not overshoot the end. Months follow
//!    from wherever the year walk landed. Each step uses
//!    [`calendar::add_years`] / [`calendar::add_months`], so leap years and
//!    short months are exact rather than 365/30-day approximations.
//! 2. **Fixed units.** The remaining milliseconds are divided out coarse to
//!    fine across the selected fixed-length units.
//! 3. **Ceiling.** If time is left below the finest selected fixed unit, that
//!    unit is incremented, so a countdown only shows all zeros once the
//!    target is actually reached.
//!
//! Unselected units are skipped, not borrowed from: with only `days`
//! selected, a 400-day span reads as 400 days.
//!
//! The engine holds no state. Each call recomputes from scratch.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::calendar;
use crate::units::{Unit, UnitSelection};

// ── Direction ───────────────────────────────────────────────────────────────

/// Whether a timer counts down toward a future target or up from a past one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Remaining time until the target.
    #[default]
    Down,
    /// Elapsed time since the target.
    Up,
}

impl Direction {
    /// Parse a `mode` value: exactly `"up"` means [`Direction::Up`], anything
    /// else (including an empty string) means [`Direction::Down`].
    pub fn parse(mode: &str) -> Self {
        if mode == "up" {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

// ── Decomposition ───────────────────────────────────────────────────────────

/// Per-unit counts for every unit of a selection.
///
/// Serializes as a JSON object keyed by unit name, coarse to fine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Decomposition {
    values: BTreeMap<Unit, u64>,
}

impl Decomposition {
    /// A result with every selected unit at zero.
    pub fn zeroed(units: &UnitSelection) -> Self {
        Self {
            values: units.iter().map(|u| (u, 0)).collect(),
        }
    }

    /// The count for `unit`, or `None` when the unit was not selected.
    pub fn get(&self, unit: Unit) -> Option<u64> {
        self.values.get(&unit).copied()
    }

    /// `(unit, count)` pairs, coarse to fine.
    pub fn iter(&self) -> impl Iterator<Item = (Unit, u64)> + '_ {
        self.values.iter().map(|(u, v)| (*u, *v))
    }

    pub fn units(&self) -> impl Iterator<Item = Unit> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether every count is zero.
    pub fn is_zero(&self) -> bool {
        self.values.values().all(|v| *v == 0)
    }
}

// ── decompose ───────────────────────────────────────────────────────────────

/// Decompose the span between the system clock and `target`.
///
/// Reads [`Utc::now`] once and delegates to [`decompose_at`].
pub fn decompose(
    target: DateTime<Utc>,
    units: &UnitSelection,
    direction: Direction,
) -> Decomposition {
    decompose_at(Utc::now(), target, units, direction)
}

/// Decompose the span between `now` and `target` into the selected units.
///
/// - [`Direction::Down`]: counts from `now` to `target`; all zeros once
///   `target <= now`.
/// - [`Direction::Up`]: counts from `target` to `now`; all zeros while
///   `target > now` (the count-up has not started).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use countdown_engine::decompose::{decompose_at, Direction};
/// use countdown_engine::units::{resolve_units, Unit};
///
/// let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
/// let target = Utc.with_ymd_and_hms(2027, 3, 4, 5, 6, 7).unwrap();
/// let result = decompose_at(now, target, &resolve_units("y,mo,d,h,m,s"), Direction::Down);
///
/// assert_eq!(result.get(Unit::Years), Some(1));
/// assert_eq!(result.get(Unit::Months), Some(2));
/// assert_eq!(result.get(Unit::Days), Some(3));
/// assert_eq!(result.get(Unit::Seconds), Some(7));
/// ```
pub fn decompose_at(
    now: DateTime<Utc>,
    target: DateTime<Utc>,
    units: &UnitSelection,
    direction: Direction,
) -> Decomposition {
    let (start, end) = match direction {
        Direction::Down if target <= now => return Decomposition::zeroed(units),
        Direction::Down => (now, target),
        Direction::Up if target > now => return Decomposition::zeroed(units),
        Direction::Up => (target, now),
    };

    let mut values = BTreeMap::new();
    let mut cursor = start;

    if units.contains(Unit::Years) {
        let (years, landed) = calendar_walk(cursor, end, calendar::add_years);
        values.insert(Unit::Years, years);
        cursor = landed;
    }
    if units.contains(Unit::Months) {
        let (months, landed) = calendar_walk(cursor, end, calendar::add_months);
        values.insert(Unit::Months, months);
        cursor = landed;
    }

    let span = end - cursor;
    let mut remaining_ms = span.num_milliseconds();
    let sub_ms_left = span > TimeDelta::milliseconds(remaining_ms);

    let mut finest_fixed = None;
    for unit in units.iter() {
        let Some(unit_ms) = unit.fixed_ms() else {
            continue;
        };
        values.insert(unit, (remaining_ms / unit_ms) as u64);
        remaining_ms %= unit_ms;
        finest_fixed = Some(unit);
    }

    if remaining_ms > 0 || sub_ms_left {
        if let Some(count) = finest_fixed.and_then(|unit| values.get_mut(&unit)) {
            *count += 1;
        }
    }

    Decomposition { values }
}

/// Greedily count whole calendar steps from `cursor` that fit before `end`.
///
/// Returns the count and the instant the cursor landed on.
fn calendar_walk(
    mut cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    step: fn(DateTime<Utc>, i32) -> Option<DateTime<Utc>>,
) -> (u64, DateTime<Utc>) {
    let mut count = 0;
    while let Some(next) = step(cursor, 1) {
        if next > end {
            break;
        }
        count += 1;
        cursor = next;
    }
    (count, cursor)
}

// ── Tests ───────────────────────────────────────────────────────────────────
