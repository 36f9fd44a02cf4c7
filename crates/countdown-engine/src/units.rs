//! Unit catalog and unit-list resolution.
//!
//! A countdown displays an ordered subset of the eight [`Unit`]s. Users pick
//! that subset with a loose comma-separated list (`"d,h,m,s"`,
//! `"Years, months"`), which [`resolve_units`] turns into a canonical
//! [`UnitSelection`]. Resolution never fails: unknown tokens are dropped and
//! an empty result falls back to the default selection.

use std::fmt;

use serde::Serialize;

/// Milliseconds in one second.
pub const MS_PER_SECOND: i64 = 1_000;
/// Milliseconds in one minute.
pub const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
/// Milliseconds in one hour.
pub const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
/// Milliseconds in one day.
pub const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;
/// Milliseconds in one week.
pub const MS_PER_WEEK: i64 = 7 * MS_PER_DAY;

// ── Unit ────────────────────────────────────────────────────────────────────

/// A display unit, ordered from coarsest to finest.
///
/// The derived `Ord` follows declaration order, so sorting units sorts them
/// coarse to fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

impl Unit {
    /// Every unit in canonical coarse-to-fine order.
    pub const ALL: [Unit; 8] = [
        Unit::Years,
        Unit::Months,
        Unit::Weeks,
        Unit::Days,
        Unit::Hours,
        Unit::Minutes,
        Unit::Seconds,
        Unit::Milliseconds,
    ];

    /// Canonical lowercase name (`"years"`, `"milliseconds"`).
    pub fn name(self) -> &'static str {
        match self {
            Unit::Years => "years",
            Unit::Months => "months",
            Unit::Weeks => "weeks",
            Unit::Days => "days",
            Unit::Hours => "hours",
            Unit::Minutes => "minutes",
            Unit::Seconds => "seconds",
            Unit::Milliseconds => "milliseconds",
        }
    }

    /// Display label shown under a value.
    pub fn label(self) -> &'static str {
        match self {
            Unit::Years => "Years",
            Unit::Months => "Months",
            Unit::Weeks => "Weeks",
            Unit::Days => "Days",
            Unit::Hours => "Hours",
            Unit::Minutes => "Minutes",
            Unit::Seconds => "Seconds",
            Unit::Milliseconds => "MS",
        }
    }

    /// Short code used in compact captions (`"1d 2h"`) and unit lists.
    pub fn short_code(self) -> &'static str {
        match self {
            Unit::Years => "y",
            Unit::Months => "mo",
            Unit::Weeks => "w",
            Unit::Days => "d",
            Unit::Hours => "h",
            Unit::Minutes => "m",
            Unit::Seconds => "s",
            Unit::Milliseconds => "ms",
        }
    }

    /// Fixed length in milliseconds, or `None` for the calendar units
    /// (years and months vary with calendar position).
    pub fn fixed_ms(self) -> Option<i64> {
        match self {
            Unit::Years | Unit::Months => None,
            Unit::Weeks => Some(MS_PER_WEEK),
            Unit::Days => Some(MS_PER_DAY),
            Unit::Hours => Some(MS_PER_HOUR),
            Unit::Minutes => Some(MS_PER_MINUTE),
            Unit::Seconds => Some(MS_PER_SECOND),
            Unit::Milliseconds => Some(1),
        }
    }

    /// Display wrap modulus (e.g. 60 for minutes). Years have none.
    pub fn modulus(self) -> Option<u32> {
        match self {
            Unit::Years => None,
            Unit::Months => Some(12),
            Unit::Weeks => Some(4),
            Unit::Days => Some(7),
            Unit::Hours => Some(24),
            Unit::Minutes | Unit::Seconds => Some(60),
            Unit::Milliseconds => Some(1000),
        }
    }

    /// Look up a single token in the alias table.
    ///
    /// The token is trimmed and matched case-insensitively.
    pub fn from_alias(token: &str) -> Option<Unit> {
        match token.trim().to_lowercase().as_str() {
            "y" | "yr" | "yrs" | "year" | "years" => Some(Unit::Years),
            "mo" | "mon" | "month" | "months" => Some(Unit::Months),
            "w" | "wk" | "wks" | "week" | "weeks" => Some(Unit::Weeks),
            "d" | "day" | "days" => Some(Unit::Days),
            "h" | "hr" | "hrs" | "hour" | "hours" => Some(Unit::Hours),
            "m" | "min" | "mins" | "minute" | "minutes" => Some(Unit::Minutes),
            "s" | "sec" | "secs" | "second" | "seconds" => Some(Unit::Seconds),
            "ms" | "millisecond" | "milliseconds" => Some(Unit::Milliseconds),
            _ => None,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ── UnitSelection ───────────────────────────────────────────────────────────

/// A non-empty, duplicate-free set of units in coarse-to-fine order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UnitSelection(Vec<Unit>);

impl UnitSelection {
    /// The fallback selection: days, hours, minutes, seconds.
    pub const DEFAULT: [Unit; 4] = [Unit::Days, Unit::Hours, Unit::Minutes, Unit::Seconds];

    /// Build a selection from any collection of units.
    ///
    /// Duplicates are removed and the result is sorted coarse to fine. An
    /// empty input yields the default selection.
    pub fn from_units<I: IntoIterator<Item = Unit>>(units: I) -> Self {
        let mut units: Vec<Unit> = units.into_iter().collect();
        units.sort();
        units.dedup();
        if units.is_empty() {
            Self::default()
        } else {
            Self(units)
        }
    }

    pub fn contains(&self, unit: Unit) -> bool {
        self.0.contains(&unit)
    }

    /// The finest (last) selected unit.
    pub fn finest(&self) -> Unit {
        // Non-empty by construction.
        self.0.last().copied().unwrap_or(Unit::Seconds)
    }

    pub fn iter(&self) -> impl Iterator<Item = Unit> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Unit] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Short codes joined by commas (`"d,h,m,s"`).
    pub fn short_codes(&self) -> String {
        self.iter()
            .map(Unit::short_code)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for UnitSelection {
    fn default() -> Self {
        Self(Self::DEFAULT.to_vec())
    }
}

impl fmt::Display for UnitSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Unit::name).collect();
        f.write_str(&names.join(","))
    }
}

impl<'a> IntoIterator for &'a UnitSelection {
    type Item = &'a Unit;
    type IntoIter = std::slice::Iter<'a, Unit>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Resolve a comma-separated unit list into a [`UnitSelection`].
///
/// Each token is trimmed, lowercased and mapped through the alias table.
/// Unrecognized tokens are discarded. If nothing valid remains, the default
/// selection (days, hours, minutes, seconds) is returned.
///
/// # Examples
///
/// ```
/// use countdown_engine::units::{resolve_units, Unit};
///
/// let selection = resolve_units("s, min, HRS, yr");
/// assert_eq!(
///     selection.as_slice(),
///     &[Unit::Years, Unit::Hours, Unit::Minutes, Unit::Seconds]
/// );
/// assert_eq!(resolve_units("bogus").to_string(), "days,hours,minutes,seconds");
/// ```
pub fn resolve_units(list: &str) -> UnitSelection {
    UnitSelection::from_units(list.split(',').filter_map(Unit::from_alias))
}

// ── Tests ───────────────────────────────────────────────────────────────────
