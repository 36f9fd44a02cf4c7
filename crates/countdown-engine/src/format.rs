//! Text rendering of decomposed values.

use crate::decompose::Decomposition;
use crate::units::{Unit, UnitSelection};

/// Pad a value for display: milliseconds to three digits, hours through
/// seconds to two, calendar-day-sized units not at all.
pub fn pad_value(unit: Unit, value: u64) -> String {
    match unit {
        Unit::Milliseconds => format!("{value:03}"),
        Unit::Years | Unit::Months | Unit::Weeks | Unit::Days => value.to_string(),
        Unit::Hours | Unit::Minutes | Unit::Seconds => format!("{value:02}"),
    }
}

/// Compact caption such as `1d 2h 3m 4s` (milliseconds are left out).
pub fn format_compact(values: &Decomposition) -> String {
    values
        .iter()
        .filter(|(unit, _)| *unit != Unit::Milliseconds)
        .map(|(unit, value)| format!("{value}{}", unit.short_code()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Caption shown on the frame where a countdown reaches zero (`0s`).
pub fn format_zero(units: &UnitSelection) -> String {
    format!("0{}", units.finest().short_code())
}

/// Padded `value label` pairs joined by spaces, with `:` between adjacent
/// hour/minute/second values (`3 Days 04:05:06`).
pub fn format_clock(values: &Decomposition) -> String {
    let mut out = String::new();
    let mut previous: Option<Unit> = None;
    for (unit, value) in values.iter() {
        match previous {
            Some(prev) if is_clock_unit(prev) && is_clock_unit(unit) => out.push(':'),
            Some(_) => out.push(' '),
            None => {}
        }
        out.push_str(&pad_value(unit, value));
        if !is_clock_unit(unit) {
            out.push(' ');
            out.push_str(unit.label());
        }
        previous = Some(unit);
    }
    out
}

fn is_clock_unit(unit: Unit) -> bool {
    matches!(unit, Unit::Hours | Unit::Minutes | Unit::Seconds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decompose::{decompose_at, Direction};
    use crate::units::resolve_units;
    use chrono::{TimeDelta, TimeZone, Utc};

    fn sample(units: &str, span: TimeDelta) -> Decomposition {
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        decompose_at(now, now + span, &resolve_units(units), Direction::Down)
    }

    fn span() -> TimeDelta {
        TimeDelta::days(3) + TimeDelta::hours(4) + TimeDelta::minutes(5) + TimeDelta::seconds(6)
    }

    #[test]
    fn test_pad_value() {
        assert_eq!(pad_value(Unit::Milliseconds, 7), "007");
        assert_eq!(pad_value(Unit::Seconds, 7), "07");
        assert_eq!(pad_value(Unit::Days, 7), "7");
        assert_eq!(pad_value(Unit::Years, 120), "120");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(&sample("d,h,m,s", span())), "3d 4h 5m 6s");
    }

    #[test]
    fn test_format_compact_skips_milliseconds() {
        let values = sample("s,ms", TimeDelta::milliseconds(1_250));
        assert_eq!(format_compact(&values), "1s");
    }

    #[test]
    fn test_format_zero() {
        assert_eq!(format_zero(&resolve_units("d,h,m,s")), "0s");
        assert_eq!(format_zero(&resolve_units("s,ms")), "0ms");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(&sample("d,h,m,s", span())), "3 Days 04:05:06");
        assert_eq!(
            format_clock(&sample("s,ms", TimeDelta::milliseconds(1_250))),
            "01 250 MS"
        );
    }
}
