use chrono::{DateTime, Datelike, TimeDelta, TimeZone, Utc};
use countdown_engine::calendar::{add_months, add_years};
use countdown_engine::decompose::{decompose_at, Direction};
use countdown_engine::progress::progress_at;
use countdown_engine::recurrence::{next_occurrence_at, Recurrence};
use countdown_engine::units::{resolve_units, Unit};
use proptest::prelude::*;

fn anchor() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap()
}

fn instant() -> impl Strategy<Value = DateTime<Utc>> {
    // 1970-01-01 .. roughly 2100.
    (0i64..4_102_444_800_000).prop_map(|ms| DateTime::from_timestamp_millis(ms).unwrap())
}

fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("y".to_string()),
        Just("mo".to_string()),
        Just("w".to_string()),
        Just("d".to_string()),
        Just("h".to_string()),
        Just("m".to_string()),
        Just("s".to_string()),
        Just("ms".to_string()),
        Just(" Hours ".to_string()),
        "[a-z]{0,6}",
    ]
}

proptest! {
    #[test]
    fn resolved_units_are_nonempty_sorted_and_unique(tokens in prop::collection::vec(token(), 0..10)) {
        let units = resolve_units(&tokens.join(","));
        prop_assert!(!units.is_empty());
        prop_assert!(units.as_slice().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn add_months_clamps_day_and_lands_in_target_month(start in instant(), months in -36i32..36) {
        let moved = add_months(start, months).unwrap();
        let start_index = start.year() * 12 + start.month0() as i32;
        let moved_index = moved.year() * 12 + moved.month0() as i32;
        prop_assert_eq!(moved_index - start_index, months);
        prop_assert!(moved.day() <= start.day());
        prop_assert_eq!(moved.time(), start.time());
    }

    #[test]
    fn add_years_matches_twelve_months(start in instant(), years in -5i32..5) {
        prop_assert_eq!(add_years(start, years), add_months(start, years * 12));
    }

    #[test]
    fn fixed_decomposition_sums_to_span(span_ms in 0i64..100_000_000_000) {
        let now = anchor();
        let target = now + TimeDelta::milliseconds(span_ms);
        let values = decompose_at(now, target, &resolve_units("w,d,h,m,s,ms"), Direction::Down);
        let total: i64 = values
            .iter()
            .map(|(unit, v)| v as i64 * unit.fixed_ms().unwrap())
            .sum();
        prop_assert_eq!(total, span_ms);
    }

    #[test]
    fn calendar_decomposition_reconstructs_target(start in instant(), span_ms in 0i64..10_000_000_000_000) {
        let target = start + TimeDelta::milliseconds(span_ms);
        let values = decompose_at(start, target, &resolve_units("y,mo,d,h,m,s,ms"), Direction::Down);

        let mut cursor = start;
        for _ in 0..values.get(Unit::Years).unwrap() {
            cursor = add_years(cursor, 1).unwrap();
        }
        for _ in 0..values.get(Unit::Months).unwrap() {
            cursor = add_months(cursor, 1).unwrap();
        }
        let fixed: i64 = values
            .iter()
            .filter_map(|(unit, v)| unit.fixed_ms().map(|ms| v as i64 * ms))
            .sum();
        prop_assert_eq!(cursor + TimeDelta::milliseconds(fixed), target);
    }

    #[test]
    fn countdown_is_zero_only_once_reached(span_ms in -10_000i64..10_000) {
        let now = anchor();
        let target = now + TimeDelta::milliseconds(span_ms);
        let values = decompose_at(now, target, &resolve_units("d,h,m,s"), Direction::Down);
        prop_assert_eq!(values.is_zero(), span_ms <= 0);
    }

    #[test]
    fn up_and_down_agree_on_mirrored_spans(span_ms in 0i64..1_000_000_000) {
        let now = anchor();
        let units = resolve_units("d,h,m,s,ms");
        let down = decompose_at(now, now + TimeDelta::milliseconds(span_ms), &units, Direction::Down);
        let up = decompose_at(now, now - TimeDelta::milliseconds(span_ms), &units, Direction::Up);
        prop_assert_eq!(down, up);
    }

    #[test]
    fn next_occurrence_is_after_now_within_one_period(base in instant(), period in prop_oneof![
        Just(Recurrence::Daily),
        Just(Recurrence::Weekly),
        Just(Recurrence::Monthly),
        Just(Recurrence::Yearly),
    ]) {
        let now = anchor();
        let next = next_occurrence_at(now, base, period);
        prop_assert!(next > now);
        if base <= now {
            let bound = match period {
                Recurrence::Daily => TimeDelta::days(1),
                Recurrence::Weekly => TimeDelta::weeks(1),
                Recurrence::Monthly => TimeDelta::days(31),
                _ => TimeDelta::days(366),
            };
            prop_assert!(next - now <= bound);
        } else {
            prop_assert_eq!(next, base);
        }
    }

    #[test]
    fn progress_is_bounded_and_monotonic(
        start_ms in 0i64..1_000_000,
        len_ms in 1i64..1_000_000,
        a in -2_000_000i64..2_000_000,
        b in -2_000_000i64..2_000_000,
    ) {
        let start = anchor() + TimeDelta::milliseconds(start_ms);
        let end = start + TimeDelta::milliseconds(len_ms);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let p_lo = progress_at(anchor() + TimeDelta::milliseconds(lo), start, end);
        let p_hi = progress_at(anchor() + TimeDelta::milliseconds(hi), start, end);
        prop_assert!((0.0..=100.0).contains(&p_lo));
        prop_assert!((0.0..=100.0).contains(&p_hi));
        prop_assert!(p_lo <= p_hi);
    }
}
