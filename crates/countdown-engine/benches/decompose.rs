use chrono::{TimeDelta, TimeZone, Utc};
use countdown_engine::decompose::{decompose_at, Direction};
use countdown_engine::recurrence::{next_occurrence_at, Recurrence};
use countdown_engine::units::resolve_units;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn bench_decompose(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
    let target = now + TimeDelta::days(3_650) + TimeDelta::milliseconds(12_345);

    let clock_units = resolve_units("d,h,m,s");
    c.bench_function("decompose_fixed_units", |b| {
        b.iter(|| {
            decompose_at(
                black_box(now),
                black_box(target),
                &clock_units,
                Direction::Down,
            )
        })
    });

    let calendar_units = resolve_units("y,mo,w,d,h,m,s,ms");
    c.bench_function("decompose_calendar_walk_ten_years", |b| {
        b.iter(|| {
            decompose_at(
                black_box(now),
                black_box(target),
                &calendar_units,
                Direction::Down,
            )
        })
    });
}

fn bench_next_occurrence(c: &mut Criterion) {
    let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
    let base = Utc.with_ymd_and_hms(1990, 1, 31, 9, 0, 0).unwrap();

    c.bench_function("next_occurrence_daily_jump", |b| {
        b.iter(|| next_occurrence_at(black_box(now), black_box(base), Recurrence::Daily))
    });
    c.bench_function("next_occurrence_monthly_steps", |b| {
        b.iter(|| next_occurrence_at(black_box(now), black_box(base), Recurrence::Monthly))
    });
}

criterion_group!(benches, bench_decompose, bench_next_occurrence);
criterion_main!(benches);
