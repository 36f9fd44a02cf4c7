//! Percent-complete between a start and an end instant.

use chrono::{DateTime, TimeDelta, Utc};

/// Progress from `start` to `end` measured against the system clock.
pub fn progress(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    progress_at(Utc::now(), start, end)
}

/// Percent of the way from `start` to `end` that `now` has reached.
///
/// Returns 0 at or before `start`, 100 at or after `end`, and the unrounded
/// linear fraction in between.
pub fn progress_at(now: DateTime<Utc>, start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    if now <= start {
        return 0.0;
    }
    if now >= end {
        return 100.0;
    }
    // start < now < end, so both spans are positive.
    span_units(now - start) / span_units(end - start) * 100.0
}

/// Span length in nanoseconds. Spans beyond `i64` nanoseconds (about 292
/// years) are measured in milliseconds and scaled up.
fn span_units(span: TimeDelta) -> f64 {
    match span.num_nanoseconds() {
        Some(ns) => ns as f64,
        None => span.num_milliseconds() as f64 * 1e6,
    }
}
