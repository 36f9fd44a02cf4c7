//! WASM bindings for countdown-engine.
//!
//! Instants cross the boundary as epoch milliseconds (`Date.now()` /
//! `date.getTime()`), decompositions as JSON strings.

use chrono::{DateTime, Utc};
use wasm_bindgen::prelude::*;

use countdown_engine::decompose::{decompose_at, Direction};
use countdown_engine::format::format_compact;
use countdown_engine::instant::parse_instant;
use countdown_engine::progress::progress_at;
use countdown_engine::recurrence::{next_occurrence_at, Recurrence};
use countdown_engine::timezone::{gmt_offset_label, local_to_utc_with, Disambiguation};
use countdown_engine::units::resolve_units;

fn from_epoch_ms(ms: f64) -> Option<DateTime<Utc>> {
    if !ms.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(ms.floor() as i64)
}

fn to_epoch_ms(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64
}

fn instant_arg(ms: f64, name: &str) -> Result<DateTime<Utc>, JsError> {
    from_epoch_ms(ms).ok_or_else(|| JsError::new(&format!("{name} is not a valid timestamp")))
}

/// Resolve a unit list to canonical comma-separated names.
#[wasm_bindgen(js_name = "resolveUnits")]
pub fn resolve_units_js(list: &str) -> String {
    resolve_units(list).to_string()
}

/// Parse a configuration date string. Returns `undefined` if invalid.
#[wasm_bindgen(js_name = "parseInstant")]
pub fn parse_instant_js(input: &str) -> Option<f64> {
    parse_instant(input).map(to_epoch_ms)
}

/// Decompose the span between `now_ms` and `target_ms` into a JSON object
/// of unit name → count.
#[wasm_bindgen(js_name = "decompose")]
pub fn decompose_js(target_ms: f64, units: &str, mode: &str, now_ms: f64) -> Result<String, JsError> {
    let target = instant_arg(target_ms, "target")?;
    let now = instant_arg(now_ms, "now")?;
    let values = decompose_at(now, target, &resolve_units(units), Direction::parse(mode));
    serde_json::to_string(&values).map_err(|e| JsError::new(&e.to_string()))
}

/// Compact caption (`1d 2h 3m 4s`) for the same inputs as [`decompose_js`].
#[wasm_bindgen(js_name = "formatCompact")]
pub fn format_compact_js(target_ms: f64, units: &str, mode: &str, now_ms: f64) -> Result<String, JsError> {
    let target = instant_arg(target_ms, "target")?;
    let now = instant_arg(now_ms, "now")?;
    Ok(format_compact(&decompose_at(
        now,
        target,
        &resolve_units(units),
        Direction::parse(mode),
    )))
}

/// Next occurrence of `base_ms` after `now_ms`. An unknown period returns the base.
#[wasm_bindgen(js_name = "nextOccurrence")]
pub fn next_occurrence_js(base_ms: f64, period: &str, now_ms: f64) -> Result<f64, JsError> {
    let base = instant_arg(base_ms, "base")?;
    let now = instant_arg(now_ms, "now")?;
    Ok(to_epoch_ms(next_occurrence_at(
        now,
        base,
        Recurrence::parse(Some(period)),
    )))
}

/// Percent complete from `start_ms` to `end_ms` at `now_ms`.
#[wasm_bindgen(js_name = "progress")]
pub fn progress_js(start_ms: f64, end_ms: f64, now_ms: f64) -> Result<f64, JsError> {
    Ok(progress_at(
        instant_arg(now_ms, "now")?,
        instant_arg(start_ms, "start")?,
        instant_arg(end_ms, "end")?,
    ))
}

/// Convert a wall-clock string in an IANA zone to epoch milliseconds.
///
/// `disambiguation` is `compatible` (default for unknown values), `earlier`
/// or `later`. Returns `undefined` if the wall clock is invalid.
#[wasm_bindgen(js_name = "localToUtc")]
pub fn local_to_utc_js(wall_clock: &str, timezone: &str, disambiguation: &str) -> Option<f64> {
    let policy = Disambiguation::parse(disambiguation).unwrap_or_default();
    local_to_utc_with(wall_clock, timezone, policy).map(to_epoch_ms)
}

/// `GMT±HH:MM` label for `timezone` at `at_ms`.
#[wasm_bindgen(js_name = "gmtOffsetLabel")]
pub fn gmt_offset_label_js(timezone: &str, at_ms: f64) -> Result<String, JsError> {
    Ok(gmt_offset_label(timezone, instant_arg(at_ms, "at")?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok<T>(result: Result<T, JsError>) -> T {
        match result {
            Ok(value) => value,
            Err(_) => panic!("binding returned an error"),
        }
    }

    // 2026-10-14T12:00:00Z
    const NOW_MS: f64 = 1_791_979_200_000.0;

    #[test]
    fn test_epoch_roundtrip_floors_fractions() {
        let instant = from_epoch_ms(NOW_MS + 0.75).unwrap();
        assert_eq!(to_epoch_ms(instant), NOW_MS);
        assert_eq!(from_epoch_ms(f64::NAN), None);
        assert_eq!(from_epoch_ms(f64::INFINITY), None);
    }

    #[test]
    fn test_resolve_units_js() {
        assert_eq!(resolve_units_js("ms,s"), "seconds,milliseconds");
        assert_eq!(resolve_units_js(""), "days,hours,minutes,seconds");
    }

    #[test]
    fn test_parse_instant_js() {
        assert_eq!(parse_instant_js("2026-10-14T12:00:00Z"), Some(NOW_MS));
        assert_eq!(parse_instant_js("garbage"), None);
    }

    #[test]
    fn test_decompose_js_json() {
        let target = NOW_MS + 90_061_000.0; // 1d 1h 1m 1s
        let json = ok(decompose_js(target, "d,h,m,s", "down", NOW_MS));
        assert_eq!(json, r#"{"days":1,"hours":1,"minutes":1,"seconds":1}"#);
        assert_eq!(
            ok(format_compact_js(target, "d,h,m,s", "down", NOW_MS)),
            "1d 1h 1m 1s"
        );
    }

    #[test]
    fn test_next_occurrence_js_daily() {
        let base = NOW_MS - 3_600_000.0;
        let next = ok(next_occurrence_js(base, "daily", NOW_MS));
        assert_eq!(next, base + 86_400_000.0);
        assert_eq!(ok(next_occurrence_js(base, "hourly", NOW_MS)), base);
    }

    #[test]
    fn test_progress_js() {
        let p = ok(progress_js(NOW_MS - 1_000.0, NOW_MS + 3_000.0, NOW_MS));
        assert!((p - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_local_to_utc_js() {
        // 2026-01-27T12:00 in New York is 17:00 UTC.
        let expected = parse_instant_js("2026-01-27T17:00:00Z");
        assert_eq!(
            local_to_utc_js("2026-01-27T12:00", "America/New_York", ""),
            expected
        );
        assert_eq!(local_to_utc_js("noon", "America/New_York", "later"), None);
    }

    #[test]
    fn test_gmt_offset_label_js() {
        assert_eq!(ok(gmt_offset_label_js("Asia/Kolkata", NOW_MS)), "GMT+05:30");
    }
}
