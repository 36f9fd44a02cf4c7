//! # countdown-engine
//!
//! Calendar-accurate countdown and count-up computation.
//!
//! The engine splits the time between "now" and a target into the display
//! units a user picked (years down to milliseconds), walking real calendar
//! years and months instead of 365/30-day approximations. It also advances
//! recurring targets, computes progress between two instants, and turns
//! wall-clock times in IANA zones into UTC instants.
//!
//! Every function that depends on the current time has an `*_at` twin that
//! takes "now" explicitly, which is what the tests and the refresh loop use.
//!
//! ## Modules
//!
//! - [`units`]: Unit catalog and alias resolution (`"d,h,m,s"` → [`UnitSelection`])
//! - [`calendar`]: Month/year stepping with end-of-month clamping
//! - [`decompose`]: Span → per-unit counts with ceiling on the finest fixed unit
//! - [`recurrence`]: Next daily/weekly/monthly/yearly occurrence after now
//! - [`progress`]: Percent complete between a start and an end
//! - [`timezone`]: Wall clock + IANA zone → UTC, with DST disambiguation
//! - [`instant`]: Lenient ISO-8601 instant parsing
//! - [`config`]: Typed countdown configuration from key/value pairs
//! - [`calculator`]: Whole-unit totals between two dates
//! - [`format`]: Padded and compact text rendering
//! - [`ticker`]: Live countdown state machine and refresh loop
//! - [`error`]: Error types

pub mod calculator;
pub mod calendar;
pub mod config;
pub mod decompose;
pub mod error;
pub mod format;
pub mod instant;
pub mod progress;
pub mod recurrence;
pub mod ticker;
pub mod timezone;
pub mod units;

pub use calculator::{span_totals, SpanTotals};
pub use calendar::{add_months, add_years};
pub use config::{CountdownConfig, MultiConfig, MultiEntry, Params};
pub use decompose::{decompose, decompose_at, Decomposition, Direction};
pub use error::{CountdownError, Result};
pub use format::{format_clock, format_compact, format_zero, pad_value};
pub use instant::{format_rfc3339, parse_instant, try_parse_instant};
pub use progress::{progress, progress_at};
pub use recurrence::{next_occurrence, next_occurrence_at, Recurrence};
pub use ticker::{
    effective_end, CancellationToken, Clock, Countdown, CountdownId, RefreshLoop, SystemClock,
    Tick,
};
pub use timezone::{
    gmt_offset_label, local_to_utc, local_to_utc_with, parse_timezone, Disambiguation,
    COMMON_TIMEZONES,
};
pub use units::{resolve_units, Unit, UnitSelection};
