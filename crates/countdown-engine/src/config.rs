//! Typed countdown configuration built from raw key/value pairs.
//!
//! A countdown is configured entirely by string pairs (`date`, `units`,
//! `mode`, ...), originally decoded from a URL fragment by the host. This
//! module validates them once so the refresh loop works with typed values.
//! Only the target date is required; every other field falls back to a
//! default when missing or malformed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::decompose::Direction;
use crate::error::{CountdownError, Result};
use crate::instant::{parse_instant, try_parse_instant};
use crate::recurrence::{next_occurrence_at, Recurrence};
use crate::units::{resolve_units, UnitSelection};

pub const MAX_TITLE_LEN: usize = 50;
pub const MAX_SUBTITLE_LEN: usize = 200;
pub const MAX_END_MESSAGE_LEN: usize = 100;

/// End message for a finished countdown when none is configured.
pub const DEFAULT_END_MESSAGE: &str = "Event Started!";
/// End message shown for count-up configurations when none is configured.
pub const DEFAULT_UP_END_MESSAGE: &str = "Started!";

/// How many `dateN` entries a multi-countdown reads.
pub const MAX_MULTI_ENTRIES: usize = 5;

/// Raw configuration pairs. Later duplicates overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Params(HashMap<String, String>);

impl Params {
    pub fn new<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// The value for `key`, treating an empty value as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// Whether `key` is set to `"1"`.
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("1")
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params::new(iter)
    }
}

// ── Single countdown ────────────────────────────────────────────────────────

/// A validated single-countdown configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountdownConfig {
    /// The instant being counted toward (down) or from (up). For recurring
    /// down-counters this is already advanced to the next occurrence.
    pub target: DateTime<Utc>,
    pub units: UnitSelection,
    pub direction: Direction,
    pub recurrence: Recurrence,
    /// Start of the progress interval, if configured.
    pub start: Option<DateTime<Utc>>,
    pub title: String,
    pub subtitle: String,
    pub end_message: String,
    pub show_progress: bool,
    pub show_percent: bool,
    /// Presentation hints passed through for the host: `sound` and
    /// `celebrate` verbatim, `notify` and `showtz` as `"1"` flags.
    pub sound: Option<String>,
    pub celebrate: Option<String>,
    pub notify: bool,
    pub show_timezone: bool,
}

impl CountdownConfig {
    /// Build a configuration, advancing recurring targets against the system clock.
    pub fn from_params(params: &Params) -> Result<Self> {
        Self::from_params_at(Utc::now(), params)
    }

    /// Build a configuration, advancing recurring targets past `now`.
    ///
    /// # Errors
    ///
    /// [`CountdownError::MissingField`] when `date` is absent or empty,
    /// [`CountdownError::InvalidDatetime`] when it cannot be parsed.
    pub fn from_params_at(now: DateTime<Utc>, params: &Params) -> Result<Self> {
        let raw_date = params.get("date").ok_or(CountdownError::MissingField("date"))?;
        let mut target = try_parse_instant(raw_date)?;

        let direction = Direction::parse(params.get("mode").unwrap_or_default());
        let recurrence = Recurrence::parse(params.get("recur"));
        if recurrence.is_recurring() && direction == Direction::Down {
            target = next_occurrence_at(now, target, recurrence);
        }

        let start = params.get("start").and_then(|raw| {
            let parsed = parse_instant(raw);
            if parsed.is_none() {
                tracing::debug!(start = raw, "ignoring unparseable start date");
            }
            parsed
        });

        let end_message = params
            .get("end")
            .map(|end| truncate(end, MAX_END_MESSAGE_LEN))
            .unwrap_or_else(|| default_end_message(direction).to_string());

        Ok(Self {
            target,
            units: params.get("units").map(resolve_units).unwrap_or_default(),
            direction,
            recurrence,
            start,
            title: truncate(params.get("title").unwrap_or_default(), MAX_TITLE_LEN),
            subtitle: truncate(params.get("subtitle").unwrap_or_default(), MAX_SUBTITLE_LEN),
            end_message,
            show_progress: params.flag("progress"),
            show_percent: params.flag("percent"),
            sound: params.get("sound").map(str::to_string),
            celebrate: params.get("celebrate").map(str::to_string),
            notify: params.flag("notify"),
            show_timezone: params.flag("showtz"),
        })
    }

    /// The progress interval, present only for down-counters with a start.
    pub fn progress_window(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.direction, self.start) {
            (Direction::Down, Some(start)) if self.show_progress || self.show_percent => {
                Some((start, self.target))
            }
            _ => None,
        }
    }
}

// ── Multiple countdowns ─────────────────────────────────────────────────────

/// One entry of a multi-countdown page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiEntry {
    /// `None` when the `dateN` value could not be parsed.
    pub target: Option<DateTime<Utc>>,
    pub title: String,
    pub end_message: String,
}

/// Up to [`MAX_MULTI_ENTRIES`] down-counters sharing one unit selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiConfig {
    pub units: UnitSelection,
    pub entries: Vec<MultiEntry>,
}

impl MultiConfig {
    /// Read `date1..date5` with their `titleN` / `endN` companions.
    ///
    /// Entry titles and end messages are kept as given; only the
    /// single-countdown fields have length limits.
    pub fn from_params(params: &Params) -> Self {
        let entries = (1..=MAX_MULTI_ENTRIES)
            .filter_map(|i| {
                let raw = params.get(&format!("date{i}"))?;
                Some(MultiEntry {
                    target: parse_instant(raw),
                    title: params
                        .get(&format!("title{i}"))
                        .unwrap_or_default()
                        .to_string(),
                    end_message: params
                        .get(&format!("end{i}"))
                        .unwrap_or(DEFAULT_END_MESSAGE)
                        .to_string(),
                })
            })
            .collect();

        Self {
            units: params.get("units").map(resolve_units).unwrap_or_default(),
            entries,
        }
    }

    /// One single-countdown configuration per entry with a valid date.
    pub fn countdowns(&self) -> Vec<CountdownConfig> {
        self.entries
            .iter()
            .filter_map(|entry| {
                Some(CountdownConfig {
                    target: entry.target?,
                    units: self.units.clone(),
                    direction: Direction::Down,
                    recurrence: Recurrence::None,
                    start: None,
                    title: entry.title.clone(),
                    subtitle: String::new(),
                    end_message: entry.end_message.clone(),
                    show_progress: false,
                    show_percent: false,
                    sound: None,
                    celebrate: None,
                    notify: false,
                    show_timezone: false,
                })
            })
            .collect()
    }
}

fn default_end_message(direction: Direction) -> &'static str {
    match direction {
        Direction::Down => DEFAULT_END_MESSAGE,
        Direction::Up => DEFAULT_UP_END_MESSAGE,
    }
}

/// Keep at most `max` characters.
fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
