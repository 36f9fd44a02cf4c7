use std::collections::HashMap;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use countdown_engine::calculator::span_totals;
use countdown_engine::config::{CountdownConfig, MultiConfig, Params};
use countdown_engine::decompose::{decompose_at, Direction};
use countdown_engine::format::{format_clock, format_compact};
use countdown_engine::instant::{format_rfc3339, try_parse_instant};
use countdown_engine::progress::progress_at;
use countdown_engine::recurrence::{next_occurrence_at, Recurrence};
use countdown_engine::ticker::{CancellationToken, Countdown, RefreshLoop, SystemClock, Tick};
use countdown_engine::timezone::{
    gmt_offset_label, parse_timezone, parse_wall_clock, resolve_wall_clock, Disambiguation,
    COMMON_TIMEZONES,
};
use countdown_engine::units::resolve_units;

#[derive(Parser)]
#[command(
    name = "countdown",
    version,
    about = "Calendar-accurate countdowns, recurrence, and timezone conversion"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a comma-separated unit list (e.g. "d,h,m,s")
    Units {
        list: String,
        /// Print the selection as a JSON array
        #[arg(long)]
        json: bool,
    },
    /// Split the time until (or since) a date into units
    Decompose {
        date: String,
        #[arg(long, default_value = "d,h,m,s")]
        units: String,
        /// "up" counts from the date; anything else counts down to it
        #[arg(long, default_value = "down")]
        mode: String,
        /// Instant to measure from instead of the system clock
        #[arg(long)]
        now: Option<String>,
        #[arg(long)]
        json: bool,
        /// Compact caption such as "1d 2h 3m 4s"
        #[arg(long, conflicts_with = "json")]
        compact: bool,
    },
    /// Next occurrence of a recurring date after now
    Next {
        date: String,
        /// daily, weekly, monthly or yearly
        period: String,
        #[arg(long)]
        now: Option<String>,
    },
    /// Percent complete between two dates
    Progress {
        start: String,
        end: String,
        #[arg(long)]
        now: Option<String>,
    },
    /// Convert a wall-clock time in an IANA timezone to UTC
    ToUtc {
        wall_clock: String,
        timezone: String,
        /// compatible, earlier or later
        #[arg(long, default_value = "compatible")]
        disambiguation: String,
    },
    /// List common timezones with their current GMT offsets
    Zones {
        /// Instant at which to evaluate offsets
        #[arg(long)]
        at: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Totals between two dates in years, months, weeks, days, hours, minutes
    Span {
        start: String,
        end: String,
        #[arg(long)]
        json: bool,
    },
    /// Run live countdowns configured by key=value pairs
    Watch {
        /// e.g. date=2026-12-31 units=d,h,m,s title=Launch (or date1=..., date2=...)
        #[arg(required = true)]
        params: Vec<String>,
        /// Stop after this many frames
        #[arg(long)]
        ticks: Option<usize>,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Units { list, json } => {
            let units = resolve_units(&list);
            if json {
                println!("{}", serde_json::to_string(&units)?);
            } else {
                println!("{units}");
            }
        }

        Command::Decompose {
            date,
            units,
            mode,
            now,
            json,
            compact,
        } => {
            let target = parse_date(&date, "date")?;
            let now = resolve_now(now.as_deref())?;
            let values = decompose_at(now, target, &resolve_units(&units), Direction::parse(&mode));
            if json {
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else if compact {
                println!("{}", format_compact(&values));
            } else {
                println!("{}", format_clock(&values));
            }
        }

        Command::Next { date, period, now } => {
            let base = parse_date(&date, "date")?;
            let now = resolve_now(now.as_deref())?;
            let recurrence = Recurrence::parse(Some(&period));
            if !recurrence.is_recurring() {
                bail!("unknown recurrence '{period}': expected daily, weekly, monthly or yearly");
            }
            println!(
                "{}",
                format_rfc3339(&next_occurrence_at(now, base, recurrence))
            );
        }

        Command::Progress { start, end, now } => {
            let start = parse_date(&start, "start date")?;
            let end = parse_date(&end, "end date")?;
            let now = resolve_now(now.as_deref())?;
            println!("{:.1}%", progress_at(now, start, end));
        }

        Command::ToUtc {
            wall_clock,
            timezone,
            disambiguation,
        } => {
            let tz = parse_timezone(&timezone)?;
            let naive = parse_wall_clock(&wall_clock).with_context(|| {
                format!("invalid wall clock '{wall_clock}': expected YYYY-MM-DDTHH:MM[:SS]")
            })?;
            let policy = Disambiguation::parse(&disambiguation).with_context(|| {
                format!("invalid disambiguation '{disambiguation}': expected compatible, earlier or later")
            })?;
            println!("{}", format_rfc3339(&resolve_wall_clock(&tz, naive, policy)));
        }

        Command::Zones { at, json } => {
            let at = resolve_now(at.as_deref())?;
            if json {
                let zones: Vec<_> = COMMON_TIMEZONES
                    .iter()
                    .map(|(zone, name)| {
                        serde_json::json!({
                            "zone": zone,
                            "name": name,
                            "offset": gmt_offset_label(zone, at),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&zones)?);
            } else {
                for (zone, name) in COMMON_TIMEZONES {
                    println!("{:<32} {}  {}", zone, gmt_offset_label(zone, at), name);
                }
            }
        }

        Command::Span { start, end, json } => {
            let start = parse_date(&start, "start date")?;
            let end = parse_date(&end, "end date")?;
            let totals = span_totals(start, end);
            if json {
                println!("{}", serde_json::to_string_pretty(&totals)?);
            } else {
                println!("{}", totals.human_readable);
                println!("Years:   {}", totals.years);
                println!("Months:  {}", totals.months);
                println!("Weeks:   {}", totals.weeks);
                println!("Days:    {}", totals.days);
                println!("Hours:   {}", totals.hours);
                println!("Minutes: {}", totals.minutes);
            }
        }

        Command::Watch { params, ticks } => watch(&params, ticks)?,
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn parse_date(input: &str, what: &str) -> Result<DateTime<Utc>> {
    try_parse_instant(input).with_context(|| format!("invalid {what}"))
}

fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>> {
    match now {
        Some(now) => parse_date(now, "--now"),
        None => Ok(Utc::now()),
    }
}

fn parse_pairs(raw: &[String]) -> Result<Params> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .with_context(|| format!("expected key=value, got '{pair}'"))
        })
        .collect::<Result<Vec<_>>>()
        .map(Params::new)
}

/// Drive the refresh loop on the system clock, printing each frame whose
/// text differs from the previous one.
fn watch(raw: &[String], max_ticks: Option<usize>) -> Result<()> {
    let params = parse_pairs(raw)?;

    let configs = if params.get("date").is_some() {
        vec![CountdownConfig::from_params(&params).context("invalid countdown configuration")?]
    } else {
        let multi = MultiConfig::from_params(&params);
        if multi.entries.is_empty() {
            bail!("no countdown configured: pass date=... or date1=...date5=...");
        }
        for (i, entry) in multi.entries.iter().enumerate() {
            if entry.target.is_none() {
                tracing::warn!(entry = i + 1, "skipping countdown with an invalid date");
            }
        }
        multi.countdowns()
    };

    let prefixed = configs.len() > 1;
    let mut refresh = RefreshLoop::new(SystemClock);
    let mut tokens: Vec<CancellationToken> = Vec::new();
    let mut titles = HashMap::new();
    for config in configs {
        let title = config.title.clone();
        let countdown = Countdown::new(config);
        tokens.push(countdown.token().clone());
        titles.insert(refresh.spawn(countdown), title);
    }

    let mut frames = 0usize;
    let mut last_line: HashMap<usize, String> = HashMap::new();
    refresh.run(
        |id, tick| {
            let text = render_tick(tick);
            let title = titles.get(&id).map(String::as_str).unwrap_or_default();
            let line = if prefixed {
                format!("[{}] {}", id + 1, with_title(title, &text))
            } else {
                with_title(title, &text)
            };
            if last_line.get(&id) != Some(&line) {
                println!("{line}");
                last_line.insert(id, line);
            }

            frames += 1;
            if max_ticks.is_some_and(|max| frames >= max) {
                tokens.iter().for_each(CancellationToken::cancel);
            }
        },
        std::thread::sleep,
    );
    Ok(())
}

fn with_title(title: &str, text: &str) -> String {
    if title.is_empty() {
        text.to_string()
    } else {
        format!("{title}: {text}")
    }
}

fn render_tick(tick: &Tick) -> String {
    match tick {
        Tick::Running { values, progress } => match progress {
            Some(p) => format!("{} ({p:.1}% complete)", format_clock(values)),
            None => format_clock(values),
        },
        Tick::Reached { caption, .. } => caption.clone(),
        Tick::Rescheduled { next } => format!("Next: {}", format_rfc3339(next)),
        Tick::Ended { message, progress } => match progress {
            Some(_) => format!("{message} (100% complete)"),
            None => message.clone(),
        },
    }
}
