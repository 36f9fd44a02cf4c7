//! Live countdown state and the timer loop that refreshes it.
//!
//! A [`Countdown`] is a wall-clock state machine: the caller hands it the
//! current instant through [`Countdown::tick`] and gets back the frame to
//! display plus how long to wait before asking again. [`RefreshLoop`] drives
//! any number of countdowns from one [`Clock`]. Each refresh is a single-shot
//! task that is queued again only after its frame has been delivered, so two
//! refreshes of the same countdown never overlap.
//!
//! Down-counter lifecycle:
//!
//! ```text
//! Running ──(now >= effective end)──> Reached ──500ms──> Ended
//!    ^                                   │
//!    └──────────1000ms─── Rescheduled <──┘ (recurring)
//! ```

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use serde::Serialize;

use crate::config::CountdownConfig;
use crate::decompose::{decompose_at, Decomposition, Direction};
use crate::format::format_zero;
use crate::progress::progress_at;
use crate::recurrence::next_occurrence_at;
use crate::units::{Unit, UnitSelection, MS_PER_SECOND};

/// Frame interval when milliseconds are on screen.
pub const FAST_FRAME_MS: i64 = 16;
/// Frame interval otherwise.
pub const FRAME_MS: i64 = 100;
/// How long the all-zero frame stays up before the end message or the next occurrence.
pub const REACHED_HOLD_MS: i64 = 500;
/// Delay before the first frame of a rescheduled occurrence.
pub const RESCHEDULE_DELAY_MS: i64 = 1_000;

// ── Cancellation ────────────────────────────────────────────────────────────

/// Shared stop flag for a countdown and every refresh scheduled for it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

// ── Clock ───────────────────────────────────────────────────────────────────

/// Source of "now" for the refresh loop.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// ── Countdown ───────────────────────────────────────────────────────────────

/// One frame produced by [`Countdown::tick`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "lowercase")]
pub enum Tick {
    /// Counting. `progress` is set when a progress window is configured.
    Running {
        values: Decomposition,
        progress: Option<f64>,
    },
    /// The effective end was crossed: every unit reads zero.
    Reached {
        values: Decomposition,
        caption: String,
    },
    /// A recurring countdown moved on to its next occurrence.
    Rescheduled { next: DateTime<Utc> },
    /// The countdown is over and nothing further is scheduled.
    Ended {
        message: String,
        progress: Option<f64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Counting,
    ShowingZero,
    Finished,
}

/// A single live countdown (or count-up).
#[derive(Debug, Clone)]
pub struct Countdown {
    config: CountdownConfig,
    target: DateTime<Utc>,
    effective_end: DateTime<Utc>,
    phase: Phase,
    token: CancellationToken,
}

impl Countdown {
    pub fn new(config: CountdownConfig) -> Self {
        Self::with_token(config, CancellationToken::new())
    }

    pub fn with_token(config: CountdownConfig, token: CancellationToken) -> Self {
        let target = config.target;
        Self {
            effective_end: effective_end(target, &config.units),
            target,
            config,
            phase: Phase::Counting,
            token,
        }
    }

    pub fn config(&self) -> &CountdownConfig {
        &self.config
    }

    /// The occurrence currently being counted toward.
    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// The instant at which a down-counter first shows all zeros.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.effective_end
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Advance the state machine to `now` and return the frame to show.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Tick {
        let units = &self.config.units;
        if self.config.direction == Direction::Up {
            return Tick::Running {
                values: decompose_at(now, self.target, units, Direction::Up),
                progress: None,
            };
        }

        match self.phase {
            Phase::Counting if now >= self.effective_end => {
                self.phase = Phase::ShowingZero;
                tracing::info!(target_at = %self.target, "countdown reached");
                Tick::Reached {
                    values: Decomposition::zeroed(units),
                    caption: format_zero(units),
                }
            }
            Phase::Counting => Tick::Running {
                values: decompose_at(now, self.target, units, Direction::Down),
                progress: self.progress(now),
            },
            Phase::ShowingZero if self.config.recurrence.is_recurring() => {
                // Strictly after the occurrence just shown, even when the zero
                // frame started before a fractional-second target.
                let next =
                    next_occurrence_at(now.max(self.target), self.target, self.config.recurrence);
                tracing::info!(
                    previous = %self.target,
                    %next,
                    recurrence = self.config.recurrence.name(),
                    "countdown rescheduled"
                );
                self.target = next;
                self.effective_end = effective_end(next, units);
                self.phase = Phase::Counting;
                Tick::Rescheduled { next }
            }
            Phase::ShowingZero | Phase::Finished => {
                if self.phase == Phase::ShowingZero {
                    tracing::info!(target_at = %self.target, "countdown ended");
                }
                self.phase = Phase::Finished;
                Tick::Ended {
                    message: self.config.end_message.clone(),
                    progress: self.config.progress_window().map(|_| 100.0),
                }
            }
        }
    }

    /// How long to wait after `tick` before refreshing again; `None` once ended.
    pub fn delay_after(&self, tick: &Tick) -> Option<TimeDelta> {
        let ms = match tick {
            Tick::Running { .. } if self.config.units.contains(Unit::Milliseconds) => {
                FAST_FRAME_MS
            }
            Tick::Running { .. } => FRAME_MS,
            Tick::Reached { .. } => REACHED_HOLD_MS,
            Tick::Rescheduled { .. } => RESCHEDULE_DELAY_MS,
            Tick::Ended { .. } => return None,
        };
        Some(TimeDelta::milliseconds(ms))
    }

    fn progress(&self, now: DateTime<Utc>) -> Option<f64> {
        self.config
            .progress_window()
            .map(|(start, _)| progress_at(now, start, self.target))
    }
}

/// `target` truncated to the finest selected fixed unit, at most one second.
///
/// Selections without any fixed unit truncate to the second.
pub fn effective_end(target: DateTime<Utc>, units: &UnitSelection) -> DateTime<Utc> {
    let granularity = units
        .iter()
        .filter_map(Unit::fixed_ms)
        .last()
        .map_or(MS_PER_SECOND, |ms| ms.min(MS_PER_SECOND));
    target
        .duration_trunc(TimeDelta::milliseconds(granularity))
        .unwrap_or(target)
}

// ── Refresh loop ────────────────────────────────────────────────────────────

/// Identifier of a countdown registered with a [`RefreshLoop`].
pub type CountdownId = usize;

/// Single-shot timer queue driving registered countdowns.
///
/// Countdowns stay registered after they end or are cancelled so their final
/// state can be read back; [`RefreshLoop::remove`] releases one.
pub struct RefreshLoop<C: Clock> {
    clock: C,
    // Indexed by id; `None` once removed.
    countdowns: Vec<Option<Countdown>>,
    // (due, sequence, id); the sequence keeps equal due times FIFO.
    queue: BinaryHeap<Reverse<(DateTime<Utc>, u64, CountdownId)>>,
    sequence: u64,
}

impl<C: Clock> RefreshLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            countdowns: Vec::new(),
            queue: BinaryHeap::new(),
            sequence: 0,
        }
    }

    /// Register a countdown and schedule its first refresh immediately.
    pub fn spawn(&mut self, countdown: Countdown) -> CountdownId {
        let id = self.countdowns.len();
        let now = self.clock.now();
        tracing::debug!(
            id,
            target_at = %countdown.target(),
            units = %countdown.config().units,
            "countdown spawned"
        );
        self.countdowns.push(Some(countdown));
        self.schedule(now, id);
        id
    }

    pub fn countdown(&self, id: CountdownId) -> Option<&Countdown> {
        self.countdowns.get(id).and_then(Option::as_ref)
    }

    /// Unregister a countdown. Refreshes still queued for it are discarded
    /// when they come due; the id is never reused.
    pub fn remove(&mut self, id: CountdownId) -> Option<Countdown> {
        let removed = self.countdowns.get_mut(id).and_then(Option::take);
        if removed.is_some() {
            tracing::debug!(id, "countdown removed");
        }
        removed
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Whether no refresh is pending.
    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Run refreshes until the queue drains.
    ///
    /// `sink` receives every frame. `sleep` is called with the wait until
    /// the next refresh falls due and must let the clock advance.
    pub fn run<S, W>(&mut self, mut sink: S, mut sleep: W)
    where
        S: FnMut(CountdownId, &Tick),
        W: FnMut(Duration),
    {
        while let Some(&Reverse((due, _, id))) = self.queue.peek() {
            let now = self.clock.now();
            if due > now {
                sleep((due - now).to_std().unwrap_or_default());
                continue;
            }
            self.queue.pop();
            self.refresh(id, now, &mut sink);
        }
        tracing::debug!("refresh loop idle");
    }

    fn refresh<S>(&mut self, id: CountdownId, now: DateTime<Utc>, sink: &mut S)
    where
        S: FnMut(CountdownId, &Tick),
    {
        let Some(countdown) = self.countdowns.get_mut(id).and_then(Option::as_mut) else {
            return;
        };
        if countdown.token().is_cancelled() {
            tracing::debug!(id, "dropping refresh for cancelled countdown");
            return;
        }

        let tick = countdown.tick(now);
        tracing::trace!(id, ?tick, "tick");
        sink(id, &tick);

        if let Some(delay) = countdown.delay_after(&tick) {
            let due = now.checked_add_signed(delay).unwrap_or(DateTime::<Utc>::MAX_UTC);
            self.schedule(due, id);
        }
    }

    fn schedule(&mut self, due: DateTime<Utc>, id: CountdownId) {
        self.sequence += 1;
        self.queue.push(Reverse((due, self.sequence, id)));
    }
}
