//! Anxiety-free loading simulation.
//!
//! ```text
//! Idle(progress = 0) ──Start──▶ Running ──progress hits 100──▶ Complete ──Reset──▶ Idle
//! ```
//!
//! While `Running`, an interval in the machine's timer scope delivers `Tick`
//! and each tick adds `step` to `progress`. Reaching 100 cancels the interval.

use std::time::Duration;

use statig::prelude::*;
use tracing::{debug, info};

use crate::timers::TimerScope;

pub const MAX_PROGRESS: u8 = 100;

/// Captions for stages 1 through 4.
pub const STAGE_CAPTIONS: [&str; 4] = [
    "Looking at your drawing...",
    "Preparing the magic...",
    "Waking up your friend...",
    "Almost ready!",
];

pub const COMFORT_LINE: &str = "I'm getting ready, just a few seconds left!";

/// Stage shown for a given progress value.
///
/// Exactly 30, 60 and 90 still belong to the lower stage.
pub fn stage_label(progress: u8) -> u8 {
    match progress {
        0..=30 => 1,
        31..=60 => 2,
        61..=90 => 3,
        _ => 4,
    }
}

pub fn stage_caption(progress: u8) -> &'static str {
    STAGE_CAPTIONS[usize::from(stage_label(progress) - 1)]
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum LoadingEvent {
    Start,
    Tick,
    Reset,
}

// ---------------------------------------------------------------------------
// Shared storage
// ---------------------------------------------------------------------------

pub struct LoadingMachine {
    timers: TimerScope<LoadingEvent>,
    tick: Duration,
    step: u8,
    progress: u8,
}

impl LoadingMachine {
    pub fn new(timers: TimerScope<LoadingEvent>, tick: Duration, step: u8) -> Self {
        Self {
            timers,
            tick,
            step: step.max(1),
            progress: 0,
        }
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Number of live interval timers (0 or 1).
    pub fn live_timers(&self) -> usize {
        self.timers.pending()
    }
}

// ---------------------------------------------------------------------------
// State machine implementation
// ---------------------------------------------------------------------------

#[state_machine(
    initial = "State::idle()",
    state(derive(Debug, Clone, PartialEq))
)]
impl LoadingMachine {
    /// Waiting for the user to start the simulation.
    #[state]
    fn idle(&mut self, event: &LoadingEvent) -> Outcome<State> {
        match event {
            LoadingEvent::Start => {
                info!(target: "interaction", "loading simulation started");
                self.progress = 0;
                self.timers.every(self.tick, LoadingEvent::Tick);
                Transition(State::running())
            }
            _ => Handled,
        }
    }

    /// Interval running; `Start` is a no-op here, `Reset` stops the interval.
    #[state]
    fn running(&mut self, event: &LoadingEvent) -> Outcome<State> {
        match event {
            LoadingEvent::Tick => {
                self.progress = self.progress.saturating_add(self.step).min(MAX_PROGRESS);
                if self.progress >= MAX_PROGRESS {
                    self.timers.cancel_all();
                    info!(target: "interaction", "loading simulation complete");
                    Transition(State::complete())
                } else {
                    Handled
                }
            }
            LoadingEvent::Start => {
                debug!(target: "interaction", "start ignored while running");
                Handled
            }
            LoadingEvent::Reset => {
                self.timers.cancel_all();
                self.progress = 0;
                info!(target: "interaction", "loading simulation reset mid-run");
                Transition(State::idle())
            }
        }
    }

    /// Progress pinned at 100 until reset.
    #[state]
    fn complete(&mut self, event: &LoadingEvent) -> Outcome<State> {
        match event {
            LoadingEvent::Reset => {
                self.progress = 0;
                Transition(State::idle())
            }
            _ => Handled,
        }
    }
}
