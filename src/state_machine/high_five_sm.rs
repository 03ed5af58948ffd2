//! High-five state machine.
//!
//! Hierarchy:
//! ```text
//! Interacting (superstate: Trigger restarts the round from any child)
//!     ├── Idle
//!     ├── Waiting            ["Wait for it..."]
//!     └── Shown { text }     [auto-dismissed after high_five_display_ms]
//! ```
//!
//! Re-triggering while a round is in flight cancels that round's pending
//! response and dismissal before starting a new one, so rounds never overlap.

use std::time::Duration;

use statig::prelude::*;
use tracing::{debug, info};

use crate::backend::MockBackend;
use crate::timers::TimerScope;

/// Feedback shown while the backend call is in flight.
pub const WAITING_TEXT: &str = "Wait for it...";

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum HighFiveEvent {
    /// User pressed the high-five button.
    Trigger,
    /// The backend answered.
    Responded(String),
    /// The display timer elapsed.
    Dismiss,
}

// ---------------------------------------------------------------------------
// Shared storage
// ---------------------------------------------------------------------------

pub struct HighFiveMachine {
    timers: TimerScope<HighFiveEvent>,
    backend: MockBackend,
    display: Duration,
}

impl HighFiveMachine {
    pub fn new(timers: TimerScope<HighFiveEvent>, backend: MockBackend, display: Duration) -> Self {
        Self {
            timers,
            backend,
            display,
        }
    }

    /// Text for the speech bubble, if any.
    pub fn feedback(state: &State) -> Option<&str> {
        match state {
            State::Idle {} => None,
            State::Waiting {} => Some(WAITING_TEXT),
            State::Shown { text } => Some(text.as_str()),
        }
    }

    fn start_round(&mut self) {
        self.timers.cancel_all();
        let backend = self.backend.clone();
        self.timers
            .resolve(async move { HighFiveEvent::Responded(backend.send_high_five().await) });
    }
}

// ---------------------------------------------------------------------------
// State machine implementation
// ---------------------------------------------------------------------------

#[state_machine(
    initial = "State::idle()",
    state(derive(Debug, Clone, PartialEq))
)]
impl HighFiveMachine {
    #[superstate]
    fn interacting(&mut self, event: &HighFiveEvent) -> Outcome<State> {
        match event {
            HighFiveEvent::Trigger => {
                info!(target: "interaction", "high five");
                self.start_round();
                Transition(State::waiting())
            }
            _ => Handled,
        }
    }

    /// Nothing on screen.
    #[state(superstate = "interacting")]
    fn idle(&mut self, event: &HighFiveEvent) -> Outcome<State> {
        match event {
            HighFiveEvent::Dismiss => {
                debug!(target: "interaction", "stale dismissal ignored");
                Handled
            }
            _ => Super,
        }
    }

    /// Backend call in flight.
    #[state(superstate = "interacting")]
    fn waiting(&mut self, event: &HighFiveEvent) -> Outcome<State> {
        match event {
            HighFiveEvent::Responded(text) => {
                self.timers.after(self.display, HighFiveEvent::Dismiss);
                Transition(State::shown(text.clone()))
            }
            _ => Super,
        }
    }

    /// Response visible until the display timer fires.
    #[state(superstate = "interacting")]
    fn shown(&mut self, event: &HighFiveEvent, text: &String) -> Outcome<State> {
        match event {
            HighFiveEvent::Dismiss => {
                debug!(target: "interaction", %text, "high five dismissed");
                Transition(State::idle())
            }
            _ => Super,
        }
    }
}
