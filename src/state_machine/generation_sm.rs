//! Character-generation state machine.
//!
//! ```text
//! Loading ──Completed──▶ Ready { character }
//!    │
//!    └──Failed──▶ Failed { message } ──Retry──▶ Loading
//! ```
//!
//! The backend request is issued by `request_character()` before the machine
//! is first driven and again on every retry. The request lives in the
//! machine's timer scope, so dropping the machine cancels it.

use statig::prelude::*;
use tracing::{debug, info, warn};

use crate::backend::{GeneratedCharacter, MockBackend};
use crate::demo::drawing::Snapshot;
use crate::timers::TimerScope;

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum GenerationEvent {
    /// The simulated backend produced a character.
    Completed(GeneratedCharacter),
    /// The simulated backend reported failure.
    Failed(String),
    /// User asked to try again after a failure.
    Retry,
}

// ---------------------------------------------------------------------------
// Shared storage
// ---------------------------------------------------------------------------

pub struct GenerationMachine {
    timers: TimerScope<GenerationEvent>,
    backend: MockBackend,
    snapshot: Snapshot,
}

impl GenerationMachine {
    pub fn new(timers: TimerScope<GenerationEvent>, backend: MockBackend, snapshot: Snapshot) -> Self {
        Self {
            timers,
            backend,
            snapshot,
        }
    }

    /// Issue the generation call for the stored snapshot.
    pub fn request_character(&mut self) {
        let backend = self.backend.clone();
        let snapshot = self.snapshot.clone();
        self.timers.resolve(async move {
            match backend.generate_character(snapshot).await {
                Ok(character) => GenerationEvent::Completed(character),
                Err(e) => GenerationEvent::Failed(e.to_string()),
            }
        });
    }
}

// ---------------------------------------------------------------------------
// State machine implementation
// ---------------------------------------------------------------------------

#[state_machine(
    initial = "State::loading()",
    state(derive(Debug, Clone, PartialEq))
)]
impl GenerationMachine {
    /// Waiting on the backend.
    #[state]
    fn loading(&mut self, event: &GenerationEvent) -> Outcome<State> {
        match event {
            GenerationEvent::Completed(character) => {
                info!(target: "generation", descriptor = %character.descriptor, "character ready");
                Transition(State::ready(character.clone()))
            }
            GenerationEvent::Failed(message) => {
                warn!(target: "generation", %message, "generation failed");
                Transition(State::failed(message.clone()))
            }
            GenerationEvent::Retry => Handled,
        }
    }

    /// The character is on screen and the user may proceed. Late backend
    /// results and retries leave it in place.
    #[state]
    fn ready(&mut self, event: &GenerationEvent, character: &GeneratedCharacter) -> Outcome<State> {
        match event {
            GenerationEvent::Retry => {
                debug!(target: "generation", descriptor = %character.descriptor, "retry ignored, character ready");
                Handled
            }
            GenerationEvent::Completed(_) | GenerationEvent::Failed(_) => Handled,
        }
    }

    /// Generation failed; `message` is shown inline.
    #[state]
    fn failed(&mut self, event: &GenerationEvent, message: &String) -> Outcome<State> {
        match event {
            GenerationEvent::Retry => {
                info!(target: "generation", previous = %message, "retrying generation");
                self.request_character();
                Transition(State::loading())
            }
            _ => Handled,
        }
    }
}
