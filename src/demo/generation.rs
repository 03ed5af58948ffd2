//! Simulated 3D preview for step 2.

use statig::prelude::*;
use tokio::runtime::Handle;

use crate::backend::{GeneratedCharacter, MockBackend};
use crate::demo::drawing::Snapshot;
use crate::state_machine::generation_sm::{GenerationEvent, GenerationMachine, State};
use crate::timers::{TimerEvents, TimerScope};

pub const LOADING_TITLE: &str = "Making Magic Happen...";
pub const LOADING_SUBTITLE: &str = "Transforming your 2D sketch into a 3D friend.";
pub const READY_LINE: &str =
    "\"Hi! I'm your new friend. I look just like your drawing, but now I can move and talk with you!\"";
pub const AR_BADGE: &str = "AR Ready";

/// What the panel shows right now.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationView<'a> {
    Loading,
    Ready(&'a GeneratedCharacter),
    Failed(&'a str),
}

pub struct GenerationPanel {
    machine: StateMachine<GenerationMachine>,
    events: TimerEvents<GenerationEvent>,
}

impl GenerationPanel {
    /// Mount the panel and start generating from `snapshot`.
    pub fn new(runtime: Handle, backend: MockBackend, snapshot: Snapshot) -> Self {
        let (timers, events) = TimerScope::new(runtime);
        let mut storage = GenerationMachine::new(timers, backend, snapshot);
        storage.request_character();
        Self {
            machine: storage.state_machine(),
            events,
        }
    }

    pub fn view(&self) -> GenerationView<'_> {
        match self.machine.state() {
            State::Loading {} => GenerationView::Loading,
            State::Ready { character } => GenerationView::Ready(character),
            State::Failed { message } => GenerationView::Failed(message.as_str()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.machine.state(), State::Ready { .. })
    }

    /// Restart generation after a failure; ignored otherwise.
    pub fn retry(&mut self) {
        self.machine.handle(&GenerationEvent::Retry);
    }

    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.events.try_next() {
            self.machine.handle(&event);
            applied += 1;
        }
        applied
    }

    pub async fn process_next(&mut self) -> bool {
        match self.events.next().await {
            Some(event) => {
                self.machine.handle(&event);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CanvasConfig, TimingConfig};
    use std::time::Duration;

    fn snapshot() -> Snapshot {
        Snapshot::blank(&CanvasConfig::default()).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn becomes_ready_after_generation_delay() {
        let backend = MockBackend::new(&TimingConfig::default());
        let mut panel = GenerationPanel::new(Handle::current(), backend, snapshot());
        let start = tokio::time::Instant::now();
        assert_eq!(panel.view(), GenerationView::Loading);

        assert!(panel.process_next().await);
        assert!(start.elapsed() >= Duration::from_millis(2500));
        assert!(panel.is_ready());
        match panel.view() {
            GenerationView::Ready(c) => assert_eq!(c.descriptor, "Generated 3D Model"),
            other => panic!("expected ready, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_shown_inline_and_retry_reloads() {
        let backend = MockBackend::new(&TimingConfig::default()).with_failing_generation(true);
        let mut panel = GenerationPanel::new(Handle::current(), backend, snapshot());
        assert!(panel.process_next().await);
        assert!(matches!(panel.view(), GenerationView::Failed(msg) if msg.contains("generation failed")));

        panel.retry();
        assert_eq!(panel.view(), GenerationView::Loading);
        assert!(panel.process_next().await);
        assert!(matches!(panel.view(), GenerationView::Failed(_)));
    }

    #[tokio::test(start_paused = true)]
    async fn retry_on_ready_character_keeps_it() {
        let backend = MockBackend::new(&TimingConfig::default());
        let mut panel = GenerationPanel::new(Handle::current(), backend, snapshot());
        assert!(panel.process_next().await);
        assert!(panel.is_ready());

        panel.retry();
        assert!(panel.is_ready());
        // No second request was issued.
        assert!(!panel.process_next().await);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_panel_cancels_generation() {
        let backend = MockBackend::new(&TimingConfig::default());
        let panel = GenerationPanel::new(Handle::current(), backend, snapshot());
        drop(panel);
        // Nothing left to wake up; the clock can run past the delay freely.
        tokio::time::sleep(Duration::from_secs(5)).await;
    }
}
