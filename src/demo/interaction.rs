//! Step 4: high-five and anxiety-free loading, behind two tabs.
//!
//! The two sub-machines share nothing but the container; each owns its own
//! timer scope.

use statig::prelude::*;
use tokio::runtime::Handle;

use crate::backend::MockBackend;
use crate::config::TimingConfig;
use crate::state_machine::high_five_sm::{self, HighFiveEvent, HighFiveMachine};
use crate::state_machine::loading_sm::{self, LoadingEvent, LoadingMachine};
use crate::timers::{TimerEvents, TimerScope};

pub const HIGH_FIVE_PROMPT: &str = "Click the button to high-five your friend! This physical interaction builds a bond without needing words.";
pub const LOADING_PROMPT: &str = "See how we reduce anxiety during waiting times.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionTab {
    #[default]
    HighFive,
    Loading,
}

impl InteractionTab {
    pub fn label(self) -> &'static str {
        match self {
            InteractionTab::HighFive => "High-Five Interaction",
            InteractionTab::Loading => "Anxiety-Free Loading",
        }
    }
}

/// Phase of the loading simulation, as the UI sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingPhase {
    Idle,
    Running,
    Complete,
}

/// Read-only view of the loading simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadingView {
    pub phase: LoadingPhase,
    pub progress: u8,
    pub stage: u8,
}

impl LoadingView {
    pub fn active(&self) -> bool {
        self.phase == LoadingPhase::Running
    }
}

pub struct InteractionPanel {
    tab: InteractionTab,
    high_five: StateMachine<HighFiveMachine>,
    high_five_events: TimerEvents<HighFiveEvent>,
    loading: StateMachine<LoadingMachine>,
    loading_events: TimerEvents<LoadingEvent>,
}

impl InteractionPanel {
    pub fn new(runtime: Handle, backend: MockBackend, timing: &TimingConfig) -> Self {
        let (hf_timers, high_five_events) = TimerScope::new(runtime.clone());
        let (ld_timers, loading_events) = TimerScope::new(runtime);
        Self {
            tab: InteractionTab::default(),
            high_five: HighFiveMachine::new(hf_timers, backend, timing.high_five_display())
                .state_machine(),
            high_five_events,
            loading: LoadingMachine::new(ld_timers, timing.loading_tick(), timing.loading_step)
                .state_machine(),
            loading_events,
        }
    }

    pub fn tab(&self) -> InteractionTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: InteractionTab) {
        self.tab = tab;
    }

    // --- High-five ---------------------------------------------------------

    pub fn trigger_high_five(&mut self) {
        self.high_five.handle(&HighFiveEvent::Trigger);
    }

    pub fn high_five_feedback(&self) -> Option<&str> {
        HighFiveMachine::feedback(self.high_five.state())
    }

    pub fn high_five_state(&self) -> &high_five_sm::State {
        self.high_five.state()
    }

    // --- Loading simulation -------------------------------------------------

    pub fn start_loading(&mut self) {
        self.loading.handle(&LoadingEvent::Start);
    }

    pub fn reset_loading(&mut self) {
        self.loading.handle(&LoadingEvent::Reset);
    }

    pub fn loading(&self) -> LoadingView {
        let phase = match self.loading.state() {
            loading_sm::State::Idle {} => LoadingPhase::Idle,
            loading_sm::State::Running {} => LoadingPhase::Running,
            loading_sm::State::Complete {} => LoadingPhase::Complete,
        };
        let progress = self.loading.inner().progress();
        LoadingView {
            phase,
            progress,
            stage: loading_sm::stage_label(progress),
        }
    }

    /// Live interval timers driving the loading bar.
    pub fn loading_timers(&self) -> usize {
        self.loading.inner().live_timers()
    }

    // --- Event pumping -----------------------------------------------------

    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.high_five_events.try_next() {
            self.high_five.handle(&event);
            applied += 1;
        }
        while let Some(event) = self.loading_events.try_next() {
            self.loading.handle(&event);
            applied += 1;
        }
        applied
    }

    pub async fn process_next(&mut self) -> bool {
        tokio::select! {
            Some(event) = self.high_five_events.next() => {
                self.high_five.handle(&event);
                true
            }
            Some(event) = self.loading_events.next() => {
                self.loading.handle(&event);
                true
            }
            else => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HIGH_FIVE_REPLY;
    use std::time::Duration;

    fn panel() -> InteractionPanel {
        let timing = TimingConfig::default();
        InteractionPanel::new(Handle::current(), MockBackend::new(&timing), &timing)
    }

    #[tokio::test(start_paused = true)]
    async fn high_five_round_trip() {
        let mut p = panel();
        assert_eq!(p.high_five_feedback(), None);

        let start = tokio::time::Instant::now();
        p.trigger_high_five();
        assert_eq!(p.high_five_feedback(), Some(high_five_sm::WAITING_TEXT));

        assert!(p.process_next().await);
        assert!(start.elapsed() >= Duration::from_millis(800));
        assert_eq!(p.high_five_feedback(), Some(HIGH_FIVE_REPLY));

        assert!(p.process_next().await);
        assert!(start.elapsed() >= Duration::from_millis(3800));
        assert_eq!(p.high_five_feedback(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn retrigger_restarts_round_without_overlap() {
        let mut p = panel();
        p.trigger_high_five();
        assert!(p.process_next().await);
        assert_eq!(p.high_five_feedback(), Some(HIGH_FIVE_REPLY));

        // Trigger again while the reply is visible: the pending dismissal
        // from the first round must not cut the second round short.
        p.trigger_high_five();
        assert_eq!(p.high_five_feedback(), Some(high_five_sm::WAITING_TEXT));
        assert!(p.process_next().await);
        assert_eq!(p.high_five_feedback(), Some(HIGH_FIVE_REPLY));
        assert!(p.process_next().await);
        assert_eq!(p.high_five_feedback(), None);
        assert!(!p.process_next().await);
    }

    #[tokio::test(start_paused = true)]
    async fn loading_runs_to_completion_in_steps_of_two() {
        let mut p = panel();
        p.select_tab(InteractionTab::Loading);
        assert_eq!(p.loading().phase, LoadingPhase::Idle);

        p.start_loading();
        assert!(p.loading().active());
        let mut last = p.loading().progress;
        while p.process_next().await {
            let view = p.loading();
            assert_eq!(view.progress, last + 2);
            assert_eq!(view.stage, loading_sm::stage_label(view.progress));
            last = view.progress;
        }
        let done = p.loading();
        assert_eq!(done.phase, LoadingPhase::Complete);
        assert_eq!(done.progress, 100);
        assert_eq!(done.stage, 4);
        assert_eq!(p.loading_timers(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn start_twice_keeps_single_interval() {
        let mut p = panel();
        p.start_loading();
        p.start_loading();
        assert_eq!(p.loading_timers(), 1);

        assert!(p.process_next().await);
        assert_eq!(p.loading().progress, 2);
        p.start_loading();
        assert!(p.process_next().await);
        assert_eq!(p.loading().progress, 4);
        assert_eq!(p.loading_timers(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_after_complete_returns_to_idle() {
        let mut p = panel();
        p.reset_loading();
        assert_eq!(p.loading().phase, LoadingPhase::Idle);

        p.start_loading();
        while p.process_next().await {}
        p.reset_loading();
        let view = p.loading();
        assert_eq!(view.phase, LoadingPhase::Idle);
        assert_eq!(view.progress, 0);
        assert_eq!(view.stage, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_while_running_stops_the_interval() {
        let mut p = panel();
        p.start_loading();
        assert!(p.process_next().await);
        assert!(p.process_next().await);
        assert_eq!(p.loading().progress, 4);

        p.reset_loading();
        let view = p.loading();
        assert_eq!((view.phase, view.progress), (LoadingPhase::Idle, 0));
        assert_eq!(p.loading_timers(), 0);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(p.pump(), 0);
        assert_eq!(p.loading().progress, 0);

        // A fresh start runs from zero again.
        p.start_loading();
        assert!(p.process_next().await);
        assert_eq!(p.loading().progress, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn tabs_do_not_reset_machines() {
        let mut p = panel();
        p.select_tab(InteractionTab::Loading);
        p.start_loading();
        assert!(p.process_next().await);
        p.select_tab(InteractionTab::HighFive);
        p.select_tab(InteractionTab::Loading);
        assert_eq!(p.loading().progress, 2);
        assert_eq!(p.tab(), InteractionTab::Loading);
    }
}
