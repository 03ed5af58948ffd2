//! The guided four-step demo.
//!
//! `DemoSession` owns the current step and exactly one mounted panel. Changing
//! step drops the old panel, which aborts every timer it still had in flight;
//! only the step index and the last drawing snapshot survive the change.

pub mod chat;
pub mod drawing;
pub mod generation;
pub mod interaction;
pub mod steps;

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::backend::MockBackend;
use crate::config::AppConfig;
use crate::error::{DemoError, DemoResult};

use chat::{ChatPanel, QUICK_REPLIES};
use drawing::{CanvasPoint, Sketch, Snapshot};
use generation::GenerationPanel;
use interaction::{InteractionPanel, InteractionTab};
use steps::StepId;

/// The panel mounted for the current step.
pub enum ActivePanel {
    Drawing(Sketch),
    Generation(GenerationPanel),
    Chat(ChatPanel),
    Interaction(InteractionPanel),
}

impl ActivePanel {
    fn pump(&mut self) -> usize {
        match self {
            ActivePanel::Drawing(_) => 0,
            ActivePanel::Generation(panel) => panel.pump(),
            ActivePanel::Chat(panel) => panel.pump(),
            ActivePanel::Interaction(panel) => panel.pump(),
        }
    }

    async fn process_next(&mut self) -> bool {
        match self {
            ActivePanel::Drawing(_) => false,
            ActivePanel::Generation(panel) => panel.process_next().await,
            ActivePanel::Chat(panel) => panel.process_next().await,
            ActivePanel::Interaction(panel) => panel.process_next().await,
        }
    }
}

/// Everything a user can do inside the demo page.
#[derive(Debug, Clone, PartialEq)]
pub enum DemoAction {
    BeginStroke(CanvasPoint),
    ExtendStroke(CanvasPoint),
    EndStroke,
    /// Pick a palette entry by index.
    SetColor(usize),
    ClearCanvas,
    CreateCharacter,
    RetryGeneration,
    StartConversation,
    Send(String),
    QuickReply(usize),
    SkipToInteraction,
    SelectTab(InteractionTab),
    HighFive,
    StartLoading,
    ResetLoading,
    JumpTo(u8),
}

pub struct DemoSession {
    runtime: Handle,
    backend: MockBackend,
    config: AppConfig,
    current: StepId,
    panel: ActivePanel,
    last_snapshot: Option<Snapshot>,
    notice: Option<String>,
}

impl DemoSession {
    /// A fresh session at step 1 with an empty canvas.
    pub fn new(runtime: Handle, backend: MockBackend, config: AppConfig) -> Self {
        let panel = ActivePanel::Drawing(Sketch::new(&config.canvas));
        Self {
            runtime,
            backend,
            config,
            current: StepId::DRAW,
            panel,
            last_snapshot: None,
            notice: None,
        }
    }

    pub fn current_step(&self) -> StepId {
        self.current
    }

    pub fn panel(&self) -> &ActivePanel {
        &self.panel
    }

    /// Last inline error, cleared by the next successful action.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn last_snapshot(&self) -> Option<&Snapshot> {
        self.last_snapshot.as_ref()
    }

    /// Move to the next step. At the last step nothing happens.
    pub fn advance(&mut self) -> DemoResult<()> {
        if self.current.is_last() {
            debug!(target: "demo", "advance ignored on last step");
            return Ok(());
        }
        self.change_step(self.current.next())
    }

    /// Jump straight to step `id`. Unknown ids leave the session untouched.
    pub fn jump_to(&mut self, id: u8) -> DemoResult<()> {
        let step = StepId::try_from(id).inspect_err(|e| {
            warn!(target: "demo", %e, "jump rejected");
        })?;
        if step == self.current {
            return Ok(());
        }
        self.change_step(step)
    }

    /// Capture the drawing and move on to the preview.
    pub fn complete_drawing(&mut self) -> DemoResult<()> {
        let ActivePanel::Drawing(sketch) = &self.panel else {
            return Ok(());
        };
        let snapshot = sketch.snapshot()?;
        debug!(
            target: "drawing",
            strokes = sketch.strokes().len(),
            bytes = snapshot.png_bytes().len(),
            "drawing captured"
        );
        self.last_snapshot = Some(snapshot);
        self.advance()
    }

    /// Apply one user action. Errors are also kept as the inline notice.
    pub fn dispatch(&mut self, action: DemoAction) -> DemoResult<()> {
        let result = self.apply(action);
        match &result {
            Ok(()) => self.notice = None,
            Err(e) => self.notice = Some(e.to_string()),
        }
        result
    }

    fn apply(&mut self, action: DemoAction) -> DemoResult<()> {
        match action {
            DemoAction::JumpTo(id) => return self.jump_to(id),
            DemoAction::CreateCharacter => return self.complete_drawing(),
            _ => {}
        }

        let step = self.current;
        let mut advance = false;
        match (&mut self.panel, action) {
            (ActivePanel::Drawing(sketch), DemoAction::BeginStroke(p)) => sketch.begin_stroke(p),
            (ActivePanel::Drawing(sketch), DemoAction::ExtendStroke(p)) => sketch.extend_stroke(p),
            (ActivePanel::Drawing(sketch), DemoAction::EndStroke) => sketch.end_stroke(),
            (ActivePanel::Drawing(sketch), DemoAction::SetColor(index)) => {
                if let Some(color) = sketch.palette().get(index).copied() {
                    sketch.set_color(color);
                }
            }
            (ActivePanel::Drawing(sketch), DemoAction::ClearCanvas) => sketch.clear(),

            (ActivePanel::Generation(panel), DemoAction::RetryGeneration) => panel.retry(),
            (ActivePanel::Generation(panel), DemoAction::StartConversation) => {
                advance = panel.is_ready();
            }

            (ActivePanel::Chat(panel), DemoAction::Send(text)) => {
                if !text.trim().is_empty() {
                    panel.send(&text);
                }
            }
            (ActivePanel::Chat(panel), DemoAction::QuickReply(index)) => {
                if let Some(text) = QUICK_REPLIES.get(index) {
                    panel.send(text);
                }
            }
            (ActivePanel::Chat(panel), DemoAction::SkipToInteraction) => {
                panel.skip();
                advance = true;
            }

            (ActivePanel::Interaction(panel), DemoAction::SelectTab(tab)) => panel.select_tab(tab),
            (ActivePanel::Interaction(panel), DemoAction::HighFive) => panel.trigger_high_five(),
            (ActivePanel::Interaction(panel), DemoAction::StartLoading) => panel.start_loading(),
            (ActivePanel::Interaction(panel), DemoAction::ResetLoading) => panel.reset_loading(),

            (_, action) => {
                debug!(target: "demo", %step, ?action, "action ignored on this step");
            }
        }
        if advance {
            self.advance()
        } else {
            Ok(())
        }
    }

    /// Apply every deferred event that has already arrived.
    pub fn pump(&mut self) -> usize {
        self.panel.pump()
    }

    /// Wait for the mounted panel's next deferred event and apply it.
    /// Returns `false` when the panel has nothing scheduled.
    pub async fn process_next(&mut self) -> bool {
        self.panel.process_next().await
    }

    fn change_step(&mut self, step: StepId) -> DemoResult<()> {
        let panel = self.mount(step)?;
        info!(target: "demo", from = %self.current, to = %step, "step changed");
        self.panel = panel;
        self.current = step;
        Ok(())
    }

    fn mount(&self, step: StepId) -> DemoResult<ActivePanel> {
        let panel = match step {
            StepId::DRAW => ActivePanel::Drawing(Sketch::new(&self.config.canvas)),
            StepId::PREVIEW => {
                let snapshot = match &self.last_snapshot {
                    Some(snapshot) => snapshot.clone(),
                    None => Snapshot::blank(&self.config.canvas)?,
                };
                ActivePanel::Generation(GenerationPanel::new(
                    self.runtime.clone(),
                    self.backend.clone(),
                    snapshot,
                ))
            }
            StepId::CHAT => {
                ActivePanel::Chat(ChatPanel::new(self.runtime.clone(), self.config.timing.clone()))
            }
            StepId::INTERACT => ActivePanel::Interaction(InteractionPanel::new(
                self.runtime.clone(),
                self.backend.clone(),
                &self.config.timing,
            )),
            other => return Err(DemoError::InvalidStep(other.get())),
        };
        Ok(panel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> DemoSession {
        let config = AppConfig::default();
        let backend = MockBackend::new(&config.timing);
        DemoSession::new(Handle::current(), backend, config)
    }

    #[tokio::test(start_paused = true)]
    async fn starts_on_drawing_step() {
        let s = session();
        assert_eq!(s.current_step(), StepId::DRAW);
        assert!(matches!(s.panel(), ActivePanel::Drawing(_)));
        assert!(s.last_snapshot().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_jump_is_rejected_and_kept_inline() {
        let mut s = session();
        let err = s.dispatch(DemoAction::JumpTo(7)).unwrap_err();
        assert!(matches!(err, DemoError::InvalidStep(7)));
        assert_eq!(s.current_step(), StepId::DRAW);
        assert!(s.notice().is_some_and(|n| n.contains('7')));

        s.dispatch(DemoAction::JumpTo(1)).unwrap();
        assert_eq!(s.notice(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn jumping_to_current_step_keeps_panel_state() {
        let mut s = session();
        s.dispatch(DemoAction::BeginStroke(CanvasPoint::new(1.0, 1.0))).unwrap();
        s.dispatch(DemoAction::ExtendStroke(CanvasPoint::new(9.0, 9.0))).unwrap();
        s.dispatch(DemoAction::EndStroke).unwrap();
        s.jump_to(1).unwrap();
        match s.panel() {
            ActivePanel::Drawing(sketch) => assert_eq!(sketch.strokes().len(), 1),
            _ => panic!("expected drawing panel"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn actions_for_other_steps_are_ignored() {
        let mut s = session();
        s.dispatch(DemoAction::HighFive).unwrap();
        s.dispatch(DemoAction::StartConversation).unwrap();
        assert_eq!(s.current_step(), StepId::DRAW);
    }

    #[tokio::test(start_paused = true)]
    async fn start_conversation_requires_ready_character() {
        let mut s = session();
        s.jump_to(2).unwrap();
        s.dispatch(DemoAction::StartConversation).unwrap();
        assert_eq!(s.current_step(), StepId::PREVIEW);

        assert!(s.process_next().await);
        s.dispatch(DemoAction::StartConversation).unwrap();
        assert_eq!(s.current_step(), StepId::CHAT);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_messages_are_not_sent() {
        let mut s = session();
        s.jump_to(3).unwrap();
        s.dispatch(DemoAction::Send("   ".into())).unwrap();
        match s.panel() {
            ActivePanel::Chat(chat) => assert_eq!(chat.transcript().len(), 1),
            _ => panic!("expected chat panel"),
        }
    }
}
