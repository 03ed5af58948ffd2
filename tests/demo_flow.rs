//! End-to-end walks through the four demo steps on a paused clock.

use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::Instant;

use autism_recover::backend::{CHARACTER_DESCRIPTOR, HIGH_FIVE_REPLY, MockBackend};
use autism_recover::config::AppConfig;
use autism_recover::demo::chat::{ChatPanel, GREETING, Role};
use autism_recover::demo::drawing::CanvasPoint;
use autism_recover::demo::generation::GenerationView;
use autism_recover::demo::interaction::{InteractionPanel, InteractionTab, LoadingPhase};
use autism_recover::demo::steps::StepId;
use autism_recover::demo::{ActivePanel, DemoAction, DemoSession};
use autism_recover::error::DemoError;
use autism_recover::route::Route;
use autism_recover::state_machine::high_five_sm::WAITING_TEXT;
use autism_recover::theme::Theme;
use autism_recover::ui::{Shell, UiAction};

fn session() -> DemoSession {
    let config = AppConfig::default();
    let backend = MockBackend::new(&config.timing);
    DemoSession::new(Handle::current(), backend, config)
}

fn failing_session() -> DemoSession {
    let config = AppConfig::default();
    let backend = MockBackend::new(&config.timing).with_failing_generation(true);
    DemoSession::new(Handle::current(), backend, config)
}

fn chat(s: &DemoSession) -> &ChatPanel {
    match s.panel() {
        ActivePanel::Chat(panel) => panel,
        _ => panic!("expected chat panel, on step {}", s.current_step()),
    }
}

fn interaction(s: &DemoSession) -> &InteractionPanel {
    match s.panel() {
        ActivePanel::Interaction(panel) => panel,
        _ => panic!("expected interaction panel, on step {}", s.current_step()),
    }
}

#[tokio::test(start_paused = true)]
async fn blank_drawing_reaches_ready_character_and_chat() {
    let mut s = session();
    let start = Instant::now();

    s.dispatch(DemoAction::CreateCharacter).unwrap();
    assert_eq!(s.current_step(), StepId::PREVIEW);
    let snapshot = s.last_snapshot().expect("snapshot captured");
    assert_eq!((snapshot.width(), snapshot.height()), (600, 400));

    match s.panel() {
        ActivePanel::Generation(panel) => assert_eq!(panel.view(), GenerationView::Loading),
        _ => panic!("expected generation panel"),
    }

    assert!(s.process_next().await);
    assert!(start.elapsed() >= Duration::from_millis(2500));
    match s.panel() {
        ActivePanel::Generation(panel) => match panel.view() {
            GenerationView::Ready(character) => {
                assert_eq!(character.descriptor, CHARACTER_DESCRIPTOR);
            }
            other => panic!("expected ready, got {other:?}"),
        },
        _ => panic!("expected generation panel"),
    }

    s.dispatch(DemoAction::StartConversation).unwrap();
    assert_eq!(s.current_step(), StepId::CHAT);
    let transcript = chat(&s).transcript();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript[0].role, Role::Character);
    assert_eq!(transcript[0].text, GREETING);
    assert!(transcript.iter().all(|m| m.role != Role::Child));
}

#[tokio::test(start_paused = true)]
async fn drawing_is_carried_into_the_snapshot() {
    let mut s = session();
    s.dispatch(DemoAction::SetColor(2)).unwrap();
    s.dispatch(DemoAction::BeginStroke(CanvasPoint::new(100.0, 100.0))).unwrap();
    s.dispatch(DemoAction::ExtendStroke(CanvasPoint::new(300.0, 200.0))).unwrap();
    s.dispatch(DemoAction::EndStroke).unwrap();
    s.dispatch(DemoAction::CreateCharacter).unwrap();

    let image = s.last_snapshot().unwrap().decode().unwrap();
    let inked = image.pixels().filter(|p| p.0 != [255, 255, 255, 255]).count();
    assert!(inked > 0);
}

#[tokio::test(start_paused = true)]
async fn failed_generation_can_be_retried() {
    let mut s = failing_session();
    s.dispatch(DemoAction::CreateCharacter).unwrap();
    assert!(s.process_next().await);

    match s.panel() {
        ActivePanel::Generation(panel) => {
            assert!(matches!(panel.view(), GenerationView::Failed(_)));
        }
        _ => panic!("expected generation panel"),
    }
    // A failed character cannot start a conversation.
    s.dispatch(DemoAction::StartConversation).unwrap();
    assert_eq!(s.current_step(), StepId::PREVIEW);

    s.dispatch(DemoAction::RetryGeneration).unwrap();
    match s.panel() {
        ActivePanel::Generation(panel) => assert_eq!(panel.view(), GenerationView::Loading),
        _ => panic!("expected generation panel"),
    }
}

#[tokio::test(start_paused = true)]
async fn sad_message_gets_comforting_reply_after_delay() {
    let mut s = session();
    s.jump_to(3).unwrap();
    let start = Instant::now();

    s.dispatch(DemoAction::Send("I feel sad 😢".to_string())).unwrap();
    {
        let transcript = chat(&s).transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1].role, Role::Child);
        assert_eq!(transcript[1].text, "I feel sad 😢");
        assert!(chat(&s).is_typing());
    }

    assert!(s.process_next().await);
    assert!(start.elapsed() >= Duration::from_millis(1000));
    let transcript = chat(&s).transcript();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[2].role, Role::Character);
    assert_eq!(
        transcript[2].text,
        "Oh no, don't be sad. I am here with you. Would a high-five help?"
    );
    assert!(!chat(&s).is_typing());
}

#[tokio::test(start_paused = true)]
async fn quick_replies_follow_rule_order() {
    let mut s = session();
    s.jump_to(3).unwrap();

    s.dispatch(DemoAction::QuickReply(0)).unwrap();
    assert!(s.process_next().await);
    s.dispatch(DemoAction::QuickReply(1)).unwrap();
    assert!(s.process_next().await);

    let replies: Vec<&str> = chat(&s)
        .transcript()
        .iter()
        .filter(|m| m.role == Role::Character)
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(
        replies,
        [
            GREETING,
            "Hi there! *Waves happily*",
            "Once upon a time, there was a drawing that came to life... that's me!",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn sad_quick_reply_after_greeting_gets_comfort() {
    let mut s = session();
    s.jump_to(3).unwrap();

    s.dispatch(DemoAction::QuickReply(0)).unwrap();
    assert!(s.process_next().await);
    s.dispatch(DemoAction::QuickReply(2)).unwrap();
    assert!(chat(&s).is_typing());
    assert!(s.process_next().await);

    let transcript = chat(&s).transcript();
    assert_eq!(transcript.len(), 5);
    assert_eq!(transcript[3].text, "I feel sad 😢");
    let last = transcript.last().unwrap();
    assert_eq!(last.role, Role::Character);
    assert_eq!(
        last.text,
        "Oh no, don't be sad. I am here with you. Would a high-five help?"
    );
}

#[tokio::test(start_paused = true)]
async fn skipping_discards_the_pending_reply() {
    let mut s = session();
    s.jump_to(3).unwrap();
    s.dispatch(DemoAction::Send("Let's play! 🎮".to_string())).unwrap();
    s.dispatch(DemoAction::SkipToInteraction).unwrap();
    assert_eq!(s.current_step(), StepId::INTERACT);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(s.pump(), 0);

    // Coming back mounts a fresh conversation.
    s.jump_to(3).unwrap();
    assert_eq!(chat(&s).transcript().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn every_step_is_reachable_by_jump() {
    let mut s = session();
    for id in [4, 2, 1, 3] {
        s.jump_to(id).unwrap();
        assert_eq!(s.current_step().get(), id);
    }
    for bad in [0, 5, 255] {
        assert!(matches!(s.jump_to(bad), Err(DemoError::InvalidStep(n)) if n == bad));
        assert_eq!(s.current_step(), StepId::CHAT);
    }

    s.jump_to(4).unwrap();
    s.advance().unwrap();
    assert_eq!(s.current_step(), StepId::INTERACT);
}

#[tokio::test(start_paused = true)]
async fn leaving_generation_cancels_it() {
    let mut s = session();
    s.dispatch(DemoAction::CreateCharacter).unwrap();
    s.jump_to(1).unwrap();

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(s.pump(), 0);
    assert_eq!(s.current_step(), StepId::DRAW);
}

#[tokio::test(start_paused = true)]
async fn high_five_round_trip() {
    let mut s = session();
    s.jump_to(4).unwrap();
    let start = Instant::now();

    s.dispatch(DemoAction::HighFive).unwrap();
    assert_eq!(interaction(&s).high_five_feedback(), Some(WAITING_TEXT));

    assert!(s.process_next().await);
    assert!(start.elapsed() >= Duration::from_millis(800));
    assert_eq!(interaction(&s).high_five_feedback(), Some(HIGH_FIVE_REPLY));

    assert!(s.process_next().await);
    assert!(start.elapsed() >= Duration::from_millis(3800));
    assert_eq!(interaction(&s).high_five_feedback(), None);
}

#[tokio::test(start_paused = true)]
async fn loading_simulation_runs_on_a_single_interval() {
    let mut s = session();
    s.jump_to(4).unwrap();
    s.dispatch(DemoAction::SelectTab(InteractionTab::Loading)).unwrap();
    s.dispatch(DemoAction::StartLoading).unwrap();
    s.dispatch(DemoAction::StartLoading).unwrap();
    assert_eq!(interaction(&s).loading_timers(), 1);

    let mut last = 0;
    while interaction(&s).loading().phase == LoadingPhase::Running {
        assert!(s.process_next().await);
        let view = interaction(&s).loading();
        assert_eq!(view.progress, last + 2);
        assert!(view.progress <= 100);
        last = view.progress;
    }

    let view = interaction(&s).loading();
    assert_eq!(view.phase, LoadingPhase::Complete);
    assert_eq!(view.progress, 100);
    assert_eq!(view.stage, 4);
    assert_eq!(interaction(&s).loading_timers(), 0);

    s.dispatch(DemoAction::ResetLoading).unwrap();
    let view = interaction(&s).loading();
    assert_eq!((view.phase, view.progress), (LoadingPhase::Idle, 0));
}

#[tokio::test(start_paused = true)]
async fn zero_loading_tick_cannot_stall_the_bar() {
    assert!(matches!(
        AppConfig::from_toml("[timing]\nloading_tick_ms = 0"),
        Err(DemoError::InvalidConfig(_))
    ));

    // Built in code, the value skips validation; the interval still runs.
    let mut config = AppConfig::default();
    config.timing.loading_tick_ms = 0;
    let backend = MockBackend::new(&config.timing);
    let mut s = DemoSession::new(Handle::current(), backend, config);
    s.jump_to(4).unwrap();
    s.dispatch(DemoAction::StartLoading).unwrap();

    tokio::time::sleep(Duration::from_secs(1)).await;
    s.pump();
    let view = interaction(&s).loading();
    assert_eq!((view.phase, view.progress), (LoadingPhase::Complete, 100));
    assert_eq!(interaction(&s).loading_timers(), 0);
}

#[tokio::test(start_paused = true)]
async fn shell_routes_demo_actions_to_the_session() {
    let config = AppConfig::default();
    let backend = MockBackend::new(&config.timing);
    let mut shell = Shell::new(Handle::current(), backend, config, Theme::default(), Route::Home);
    assert!(shell.demo().is_none());

    shell.apply(UiAction::Navigate(Route::Demo));
    shell.apply(UiAction::Demo(DemoAction::JumpTo(3)));
    shell.type_text("Hi friend");
    shell.apply(UiAction::SubmitDraft);
    assert_eq!(shell.draft(), "");

    let demo = shell.demo().expect("demo session");
    assert_eq!(demo.current_step(), StepId::CHAT);
    assert_eq!(chat(demo).transcript().len(), 2);

    tokio::time::sleep(Duration::from_millis(1100)).await;
    shell.tick();
    let demo = shell.demo().expect("demo session");
    assert_eq!(chat(demo).transcript().len(), 3);

    shell.apply(UiAction::Navigate(Route::Research));
    assert!(shell.demo().is_none());
}
