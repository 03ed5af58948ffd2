//! The windowed site: navigation, pages, pointer and keyboard routing.
//!
//! `Shell` holds everything that outlives a single frame. Painting rebuilds
//! the `HitMap` every frame; input handlers resolve clicks against the map
//! from the frame the user actually saw.

pub mod demo_view;
pub mod home;
pub mod nav;
pub mod paint;
pub mod research;

use std::time::Instant;

use tokio::runtime::Handle;
use tracing::{debug, info};
use vello::Scene;
use vello::kurbo::{Point, Rect};

use crate::backend::MockBackend;
use crate::config::AppConfig;
use crate::demo::drawing::CanvasPoint;
use crate::demo::{ActivePanel, DemoAction, DemoSession};
use crate::route::Route;
use crate::theme::Theme;
use paint::{Fonts, Painter};

/// Pixels scrolled per wheel line.
const LINE_SCROLL: f64 = 48.0;

/// Anything a click can trigger.
#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    Navigate(Route),
    ToggleMenu,
    SubmitDraft,
    Demo(DemoAction),
}

/// Click targets of the last painted frame, in screen coordinates.
#[derive(Debug, Default)]
pub struct HitMap {
    /// `None` marks an opaque region that swallows clicks.
    regions: Vec<(Rect, Option<UiAction>)>,
    canvas: Option<Rect>,
}

impl HitMap {
    pub fn clear(&mut self) {
        self.regions.clear();
        self.canvas = None;
    }

    pub fn push(&mut self, rect: Rect, action: UiAction) {
        self.regions.push((rect, Some(action)));
    }

    /// Stop clicks inside `rect` from reaching anything painted earlier.
    pub fn block(&mut self, rect: Rect) {
        self.regions.push((rect, None));
    }

    pub fn set_canvas(&mut self, rect: Rect) {
        self.canvas = Some(rect);
    }

    pub fn canvas(&self) -> Option<Rect> {
        self.canvas
    }

    /// The topmost target under `point`. Later regions are drawn on top.
    pub fn hit(&self, point: Point) -> Option<&UiAction> {
        self.regions
            .iter()
            .rev()
            .find(|(rect, _)| rect.contains(point))
            .and_then(|(_, action)| action.as_ref())
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

pub struct Shell {
    runtime: Handle,
    backend: MockBackend,
    config: AppConfig,
    theme: Theme,
    route: Route,
    menu_open: bool,
    scroll: f64,
    content_height: f64,
    viewport: (f64, f64),
    demo: Option<DemoSession>,
    draft: String,
    pointer: Point,
    pointer_down: bool,
    hits: HitMap,
    started: Instant,
}

impl Shell {
    pub fn new(runtime: Handle, backend: MockBackend, config: AppConfig, theme: Theme, route: Route) -> Self {
        let mut shell = Self {
            runtime,
            backend,
            config,
            theme,
            route: Route::Home,
            menu_open: false,
            scroll: 0.0,
            content_height: 0.0,
            viewport: (0.0, 0.0),
            demo: None,
            draft: String::new(),
            pointer: Point::ZERO,
            pointer_down: false,
            hits: HitMap::default(),
            started: Instant::now(),
        };
        shell.navigate(route);
        shell
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn demo(&self) -> Option<&DemoSession> {
        self.demo.as_ref()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn scroll(&self) -> f64 {
        self.scroll
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        info!(target: "theme", "theme applied");
        self.theme = theme;
    }

    pub fn hits(&self) -> &HitMap {
        &self.hits
    }

    /// Show `route`. Entering the demo mounts a fresh session; leaving it
    /// drops the session with all of its timers.
    pub fn navigate(&mut self, route: Route) {
        self.menu_open = false;
        self.scroll = 0.0;
        if route == self.route && (route != Route::Demo || self.demo.is_some()) {
            return;
        }
        info!(target: "demo", from = %self.route, to = %route, "navigate");
        self.route = route;
        self.draft.clear();
        self.demo = (route == Route::Demo).then(|| {
            DemoSession::new(self.runtime.clone(), self.backend.clone(), self.config.clone())
        });
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Navigate(route) => self.navigate(route),
            UiAction::ToggleMenu => self.toggle_menu(),
            UiAction::SubmitDraft => {
                let text = std::mem::take(&mut self.draft);
                self.dispatch(DemoAction::Send(text));
            }
            UiAction::Demo(action) => self.dispatch(action),
        }
    }

    fn dispatch(&mut self, action: DemoAction) {
        let Some(demo) = self.demo.as_mut() else {
            return;
        };
        let before = demo.current_step();
        // Failures stay visible through `DemoSession::notice`.
        if let Err(e) = demo.dispatch(action) {
            debug!(target: "demo", %e, "action failed");
        }
        if demo.current_step() != before {
            self.draft.clear();
            self.scroll = 0.0;
        }
    }

    /// Apply deferred panel events. Called once per frame.
    pub fn tick(&mut self) -> usize {
        self.demo.as_mut().map_or(0, DemoSession::pump)
    }

    // --- Pointer -----------------------------------------------------------

    fn drawing_active(&self) -> bool {
        matches!(
            self.demo.as_ref().map(DemoSession::panel),
            Some(ActivePanel::Drawing(sketch)) if sketch.is_drawing()
        )
    }

    /// Map a screen point into canvas pixels, if it is over the canvas.
    fn canvas_point(&self, point: Point) -> Option<CanvasPoint> {
        if self.menu_open || point.y < self.theme.layout.nav_height {
            return None;
        }
        let rect = self.hits.canvas()?;
        let Some(ActivePanel::Drawing(sketch)) = self.demo.as_ref().map(DemoSession::panel) else {
            return None;
        };
        demo_view::to_canvas(point, rect, sketch.size())
    }

    pub fn pointer_moved(&mut self, point: Point) {
        self.pointer = point;
        if !self.pointer_down || !self.drawing_active() {
            return;
        }
        match self.canvas_point(point) {
            Some(p) => self.dispatch(DemoAction::ExtendStroke(p)),
            None => self.dispatch(DemoAction::EndStroke),
        }
    }

    pub fn pointer_pressed(&mut self) {
        self.pointer_down = true;
        let point = self.pointer;
        if let Some(p) = self.canvas_point(point) {
            self.dispatch(DemoAction::BeginStroke(p));
            return;
        }
        if let Some(action) = self.hits.hit(point).cloned() {
            self.apply(action);
        } else if self.menu_open {
            self.menu_open = false;
        }
    }

    pub fn pointer_released(&mut self) {
        self.pointer_down = false;
        if self.drawing_active() {
            self.dispatch(DemoAction::EndStroke);
        }
    }

    /// The pointer left the window.
    pub fn pointer_left(&mut self) {
        self.pointer_down = false;
        if self.drawing_active() {
            self.dispatch(DemoAction::EndStroke);
        }
    }

    /// Wheel input: positive `lines` scrolls content up.
    pub fn scroll_lines(&mut self, lines: f64) {
        self.scroll_pixels(lines * LINE_SCROLL);
    }

    pub fn scroll_pixels(&mut self, pixels: f64) {
        let page = (self.viewport.1 - self.theme.layout.nav_height).max(0.0);
        let max = (self.content_height - page).max(0.0);
        self.scroll = (self.scroll + pixels).clamp(0.0, max);
    }

    // --- Keyboard ----------------------------------------------------------

    fn chat_open(&self) -> bool {
        matches!(
            self.demo.as_ref().map(DemoSession::panel),
            Some(ActivePanel::Chat(_))
        )
    }

    pub fn type_text(&mut self, text: &str) {
        if self.chat_open() {
            self.draft.extend(text.chars().filter(|c| !c.is_control()));
        }
    }

    pub fn backspace(&mut self) {
        if self.chat_open() {
            self.draft.pop();
        }
    }

    pub fn submit(&mut self) {
        if self.chat_open() {
            self.apply(UiAction::SubmitDraft);
        }
    }

    // --- Painting ----------------------------------------------------------

    /// Paint the current page into `scene` and rebuild the hit map.
    pub fn paint(&mut self, scene: &mut Scene, fonts: &Fonts, width: f64, height: f64) {
        self.viewport = (width, height);
        self.hits.clear();
        let elapsed = self.started.elapsed().as_secs_f64();
        let mut painter = Painter::new(scene, fonts, &mut self.hits, &self.theme, (width, height), elapsed);

        let background = painter.theme.background();
        painter.fill_rect(Rect::new(0.0, 0.0, width, height), background);

        painter.set_scroll(self.scroll);
        let top = self.theme.layout.nav_height;
        let content = match self.route {
            Route::Home => home::paint(&mut painter, top),
            Route::Research => research::paint(&mut painter, top),
            Route::Demo => match self.demo.as_ref() {
                Some(demo) => demo_view::paint(&mut painter, top, demo, &self.draft),
                None => 0.0,
            },
        };

        painter.set_scroll(0.0);
        nav::paint(&mut painter, self.route, self.menu_open);

        self.content_height = content;
        // Keep the offset valid after a resize or a shorter page.
        self.scroll_pixels(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::steps::StepId;

    fn shell(route: Route) -> Shell {
        let config = AppConfig::default();
        let backend = MockBackend::new(&config.timing);
        Shell::new(Handle::current(), backend, config, Theme::default(), route)
    }

    #[test]
    fn hit_map_prefers_topmost_region() {
        let mut hits = HitMap::default();
        hits.push(Rect::new(0.0, 0.0, 100.0, 100.0), UiAction::ToggleMenu);
        hits.push(Rect::new(10.0, 10.0, 20.0, 20.0), UiAction::Navigate(Route::Demo));
        assert_eq!(hits.hit(Point::new(15.0, 15.0)), Some(&UiAction::Navigate(Route::Demo)));
        assert_eq!(hits.hit(Point::new(50.0, 50.0)), Some(&UiAction::ToggleMenu));
        assert_eq!(hits.hit(Point::new(150.0, 50.0)), None);

        hits.block(Rect::new(0.0, 0.0, 100.0, 12.0));
        assert_eq!(hits.hit(Point::new(15.0, 11.0)), None);
        assert_eq!(hits.hit(Point::new(15.0, 15.0)), Some(&UiAction::Navigate(Route::Demo)));
    }

    #[tokio::test(start_paused = true)]
    async fn demo_session_exists_only_on_demo_route() {
        let mut s = shell(Route::Home);
        assert!(s.demo().is_none());
        s.navigate(Route::Demo);
        assert_eq!(s.demo().map(DemoSession::current_step), Some(StepId::DRAW));
        s.navigate(Route::Research);
        assert!(s.demo().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn reentering_demo_starts_from_step_one() {
        let mut s = shell(Route::Demo);
        s.apply(UiAction::Demo(DemoAction::JumpTo(3)));
        assert_eq!(s.demo().map(DemoSession::current_step), Some(StepId::CHAT));

        s.navigate(Route::Home);
        s.navigate(Route::Demo);
        assert_eq!(s.demo().map(DemoSession::current_step), Some(StepId::DRAW));
    }

    #[tokio::test(start_paused = true)]
    async fn navigation_closes_menu() {
        let mut s = shell(Route::Home);
        s.toggle_menu();
        assert!(s.menu_open());
        s.apply(UiAction::Navigate(Route::Research));
        assert!(!s.menu_open());
        assert_eq!(s.route(), Route::Research);
    }

    #[tokio::test(start_paused = true)]
    async fn typing_only_reaches_the_chat() {
        let mut s = shell(Route::Demo);
        s.type_text("hello");
        assert_eq!(s.draft(), "");

        s.apply(UiAction::Demo(DemoAction::JumpTo(3)));
        s.type_text("Hi\u{8}");
        assert_eq!(s.draft(), "Hi");
        s.backspace();
        s.type_text("i there");
        s.submit();
        assert_eq!(s.draft(), "");
        match s.demo().map(DemoSession::panel) {
            Some(ActivePanel::Chat(chat)) => {
                assert_eq!(chat.transcript().len(), 2);
                assert_eq!(chat.transcript()[1].text, "Hi there");
            }
            _ => panic!("expected chat panel"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn scroll_is_clamped_to_content() {
        let mut s = shell(Route::Research);
        s.viewport = (1280.0, 864.0);
        s.content_height = 2000.0;
        s.scroll_lines(-3.0);
        assert_eq!(s.scroll(), 0.0);
        s.scroll_lines(100.0);
        assert_eq!(s.scroll(), 2000.0 - (864.0 - 64.0));
    }
}
