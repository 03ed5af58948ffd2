//! The four-step demo: stepper, step header and the active panel.

use vello::kurbo::{Affine, BezPath, Cap, Join, Point, Rect, Stroke};

use crate::demo::chat::{ChatPanel, QUICK_REPLIES, Role};
use crate::demo::drawing::{CanvasPoint, Sketch};
use crate::demo::generation::{
    AR_BADGE, GenerationPanel, GenerationView, LOADING_SUBTITLE, LOADING_TITLE, READY_LINE,
};
use crate::demo::interaction::{
    HIGH_FIVE_PROMPT, InteractionPanel, InteractionTab, LOADING_PROMPT, LoadingPhase,
};
use crate::demo::steps::{STEP_COUNT, StepId, StepStatus, progress_fraction};
use crate::demo::{ActivePanel, DemoAction, DemoSession};
use crate::state_machine::loading_sm::{COMFORT_LINE, stage_caption};
use crate::theme::to_color;
use crate::ui::UiAction;
use crate::ui::paint::{Painter, Weight};

pub const CHAT_TITLE: &str = "My Friend";
pub const CHAT_STATUS: &str = "Online";
pub const CHAT_PLACEHOLDER: &str = "Type a message...";
pub const SKIP_LABEL: &str = "Skip to Interaction";
pub const DRAW_TIP_TITLE: &str = "Tip";
pub const DRAW_TIP: &str =
    "Draw a simple outline of a character or animal. Simple shapes work best for our AI to recognize!";

const PANEL_PAD: f64 = 24.0;
const CHAT_HEIGHT: f64 = 500.0;
const BUBBLE_PAD: f64 = 14.0;
const BUBBLE_GAP: f64 = 12.0;

/// Map a screen point over `rect` into canvas pixels of a `size` canvas.
///
/// Returns `None` outside the rectangle or for a degenerate one.
pub fn to_canvas(point: Point, rect: Rect, size: (u32, u32)) -> Option<CanvasPoint> {
    let inside = (rect.x0..=rect.x1).contains(&point.x) && (rect.y0..=rect.y1).contains(&point.y);
    if rect.width() <= 0.0 || rect.height() <= 0.0 || !inside {
        return None;
    }
    let sx = f64::from(size.0) / rect.width();
    let sy = f64::from(size.1) / rect.height();
    Some(CanvasPoint::new(
        (point.x - rect.x0) * sx,
        (point.y - rect.y0) * sy,
    ))
}

fn act(action: DemoAction) -> UiAction {
    UiAction::Demo(action)
}

/// Paint the demo page below `top`; returns the content height.
pub fn paint(p: &mut Painter<'_>, top: f64, demo: &DemoSession, draft: &str) -> f64 {
    let (x, w) = p.column(960.0);
    let mut y = top + 40.0;

    y = paint_stepper(p, x, w, y, demo.current_step()) + 32.0;

    let step = demo.current_step();
    let info = step.info();
    let muted = p.theme.text_muted();
    let primary = p.theme.primary();
    p.text(x, y + 14.0, &format!("Step {} of {}", step.get(), STEP_COUNT), 14.0, Weight::Bold, primary);
    y += 28.0;
    let title_size = p.theme.type_size(if p.narrow() { 3 } else { 4 });
    let ink = p.theme.text();
    y += p.paragraph(x, y, w, info.title, title_size, Weight::Bold, ink) + 6.0;
    let body = p.theme.type_size(0);
    y += p.paragraph(x, y, w, info.description, body, Weight::Regular, muted) + 20.0;

    if let Some(notice) = demo.notice() {
        let h = p.paragraph_height(w - 32.0, notice, 14.0, Weight::Bold) + 20.0;
        let rect = Rect::new(x, y, x + w, y + h);
        let (fill, text) = (p.theme.primary_soft(), p.theme.primary_dark());
        p.fill_rounded(rect, 12.0, fill);
        p.paragraph(x + 16.0, y + 10.0, w - 32.0, notice, 14.0, Weight::Bold, text);
        y += h + 16.0;
    }

    let card_top = y;
    let inner = Rect::new(x + PANEL_PAD, y + PANEL_PAD, x + w - PANEL_PAD, y + PANEL_PAD);
    // Panel height first: the card frame is painted before its contents.
    let height = match demo.panel() {
        ActivePanel::Drawing(sketch) => drawing_height(p, inner.width(), sketch),
        ActivePanel::Generation(_) => 360.0,
        ActivePanel::Chat(_) => CHAT_HEIGHT,
        ActivePanel::Interaction(panel) => interaction_height(panel),
    };
    let card = Rect::new(x, card_top, x + w, card_top + height + 2.0 * PANEL_PAD);
    let (surface, border) = (p.theme.surface(), p.theme.border());
    let radius = p.theme.radii.card;
    p.fill_rounded(card, radius, surface);
    p.stroke_rounded(card, radius, 1.0, border);

    let area = Rect::new(inner.x0, inner.y0, inner.x1, inner.y0 + height);
    match demo.panel() {
        ActivePanel::Drawing(sketch) => paint_drawing(p, area, sketch),
        ActivePanel::Generation(panel) => paint_generation(p, area, panel),
        ActivePanel::Chat(panel) => paint_chat(p, area, panel, draft),
        ActivePanel::Interaction(panel) => paint_interaction(p, area, panel),
    }

    card.y1 + 64.0 - top
}

// --- Stepper ---------------------------------------------------------------

fn paint_stepper(p: &mut Painter<'_>, x: f64, w: f64, top: f64, current: StepId) -> f64 {
    let radius = 20.0;
    let cy = top + radius;
    let first = x + radius;
    let span = w - 2.0 * radius;
    let gap = span / f64::from(STEP_COUNT - 1);

    let (track, fill) = (p.theme.border(), p.theme.primary());
    p.progress_bar(Rect::new(first, cy - 2.0, first + span, cy + 2.0), progress_fraction(current), track, fill);

    let show_titles = !p.narrow();
    for (i, step) in StepId::all().enumerate() {
        let center = Point::new(first + i as f64 * gap, cy);
        let status = StepStatus::of(step, current);
        let (disc, ink) = match status {
            StepStatus::Done => (p.theme.primary(), p.theme.surface()),
            StepStatus::Current => (p.theme.primary_dark(), p.theme.surface()),
            StepStatus::Upcoming => (p.theme.muted_surface(), p.theme.text_muted()),
        };
        p.circle(center, radius, disc);
        if status == StepStatus::Current {
            let halo = p.theme.primary_soft();
            p.ring(center, radius + 4.0, 4.0, halo);
        }
        let label = match status {
            StepStatus::Done => "✓".to_string(),
            _ => step.get().to_string(),
        };
        p.text_centered(center.x, center.y + 6.0, &label, 16.0, Weight::Bold, ink);
        p.hit(
            Rect::from_center_size(center, (2.0 * radius, 2.0 * radius)),
            act(DemoAction::JumpTo(step.get())),
        );

        if show_titles {
            let title_ink = if status == StepStatus::Upcoming {
                p.theme.text_muted()
            } else {
                p.theme.text()
            };
            let title = step.info().title;
            let size = 12.0;
            let baseline = cy + radius + 20.0;
            if i == 0 {
                p.text(center.x - radius, baseline, title, size, Weight::Bold, title_ink);
            } else if step.is_last() {
                p.text_right(center.x + radius, baseline, title, size, Weight::Bold, title_ink);
            } else {
                p.text_centered(center.x, baseline, title, size, Weight::Bold, title_ink);
            }
        }
    }
    cy + radius + if show_titles { 28.0 } else { 0.0 }
}

// --- Step 1: drawing -------------------------------------------------------

fn canvas_size(width: f64, sketch: &Sketch) -> (f64, f64) {
    let (cw, ch) = sketch.size();
    let aspect = f64::from(ch.max(1)) / f64::from(cw.max(1));
    (width, width * aspect)
}

fn sidebar_width(p: &Painter<'_>) -> Option<f64> {
    (!p.narrow()).then_some(256.0)
}

fn drawing_height(p: &Painter<'_>, width: f64, sketch: &Sketch) -> f64 {
    let canvas_w = match sidebar_width(p) {
        Some(side) => width - side - PANEL_PAD,
        None => width,
    };
    let (_, h) = canvas_size(canvas_w, sketch);
    let base = h + 16.0 + 48.0;
    if let Some(side) = sidebar_width(p) {
        base.max(tip_height(p, side) + 80.0)
    } else {
        base + 16.0 + tip_height(p, width) + 16.0 + 56.0
    }
}

fn tip_height(p: &Painter<'_>, width: f64) -> f64 {
    p.paragraph_height(width - 40.0, DRAW_TIP, 14.0, Weight::Regular) + 64.0
}

fn paint_drawing(p: &mut Painter<'_>, area: Rect, sketch: &Sketch) {
    let side = sidebar_width(p);
    let canvas_w = match side {
        Some(s) => area.width() - s - PANEL_PAD,
        None => area.width(),
    };
    let (cw, ch) = canvas_size(canvas_w, sketch);
    let canvas = Rect::new(area.x0, area.y0, area.x0 + cw, area.y0 + ch);

    let (white, border) = (p.theme.surface(), p.theme.border());
    let radius = p.theme.radii.canvas;
    p.fill_rounded(canvas, radius, white);
    p.stroke_rounded(canvas, radius, 2.0, border);
    p.canvas_region(canvas);

    let (pw, ph) = sketch.size();
    let scale = cw / f64::from(pw.max(1));
    let placement = Affine::translate((canvas.x0, canvas.y0)) * Affine::scale_non_uniform(scale, ch / f64::from(ph.max(1)));
    let style = Stroke::new(sketch.line_width())
        .with_caps(Cap::Round)
        .with_join(Join::Round);
    for stroke in sketch.strokes() {
        // A lone point paints nothing, matching the snapshot raster.
        let [first, rest @ ..] = stroke.points.as_slice() else { continue };
        if rest.is_empty() {
            continue;
        }
        let mut path = BezPath::new();
        path.move_to((first.x, first.y));
        for point in rest {
            path.line_to((point.x, point.y));
        }
        p.stroke_path(&path, &style, placement, to_color(stroke.color));
    }

    // Palette and clear button under the canvas.
    let row = canvas.y1 + 16.0;
    let swatch = 32.0;
    let palette = sketch.palette();
    let tray = Rect::new(canvas.x0, row, canvas.x0 + 16.0 + palette.len() as f64 * (swatch + 8.0), row + 48.0);
    let tray_fill = p.theme.muted_surface();
    p.fill_rounded(tray, 24.0, tray_fill);
    for (i, ink) in palette.iter().enumerate() {
        let center = Point::new(tray.x0 + 12.0 + swatch / 2.0 + i as f64 * (swatch + 8.0), tray.center().y);
        p.circle(center, swatch / 2.0, to_color(*ink));
        if *ink == sketch.color() {
            let ring = p.theme.text();
            p.ring(center, swatch / 2.0 + 2.0, 2.0, ring);
        }
        p.hit(
            Rect::from_center_size(center, (swatch, swatch)),
            act(DemoAction::SetColor(i)),
        );
    }
    let clear = Rect::new(tray.x1 + 12.0, row + 4.0, tray.x1 + 100.0, row + 44.0);
    let (fill, ink) = (p.theme.border(), p.theme.text());
    p.button(clear, "Clear", 14.0, fill, ink, act(DemoAction::ClearCanvas));

    let (tip_rect, create) = match side {
        Some(s) => {
            let left = area.x1 - s;
            let tip = Rect::new(left, area.y0, area.x1, area.y0 + tip_height(p, s));
            let button = Rect::new(left, tip.y1 + 24.0, area.x1, tip.y1 + 80.0);
            (tip, button)
        }
        None => {
            let top = row + 64.0;
            let tip = Rect::new(area.x0, top, area.x1, top + tip_height(p, area.width()));
            let button = Rect::new(area.x0, tip.y1 + 16.0, area.x1, tip.y1 + 72.0);
            (tip, button)
        }
    };
    let (tip_fill, tip_ink) = (p.theme.accent_soft(), p.theme.text());
    p.fill_rounded(tip_rect, p.theme.radii.card, tip_fill);
    p.text(tip_rect.x0 + 20.0, tip_rect.y0 + 32.0, DRAW_TIP_TITLE, 16.0, Weight::Bold, tip_ink);
    let muted = p.theme.text_muted();
    p.paragraph(tip_rect.x0 + 20.0, tip_rect.y0 + 44.0, tip_rect.width() - 40.0, DRAW_TIP, 14.0, Weight::Regular, muted);

    let (primary, white) = (p.theme.primary(), p.theme.surface());
    let label = p.theme.type_size(1);
    p.button(create, "Create Character", label, primary, white, act(DemoAction::CreateCharacter));
}

// --- Step 2: generation ----------------------------------------------------

/// A round friend with eyes and a smile, bobbing with time.
fn paint_character(p: &mut Painter<'_>, center: Point, radius: f64) {
    let bob = (p.elapsed * 2.5).sin() * radius * 0.06;
    let c = Point::new(center.x, center.y + bob);
    let (body, cheek, eye) = (p.theme.primary(), p.theme.primary_soft(), p.theme.text());
    p.circle(c, radius, body);
    p.circle(Point::new(c.x - radius * 0.55, c.y + radius * 0.15), radius * 0.14, cheek);
    p.circle(Point::new(c.x + radius * 0.55, c.y + radius * 0.15), radius * 0.14, cheek);
    let white = p.theme.surface();
    for dx in [-0.3, 0.3] {
        let e = Point::new(c.x + radius * dx, c.y - radius * 0.15);
        p.circle(e, radius * 0.16, white);
        p.circle(e, radius * 0.08, eye);
    }
    let mut smile = BezPath::new();
    smile.move_to((c.x - radius * 0.3, c.y + radius * 0.25));
    smile.quad_to((c.x, c.y + radius * 0.55), (c.x + radius * 0.3, c.y + radius * 0.25));
    let style = Stroke::new(radius * 0.08).with_caps(Cap::Round);
    p.stroke_path(&smile, &style, Affine::IDENTITY, white);
}

fn paint_spinner(p: &mut Painter<'_>, center: Point, radius: f64) {
    let track = p.theme.muted_surface();
    p.ring(center, radius, 8.0, track);
    let fill = p.theme.primary();
    let turn = p.elapsed * std::f64::consts::TAU * 0.8;
    for k in 0..6 {
        let angle = turn - f64::from(k) * 0.22;
        let dot = Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin());
        p.circle(dot, 6.0 - f64::from(k) * 0.7, fill);
    }
}

fn paint_generation(p: &mut Painter<'_>, area: Rect, panel: &GenerationPanel) {
    let cx = area.center().x;
    let (ink, muted) = (p.theme.text(), p.theme.text_muted());
    match panel.view() {
        GenerationView::Loading => {
            paint_spinner(p, Point::new(cx, area.y0 + 110.0), 56.0);
            let size = p.theme.type_size(2);
            p.text_centered(cx, area.y0 + 220.0, LOADING_TITLE, size, Weight::Bold, ink);
            p.text_centered(cx, area.y0 + 252.0, LOADING_SUBTITLE, 15.0, Weight::Regular, muted);
        }
        GenerationView::Ready(character) => {
            let stage = Rect::new(cx - 150.0, area.y0, cx + 150.0, area.y0 + 220.0);
            let backdrop = p.theme.accent_soft();
            p.fill_rounded(stage, p.theme.radii.card, backdrop);
            paint_character(p, stage.center(), 64.0);

            let badge_w = p.measure(AR_BADGE, 12.0, Weight::Bold) + 20.0;
            let badge = Rect::new(stage.x1 - badge_w - 10.0, stage.y0 + 10.0, stage.x1 - 10.0, stage.y0 + 34.0);
            let (badge_fill, white) = (p.theme.success(), p.theme.surface());
            p.fill_rounded(badge, 12.0, badge_fill);
            p.text_centered(badge.center().x, badge.y1 - 8.0, AR_BADGE, 12.0, Weight::Bold, white);

            p.text_centered(cx, stage.y1 + 28.0, &character.descriptor, 16.0, Weight::Bold, ink);
            let line_w = area.width().min(520.0);
            p.paragraph_aligned(cx - line_w / 2.0, stage.y1 + 40.0, line_w, READY_LINE, 14.0, Weight::Regular, muted, true);

            let button = Rect::new(cx - 130.0, area.y1 - 52.0, cx + 130.0, area.y1);
            let primary = p.theme.primary();
            p.button(button, "Start Conversation", 16.0, primary, white, act(DemoAction::StartConversation));
        }
        GenerationView::Failed(message) => {
            let warn = p.theme.primary_dark();
            p.text_centered(cx, area.y0 + 120.0, "Something went wrong", p.theme.type_size(2), Weight::Bold, warn);
            let line_w = area.width().min(520.0);
            p.paragraph_aligned(cx - line_w / 2.0, area.y0 + 140.0, line_w, message, 15.0, Weight::Regular, muted, true);
            let button = Rect::new(cx - 100.0, area.y0 + 220.0, cx + 100.0, area.y0 + 272.0);
            p.outline_button(button, "Try Again", 16.0, ink, act(DemoAction::RetryGeneration));
        }
    }
}

// --- Step 3: chat ----------------------------------------------------------

fn paint_chat(p: &mut Painter<'_>, area: Rect, panel: &ChatPanel, draft: &str) {
    let (ink, muted, border) = (p.theme.text(), p.theme.text_muted(), p.theme.border());
    let background = p.theme.background();
    p.fill_rounded(area, p.theme.radii.card, background);

    // Header.
    let header = Rect::new(area.x0, area.y0, area.x1, area.y0 + 64.0);
    let avatar = Point::new(header.x0 + 36.0, header.center().y);
    let soft = p.theme.primary_soft();
    p.circle(avatar, 20.0, soft);
    paint_character(p, avatar, 12.0);
    p.text(avatar.x + 32.0, header.center().y - 2.0, CHAT_TITLE, 16.0, Weight::Bold, ink);
    let online = p.theme.success();
    p.circle(Point::new(avatar.x + 36.0, header.center().y + 14.0), 4.0, online);
    p.text(avatar.x + 46.0, header.center().y + 18.0, CHAT_STATUS, 12.0, Weight::Bold, online);
    let skip_w = p.measure(SKIP_LABEL, 14.0, Weight::Bold) + 24.0;
    let skip = Rect::new(header.x1 - skip_w - 16.0, header.center().y - 16.0, header.x1 - 16.0, header.center().y + 16.0);
    let secondary = p.theme.secondary();
    p.text_centered(skip.center().x, skip.center().y + 5.0, SKIP_LABEL, 14.0, Weight::Bold, secondary);
    p.hit(skip, act(DemoAction::SkipToInteraction));
    p.fill_rect(Rect::new(area.x0, header.y1, area.x1, header.y1 + 1.0), border);

    // Input area, bottom up.
    let input = Rect::new(area.x0 + 16.0, area.y1 - 64.0, area.x1 - 16.0, area.y1 - 16.0);
    let surface = p.theme.surface();
    p.fill_rounded(input, 12.0, surface);
    p.stroke_rounded(input, 12.0, 1.0, border);
    let (shown, shown_ink) = if draft.is_empty() {
        (CHAT_PLACEHOLDER, muted)
    } else {
        (draft, ink)
    };
    p.text(input.x0 + 16.0, input.center().y + 5.0, shown, 15.0, Weight::Regular, shown_ink);
    let send = Rect::new(input.x1 - 72.0, input.y0 + 6.0, input.x1 - 6.0, input.y1 - 6.0);
    let white = p.theme.surface();
    p.button(send, "Send", 14.0, secondary, white, UiAction::SubmitDraft);

    let chips_y = input.y0 - 48.0;
    let mut chip_x = area.x0 + 16.0;
    let chip_fill = p.theme.muted_surface();
    for (i, reply) in QUICK_REPLIES.iter().enumerate() {
        let chip_w = p.measure(reply, 13.0, Weight::Bold) + 28.0;
        if chip_x + chip_w > area.x1 - 16.0 {
            break;
        }
        let chip = Rect::new(chip_x, chips_y, chip_x + chip_w, chips_y + 36.0);
        p.fill_rounded(chip, 18.0, chip_fill);
        p.text_centered(chip.center().x, chip.center().y + 5.0, reply, 13.0, Weight::Bold, muted);
        p.hit(chip, act(DemoAction::QuickReply(i)));
        chip_x = chip.x1 + 8.0;
    }

    // Messages: newest at the bottom, older ones dropped once out of room.
    let messages = Rect::new(area.x0 + 20.0, header.y1 + 16.0, area.x1 - 20.0, chips_y - 12.0);
    let max_bubble = messages.width() * 0.8;
    let mut bottom = messages.y1;
    if panel.is_typing() {
        let bubble = Rect::new(messages.x0, bottom - 40.0, messages.x0 + 72.0, bottom);
        p.fill_rounded(bubble, 16.0, surface);
        for k in 0..3 {
            let phase = (p.elapsed * 6.0 - f64::from(k)).sin() * 3.0;
            p.circle(Point::new(bubble.x0 + 20.0 + f64::from(k) * 16.0, bubble.center().y + phase), 4.0, muted);
        }
        bottom = bubble.y0 - BUBBLE_GAP;
    }
    let size = 15.0;
    for message in panel.transcript().iter().rev() {
        let text_w = p.measure(&message.text, size, Weight::Regular).min(max_bubble - 2.0 * BUBBLE_PAD);
        let text_h = p.paragraph_height(text_w + 1.0, &message.text, size, Weight::Regular);
        let h = text_h + 2.0 * BUBBLE_PAD;
        if bottom - h < messages.y0 {
            break;
        }
        let w = text_w + 2.0 * BUBBLE_PAD;
        let (left, fill, text_ink) = match message.role {
            Role::Child => (messages.x1 - w, secondary, white),
            Role::Character => (messages.x0, surface, ink),
        };
        let bubble = Rect::new(left, bottom - h, left + w, bottom);
        p.fill_rounded(bubble, 16.0, fill);
        if message.role == Role::Character {
            p.stroke_rounded(bubble, 16.0, 1.0, border);
        }
        p.paragraph(bubble.x0 + BUBBLE_PAD, bubble.y0 + BUBBLE_PAD, text_w + 1.0, &message.text, size, Weight::Regular, text_ink);
        bottom = bubble.y0 - BUBBLE_GAP;
    }
}

// --- Step 4: interaction ---------------------------------------------------

fn interaction_height(panel: &InteractionPanel) -> f64 {
    match panel.tab() {
        InteractionTab::HighFive => 420.0,
        InteractionTab::Loading => 340.0,
    }
}

fn paint_interaction(p: &mut Painter<'_>, area: Rect, panel: &InteractionPanel) {
    let cx = area.center().x;
    let tabs = [InteractionTab::HighFive, InteractionTab::Loading];
    let tab_w = 180.0;
    let strip = Rect::new(cx - tab_w - 6.0, area.y0, cx + tab_w + 6.0, area.y0 + 48.0);
    let strip_fill = p.theme.muted_surface();
    p.fill_rounded(strip, 24.0, strip_fill);
    for (i, tab) in tabs.into_iter().enumerate() {
        let left = strip.x0 + 6.0 + i as f64 * tab_w;
        let rect = Rect::new(left, strip.y0 + 6.0, left + tab_w, strip.y1 - 6.0);
        let ink = if panel.tab() == tab {
            let white = p.theme.surface();
            p.fill_rounded(rect, 18.0, white);
            p.theme.text()
        } else {
            p.theme.text_muted()
        };
        p.text_centered(rect.center().x, rect.center().y + 5.0, tab.label(), 14.0, Weight::Bold, ink);
        p.hit(rect, act(DemoAction::SelectTab(tab)));
    }

    let body = Rect::new(area.x0, strip.y1 + 24.0, area.x1, area.y1);
    match panel.tab() {
        InteractionTab::HighFive => paint_high_five(p, body, panel),
        InteractionTab::Loading => paint_loading(p, body, panel),
    }
}

fn paint_high_five(p: &mut Painter<'_>, area: Rect, panel: &InteractionPanel) {
    let cx = area.center().x;
    let muted = p.theme.text_muted();
    let line_w = area.width().min(520.0);
    let h = p.paragraph_aligned(cx - line_w / 2.0, area.y0, line_w, HIGH_FIVE_PROMPT, 14.0, Weight::Regular, muted, true);

    let character = Point::new(cx, area.y0 + h + 110.0);
    paint_character(p, character, 64.0);

    if let Some(feedback) = panel.high_five_feedback() {
        let text_w = p.measure(feedback, 15.0, Weight::Bold);
        let bubble = Rect::new(cx - text_w / 2.0 - 16.0, character.y - 132.0, cx + text_w / 2.0 + 16.0, character.y - 92.0);
        let (fill, ink) = (p.theme.surface(), p.theme.text());
        let border = p.theme.border();
        p.fill_rounded(bubble, 20.0, fill);
        p.stroke_rounded(bubble, 20.0, 1.0, border);
        p.text_centered(cx, bubble.center().y + 5.0, feedback, 15.0, Weight::Bold, ink);
    }

    let button = Rect::new(cx - 100.0, area.y1 - 56.0, cx + 100.0, area.y1);
    let (fill, white) = (p.theme.secondary(), p.theme.surface());
    p.button(button, "High Five!", p.theme.type_size(1), fill, white, act(DemoAction::HighFive));
}

fn paint_loading(p: &mut Painter<'_>, area: Rect, panel: &InteractionPanel) {
    let cx = area.center().x;
    let (ink, muted) = (p.theme.text(), p.theme.text_muted());
    let view = panel.loading();
    let white = p.theme.surface();

    if view.phase == LoadingPhase::Idle {
        p.text_centered(cx, area.y0 + 60.0, LOADING_PROMPT, 15.0, Weight::Regular, muted);
        let button = Rect::new(cx - 110.0, area.y0 + 88.0, cx + 110.0, area.y0 + 140.0);
        let accent = p.theme.accent();
        p.button(button, "Simulate Loading", 16.0, accent, white, act(DemoAction::StartLoading));
        return;
    }

    let card_w = area.width().min(448.0);
    let card = Rect::new(cx - card_w / 2.0, area.y0, cx + card_w / 2.0, area.y0 + 230.0);
    let border = p.theme.border();
    p.fill_rounded(card, p.theme.radii.card, white);
    p.stroke_rounded(card, p.theme.radii.card, 1.0, border);

    let pad = 24.0;
    let soft = p.theme.accent_soft();
    let icon = Rect::new(card.x0 + pad, card.y0 + pad, card.x0 + pad + 40.0, card.y0 + pad + 40.0);
    p.fill_rounded(icon, 10.0, soft);
    let pulse = 0.7 + 0.3 * (p.elapsed * 3.0).sin().abs();
    let accent = p.theme.accent();
    p.ring(icon.center(), 10.0 * pulse, 3.0, accent);

    p.text(icon.x1 + 12.0, icon.y0 + 18.0, stage_caption(view.progress), 17.0, Weight::Bold, ink);
    p.text(icon.x1 + 12.0, icon.y1, &format!("STEP {} OF 4", view.stage), 11.0, Weight::Bold, muted);

    let bar = Rect::new(card.x0 + pad, icon.y1 + 20.0, card.x1 - pad, icon.y1 + 36.0);
    let track = p.theme.muted_surface();
    p.progress_bar(bar, f64::from(view.progress) / 100.0, track, accent);
    p.text_right(bar.x1, bar.y1 + 20.0, &format!("{}%", view.progress), 12.0, Weight::Bold, muted);

    // One dot per stage; reached stages are filled.
    for stage in 1..=4u8 {
        let dot = Point::new(bar.x0 + 6.0 + f64::from(stage - 1) * 18.0, bar.y1 + 14.0);
        let fill = if stage <= view.stage { accent } else { track };
        p.circle(dot, 5.0, fill);
    }

    let comfort = Rect::new(card.x0 + pad, bar.y1 + 36.0, card.x1 - pad, bar.y1 + 72.0);
    let background = p.theme.background();
    p.fill_rounded(comfort, 8.0, background);
    p.text_centered(cx, comfort.center().y + 5.0, &format!("\"{COMFORT_LINE}\""), 13.0, Weight::Regular, muted);

    if view.phase == LoadingPhase::Complete {
        let button = Rect::new(cx - 100.0, card.y1 + 20.0, cx + 100.0, card.y1 + 64.0);
        p.outline_button(button, "Reset Simulation", 14.0, ink, act(DemoAction::ResetLoading));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_canvas_scales_into_pixel_space() {
        let rect = Rect::new(100.0, 50.0, 400.0, 250.0);
        let point = to_canvas(Point::new(250.0, 150.0), rect, (600, 400)).unwrap();
        assert_eq!(point, CanvasPoint::new(300.0, 200.0));
    }

    #[test]
    fn to_canvas_maps_corners() {
        let rect = Rect::new(0.0, 0.0, 300.0, 200.0);
        assert_eq!(to_canvas(Point::new(0.0, 0.0), rect, (600, 400)), Some(CanvasPoint::new(0.0, 0.0)));
        assert_eq!(
            to_canvas(Point::new(300.0, 200.0), rect, (600, 400)),
            Some(CanvasPoint::new(600.0, 400.0))
        );
    }

    #[test]
    fn to_canvas_rejects_outside_points() {
        let rect = Rect::new(10.0, 10.0, 110.0, 110.0);
        assert_eq!(to_canvas(Point::new(5.0, 50.0), rect, (100, 100)), None);
        assert_eq!(to_canvas(Point::new(50.0, 111.0), rect, (100, 100)), None);
    }

    #[test]
    fn to_canvas_rejects_degenerate_rect() {
        let rect = Rect::new(10.0, 10.0, 10.0, 50.0);
        assert_eq!(to_canvas(Point::new(10.0, 20.0), rect, (100, 100)), None);
    }
}
