//! Landing page: hero, calls to action, value cards, team.

use vello::kurbo::{Point, Rect};

use crate::content::{
    Accent, CTA_DEMO, CTA_RESEARCH, HOME_BADGE, HOME_HEADLINE, HOME_PITCH, HOME_TAGLINE, TEAM,
    TEAM_HEADING, VALUE_PROPS,
};
use crate::route::Route;
use crate::ui::UiAction;
use crate::ui::paint::{Painter, Weight};

/// Paint the page below `top`; returns the content height.
pub fn paint(p: &mut Painter<'_>, top: f64) -> f64 {
    let (x, w) = p.column(p.theme.layout.max_content_width);
    let cx = x + w / 2.0;
    let narrow = p.narrow();
    let mut y = top + if narrow { 40.0 } else { 72.0 };

    // Soft blobs behind the hero.
    let glow = p.theme.primary_soft();
    p.circle(Point::new(p.width * 0.85, top + 80.0), 180.0, glow);
    let glow = p.theme.accent_soft();
    p.circle(Point::new(p.width * 0.1, top + 420.0), 150.0, glow);

    // Badge pill.
    let badge_size = 14.0;
    let badge_w = p.measure(HOME_BADGE, badge_size, Weight::Bold) + 32.0;
    let badge = Rect::new(cx - badge_w / 2.0, y, cx + badge_w / 2.0, y + 32.0);
    let (surface, soft, primary) = (p.theme.surface(), p.theme.primary_soft(), p.theme.primary());
    p.fill_rounded(badge, 16.0, surface);
    p.stroke_rounded(badge, 16.0, 1.0, soft);
    p.text_centered(cx, badge.y1 - 10.0, HOME_BADGE, badge_size, Weight::Bold, primary);
    y = badge.y1 + 28.0;

    // Headline.
    let headline = p.theme.type_size(if narrow { 4 } else { 6 });
    let ink = p.theme.text();
    y += p.paragraph_aligned(x, y, w, HOME_HEADLINE, headline, Weight::Bold, ink, true);
    let primary_dark = p.theme.primary_dark();
    y += p.paragraph_aligned(x, y, w, HOME_TAGLINE, headline, Weight::Bold, primary_dark, true);
    y += 24.0;

    // Pitch.
    let pitch_size = p.theme.type_size(1);
    let pitch_w = w.min(680.0);
    let muted = p.theme.text_muted();
    y += p.paragraph_aligned(cx - pitch_w / 2.0, y, pitch_w, HOME_PITCH, pitch_size, Weight::Regular, muted, true);
    y += 36.0;

    // Calls to action: side by side, or stacked when narrow.
    let (btn_w, btn_h) = (220.0, 56.0);
    let label = p.theme.type_size(1);
    let (demo_rect, research_rect) = if narrow {
        let a = Rect::new(cx - btn_w / 2.0, y, cx + btn_w / 2.0, y + btn_h);
        let b = Rect::new(a.x0, a.y1 + 12.0, a.x1, a.y1 + 12.0 + btn_h);
        (a, b)
    } else {
        let a = Rect::new(cx - btn_w - 8.0, y, cx - 8.0, y + btn_h);
        let b = Rect::new(cx + 8.0, y, cx + 8.0 + btn_w, y + btn_h);
        (a, b)
    };
    let white = p.theme.surface();
    p.button(demo_rect, CTA_DEMO, label, primary, white, UiAction::Navigate(Route::Demo));
    let text = p.theme.text();
    p.outline_button(research_rect, CTA_RESEARCH, label, text, UiAction::Navigate(Route::Research));
    y = research_rect.y1 + 80.0;

    // Value propositions on a white sheet.
    let sheet_top = y;
    let card_gap = 24.0;
    let cols = if narrow { 1 } else { 3 };
    let card_w = (w - card_gap * f64::from(cols - 1)) / f64::from(cols);
    let body_size = p.theme.type_size(0);
    let card_h = VALUE_PROPS
        .iter()
        .map(|v| p.paragraph_height(card_w - 64.0, v.body, body_size, Weight::Regular))
        .fold(0.0, f64::max)
        + 170.0;
    let rows = VALUE_PROPS.len().div_ceil(cols as usize);
    let sheet_h = 80.0 + rows as f64 * (card_h + card_gap);
    p.fill_rounded(Rect::new(0.0, sheet_top, p.width, sheet_top + sheet_h + 48.0), 48.0, white);

    for (i, prop) in VALUE_PROPS.iter().enumerate() {
        let col = i % cols as usize;
        let row = i / cols as usize;
        let left = x + col as f64 * (card_w + card_gap);
        let card_top = sheet_top + 48.0 + row as f64 * (card_h + card_gap);
        let card = Rect::new(left, card_top, left + card_w, card_top + card_h);
        let fill = p.theme.accent_soft();
        p.fill_rounded(card, p.theme.radii.card, fill);

        let icon = Rect::new(card.x0 + 32.0, card.y0 + 32.0, card.x0 + 96.0, card.y0 + 96.0);
        p.fill_rounded(icon, 16.0, white);
        let accent = accent_color(p, prop.accent);
        p.circle(icon.center(), 14.0, accent);

        let title_size = p.theme.type_size(2);
        p.text(card.x0 + 32.0, icon.y1 + 40.0, prop.title, title_size, Weight::Bold, ink);
        p.paragraph(card.x0 + 32.0, icon.y1 + 56.0, card_w - 64.0, prop.body, body_size, Weight::Regular, muted);
    }
    y = sheet_top + sheet_h;

    // Team.
    let border = p.theme.border();
    p.fill_rect(Rect::new(x, y, x + w, y + 1.0), border);
    y += 48.0;
    p.text_centered(cx, y, &TEAM_HEADING.to_uppercase(), 14.0, Weight::Bold, muted);
    y += 40.0;
    let names = TEAM.join("     ");
    y += p.paragraph_aligned(x, y - body_size, w, &names, body_size, Weight::Bold, text, true);
    y += 48.0;

    y - top
}

fn accent_color(p: &Painter<'_>, accent: Accent) -> vello::peniko::Color {
    match accent {
        Accent::Primary => p.theme.primary(),
        Accent::Accent => p.theme.accent(),
        Accent::Secondary => p.theme.secondary(),
    }
}
