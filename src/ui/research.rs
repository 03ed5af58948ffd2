//! Research page: motivation, iteration timeline, anxiety chart.

use vello::kurbo::{Point, Rect};

use crate::content::{
    ANXIETY_CHART, Accent, CHART_TITLE, ChartBar, ITERATIONS, PROBLEM_BODY, PROBLEM_TITLE,
    RESEARCH_HEADING, RESEARCH_INTRO, USERS_BODY, USERS_TITLE,
};
use crate::ui::paint::{Painter, Weight};

const CARD_PAD: f64 = 32.0;
const TIMELINE_INDENT: f64 = 56.0;

pub fn paint(p: &mut Painter<'_>, top: f64) -> f64 {
    let (x, w) = p.column(960.0);
    let narrow = p.narrow();
    let (ink, muted) = (p.theme.text(), p.theme.text_muted());
    let mut y = top + 64.0;

    let heading = p.theme.type_size(if narrow { 3 } else { 5 });
    y += p.paragraph_aligned(x, y, w, RESEARCH_HEADING, heading, Weight::Bold, ink, true);
    y += 16.0;
    let intro_size = p.theme.type_size(1);
    y += p.paragraph_aligned(x, y, w, RESEARCH_INTRO, intro_size, Weight::Regular, muted, true);
    y += 56.0;

    // Problem statement and target users: two cards, stacked when narrow.
    let gap = 32.0;
    let cards = [(PROBLEM_TITLE, PROBLEM_BODY), (USERS_TITLE, USERS_BODY)];
    let card_w = if narrow { w } else { (w - gap) / 2.0 };
    let body = p.theme.type_size(0);
    let card_h = cards
        .iter()
        .map(|(_, text)| p.paragraph_height(card_w - 2.0 * CARD_PAD, text, body, Weight::Regular))
        .fold(0.0, f64::max)
        + 2.0 * CARD_PAD
        + 48.0;
    for (i, (title, text)) in cards.iter().enumerate() {
        let (left, card_top) = if narrow {
            (x, y + i as f64 * (card_h + gap))
        } else {
            (x + i as f64 * (card_w + gap), y)
        };
        let card = Rect::new(left, card_top, left + card_w, card_top + card_h);
        card_background(p, card);
        let title_size = p.theme.type_size(2);
        p.text(card.x0 + CARD_PAD, card.y0 + CARD_PAD + title_size, title, title_size, Weight::Bold, ink);
        p.paragraph(card.x0 + CARD_PAD, card.y0 + CARD_PAD + 48.0, card_w - 2.0 * CARD_PAD, text, body, Weight::Regular, muted);
    }
    y += if narrow { 2.0 * card_h + gap } else { card_h };
    y += 64.0;

    // Iteration timeline.
    let line_x = x + 20.0;
    let timeline_top = y;
    let card_left = x + TIMELINE_INDENT;
    let card_w = w - TIMELINE_INDENT;
    let mut dots = Vec::with_capacity(ITERATIONS.len());
    for iteration in &ITERATIONS {
        let text_w = card_w - 2.0 * CARD_PAD;
        let summary_size = p.theme.type_size(1);
        let mut h = CARD_PAD + 40.0;
        h += p.paragraph_height(text_w, iteration.summary, summary_size, Weight::Bold) + 8.0;
        h += p.paragraph_height(text_w, iteration.insight, body, Weight::Regular);
        if iteration.has_chart {
            h += 24.0 + chart_height();
        }
        h += CARD_PAD;

        let card = Rect::new(card_left, y, card_left + card_w, y + h);
        card_background(p, card);

        let (pill_fill, pill_ink) = pill_colors(p, iteration.accent);
        let pill_w = p.measure(iteration.title, 13.0, Weight::Bold) + 24.0;
        let pill = Rect::new(card.x0 + CARD_PAD, card.y0 + CARD_PAD, card.x0 + CARD_PAD + pill_w, card.y0 + CARD_PAD + 26.0);
        p.fill_rounded(pill, 13.0, pill_fill);
        p.text(pill.x0 + 12.0, pill.y1 - 8.0, iteration.title, 13.0, Weight::Bold, pill_ink);

        let mut cy = pill.y1 + 14.0;
        cy += p.paragraph(card.x0 + CARD_PAD, cy, text_w, iteration.summary, summary_size, Weight::Bold, ink) + 8.0;
        cy += p.paragraph(card.x0 + CARD_PAD, cy, text_w, iteration.insight, body, Weight::Regular, muted);
        if iteration.has_chart {
            paint_chart(p, Rect::new(card.x0 + CARD_PAD, cy + 24.0, card.x1 - CARD_PAD, cy + 24.0 + chart_height()));
        }

        dots.push(card.y0 + 20.0);
        y = card.y1 + 48.0;
    }

    let rail = p.theme.border();
    p.fill_rect(Rect::new(line_x - 2.0, timeline_top, line_x + 2.0, y - 48.0), rail);
    let (surface, dot_ink) = (p.theme.surface(), p.theme.text_muted());
    for (i, dot_y) in dots.into_iter().enumerate() {
        let center = Point::new(line_x, dot_y);
        p.circle(center, 20.0, surface);
        p.ring(center, 18.0, 4.0, rail);
        p.text_centered(line_x, dot_y + 6.0, &(i + 1).to_string(), 16.0, Weight::Bold, dot_ink);
    }

    y + 16.0 - top
}

fn card_background(p: &mut Painter<'_>, card: Rect) {
    let (surface, border) = (p.theme.surface(), p.theme.border());
    let radius = p.theme.radii.card;
    p.fill_rounded(card, radius, surface);
    p.stroke_rounded(card, radius, 1.0, border);
}

fn pill_colors(p: &Painter<'_>, accent: Accent) -> (vello::peniko::Color, vello::peniko::Color) {
    match accent {
        Accent::Primary => (p.theme.primary_soft(), p.theme.primary_dark()),
        Accent::Accent => (p.theme.accent_soft(), p.theme.text()),
        Accent::Secondary => (p.theme.muted_surface(), p.theme.secondary()),
    }
}

const BAR_ROW: f64 = 48.0;

fn chart_height() -> f64 {
    56.0 + ANXIETY_CHART.len() as f64 * BAR_ROW + 8.0
}

fn paint_chart(p: &mut Painter<'_>, area: Rect) {
    let (fill, border) = (p.theme.background(), p.theme.border());
    p.fill_rounded(area, 12.0, fill);
    p.stroke_rounded(area, 12.0, 1.0, border);

    let pad = 20.0;
    let ink = p.theme.text();
    p.text(area.x0 + pad, area.y0 + pad + 12.0, CHART_TITLE, 12.0, Weight::Bold, ink);

    let mut y = area.y0 + 56.0;
    for bar in &ANXIETY_CHART {
        paint_bar(p, Rect::new(area.x0 + pad, y, area.x1 - pad, y + BAR_ROW), bar);
        y += BAR_ROW;
    }
}

fn paint_bar(p: &mut Painter<'_>, row: Rect, bar: &ChartBar) {
    let (label_ink, fill) = if bar.highlighted {
        (p.theme.primary_dark(), p.theme.accent())
    } else {
        (p.theme.text_muted(), p.theme.text_muted())
    };
    p.text(row.x0, row.y0 + 12.0, bar.label, 12.0, Weight::Bold, label_ink);
    p.text_right(row.x1, row.y0 + 12.0, bar.value_label, 12.0, Weight::Bold, label_ink);
    let track = p.theme.border();
    // The highlighted bar breathes slowly, like a pulse.
    let fraction = if bar.highlighted {
        bar.fraction() * (0.96 + 0.04 * (p.elapsed * 2.0).sin())
    } else {
        bar.fraction()
    };
    p.progress_bar(Rect::new(row.x0, row.y0 + 20.0, row.x1, row.y0 + 36.0), fraction, track, fill);
}
