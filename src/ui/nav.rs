//! Top navigation bar.

use vello::kurbo::{Point, Rect};

use crate::content::BRAND;
use crate::route::{NAV_LINKS, Route};
use crate::ui::UiAction;
use crate::ui::paint::{Painter, Weight};

const LINK_SIZE: f64 = 16.0;
const LINK_PAD_X: f64 = 16.0;
const LINK_GAP: f64 = 12.0;

pub fn paint(p: &mut Painter<'_>, active: Route, menu_open: bool) {
    let h = p.theme.layout.nav_height;
    let w = p.width;
    let gutter = p.theme.layout.gutter;

    let surface = p.theme.surface();
    let border = p.theme.primary_soft();
    p.fill_rect(Rect::new(0.0, 0.0, w, h), surface);
    p.fill_rect(Rect::new(0.0, h - 1.0, w, h), border);
    p.block(Rect::new(0.0, 0.0, w, h));

    // Brand: heart badge plus wordmark, links home.
    let badge = Rect::new(gutter, h / 2.0 - 18.0, gutter + 36.0, h / 2.0 + 18.0);
    let primary = p.theme.primary();
    p.fill_rounded(badge, 12.0, primary);
    let white = p.theme.surface();
    p.circle(Point::new(badge.center().x - 5.0, badge.center().y - 3.0), 6.0, white);
    p.circle(Point::new(badge.center().x + 5.0, badge.center().y - 3.0), 6.0, white);
    p.fill_rect(
        Rect::new(badge.center().x - 8.0, badge.center().y - 2.0, badge.center().x + 8.0, badge.center().y + 4.0),
        white,
    );
    let brand_size = p.theme.type_size(2);
    let brand_w = p.text(badge.x1 + 10.0, h / 2.0 + brand_size * 0.35, BRAND, brand_size, Weight::Bold, primary);
    p.hit(
        Rect::new(badge.x0, 0.0, badge.x1 + 10.0 + brand_w, h),
        UiAction::Navigate(Route::Home),
    );

    if p.narrow() {
        paint_menu_toggle(p, menu_open);
        if menu_open {
            paint_dropdown(p, active);
        }
    } else {
        paint_links(p, active);
    }
}

fn paint_links(p: &mut Painter<'_>, active: Route) {
    let h = p.theme.layout.nav_height;
    let mut right = p.width - p.theme.layout.gutter;
    for link in NAV_LINKS.iter().rev() {
        let label_w = p.measure(link.label, LINK_SIZE, Weight::Bold);
        let rect = Rect::new(right - label_w - 2.0 * LINK_PAD_X, h / 2.0 - 18.0, right, h / 2.0 + 18.0);
        paint_link(p, rect, link.label, link.route == active);
        p.hit(rect, UiAction::Navigate(link.route));
        right = rect.x0 - LINK_GAP;
    }
}

fn paint_link(p: &mut Painter<'_>, rect: Rect, label: &str, active: bool) {
    let ink = if active {
        p.fill_rounded(rect, rect.height() / 2.0, p.theme.primary_soft());
        p.theme.primary_dark()
    } else {
        p.theme.text_muted()
    };
    p.text_centered(rect.center().x, rect.center().y + LINK_SIZE * 0.35, label, LINK_SIZE, Weight::Bold, ink);
}

fn paint_menu_toggle(p: &mut Painter<'_>, open: bool) {
    let h = p.theme.layout.nav_height;
    let right = p.width - p.theme.layout.gutter;
    let rect = Rect::new(right - 40.0, h / 2.0 - 20.0, right, h / 2.0 + 20.0);
    let ink = p.theme.text_muted();
    if open {
        p.text_centered(rect.center().x, rect.center().y + 8.0, "×", 26.0, Weight::Regular, ink);
    } else {
        for i in -1..=1 {
            let y = rect.center().y + f64::from(i) * 7.0;
            p.fill_rounded(Rect::new(rect.x0 + 10.0, y - 1.5, rect.x1 - 10.0, y + 1.5), 1.5, ink);
        }
    }
    p.hit(rect, UiAction::ToggleMenu);
}

fn paint_dropdown(p: &mut Painter<'_>, active: Route) {
    let top = p.theme.layout.nav_height;
    let row = 48.0;
    let panel = Rect::new(0.0, top, p.width, top + row * NAV_LINKS.len() as f64 + 16.0);
    let surface = p.theme.surface();
    let border = p.theme.border();
    p.fill_rect(panel, surface);
    p.fill_rect(Rect::new(0.0, panel.y1 - 1.0, p.width, panel.y1), border);
    p.block(panel);

    let gutter = p.theme.layout.gutter;
    for (i, link) in NAV_LINKS.iter().enumerate() {
        let y = top + 8.0 + i as f64 * row;
        let rect = Rect::new(gutter, y, p.width - gutter, y + row - 8.0);
        let (fill, ink) = if link.route == active {
            (p.theme.primary_soft(), p.theme.primary_dark())
        } else {
            (p.theme.surface(), p.theme.text())
        };
        p.fill_rounded(rect, 12.0, fill);
        p.text(rect.x0 + 16.0, rect.center().y + 6.0, link.label, 17.0, Weight::Bold, ink);
        p.hit(rect, UiAction::Navigate(link.route));
    }
}
