//! Drawing primitives and text layout on top of a vello `Scene`.
//!
//! Text goes through skrifa's charmap and glyph metrics when a system font is
//! available. Without one, each character becomes a small filled block so the
//! layout is still readable as shapes.

use vello::kurbo::{Affine, BezPath, Circle, Point, Rect, RoundedRect, Stroke, Vec2};
use vello::peniko::{Color, Fill, FontData};
use vello::{Glyph, Scene};

use crate::theme::Theme;
use crate::ui::{HitMap, UiAction};

/// Advance used for every character when no font could be loaded.
const FALLBACK_ADVANCE: f64 = 0.55;

/// Fonts used by the UI. Either may be missing.
#[derive(Default)]
pub struct Fonts {
    pub regular: Option<FontData>,
    pub bold: Option<FontData>,
}

impl Fonts {
    pub fn load() -> Self {
        let regular = load_system_font(&[
            "Optima",
            "Helvetica",
            "Arial",
            "DejaVuSans",
            "LiberationSans-Regular",
        ]);
        let bold = load_system_font(&[
            "Arial Bold",
            "DejaVuSans-Bold",
            "LiberationSans-Bold",
        ]);
        Self { regular, bold }
    }
}

/// Try each name in each common font directory; the first readable file wins.
fn load_system_font(names: &[&str]) -> Option<FontData> {
    let dirs = [
        "/System/Library/Fonts/",
        "/System/Library/Fonts/Supplemental/",
        "/Library/Fonts/",
        "/usr/share/fonts/truetype/dejavu/",
        "/usr/share/fonts/truetype/liberation/",
        "/usr/share/fonts/truetype/",
        "/usr/share/fonts/opentype/",
    ];
    let extensions = ["ttf", "otf", "ttc"];
    for name in names {
        for dir in dirs {
            for ext in extensions {
                let path = format!("{dir}{name}.{ext}");
                if let Ok(data) = std::fs::read(&path) {
                    tracing::debug!(%path, "font loaded");
                    return Some(FontData::new(data.into(), 0));
                }
            }
        }
    }
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    Regular,
    Bold,
}

/// Lay `text` out on one line starting at `(x, baseline)`.
///
/// Characters the font cannot map are skipped. Returns the glyphs and the
/// pen position after the last one.
fn shape_line(font: &FontData, size: f32, text: &str, x: f64, baseline: f64) -> (Vec<Glyph>, f64) {
    let Ok(font_ref) = skrifa::FontRef::from_index(font.data.as_ref(), font.index) else {
        return (Vec::new(), x);
    };
    use skrifa::MetadataProvider;
    let charmap = font_ref.charmap();
    let metrics = font_ref.glyph_metrics(
        skrifa::instance::Size::new(size),
        skrifa::instance::LocationRef::default(),
    );

    let mut glyphs = Vec::with_capacity(text.len());
    let mut pen = x;
    for ch in text.chars() {
        let Some(gid) = charmap.map(ch) else {
            continue;
        };
        glyphs.push(Glyph {
            id: gid.to_u32(),
            x: pen as f32,
            y: baseline as f32,
        });
        pen += f64::from(metrics.advance_width(gid).unwrap_or(size * 0.5));
    }
    (glyphs, pen)
}

/// Width of `text` set at `size`.
pub fn measure(font: Option<&FontData>, size: f64, text: &str) -> f64 {
    match font {
        Some(font) => shape_line(font, size as f32, text, 0.0, 0.0).1,
        None => text.chars().count() as f64 * size * FALLBACK_ADVANCE,
    }
}

/// Greedy word wrap. A single word wider than `max_width` gets a line of its own.
pub fn wrap_lines(text: &str, max_width: f64, measure: impl Fn(&str) -> f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if line.is_empty() {
            line.push_str(word);
            continue;
        }
        let candidate = format!("{line} {word}");
        if measure(&candidate) > max_width {
            lines.push(std::mem::replace(&mut line, word.to_string()));
        } else {
            line = candidate;
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Where the page is drawn and where clicks should land.
///
/// All coordinates passed in are page coordinates; the painter shifts them
/// by the current scroll offset both for drawing and for hit regions.
pub struct Painter<'a> {
    scene: &'a mut Scene,
    fonts: &'a Fonts,
    hits: &'a mut HitMap,
    pub theme: &'a Theme,
    pub width: f64,
    pub height: f64,
    pub elapsed: f64,
    offset_y: f64,
}

impl<'a> Painter<'a> {
    pub fn new(
        scene: &'a mut Scene,
        fonts: &'a Fonts,
        hits: &'a mut HitMap,
        theme: &'a Theme,
        size: (f64, f64),
        elapsed: f64,
    ) -> Self {
        Self {
            scene,
            fonts,
            hits,
            theme,
            width: size.0,
            height: size.1,
            elapsed,
            offset_y: 0.0,
        }
    }

    /// Shift subsequent drawing up by `scroll` pixels.
    pub fn set_scroll(&mut self, scroll: f64) {
        self.offset_y = -scroll;
    }

    pub fn narrow(&self) -> bool {
        self.theme.is_narrow(self.width)
    }

    /// Left edge and width of the centred content column.
    pub fn column(&self, max_width: f64) -> (f64, f64) {
        let gutter = self.theme.layout.gutter;
        let w = (self.width - 2.0 * gutter).min(max_width).max(0.0);
        ((self.width - w) / 2.0, w)
    }

    fn transform(&self) -> Affine {
        Affine::translate((0.0, self.offset_y))
    }

    fn to_screen(&self, rect: Rect) -> Rect {
        rect + Vec2::new(0.0, self.offset_y)
    }

    fn font(&self, weight: Weight) -> Option<&'a FontData> {
        match weight {
            Weight::Bold => self.fonts.bold.as_ref().or(self.fonts.regular.as_ref()),
            Weight::Regular => self.fonts.regular.as_ref(),
        }
    }

    // --- Shapes ------------------------------------------------------------

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let t = self.transform();
        self.scene.fill(Fill::NonZero, t, color, None, &rect);
    }

    pub fn fill_rounded(&mut self, rect: Rect, radius: f64, color: Color) {
        let t = self.transform();
        let shape = RoundedRect::from_rect(rect, radius);
        self.scene.fill(Fill::NonZero, t, color, None, &shape);
    }

    pub fn stroke_rounded(&mut self, rect: Rect, radius: f64, width: f64, color: Color) {
        let t = self.transform();
        let shape = RoundedRect::from_rect(rect, radius);
        self.scene.stroke(&Stroke::new(width), t, color, None, &shape);
    }

    pub fn circle(&mut self, center: Point, radius: f64, color: Color) {
        let t = self.transform();
        self.scene
            .fill(Fill::NonZero, t, color, None, &Circle::new(center, radius));
    }

    pub fn ring(&mut self, center: Point, radius: f64, width: f64, color: Color) {
        let t = self.transform();
        self.scene.stroke(
            &Stroke::new(width),
            t,
            color,
            None,
            &Circle::new(center, radius),
        );
    }

    /// Stroke a path placed with `placement`, on top of the scroll offset.
    pub fn stroke_path(&mut self, path: &BezPath, style: &Stroke, placement: Affine, color: Color) {
        let t = self.transform() * placement;
        self.scene.stroke(style, t, color, None, path);
    }

    // --- Text --------------------------------------------------------------

    pub fn measure(&self, text: &str, size: f64, weight: Weight) -> f64 {
        measure(self.font(weight), size, text)
    }

    /// Draw one line of text with its baseline at `baseline`. Returns its width.
    pub fn text(&mut self, x: f64, baseline: f64, text: &str, size: f64, weight: Weight, color: Color) -> f64 {
        let t = self.transform();
        match self.font(weight) {
            Some(font) => {
                let (glyphs, end) = shape_line(font, size as f32, text, x, baseline);
                if !glyphs.is_empty() {
                    self.scene
                        .draw_glyphs(font)
                        .font_size(size as f32)
                        .transform(t)
                        .brush(&color)
                        .draw(Fill::NonZero, glyphs.into_iter());
                }
                end - x
            }
            None => {
                let advance = size * FALLBACK_ADVANCE;
                let block_h = size * 0.6;
                for (i, ch) in text.chars().enumerate() {
                    if ch.is_whitespace() {
                        continue;
                    }
                    let left = x + i as f64 * advance;
                    let block = Rect::new(left, baseline - block_h, left + advance * 0.8, baseline);
                    self.scene.fill(Fill::NonZero, t, color, None, &block);
                }
                text.chars().count() as f64 * advance
            }
        }
    }

    pub fn text_centered(&mut self, cx: f64, baseline: f64, text: &str, size: f64, weight: Weight, color: Color) {
        let w = self.measure(text, size, weight);
        self.text(cx - w / 2.0, baseline, text, size, weight, color);
    }

    pub fn text_right(&mut self, right: f64, baseline: f64, text: &str, size: f64, weight: Weight, color: Color) {
        let w = self.measure(text, size, weight);
        self.text(right - w, baseline, text, size, weight, color);
    }

    /// Wrapped text inside `max_width`. `top` is the top of the first line;
    /// returns the total height used.
    pub fn paragraph(
        &mut self,
        x: f64,
        top: f64,
        max_width: f64,
        text: &str,
        size: f64,
        weight: Weight,
        color: Color,
    ) -> f64 {
        self.paragraph_aligned(x, top, max_width, text, size, weight, color, false)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn paragraph_aligned(
        &mut self,
        x: f64,
        top: f64,
        max_width: f64,
        text: &str,
        size: f64,
        weight: Weight,
        color: Color,
        centered: bool,
    ) -> f64 {
        let font = self.font(weight);
        let lines = wrap_lines(text, max_width, |s| measure(font, size, s));
        let line_height = self.theme.line_height_for(size);
        let mut baseline = top + size;
        for line in &lines {
            if centered {
                self.text_centered(x + max_width / 2.0, baseline, line, size, weight, color);
            } else {
                self.text(x, baseline, line, size, weight, color);
            }
            baseline += line_height;
        }
        lines.len() as f64 * line_height
    }

    /// Height `paragraph` would use, without drawing.
    pub fn paragraph_height(&self, max_width: f64, text: &str, size: f64, weight: Weight) -> f64 {
        let font = self.font(weight);
        let lines = wrap_lines(text, max_width, |s| measure(font, size, s)).len();
        lines as f64 * self.theme.line_height_for(size)
    }

    // --- Interactive -------------------------------------------------------

    /// Register `rect` (page coordinates) as a click target.
    pub fn hit(&mut self, rect: Rect, action: UiAction) {
        let screen = self.to_screen(rect);
        self.hits.push(screen, action);
    }

    /// Swallow clicks on `rect` (screen coordinates, unaffected by scroll).
    pub fn block(&mut self, rect: Rect) {
        self.hits.block(rect);
    }

    /// Record where the drawing canvas sits on screen.
    pub fn canvas_region(&mut self, rect: Rect) {
        let screen = self.to_screen(rect);
        self.hits.set_canvas(screen);
    }

    /// A filled, rounded button with a centred label.
    #[allow(clippy::too_many_arguments)]
    pub fn button(
        &mut self,
        rect: Rect,
        label: &str,
        size: f64,
        fill: Color,
        ink: Color,
        action: UiAction,
    ) {
        let radius = self.theme.radii.button;
        self.fill_rounded(rect, radius, fill);
        let baseline = rect.center().y + size * 0.35;
        self.text_centered(rect.center().x, baseline, label, size, Weight::Bold, ink);
        self.hit(rect, action);
    }

    /// An outlined button, used for secondary actions.
    pub fn outline_button(&mut self, rect: Rect, label: &str, size: f64, ink: Color, action: UiAction) {
        let radius = self.theme.radii.button;
        let surface = self.theme.surface();
        let border = self.theme.border();
        self.fill_rounded(rect, radius, surface);
        self.stroke_rounded(rect, radius, 1.5, border);
        let baseline = rect.center().y + size * 0.35;
        self.text_centered(rect.center().x, baseline, label, size, Weight::Bold, ink);
        self.hit(rect, action);
    }

    /// A full-width horizontal bar filled to `fraction`.
    pub fn progress_bar(&mut self, rect: Rect, fraction: f64, track: Color, fill: Color) {
        let radius = rect.height() / 2.0;
        self.fill_rounded(rect, radius, track);
        let w = rect.width() * fraction.clamp(0.0, 1.0);
        if w > 0.0 {
            let filled = Rect::new(rect.x0, rect.y0, rect.x0 + w.max(rect.height()), rect.y1);
            self.fill_rounded(filled, radius, fill);
        }
    }
}
