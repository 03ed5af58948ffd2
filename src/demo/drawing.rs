//! Freehand drawing capture for step 1.
//!
//! Strokes are stored as polylines and only turned into pixels when a
//! snapshot is requested, so the on-screen renderer and the exported raster
//! share one source of truth.
//!
//! Raster model: white background, every stroke drawn as a chain of
//! round-capped segments of `line_width`. Round caps on every segment give
//! round joins for free.

use std::io::Cursor;

use base64::Engine;
use image::{ImageFormat, Rgba, RgbaImage};
use tracing::{debug, info};

use crate::config::CanvasConfig;
use crate::error::{DemoError, DemoResult};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// An opaque RGB ink colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InkColor(pub [u8; 3]);

impl InkColor {
    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self([channel(0)?, channel(2)?, channel(4)?]))
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.0;
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    fn pixel(self) -> Rgba<u8> {
        let [r, g, b] = self.0;
        Rgba([r, g, b, 255])
    }
}

/// A point in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasPoint {
    pub x: f64,
    pub y: f64,
}

impl CanvasPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    pub color: InkColor,
    pub points: Vec<CanvasPoint>,
}

/// The drawing surface and its accumulated strokes.
#[derive(Debug, Clone)]
pub struct Sketch {
    width: u32,
    height: u32,
    line_width: f64,
    palette: Vec<InkColor>,
    color: InkColor,
    strokes: Vec<Stroke>,
    drawing: bool,
}

impl Sketch {
    pub fn new(config: &CanvasConfig) -> Self {
        let mut palette: Vec<InkColor> = config
            .palette
            .iter()
            .filter_map(|hex| InkColor::from_hex(hex))
            .collect();
        if palette.is_empty() {
            palette.push(InkColor([0xfb, 0x71, 0x85]));
        }
        Self {
            width: config.width,
            height: config.height,
            line_width: config.line_width,
            color: palette[0],
            palette,
            strokes: Vec::new(),
            drawing: false,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    pub fn palette(&self) -> &[InkColor] {
        &self.palette
    }

    pub fn color(&self) -> InkColor {
        self.color
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    pub fn begin_stroke(&mut self, at: CanvasPoint) {
        self.strokes.push(Stroke {
            color: self.color,
            points: vec![at],
        });
        self.drawing = true;
    }

    /// Append to the active stroke; ignored when no stroke is active.
    pub fn extend_stroke(&mut self, to: CanvasPoint) {
        if !self.drawing {
            return;
        }
        if let Some(stroke) = self.strokes.last_mut() {
            stroke.points.push(to);
        }
    }

    pub fn end_stroke(&mut self) {
        self.drawing = false;
    }

    /// Change the ink for strokes started from now on.
    pub fn set_color(&mut self, color: InkColor) {
        self.color = color;
    }

    /// Repaint the background and discard every stroke.
    pub fn clear(&mut self) {
        self.strokes.clear();
        self.drawing = false;
        debug!(target: "drawing", "canvas cleared");
    }

    /// Rasterize the current strokes.
    pub fn rasterize(&self) -> DemoResult<RgbaImage> {
        if self.width == 0 || self.height == 0 {
            return Err(DemoError::CaptureUnavailable);
        }
        let mut image = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);
        let radius = self.line_width / 2.0;
        for stroke in &self.strokes {
            // A lone moveTo never paints.
            for pair in stroke.points.windows(2) {
                stamp_segment(&mut image, pair[0], pair[1], radius, stroke.color.pixel());
            }
        }
        Ok(image)
    }

    /// Capture the current raster as a PNG snapshot.
    pub fn snapshot(&self) -> DemoResult<Snapshot> {
        let image = self.rasterize()?;
        let snapshot = Snapshot::encode(&image)?;
        info!(
            target: "drawing",
            strokes = self.strokes.len(),
            bytes = snapshot.png.len(),
            "snapshot captured"
        );
        Ok(snapshot)
    }
}

/// Paint every pixel whose centre lies within `radius` of segment `a`-`b`.
fn stamp_segment(image: &mut RgbaImage, a: CanvasPoint, b: CanvasPoint, radius: f64, color: Rgba<u8>) {
    let (w, h) = (f64::from(image.width()), f64::from(image.height()));
    let min_x = (a.x.min(b.x) - radius).floor().clamp(0.0, w) as u32;
    let max_x = (a.x.max(b.x) + radius).ceil().clamp(0.0, w) as u32;
    let min_y = (a.y.min(b.y) - radius).floor().clamp(0.0, h) as u32;
    let max_y = (a.y.max(b.y) + radius).ceil().clamp(0.0, h) as u32;

    let (dx, dy) = (b.x - a.x, b.y - a.y);
    let len_sq = dx * dx + dy * dy;
    let radius_sq = radius * radius;

    for py in min_y..max_y {
        for px in min_x..max_x {
            let cx = f64::from(px) + 0.5;
            let cy = f64::from(py) + 0.5;
            let t = if len_sq == 0.0 {
                0.0
            } else {
                (((cx - a.x) * dx + (cy - a.y) * dy) / len_sq).clamp(0.0, 1.0)
            };
            let (nx, ny) = (a.x + t * dx - cx, a.y + t * dy - cy);
            if nx * nx + ny * ny <= radius_sq {
                image.put_pixel(px, py, color);
            }
        }
    }
}

/// A PNG-encoded capture of the drawing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    width: u32,
    height: u32,
    png: Vec<u8>,
}

impl Snapshot {
    pub fn encode(image: &RgbaImage) -> DemoResult<Self> {
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(Self {
            width: image.width(),
            height: image.height(),
            png,
        })
    }

    /// A snapshot of an untouched canvas.
    pub fn blank(config: &CanvasConfig) -> DemoResult<Self> {
        Sketch::new(config).snapshot()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn png_bytes(&self) -> &[u8] {
        &self.png
    }

    pub fn decode(&self) -> DemoResult<RgbaImage> {
        let image = image::load_from_memory_with_format(&self.png, ImageFormat::Png)?;
        Ok(image.to_rgba8())
    }

    /// `data:image/png;base64,...`, the form a browser canvas exports.
    pub fn to_data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.png);
        format!("data:image/png;base64,{encoded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sketch() -> Sketch {
        Sketch::new(&CanvasConfig::default())
    }

    fn p(x: f64, y: f64) -> CanvasPoint {
        CanvasPoint::new(x, y)
    }

    #[test]
    fn hex_parsing() {
        assert_eq!(InkColor::from_hex("#fb7185"), Some(InkColor([0xfb, 0x71, 0x85])));
        assert_eq!(InkColor::from_hex("38bdf8"), Some(InkColor([0x38, 0xbd, 0xf8])));
        assert_eq!(InkColor::from_hex("#fff"), None);
        assert_eq!(InkColor::from_hex("#gggggg"), None);
        assert_eq!(InkColor([0xa7, 0x8b, 0xfa]).to_hex(), "#a78bfa");
    }

    #[test]
    fn new_sketch_uses_first_palette_colour() {
        let s = sketch();
        assert_eq!(s.color().to_hex(), "#fb7185");
        assert_eq!(s.palette().len(), 4);
        assert_eq!(s.size(), (600, 400));
    }

    #[test]
    fn extend_without_active_stroke_is_ignored() {
        let mut s = sketch();
        s.extend_stroke(p(10.0, 10.0));
        assert!(s.strokes().is_empty());

        s.begin_stroke(p(0.0, 0.0));
        s.extend_stroke(p(5.0, 5.0));
        s.end_stroke();
        s.extend_stroke(p(9.0, 9.0));
        assert_eq!(s.strokes()[0].points.len(), 2);
    }

    #[test]
    fn colour_change_only_affects_later_strokes() {
        let mut s = sketch();
        s.begin_stroke(p(0.0, 0.0));
        s.extend_stroke(p(1.0, 1.0));
        s.end_stroke();
        let sky = InkColor::from_hex("#38bdf8").unwrap();
        s.set_color(sky);
        s.begin_stroke(p(2.0, 2.0));
        assert_eq!(s.strokes()[0].color.to_hex(), "#fb7185");
        assert_eq!(s.strokes()[1].color, sky);
    }

    #[test]
    fn strokes_are_painted_with_round_caps() {
        let mut s = sketch();
        s.begin_stroke(p(100.0, 100.0));
        s.extend_stroke(p(200.0, 100.0));
        s.end_stroke();
        let image = s.rasterize().unwrap();

        let ink = Rgba([0xfb, 0x71, 0x85, 255]);
        assert_eq!(*image.get_pixel(150, 100), ink);
        // Within the cap radius past the end point.
        assert_eq!(*image.get_pixel(201, 100), ink);
        // Outside the half-width.
        assert_eq!(*image.get_pixel(150, 104), BACKGROUND);
        assert_eq!(*image.get_pixel(300, 300), BACKGROUND);
    }

    #[test]
    fn single_point_stroke_paints_nothing() {
        let mut s = sketch();
        s.begin_stroke(p(50.0, 50.0));
        s.end_stroke();
        let image = s.rasterize().unwrap();
        assert!(image.pixels().all(|px| *px == BACKGROUND));
    }

    #[test]
    fn clear_then_snapshot_matches_blank() {
        let mut s = sketch();
        s.begin_stroke(p(10.0, 10.0));
        s.extend_stroke(p(300.0, 200.0));
        s.end_stroke();
        s.clear();

        let cleared = s.snapshot().unwrap();
        let blank = Snapshot::blank(&CanvasConfig::default()).unwrap();
        assert_eq!(cleared, blank);
        assert!(cleared.decode().unwrap().pixels().all(|px| *px == BACKGROUND));
    }

    #[test]
    fn zero_sized_surface_is_unavailable() {
        let config = CanvasConfig {
            width: 0,
            ..CanvasConfig::default()
        };
        let err = Sketch::new(&config).snapshot().unwrap_err();
        assert!(matches!(err, DemoError::CaptureUnavailable));
    }

    #[test]
    fn data_url_has_png_prefix() {
        let snap = sketch().snapshot().unwrap();
        assert!(snap.to_data_url().starts_with("data:image/png;base64,iVBOR"));
        assert_eq!((snap.width(), snap.height()), (600, 400));
    }
}
