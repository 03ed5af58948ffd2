//! Visual tokens for the site.
//!
//! Colours are kept as `#rrggbb` strings so `theme.toml` stays hand-editable;
//! they are parsed on use and fall back to the default palette when a value
//! does not parse.

use serde::{Deserialize, Serialize};
use vello::peniko::Color;

use crate::demo::drawing::InkColor;
use crate::error::DemoResult;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Theme {
    pub colors: ColorTokens,
    pub type_scale: TypeScaleTokens,
    pub radii: RadiusTokens,
    pub layout: LayoutTokens,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ColorTokens {
    pub background: String,
    pub surface: String,
    pub muted_surface: String,
    pub border: String,
    pub text: String,
    pub text_muted: String,
    pub primary: String,
    pub primary_dark: String,
    pub primary_soft: String,
    pub secondary: String,
    pub accent: String,
    pub accent_soft: String,
    pub success: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TypeScaleTokens {
    pub base: f64,
    pub ratio: f64,
    pub line_height: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RadiusTokens {
    pub card: f64,
    pub button: f64,
    pub canvas: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutTokens {
    pub nav_height: f64,
    pub max_content_width: f64,
    /// Below this window width the nav links collapse behind a menu toggle.
    pub narrow_breakpoint: f64,
    pub gutter: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            colors: ColorTokens::default(),
            type_scale: TypeScaleTokens::default(),
            radii: RadiusTokens::default(),
            layout: LayoutTokens::default(),
        }
    }
}

impl Default for ColorTokens {
    fn default() -> Self {
        Self {
            background: "#f8fafc".into(),
            surface: "#ffffff".into(),
            muted_surface: "#f1f5f9".into(),
            border: "#e2e8f0".into(),
            text: "#1e293b".into(),
            text_muted: "#64748b".into(),
            primary: "#f43f5e".into(),
            primary_dark: "#e11d48".into(),
            primary_soft: "#ffe4e6".into(),
            secondary: "#8b5cf6".into(),
            accent: "#fbbf24".into(),
            accent_soft: "#fef3c7".into(),
            success: "#22c55e".into(),
        }
    }
}

impl Default for TypeScaleTokens {
    fn default() -> Self {
        Self {
            base: 16.0,
            ratio: 1.25,
            line_height: 1.5,
        }
    }
}

impl Default for RadiusTokens {
    fn default() -> Self {
        Self {
            card: 24.0,
            button: 14.0,
            canvas: 16.0,
        }
    }
}

impl Default for LayoutTokens {
    fn default() -> Self {
        Self {
            nav_height: 64.0,
            max_content_width: 1120.0,
            narrow_breakpoint: 768.0,
            gutter: 24.0,
        }
    }
}

/// Parse `hex` into a vello colour, or `fallback` if it does not parse.
pub fn hex_color(hex: &str, fallback: &str) -> Color {
    let ink = InkColor::from_hex(hex)
        .or_else(|| InkColor::from_hex(fallback))
        .unwrap_or(InkColor([0, 0, 0]));
    to_color(ink)
}

pub fn to_color(ink: InkColor) -> Color {
    let [r, g, b] = ink.0;
    Color::from_rgba8(r, g, b, 255)
}

impl Theme {
    pub fn background(&self) -> Color {
        hex_color(&self.colors.background, &ColorTokens::default().background)
    }

    pub fn surface(&self) -> Color {
        hex_color(&self.colors.surface, "#ffffff")
    }

    pub fn muted_surface(&self) -> Color {
        hex_color(&self.colors.muted_surface, "#f1f5f9")
    }

    pub fn border(&self) -> Color {
        hex_color(&self.colors.border, "#e2e8f0")
    }

    pub fn text(&self) -> Color {
        hex_color(&self.colors.text, "#1e293b")
    }

    pub fn text_muted(&self) -> Color {
        hex_color(&self.colors.text_muted, "#64748b")
    }

    pub fn primary(&self) -> Color {
        hex_color(&self.colors.primary, "#f43f5e")
    }

    pub fn primary_dark(&self) -> Color {
        hex_color(&self.colors.primary_dark, "#e11d48")
    }

    pub fn primary_soft(&self) -> Color {
        hex_color(&self.colors.primary_soft, "#ffe4e6")
    }

    pub fn secondary(&self) -> Color {
        hex_color(&self.colors.secondary, "#8b5cf6")
    }

    pub fn accent(&self) -> Color {
        hex_color(&self.colors.accent, "#fbbf24")
    }

    pub fn accent_soft(&self) -> Color {
        hex_color(&self.colors.accent_soft, "#fef3c7")
    }

    pub fn success(&self) -> Color {
        hex_color(&self.colors.success, "#22c55e")
    }

    /// Type size from the modular scale; `step = 0` is the body size.
    pub fn type_size(&self, step: i32) -> f64 {
        self.type_scale.base * self.type_scale.ratio.powi(step)
    }

    pub fn line_height_for(&self, font_size: f64) -> f64 {
        font_size * self.type_scale.line_height
    }

    pub fn is_narrow(&self, window_width: f64) -> bool {
        window_width < self.layout.narrow_breakpoint
    }

    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    pub fn from_toml(s: &str) -> DemoResult<Self> {
        Ok(toml::from_str(s)?)
    }
}
