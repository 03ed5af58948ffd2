//! Runtime configuration for the demo.
//!
//! Every timing constant and canvas parameter lives in `AppConfig` so that
//! tests and `config.toml` can shorten or reshape the demo without touching
//! code. All sections use `#[serde(default)]`; a partial file only overrides
//! what it names.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DemoError, DemoResult};

/// Root configuration container.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub timing: TimingConfig,
    pub canvas: CanvasConfig,
    pub window: WindowConfig,
}

/// Delays of the simulated backend and panel timers, in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    pub generation_ms: u64,
    pub chat_reply_ms: u64,
    pub high_five_ms: u64,
    pub high_five_display_ms: u64,
    pub loading_tick_ms: u64,
    pub loading_step: u8,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub line_width: f64,
    /// Hex colours offered by the drawing palette; the first is the default ink.
    pub palette: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub windowed: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            generation_ms: 2500,
            chat_reply_ms: 1000,
            high_five_ms: 800,
            high_five_display_ms: 3000,
            loading_tick_ms: 100,
            loading_step: 2,
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 400,
            line_width: 5.0,
            palette: vec![
                "#fb7185".to_string(),
                "#fcd34d".to_string(),
                "#a78bfa".to_string(),
                "#38bdf8".to_string(),
            ],
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            windowed: false,
            width: 1280,
            height: 860,
        }
    }
}

impl TimingConfig {
    pub fn generation_delay(&self) -> Duration {
        Duration::from_millis(self.generation_ms)
    }

    pub fn chat_reply_delay(&self) -> Duration {
        Duration::from_millis(self.chat_reply_ms)
    }

    pub fn high_five_delay(&self) -> Duration {
        Duration::from_millis(self.high_five_ms)
    }

    pub fn high_five_display(&self) -> Duration {
        Duration::from_millis(self.high_five_display_ms)
    }

    pub fn loading_tick(&self) -> Duration {
        Duration::from_millis(self.loading_tick_ms)
    }
}

impl AppConfig {
    /// Deserialize from a TOML string.
    pub fn from_toml(s: &str) -> DemoResult<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would stall a timer or leave the canvas empty.
    pub fn validate(&self) -> DemoResult<()> {
        let invalid = |what: &str| -> DemoResult<()> {
            Err(DemoError::InvalidConfig(format!("{what} must be greater than zero")))
        };
        if self.timing.loading_tick_ms == 0 {
            return invalid("timing.loading_tick_ms");
        }
        if self.timing.loading_step == 0 {
            return invalid("timing.loading_step");
        }
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return invalid("canvas.width and canvas.height");
        }
        Ok(())
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Load from `path`. A missing file yields defaults; a malformed one is an error.
    pub fn load(path: &Path) -> DemoResult<Self> {
        if !path.exists() {
            debug!(target: "config", path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        info!(target: "config", path = %path.display(), "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_timings() {
        let c = AppConfig::default();
        assert_eq!(c.timing.generation_delay(), Duration::from_millis(2500));
        assert_eq!(c.timing.chat_reply_delay(), Duration::from_secs(1));
        assert_eq!(c.timing.high_five_delay(), Duration::from_millis(800));
        assert_eq!(c.timing.high_five_display(), Duration::from_secs(3));
        assert_eq!(c.timing.loading_tick(), Duration::from_millis(100));
        assert_eq!(c.timing.loading_step, 2);
        assert_eq!((c.canvas.width, c.canvas.height), (600, 400));
        assert_eq!(c.canvas.palette[0], "#fb7185");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let c = AppConfig::from_toml("[timing]\nchat_reply_ms = 10\n").expect("parse");
        assert_eq!(c.timing.chat_reply_ms, 10);
        assert_eq!(c.timing.generation_ms, 2500);
        assert_eq!(c.canvas.width, 600);
    }

    #[test]
    fn invalid_toml_is_rejected() {
        assert!(AppConfig::from_toml("[timing\nbroken").is_err());
    }

    #[test]
    fn zero_loading_tick_is_rejected() {
        let err = AppConfig::from_toml("[timing]\nloading_tick_ms = 0\n").unwrap_err();
        assert!(matches!(err, DemoError::InvalidConfig(ref m) if m.contains("loading_tick_ms")));
        assert!(AppConfig::from_toml("[timing]\nloading_step = 0\n").is_err());
        assert!(AppConfig::from_toml("[canvas]\nheight = 0\n").is_err());
        // Zero delays on one-shot timers are fine: they fire immediately.
        assert!(AppConfig::from_toml("[timing]\nchat_reply_ms = 0\n").is_ok());
    }

    #[test]
    fn window_defaults_to_fullscreen() {
        assert!(!AppConfig::default().window.windowed);
        let c = AppConfig::from_toml("[window]\nwindowed = true\n").expect("parse");
        assert!(c.window.windowed);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let c = AppConfig::load(&dir.path().join("config.toml")).expect("load");
        assert_eq!(c.timing.loading_step, 2);
    }

    #[test]
    fn load_reads_file_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[canvas]\nwidth = 320\n").expect("write");
        let c = AppConfig::load(&path).expect("load");
        assert_eq!(c.canvas.width, 320);
        assert_eq!(c.canvas.height, 400);
    }
}
