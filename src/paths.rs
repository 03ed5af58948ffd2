//! Where autism-recover keeps its files.
//!
//! - Config: `~/.config/autism-recover/` (`config.toml`, `theme.toml`)
//! - Logs:   `~/Library/Logs/autism-recover/` on macOS, otherwise
//!           `$XDG_DATA_HOME/autism-recover/logs/`

use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "autism-recover";

pub const CONFIG_FILE: &str = "config.toml";
pub const THEME_FILE: &str = "theme.toml";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config: PathBuf,
    pub logs: PathBuf,
}

impl AppPaths {
    /// Resolve paths from `$HOME`. Nothing is created on disk.
    pub fn resolve() -> Option<Self> {
        let home = std::env::var("HOME").ok().map(PathBuf::from)?;
        Some(Self {
            config: resolve_config_dir(&home),
            logs: resolve_log_dir(&home),
        })
    }

    /// Both directories rooted under `root`; used by tests and `--config`.
    pub fn under(root: &Path) -> Self {
        Self {
            config: root.join("config"),
            logs: root.join("logs"),
        }
    }

    pub fn ensure(&self) -> std::io::Result<()> {
        for dir in [&self.config, &self.logs] {
            std::fs::create_dir_all(dir)?;
            debug!("ensured directory: {}", dir.display());
        }
        Ok(())
    }

    pub fn config_file(&self) -> PathBuf {
        self.config.join(CONFIG_FILE)
    }

    pub fn theme_file(&self) -> PathBuf {
        self.config.join(THEME_FILE)
    }
}

fn resolve_config_dir(home: &Path) -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join(APP_NAME)
    } else {
        home.join(".config").join(APP_NAME)
    }
}

#[cfg(target_os = "macos")]
fn resolve_log_dir(home: &Path) -> PathBuf {
    home.join("Library").join("Logs").join(APP_NAME)
}

#[cfg(not(target_os = "macos"))]
fn resolve_log_dir(home: &Path) -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join(APP_NAME).join("logs")
    } else {
        home.join(".local").join("share").join(APP_NAME).join("logs")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_names_the_app() {
        let paths = AppPaths::resolve().expect("HOME should be set in tests");
        assert!(paths.config.to_string_lossy().contains("autism-recover"));
        assert!(paths.logs.to_string_lossy().contains("autism-recover"));
        assert!(paths.config_file().ends_with("config.toml"));
        assert!(paths.theme_file().ends_with("theme.toml"));
    }

    #[test]
    fn ensure_creates_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let paths = AppPaths::under(tmp.path());
        paths.ensure().expect("ensure should succeed");
        assert!(paths.config.is_dir());
        assert!(paths.logs.is_dir());
    }
}
