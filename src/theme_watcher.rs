//! Hot-reload for `theme.toml`.
//!
//! The watcher sits on the file's parent directory and filters by file name,
//! since most editors save by writing a temp file and renaming it over the
//! original. Parsed themes are handed to the UI thread over a channel that
//! the event loop polls once per frame.

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, info, warn};

use crate::theme::Theme;

/// Write `content` to `path` unless the file already exists.
pub fn ensure_default_toml(path: &Path, content: &str) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    info!(target: "theme", path = %path.display(), "wrote default theme");
    Ok(true)
}

/// Read and parse a theme file.
pub fn load_theme(path: &Path) -> crate::error::DemoResult<Theme> {
    let content = std::fs::read_to_string(path)?;
    Theme::from_toml(&content)
}

/// Call `on_change` whenever the file at `path` is created or modified.
pub fn spawn_watcher<F>(path: &Path, on_change: F) -> notify::Result<RecommendedWatcher>
where
    F: Fn() + Send + 'static,
{
    let (Some(target), Some(parent)) = (path.file_name(), path.parent()) else {
        return Err(notify::Error::generic("theme path needs a file name and a parent"));
    };
    let target = target.to_os_string();

    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    return;
                }
                let hits = event
                    .paths
                    .iter()
                    .any(|p| p.file_name().is_some_and(|f| f == target));
                if hits {
                    on_change();
                }
            }
            Err(e) => warn!(target: "theme", "watch error: {e}"),
        }
    })?;

    watcher.watch(parent, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

/// Owns the watcher and the receiving end of reloaded themes.
pub struct ThemeWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
    rx: mpsc::Receiver<Theme>,
}

impl ThemeWatcher {
    /// Start watching `path`, writing the commented default first if missing.
    pub fn start(path: PathBuf) -> anyhow::Result<Self> {
        ensure_default_toml(&path, &default_toml_content())?;

        let (tx, rx) = mpsc::channel();
        let watched = path.clone();
        let watcher = spawn_watcher(&path, move || match load_theme(&watched) {
            Ok(theme) => {
                debug!(target: "theme", "theme reloaded");
                let _ = tx.send(theme);
            }
            // Half-written saves land here; the next event brings the full file.
            Err(e) => warn!(target: "theme", path = %watched.display(), "theme not reloaded: {e}"),
        })?;

        Ok(Self {
            _watcher: watcher,
            path,
            rx,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The most recent theme reloaded since the last poll, if any.
    pub fn poll(&self) -> Option<Theme> {
        self.rx.try_iter().last()
    }
}

/// Default `theme.toml`: every token at its compiled default, with notes.
pub fn default_toml_content() -> String {
    r##"# AutismRecover theme. Edit and save; the window picks changes up live.
# Missing values use compiled defaults. Delete a line to reset it.

[colors]
background = "#f8fafc"     # page background (slate-50)
surface = "#ffffff"        # cards, canvas
muted_surface = "#f1f5f9"  # input rows, inactive tabs
border = "#e2e8f0"
text = "#1e293b"
text_muted = "#64748b"
primary = "#f43f5e"        # rose: buttons, active step, brand
primary_dark = "#e11d48"
primary_soft = "#ffe4e6"
secondary = "#8b5cf6"      # violet: research highlights
accent = "#fbbf24"         # amber: high-five, AR badge
accent_soft = "#fef3c7"
success = "#22c55e"

[type_scale]
base = 16.0         # body size in pixels
ratio = 1.25        # major third
line_height = 1.5

[radii]
card = 24.0
button = 14.0
canvas = 16.0

[layout]
nav_height = 64.0
max_content_width = 1120.0
narrow_breakpoint = 768.0   # below this the nav collapses behind a menu
gutter = 24.0
"##
    .to_string()
}
