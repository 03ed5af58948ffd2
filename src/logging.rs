//! Logging initialisation.
//!
//! Stderr output is always on, filtered by `RUST_LOG` (default `warn`). With
//! `AUTISM_RECOVER_LOG=1` a second layer also writes `autism-recover.log` into
//! the log directory, at `info` unless `RUST_LOG` says otherwise.
//!
//! Keep the returned guard alive until exit so buffered lines get flushed.

use std::path::{Path, PathBuf};

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const LOG_ENV: &str = "AUTISM_RECOVER_LOG";
pub const LOG_FILE: &str = "autism-recover.log";

pub struct LogGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

/// Install the global subscriber. Call once from `main`.
pub fn init(log_dir: Option<&Path>) -> LogGuard {
    let file_guard = if file_logging_enabled() {
        let dir = log_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(std::env::temp_dir);
        let _ = std::fs::create_dir_all(&dir);
        let file_appender = tracing_appender::rolling::never(&dir, LOG_FILE);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(env_filter("info"))
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
            .init();

        tracing::info!(path = %log_path(&dir).display(), "file logging enabled");
        Some(guard)
    } else {
        tracing_subscriber::registry()
            .with(env_filter("warn"))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();

        None
    };

    LogGuard {
        _file_guard: file_guard,
    }
}

fn file_logging_enabled() -> bool {
    std::env::var(LOG_ENV).as_deref() == Ok("1")
}

fn env_filter(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

pub fn log_path(dir: &Path) -> PathBuf {
    dir.join(LOG_FILE)
}
