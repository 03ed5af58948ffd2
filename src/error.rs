//! Error types for the demo library.
//!
//! Failures inside a panel are never propagated out of the render loop; the
//! panel keeps them as inline state so the user can retry the action.

use thiserror::Error;

/// Result type alias for demo operations.
pub type DemoResult<T> = Result<T, DemoError>;

/// Errors that can occur while driving the demo.
#[derive(Debug, Error)]
pub enum DemoError {
    /// The simulated character generation call reported a failure.
    #[error("character generation failed: {0}")]
    GenerationFailed(String),

    /// The drawing surface has no pixels to capture.
    #[error("drawing surface is unavailable")]
    CaptureUnavailable,

    /// A step outside the 1..=4 catalog was requested.
    #[error("invalid demo step: {0} (expected 1..=4)")]
    InvalidStep(u8),

    /// Encoding or decoding a drawing snapshot failed.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// A config or theme file could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// A config file parsed but holds a value the demo cannot run with.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// I/O error (config files, log directories).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for DemoError {
    fn from(err: image::ImageError) -> Self {
        DemoError::Snapshot(err.to_string())
    }
}
