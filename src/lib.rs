//! AutismRecover: a native rendition of the AutismRecover site.
//!
//! The library holds everything except the window loop: routes and page
//! content, the four-step demo with its timer-driven panels, the simulated
//! backend, configuration, theme hot-reload and the vello painting code.

pub mod backend;
pub mod config;
pub mod content;
pub mod demo;
pub mod error;
pub mod logging;
pub mod paths;
pub mod route;
pub mod state_machine;
pub mod theme;
pub mod theme_watcher;
pub mod timers;
pub mod ui;
