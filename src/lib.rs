// src/lib.rs
//! Perak UI Framework
//!
//! A panel-based UI framework: panels are opened by type, animated in and out with
//! tweens, and destroyed once they have stayed hidden long enough. Everything runs
//! on one logical thread driven by the host's frame loop.

pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod runtime;
pub mod scene_control;
pub mod ui;

// Re-export main types for convenience
pub use app::PerakApp;
pub use config::FrameworkConfig;
pub use error::{Error, Result};

/// Installs the `env_logger` backend
///
/// Defaults to `info` for this crate; `RUST_LOG` overrides it. Calling it again, or
/// after the host installed its own logger, does nothing.
pub fn init_logging() {
    let _ = env_logger::Builder::new()
        .filter_module("perak", log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

/// Creates an application context with the default configuration
///
/// # Arguments
/// * `resources` - Provider resolving panel and UI-root templates
pub fn default(resources: impl gfx::resources::ResourceProvider + 'static) -> Result<PerakApp> {
    PerakApp::new(FrameworkConfig::default(), resources)
}
