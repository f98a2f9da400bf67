//! # Perak Prelude
//!
//! This module provides a convenient way to import commonly used types and traits
//! from the framework. It's designed to reduce boilerplate imports when writing
//! panels and wiring them into a host.
//!
//! ## Usage
//!
//! ```rust
//! use perak::prelude::*;
//! ```
//!
//! This brings all essential types into scope, allowing you to write:
//!
//! ```no_run
//! use perak::prelude::*;
//! use std::any::Any;
//!
//! #[derive(Default)]
//! struct PausePanel {
//!     core: PanelCore,
//! }
//!
//! impl Panel for PausePanel {
//!     fn core(&self) -> &PanelCore { &self.core }
//!     fn core_mut(&mut self) -> &mut PanelCore { &mut self.core }
//!     fn as_any(&self) -> &dyn Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn Any { self }
//!
//!     fn awake(&mut self, ctx: &mut PanelContext<'_>) {
//!         ctx.audio.play_sound(PlayMusic::ButtonClick);
//!     }
//! }
//!
//! fn main() -> perak::Result<()> {
//!     perak::init_logging();
//!     let resources = ResourceTable::new()
//!         .with("Prefabs/UI/PausePanel", Template::new("PausePanel"));
//!     let mut app = perak::default(resources)?;
//!     app.open_panel::<PausePanel>(Args::new())?;
//!     app.tick(0.016)?;
//!     Ok(())
//! }
//! ```

// Re-export core application types
pub use crate::app::{PerakApp, Stage};
pub use crate::config::FrameworkConfig;
pub use crate::default;
pub use crate::error::{Error, Result};

// Re-export scene and resource types
pub use crate::gfx::resources::{ResourceProvider, ResourceTable, Template};
pub use crate::gfx::scene::{Scene, SurfaceId, Transform};

// Re-export panel types
pub use crate::ui::{
    Args, CommandQueue, Ease, EventData, InputEvent, Panel, PanelContext, PanelCore,
    PanelState, PanelType, RotateMode, TouchType, TweenKind, TweenSettings, UiManager,
};

// Re-export audio and scene control types
pub use crate::audio::{AudioBackend, AudioPlayer, PlayMusic};
pub use crate::scene_control::{Prefs, SceneLoader};

// Re-export cgmath for convenience
pub use cgmath::{Vector2, Vector3};
