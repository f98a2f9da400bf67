//! # User Interface Module
//!
//! This module provides the panel framework: a registry that opens, shows, hides
//! and lazily destroys panels keyed by their type, the tween animations panels play
//! on show and hide, and per-surface gesture listeners.
//!
//! ## Architecture
//!
//! The system is built around the [`UiManager`] which handles:
//! - Resolving a panel type to a resource path and instantiating it under the UI root
//! - Keeping at most one live instance per panel type
//! - Batch closing with per-panel guards
//! - Destroying panels that stayed hidden longer than their delay
//!
//! ## Key Components
//!
//! - [`UiManager`] - Registry of resident panels
//! - [`Panel`] / [`PanelCore`] - Behaviour trait and the state every panel embeds
//! - [`TweenSettings`] - Show/hide animation of a panel
//! - [`EventListener`] - Gesture callbacks attached to one surface
//! - [`CommandQueue`] - Requests panels and callbacks make of the registry
//!
//! ## Usage
//!
//! Panels are normally driven through [`PerakApp`]:
//!
//! ```no_run
//! use perak::prelude::*;
//! use std::any::Any;
//!
//! #[derive(Default)]
//! struct ShopPanel {
//!     core: PanelCore,
//! }
//!
//! impl Panel for ShopPanel {
//!     fn core(&self) -> &PanelCore { &self.core }
//!     fn core_mut(&mut self) -> &mut PanelCore { &mut self.core }
//!     fn as_any(&self) -> &dyn Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn Any { self }
//! }
//!
//! # fn main() -> perak::Result<()> {
//! let resources = ResourceTable::new()
//!     .with("Prefabs/UI/ShopPanel", Template::new("ShopPanel"));
//! let mut app = PerakApp::new(FrameworkConfig::default(), resources)?;
//! app.open_panel::<ShopPanel>(Args::new())?;
//! app.tick(0.016)?;
//! # Ok(())
//! # }
//! ```
//!
//! [`PerakApp`]: crate::app::PerakApp

pub mod args;
pub mod event;
pub mod manager;
pub mod panel;
pub mod paths;
pub(crate) mod tasks;
pub mod tween;

mod test_lifecycle;
mod test_registry;

// Re-export main types
pub use args::Args;
pub use event::{
    AxisEventData, BaseEventData, Clickable, Draggable, EventData, EventListener, Hoverable,
    InputEvent, ListenerTable, MoveDirection, Navigable, PointerButton, PointerEventData,
    Scrollable, Selectable, TouchCallback, TouchEvent, TouchType,
};
pub use manager::{ResidentPanel, UiHost, UiManager};
pub use panel::{
    CommandQueue, Panel, PanelContext, PanelCore, PanelState, PanelType, UiCommand,
    DEFAULT_DESTROY_DELAY,
};
pub use paths::ResourcePaths;
pub use tween::{Ease, RotateMode, TweenKind, TweenSettings, DEFAULT_TWEEN_DURATION};
