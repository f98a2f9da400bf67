// src/gfx/resources/mod.rs
//! Resource management
//!
//! Templates and the provider that resolves them by path.

pub mod provider;
pub mod template;

// Re-export main types
pub use provider::{ResourceProvider, ResourceTable};
pub use template::Template;
