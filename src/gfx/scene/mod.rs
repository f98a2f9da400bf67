//! # Scene Graph Module
//!
//! This module provides the scene/container collaborator the UI framework runs on:
//! a tree of [`Surface`]s with an active flag, a local transform, and a
//! "don't destroy on load" flag for surfaces that outlive scene transitions.
//!
//! ## Key Components
//!
//! - [`Scene`] - Owns every surface and provides activate/deactivate/destroy primitives
//! - [`Surface`] - One node of the tree
//! - [`SurfaceId`] - Handle used by panels and listeners to refer to their surface
//! - [`Transform`] - Local position, scale and Euler rotation animated by panel tweens
//!
//! ## Usage
//!
//! ```no_run
//! use perak::gfx::scene::Scene;
//!
//! let mut scene = Scene::new();
//! let root = scene.spawn("RootUI", None);
//! let container = scene.spawn("Container", Some(root));
//! scene.set_active(container, false);
//! ```

pub mod scene;
pub mod surface;

// Re-export main types
pub use scene::Scene;
pub use surface::{Surface, SurfaceId, Transform};
