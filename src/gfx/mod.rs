//! # Graphics Module
//!
//! The scene collaborator the UI framework runs on, and the resources it is
//! populated from.
//!
//! ## Architecture Overview
//!
//! - **Scene Management** ([`scene`]) - Surface hierarchy with active flags, tags,
//!   transforms and persistence across scene transitions
//! - **Resource Management** ([`resources`]) - Templates and the provider resolving
//!   them by path
//!
//! ## Usage
//!
//! ```no_run
//! use perak::gfx::resources::{ResourceTable, Template};
//! use perak::gfx::scene::Scene;
//!
//! let resources = ResourceTable::new().with("Prefabs/RootUI", Template::new("RootUI"));
//! let mut scene = Scene::new();
//! # let _ = (&resources, &mut scene);
//! ```

pub mod resources;
pub mod scene;
