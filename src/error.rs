//! Error types for the Perak UI framework
//!
//! Most failures in the framework are absorbed at the registry boundary and only
//! logged. The variants here are what those boundaries see internally, plus the one
//! condition that is allowed to abort initialization: constructing a second instance
//! of a strict singleton.

use crate::gfx::scene::SurfaceId;
use thiserror::Error;

/// Errors raised by the framework
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// The resource provider had nothing at the requested path
    #[error("resource not found at path `{path}`")]
    ResourceNotFound { path: String },

    /// A second instance of a strict singleton was constructed
    #[error("singleton `{type_name}` is already initialized")]
    SingletonReentry { type_name: &'static str },

    /// A live instance of the panel type is already tracked
    #[error("panel `{panel}` is already resident")]
    AlreadyResident { panel: &'static str },

    /// The UI root exists but its container child could not be created
    #[error("UI root has no container")]
    ContainerMissing,

    /// An operation referenced a surface that is not (or no longer) in the scene
    #[error("unknown surface {0:?}")]
    UnknownSurface(SurfaceId),
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
