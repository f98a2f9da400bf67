//! # Scene Control Module
//!
//! Scene transitions and the small preference store they rely on.
//!
//! Loading the scene itself is the host's job: it implements [`SceneLoader`].
//! [`SceneControlManager`] stops the music, optionally routes the transition through
//! a loading panel, and unloads every surface that is not persistent.

pub mod manager;
pub mod prefs;

// Re-export main types
pub use manager::{SceneContext, SceneControlManager};
pub use prefs::Prefs;

use log::info;

/// Host collaborator that loads scenes by name
pub trait SceneLoader {
    fn load_scene(&mut self, name: &str);
}

/// Loader for hosts without scenes; only remembers the last request
#[derive(Debug, Default)]
pub struct NullSceneLoader {
    last: Option<String>,
}

impl NullSceneLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_loaded(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

impl SceneLoader for NullSceneLoader {
    fn load_scene(&mut self, name: &str) {
        info!("no scene loader installed, ignoring load of {name}");
        self.last = Some(name.to_string());
    }
}
