//! Sound manager
//!
//! Plays UI sound effects and background music through an [`AudioBackend`]. Clips
//! are cached by path so each one is loaded at most once. The manager lives under
//! the persistent root and keeps playing across scene transitions until
//! [`SoundManager::stop_bgm_on_load`] is called.

use log::{debug, warn};
use std::collections::HashMap;
use std::rc::Rc;

use super::backend::{AudioBackend, ClipId};
use super::{AudioPlayer, PlayMusic};
use crate::gfx::scene::SurfaceId;

pub struct SoundManager {
    root: SurfaceId,
    backend: Rc<dyn AudioBackend>,
    clips: HashMap<String, ClipId>,
    bgm: Option<String>,
    bgm_volume: f32,
}

impl SoundManager {
    /// # Arguments
    /// * `root` - Persistent surface hosting the manager
    /// * `backend` - Audio device collaborator
    /// * `bgm_volume` - Volume used for background music
    pub fn new(root: SurfaceId, backend: Rc<dyn AudioBackend>, bgm_volume: f32) -> Self {
        Self {
            root,
            backend,
            clips: HashMap::new(),
            bgm: None,
            bgm_volume: bgm_volume.clamp(0.0, 1.0),
        }
    }

    pub fn root(&self) -> SurfaceId {
        self.root
    }

    /// Swaps the audio device; cached clips belong to the old one and are dropped
    pub fn set_backend(&mut self, backend: Rc<dyn AudioBackend>) {
        if let Some(path) = self.bgm.take() {
            debug!("stopping background music {path} before switching backend");
            self.backend.stop_music();
        }
        self.backend = backend;
        self.clips.clear();
    }

    fn clip(&mut self, path: &str) -> Option<ClipId> {
        if let Some(clip) = self.clips.get(path) {
            return Some(*clip);
        }
        match self.backend.load_clip(path) {
            Some(clip) => {
                self.clips.insert(path.to_string(), clip);
                Some(clip)
            }
            None => {
                warn!("audio clip not found: {path}");
                None
            }
        }
    }

    /// Plays a one-shot sound effect stored at `path`
    pub fn play_sound_by_path(&mut self, path: &str) {
        if let Some(clip) = self.clip(path) {
            self.backend.play_one_shot(clip);
        }
    }

    /// Starts looping background music stored at `path`
    ///
    /// Music already playing is stopped first.
    pub fn play_bgm_by_path(&mut self, path: &str, volume: f32) {
        let Some(clip) = self.clip(path) else {
            return;
        };
        if self.bgm.is_some() {
            self.backend.stop_music();
        }
        self.backend.play_music(clip, volume.clamp(0.0, 1.0), true);
        self.bgm = Some(path.to_string());
    }

    /// Stops background music ahead of a scene load
    pub fn stop_bgm_on_load(&mut self) {
        if let Some(path) = self.bgm.take() {
            debug!("stopping background music {path} for scene load");
            self.backend.stop_music();
        }
    }

    /// Path of the background music currently playing
    pub fn current_bgm(&self) -> Option<&str> {
        self.bgm.as_deref()
    }

    /// Number of clips loaded so far
    pub fn cached_clips(&self) -> usize {
        self.clips.len()
    }
}

impl AudioPlayer for SoundManager {
    fn play_sound(&mut self, kind: PlayMusic) {
        let Some(path) = kind.path() else {
            return;
        };
        if kind.is_background() {
            let volume = self.bgm_volume;
            self.play_bgm_by_path(path, volume);
        } else {
            self.play_sound_by_path(path);
        }
    }
}
