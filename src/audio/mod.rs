//! # Audio Module
//!
//! Sound effects and background music for the UI layer.
//!
//! ## Key Components
//!
//! - [`AudioPlayer`] - The single `play_sound(kind)` surface panels and listeners see
//! - [`SoundManager`] - Persistent manager caching clips and driving an [`AudioBackend`]
//! - [`NullAudio`] / [`NullAudioBackend`] - Silent stand-ins for headless hosts
//!
//! ## Usage
//!
//! ```no_run
//! use perak::audio::{AudioPlayer, NullAudio, PlayMusic};
//!
//! let mut audio = NullAudio;
//! audio.play_sound(PlayMusic::ButtonClick);
//! ```

pub mod backend;
pub mod manager;

// Re-export main types
pub use backend::{AudioBackend, ClipId, NullAudioBackend};
pub use manager::SoundManager;

/// Enumerated sounds the UI can request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayMusic {
    #[default]
    None,
    ButtonClick,
    StartScene,
}

impl PlayMusic {
    /// Resource path of the clip, `None` for [`PlayMusic::None`]
    pub fn path(self) -> Option<&'static str> {
        match self {
            PlayMusic::None => None,
            PlayMusic::ButtonClick => Some("Sound/UI/ButtonClick"),
            PlayMusic::StartScene => Some("Sound/Bg/StartScene"),
        }
    }

    /// Whether the sound is looping background music rather than an effect
    pub fn is_background(self) -> bool {
        matches!(self, PlayMusic::StartScene)
    }
}

/// Fire-and-forget sound playback
pub trait AudioPlayer {
    fn play_sound(&mut self, kind: PlayMusic);
}

/// Player that drops every request
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioPlayer for NullAudio {
    fn play_sound(&mut self, _kind: PlayMusic) {}
}
