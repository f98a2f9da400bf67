use std::cell::Cell;

/// Handle to a clip loaded by an [`AudioBackend`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(pub u64);

/// Platform audio collaborator
///
/// Methods take `&self`: backends are handles onto an audio device and are shared
/// between the sound manager and whoever created them.
pub trait AudioBackend {
    /// Loads the clip stored at `path`, or `None` when it does not exist
    fn load_clip(&self, path: &str) -> Option<ClipId>;

    /// Fire-and-forget playback of a sound effect
    fn play_one_shot(&self, clip: ClipId);

    /// Starts background music, replacing whatever was playing
    fn play_music(&self, clip: ClipId, volume: f32, looping: bool);

    fn stop_music(&self);
}

/// Backend that accepts every path and plays nothing
#[derive(Debug, Default)]
pub struct NullAudioBackend {
    next_clip: Cell<u64>,
}

impl NullAudioBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioBackend for NullAudioBackend {
    fn load_clip(&self, _path: &str) -> Option<ClipId> {
        let id = self.next_clip.get();
        self.next_clip.set(id + 1);
        Some(ClipId(id))
    }

    fn play_one_shot(&self, _clip: ClipId) {}

    fn play_music(&self, _clip: ClipId, _volume: f32, _looping: bool) {}

    fn stop_music(&self) {}
}
