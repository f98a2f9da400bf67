use log::info;

use super::prefs::Prefs;
use super::SceneLoader;
use crate::audio::SoundManager;
use crate::gfx::scene::Scene;
use crate::ui::{Args, CommandQueue, PanelType};

/// What a scene load can touch
pub struct SceneContext<'a> {
    pub scene: &'a mut Scene,
    pub audio: &'a mut SoundManager,
    pub prefs: &'a mut Prefs,
    pub loader: &'a mut dyn SceneLoader,
    pub commands: &'a CommandQueue,
    /// Preference key holding the scene a loading panel should load
    pub next_scene_key: &'a str,
}

/// Scene transitions, with or without a loading panel
#[derive(Debug, Default)]
pub struct SceneControlManager {
    current: Option<String>,
}

impl SceneControlManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a transition to the scene `name`
    ///
    /// Background music is stopped first. With a loading panel, the scene name is
    /// stored in the preferences and the loading panel is opened closing the others;
    /// the panel finishes the transition. Without one, the scene is loaded right
    /// away and every non-persistent surface is unloaded.
    ///
    /// # Arguments
    /// * `loading_panel` - Panel shown while the scene loads, if any
    /// * `name` - Scene to load
    /// * `ctx` - Scene, audio, preferences and loader collaborators
    pub fn load_scene(
        &mut self,
        loading_panel: Option<PanelType>,
        name: &str,
        ctx: &mut SceneContext<'_>,
    ) {
        ctx.audio.stop_bgm_on_load();
        match loading_panel {
            Some(panel) => {
                info!("loading scene {name} behind {}", panel.name());
                ctx.prefs.set_string(ctx.next_scene_key, name);
                ctx.commands.open_panels(vec![panel], true, Args::new());
            }
            None => {
                info!("loading scene {name}");
                ctx.loader.load_scene(name);
                let unloaded = ctx.scene.unload_transient();
                info!("scene {name} loaded, {unloaded} transient roots unloaded");
                self.current = Some(name.to_string());
            }
        }
    }

    /// Takes the scene name left behind for a loading panel
    pub fn take_pending_scene(&self, prefs: &mut Prefs, next_scene_key: &str) -> Option<String> {
        prefs.delete_key(next_scene_key)
    }

    /// Last scene loaded directly
    pub fn current_scene(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudioBackend;
    use crate::ui::{Panel, PanelCore, UiCommand};
    use std::any::Any;
    use std::rc::Rc;

    #[derive(Default)]
    struct LoadingPanel {
        core: PanelCore,
    }

    impl Panel for LoadingPanel {
        fn core(&self) -> &PanelCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut PanelCore {
            &mut self.core
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[derive(Default)]
    struct RecordingLoader {
        loaded: Vec<String>,
    }

    impl SceneLoader for RecordingLoader {
        fn load_scene(&mut self, name: &str) {
            self.loaded.push(name.to_string());
        }
    }

    struct Fixture {
        scene: Scene,
        audio: SoundManager,
        prefs: Prefs,
        loader: RecordingLoader,
        commands: CommandQueue,
    }

    impl Fixture {
        fn new() -> Self {
            let mut scene = Scene::new();
            let root = scene.spawn("DDOLGameManager", None);
            scene.mark_persistent(root);
            Self {
                scene,
                audio: SoundManager::new(root, Rc::new(NullAudioBackend::new()), 0.5),
                prefs: Prefs::new(),
                loader: RecordingLoader::default(),
                commands: CommandQueue::new(),
            }
        }

        fn ctx(&mut self) -> SceneContext<'_> {
            SceneContext {
                scene: &mut self.scene,
                audio: &mut self.audio,
                prefs: &mut self.prefs,
                loader: &mut self.loader,
                commands: &self.commands,
                next_scene_key: "NextSceneName",
            }
        }
    }

    #[test]
    fn test_direct_load_unloads_transient_surfaces() {
        let mut fixture = Fixture::new();
        let level = fixture.scene.spawn("Level", None);
        fixture.audio.play_bgm_by_path("Sound/Bg/StartScene", 0.5);

        let mut control = SceneControlManager::new();
        control.load_scene(None, "Battle", &mut fixture.ctx());

        assert_eq!(fixture.loader.loaded, vec!["Battle"]);
        assert!(!fixture.scene.is_alive(level));
        assert_eq!(fixture.scene.len(), 1);
        assert!(fixture.audio.current_bgm().is_none());
        assert_eq!(control.current_scene(), Some("Battle"));
        assert!(fixture.commands.is_empty());
    }

    #[test]
    fn test_loading_panel_defers_the_load() {
        let mut fixture = Fixture::new();
        let mut control = SceneControlManager::new();
        let loading = PanelType::of::<LoadingPanel>();

        control.load_scene(Some(loading), "Battle", &mut fixture.ctx());

        assert!(fixture.loader.loaded.is_empty());
        assert_eq!(fixture.prefs.get_string("NextSceneName"), Some("Battle"));
        let commands = fixture.commands.take();
        assert!(matches!(
            &commands[..],
            [UiCommand::Open { kinds, close_others: true, .. }] if kinds == &vec![loading]
        ));
        assert_eq!(
            control.take_pending_scene(&mut fixture.prefs, "NextSceneName").as_deref(),
            Some("Battle")
        );
        assert!(control.current_scene().is_none());
    }
}
