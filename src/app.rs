//! Application context
//!
//! [`PerakApp`] replaces the process-wide manager singletons with one explicit
//! context: it owns the [`Stage`] (scene, collaborators and managers) and the
//! coroutine scheduler, and the host drives it by calling [`PerakApp::tick`] once
//! per frame.

use log::{info, warn};
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::audio::{AudioBackend, AudioPlayer, NullAudioBackend, PlayMusic, SoundManager};
use crate::config::FrameworkConfig;
use crate::error::{Error, Result};
use crate::gfx::resources::ResourceProvider;
use crate::gfx::scene::{Scene, SurfaceId};
use crate::runtime::{Lazy, Persistent, Scheduler, SchedulerHandle};
use crate::scene_control::{NullSceneLoader, Prefs, SceneContext, SceneControlManager, SceneLoader};
use crate::ui::{
    tasks, Args, CommandQueue, EventData, InputEvent, ListenerTable, Panel, PanelState,
    PanelType, TouchType, UiCommand, UiHost, UiManager,
};

// Rounds of queued commands applied per flush before giving up
const MAX_COMMAND_ROUNDS: usize = 64;

/// Everything the managers share
pub struct Stage {
    scene: Scene,
    resources: Box<dyn ResourceProvider>,
    audio_backend: Rc<dyn AudioBackend>,
    audio: Persistent<SoundManager>,
    ui: Lazy<UiManager>,
    scene_control: Lazy<SceneControlManager>,
    scene_loader: Box<dyn SceneLoader>,
    prefs: Prefs,
    listeners: ListenerTable,
    commands: CommandQueue,
    config: FrameworkConfig,
}

impl Stage {
    fn new(config: FrameworkConfig, resources: Box<dyn ResourceProvider>) -> Self {
        Self {
            scene: Scene::new(),
            resources,
            audio_backend: Rc::new(NullAudioBackend::new()),
            audio: Persistent::new(config.persistent_root_name.clone()),
            ui: Lazy::new(),
            scene_control: Lazy::new(),
            scene_loader: Box::new(NullSceneLoader::new()),
            prefs: Prefs::new(),
            listeners: ListenerTable::new(),
            commands: CommandQueue::new(),
            config,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// The panel registry, once constructed
    pub fn ui(&self) -> Option<&UiManager> {
        self.ui.get()
    }

    /// The sound manager, once constructed
    pub fn audio(&self) -> Option<&SoundManager> {
        self.audio.get()
    }

    pub fn scene_control(&self) -> Option<&SceneControlManager> {
        self.scene_control.get()
    }

    pub fn prefs(&self) -> &Prefs {
        &self.prefs
    }

    pub fn prefs_mut(&mut self) -> &mut Prefs {
        &mut self.prefs
    }

    pub fn listeners(&self) -> &ListenerTable {
        &self.listeners
    }

    pub fn commands(&self) -> &CommandQueue {
        &self.commands
    }

    pub fn config(&self) -> &FrameworkConfig {
        &self.config
    }

    fn sound_manager<'s>(
        slot: &'s mut Persistent<SoundManager>,
        scene: &mut Scene,
        backend: &Rc<dyn AudioBackend>,
        config: &FrameworkConfig,
    ) -> Result<&'s mut SoundManager> {
        let fresh = !slot.is_initialized();
        let backend = Rc::clone(backend);
        let volume = config.bgm_volume;
        let sounds =
            slot.get_or_try_init(scene, move |root| SoundManager::new(root, backend, volume))?;
        if fresh {
            scene.set_tag(sounds.root(), config.audio_source_tag.clone());
        }
        Ok(sounds)
    }

    /// Runs `f` against the registry and its collaborators
    pub(crate) fn with_ui<R>(
        &mut self,
        f: impl FnOnce(&mut UiManager, &mut UiHost<'_>) -> R,
    ) -> Result<R> {
        let Stage {
            scene,
            resources,
            audio_backend,
            audio,
            ui,
            listeners,
            commands,
            config,
            ..
        } = self;
        let audio = Self::sound_manager(audio, scene, audio_backend, config)?;
        let ui = ui.get_or_try_init(|| UiManager::new(config))?;
        let mut host = UiHost {
            scene,
            resources: &**resources,
            audio,
            commands,
            listeners,
        };
        Ok(f(ui, &mut host))
    }

    pub(crate) fn with_audio<R>(&mut self, f: impl FnOnce(&mut SoundManager) -> R) -> Result<R> {
        let audio = Self::sound_manager(
            &mut self.audio,
            &mut self.scene,
            &self.audio_backend,
            &self.config,
        )?;
        Ok(f(audio))
    }

    fn load_scene(&mut self, loading_panel: Option<PanelType>, name: &str) -> Result<()> {
        let Stage {
            scene,
            audio_backend,
            audio,
            scene_control,
            scene_loader,
            prefs,
            commands,
            config,
            ..
        } = self;
        let audio = Self::sound_manager(audio, scene, audio_backend, config)?;
        let control = scene_control.get_or_try_init(SceneControlManager::new)?;
        let mut ctx = SceneContext {
            scene,
            audio,
            prefs,
            loader: &mut **scene_loader,
            commands,
            next_scene_key: &config.next_scene_key,
        };
        control.load_scene(loading_panel, name, &mut ctx);
        Ok(())
    }
}

/// The framework's application context
pub struct PerakApp {
    stage: Rc<RefCell<Stage>>,
    scheduler: Scheduler,
}

impl PerakApp {
    /// Creates the context, constructs the panel registry and starts the sweep
    ///
    /// # Arguments
    /// * `config` - Framework settings
    /// * `resources` - Provider resolving panel and UI-root templates
    ///
    /// # Returns
    /// [`Error::SingletonReentry`] if another context is alive on this thread
    pub fn new(
        config: FrameworkConfig,
        resources: impl ResourceProvider + 'static,
    ) -> Result<Self> {
        let sweep_interval = config.sweep_interval;
        let stage = Rc::new(RefCell::new(Stage::new(config, Box::new(resources))));
        stage.borrow_mut().with_ui(|_, _| ())?;

        let scheduler = Scheduler::new();
        let handle = scheduler.handle();
        handle.start_coroutine(tasks::check_destroy_panels(
            Rc::downgrade(&stage),
            handle.clone(),
            sweep_interval,
        ));
        info!("application context ready");
        Ok(Self { stage, scheduler })
    }

    /// Installs the audio device
    pub fn with_audio_backend(self, backend: impl AudioBackend + 'static) -> Self {
        {
            let mut stage = self.stage.borrow_mut();
            let backend: Rc<dyn AudioBackend> = Rc::new(backend);
            if let Some(sounds) = stage.audio.get_mut() {
                sounds.set_backend(Rc::clone(&backend));
            }
            stage.audio_backend = backend;
        }
        self
    }

    /// Installs the host's scene loader
    pub fn with_scene_loader(self, loader: impl SceneLoader + 'static) -> Self {
        self.stage.borrow_mut().scene_loader = Box::new(loader);
        self
    }

    pub fn stage(&self) -> Ref<'_, Stage> {
        self.stage.borrow()
    }

    pub fn stage_mut(&self) -> RefMut<'_, Stage> {
        self.stage.borrow_mut()
    }

    pub fn scheduler_handle(&self) -> SchedulerHandle {
        self.scheduler.handle()
    }

    /// Queue shared with panels and listeners
    pub fn commands(&self) -> CommandQueue {
        self.stage.borrow().commands.clone()
    }

    /// Advances one frame
    ///
    /// Steps animations, resumes coroutines, applies queued commands and tears down
    /// the listeners of destroyed surfaces.
    pub fn tick(&mut self, delta_time: f32) -> Result<()> {
        self.stage
            .borrow_mut()
            .with_ui(|ui, host| ui.update(delta_time, host))?;
        self.scheduler.tick(delta_time);
        self.flush_commands()?;

        let mut stage = self.stage.borrow_mut();
        let destroyed = stage.scene.take_destroyed();
        stage.listeners.remove_destroyed(&destroyed);
        Ok(())
    }

    /// Opens panels, optionally batch-closing the others first
    ///
    /// Resident panels are shown right away; the others are loaded before this
    /// returns, most recently requested first.
    pub fn open_panels(
        &mut self,
        kinds: &[PanelType],
        close_others: bool,
        params: Args,
    ) -> Result<()> {
        self.open_panels_now(kinds, close_others, params)?;
        self.flush_commands()
    }

    pub fn open_panel<T: Panel + Default>(&mut self, params: Args) -> Result<()> {
        self.open_panels(&[PanelType::of::<T>()], false, params)
    }

    pub fn open_panel_close_others<T: Panel + Default>(&mut self, params: Args) -> Result<()> {
        self.open_panels(&[PanelType::of::<T>()], true, params)
    }

    fn open_panels_now(
        &mut self,
        kinds: &[PanelType],
        close_others: bool,
        params: Args,
    ) -> Result<()> {
        let needs_load = self
            .stage
            .borrow_mut()
            .with_ui(|ui, host| ui.open_panels(kinds, close_others, params, host))?;
        if needs_load {
            let handle = self.scheduler.handle();
            handle.start_coroutine(tasks::load_panels(Rc::downgrade(&self.stage), handle.clone()));
        }
        Ok(())
    }

    /// Shows a resident panel
    ///
    /// # Returns
    /// `false` if the panel is not resident
    pub fn show_panel<T: Panel + Default>(&mut self) -> Result<bool> {
        let kind = PanelType::of::<T>();
        let shown = self
            .stage
            .borrow_mut()
            .with_ui(|ui, host| ui.show_panel(&kind, host))?;
        self.flush_commands()?;
        Ok(shown)
    }

    /// Tracks and shows a panel the host attached to `surface` itself
    ///
    /// # Returns
    /// [`Error::AlreadyResident`] if `T` already has a live instance; `surface` is
    /// then left untouched for the caller to dispose of.
    pub fn register_panel<T: Panel + Default>(
        &mut self,
        surface: SurfaceId,
        panel: T,
    ) -> Result<()> {
        self.stage.borrow_mut().with_ui(|ui, host| {
            ui.register_panel(PanelType::of::<T>(), surface, Box::new(panel), host)
        })??;
        self.flush_commands()
    }

    pub fn hide_panel<T: Panel + Default>(&mut self) -> Result<()> {
        self.hide(PanelType::of::<T>())
    }

    pub fn hide(&mut self, kind: PanelType) -> Result<()> {
        self.stage
            .borrow_mut()
            .with_ui(|ui, host| ui.hide_panel(&kind, host))?;
        self.flush_commands()
    }

    pub fn close_panels(&mut self, kinds: &[PanelType]) -> Result<()> {
        self.stage
            .borrow_mut()
            .with_ui(|ui, host| ui.close_panels(kinds, host))?;
        self.flush_commands()
    }

    pub fn destroy_panel<T: Panel + Default>(&mut self) -> Result<bool> {
        self.destroy(PanelType::of::<T>())
    }

    /// Destroys a panel regardless of its guards
    pub fn destroy(&mut self, kind: PanelType) -> Result<bool> {
        self.stage
            .borrow_mut()
            .with_ui(|ui, host| ui.destroy_panel(&kind, host.scene))
    }

    /// Starts a scene transition, optionally behind a loading panel
    pub fn load_scene(&mut self, loading_panel: Option<PanelType>, name: &str) -> Result<()> {
        self.stage.borrow_mut().load_scene(loading_panel, name)?;
        self.flush_commands()
    }

    pub fn play_sound(&mut self, sound: PlayMusic) -> Result<()> {
        self.stage
            .borrow_mut()
            .with_audio(|audio| audio.play_sound(sound))
    }

    /// Registers a gesture handler on a live surface, replacing any previous one
    pub fn add_listener(
        &mut self,
        surface: SurfaceId,
        touch_type: TouchType,
        callback: impl Fn(SurfaceId, &EventData, &Args) + 'static,
        args: Args,
    ) -> Result<()> {
        let mut stage = self.stage.borrow_mut();
        if !stage.scene.is_alive(surface) {
            return Err(Error::UnknownSurface(surface));
        }
        stage.listeners.get(surface).add_listener(touch_type, callback, args);
        Ok(())
    }

    /// Delivers a raw input event to the listener on `surface`
    ///
    /// Clicks play the listener's click sound first. Commands queued by the
    /// handler are applied before this returns.
    ///
    /// # Returns
    /// Whether a handler ran
    pub fn dispatch(&mut self, surface: SurfaceId, event: &InputEvent) -> Result<bool> {
        let (touch, click_sound) = {
            let stage = self.stage.borrow();
            if !stage.scene.is_alive(surface) {
                return Err(Error::UnknownSurface(surface));
            }
            let Some(listener) = stage.listeners.find(surface) else {
                return Ok(false);
            };
            let Some(touch_type) = event.touch_type() else {
                return Ok(false);
            };
            let Some(touch) = listener.get_event(touch_type).cloned() else {
                return Ok(false);
            };
            let sound = match touch_type {
                TouchType::OnClick => listener.click_sound(),
                _ => PlayMusic::None,
            };
            (touch, sound)
        };

        if click_sound != PlayMusic::None {
            self.play_sound(click_sound)?;
        }
        touch.call(surface, &event.data());
        self.flush_commands()?;
        Ok(true)
    }

    /// Applies queued commands until the queue stays empty
    pub fn flush_commands(&mut self) -> Result<()> {
        for _ in 0..MAX_COMMAND_ROUNDS {
            let commands = self.commands().take();
            if commands.is_empty() {
                return Ok(());
            }
            for command in commands {
                self.apply(command)?;
            }
        }
        warn!("commands still queued after {MAX_COMMAND_ROUNDS} rounds, deferring to next frame");
        Ok(())
    }

    fn apply(&mut self, command: UiCommand) -> Result<()> {
        match command {
            UiCommand::Open {
                kinds,
                close_others,
                params,
            } => self.open_panels_now(&kinds, close_others, params),
            UiCommand::Hide(kind) => self
                .stage
                .borrow_mut()
                .with_ui(|ui, host| ui.hide_panel(&kind, host)),
            UiCommand::Destroy(kind) => self.destroy(kind).map(|_| ()),
            UiCommand::LoadScene {
                loading_panel,
                name,
            } => self.stage.borrow_mut().load_scene(loading_panel, &name),
            UiCommand::PlaySound(sound) => self.play_sound(sound),
        }
    }

    pub fn is_resident<T: Panel + Default>(&self) -> bool {
        let stage = self.stage.borrow();
        stage
            .ui()
            .is_some_and(|ui| ui.is_resident(&PanelType::of::<T>(), &stage.scene))
    }

    pub fn is_visible<T: Panel + Default>(&self) -> bool {
        let stage = self.stage.borrow();
        stage
            .ui()
            .is_some_and(|ui| ui.is_visible(&PanelType::of::<T>(), &stage.scene))
    }

    pub fn panel_state<T: Panel + Default>(&self) -> Option<PanelState> {
        let stage = self.stage.borrow();
        stage
            .ui()
            .and_then(|ui| ui.panel_state(&PanelType::of::<T>(), &stage.scene))
    }

    pub fn surface_of<T: Panel + Default>(&self) -> Option<SurfaceId> {
        self.stage
            .borrow()
            .ui()
            .and_then(|ui| ui.surface_of(&PanelType::of::<T>()))
    }

    /// Scheduler clock
    pub fn now(&self) -> f64 {
        self.scheduler.handle().now()
    }

    /// Stops every coroutine and resets the persistent managers
    pub fn shutdown(&mut self) {
        self.scheduler.stop_all();
        let mut stage = self.stage.borrow_mut();
        if let Some(mut sounds) = stage.audio.shutdown() {
            sounds.stop_bgm_on_load();
        }
        info!("application context shut down");
    }
}
