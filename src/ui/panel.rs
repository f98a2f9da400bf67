//! # Panels
//!
//! A panel is the behaviour attached to one UI surface. The surface belongs to the
//! scene; the panel carries the visibility protocol, the open/close animation and
//! the deferred-destroy timer.
//!
//! ## Lifecycle
//!
//! 1. **Awake** - Called once when the registry attaches the behaviour
//! 2. **Set params** - Open-time parameters are injected
//! 3. **Set visible** - The surface is activated and the open animation starts
//! 4. **Async load** - Called one tick later if the panel is still active
//! 5. **Transition complete** - Called when the animation settles; on hide this
//!    deactivates the surface and, for `immediate_destroy` panels, destroys it
//!
//! ## Usage
//!
//! ```no_run
//! use perak::ui::{Panel, PanelContext, PanelCore, TweenKind};
//! use std::any::Any;
//!
//! #[derive(Default)]
//! struct ShopPanel {
//!     core: PanelCore,
//! }
//!
//! impl Panel for ShopPanel {
//!     fn core(&self) -> &PanelCore { &self.core }
//!     fn core_mut(&mut self) -> &mut PanelCore { &mut self.core }
//!
//!     fn awake(&mut self, _ctx: &mut PanelContext<'_>) {
//!         self.core.tween.kind = TweenKind::Scale;
//!     }
//!
//!     fn as_any(&self) -> &dyn Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn Any { self }
//! }
//! ```

use std::any::{type_name, Any, TypeId};
use std::cell::RefCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use super::args::Args;
use super::event::ListenerTable;
use super::tween::{Direction, TweenSet, TweenSettings};
use crate::audio::{AudioPlayer, PlayMusic};
use crate::gfx::scene::{Scene, SurfaceId};

/// Logical type of a panel: identity, display name and constructor
#[derive(Clone, Copy)]
pub struct PanelType {
    id: TypeId,
    name: &'static str,
    construct: fn() -> Box<dyn Panel>,
}

impl PanelType {
    pub fn of<T: Panel + Default>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name::<T>(),
            construct: || Box::new(T::default()),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Unqualified type name, e.g. `LoginPanel`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Builds a fresh, not yet awake behaviour of this type
    pub fn construct(&self) -> Box<dyn Panel> {
        (self.construct)()
    }
}

impl PartialEq for PanelType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PanelType {}

impl Hash for PanelType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for PanelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PanelType").field(&self.name).finish()
    }
}

fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let path = full.split('<').next().unwrap_or(full);
    path.rsplit("::").next().unwrap_or(path)
}

/// Derived lifecycle state of a resident panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    Hidden,
    Showing,
    Visible,
    Hiding,
    /// Hidden and out of time; the next sweep destroys it
    PendingDestroy,
    Destroyed,
}

/// Registry requests queued by panels and listeners
///
/// Applied by the application after the current operation returns.
#[derive(Debug, Clone)]
pub enum UiCommand {
    Open {
        kinds: Vec<PanelType>,
        close_others: bool,
        params: Args,
    },
    Hide(PanelType),
    Destroy(PanelType),
    LoadScene {
        loading_panel: Option<PanelType>,
        name: String,
    },
    PlaySound(PlayMusic),
}

/// Shared queue of [`UiCommand`]s
///
/// Cheap to clone; callbacks capture a clone and push into the same queue.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    queue: Rc<RefCell<Vec<UiCommand>>>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, command: UiCommand) {
        self.queue.borrow_mut().push(command);
    }

    pub fn open_panel<T: Panel + Default>(&self, params: Args) {
        self.open_panels(vec![PanelType::of::<T>()], false, params);
    }

    pub fn open_panel_close_others<T: Panel + Default>(&self, params: Args) {
        self.open_panels(vec![PanelType::of::<T>()], true, params);
    }

    pub fn open_panels(&self, kinds: Vec<PanelType>, close_others: bool, params: Args) {
        self.push(UiCommand::Open {
            kinds,
            close_others,
            params,
        });
    }

    pub fn hide_panel<T: Panel + Default>(&self) {
        self.push(UiCommand::Hide(PanelType::of::<T>()));
    }

    pub fn destroy_panel<T: Panel + Default>(&self) {
        self.push(UiCommand::Destroy(PanelType::of::<T>()));
    }

    pub fn load_scene(&self, loading_panel: Option<PanelType>, name: impl Into<String>) {
        self.push(UiCommand::LoadScene {
            loading_panel,
            name: name.into(),
        });
    }

    pub fn play_sound(&self, sound: PlayMusic) {
        self.push(UiCommand::PlaySound(sound));
    }

    /// Drains every queued command in push order
    pub fn take(&self) -> Vec<UiCommand> {
        std::mem::take(&mut *self.queue.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

/// What a panel hook can reach
pub struct PanelContext<'a> {
    /// Surface the panel is attached to
    pub surface: SurfaceId,
    pub scene: &'a mut Scene,
    pub audio: &'a mut dyn AudioPlayer,
    pub commands: &'a CommandQueue,
    pub listeners: &'a mut ListenerTable,
}

/// Hidden time before the sweep destroys a panel that doesn't pick its own
pub const DEFAULT_DESTROY_DELAY: f32 = 10.0;

/// State shared by every panel
///
/// Concrete panels embed one and expose it through [`Panel::core`].
#[derive(Debug, Clone)]
pub struct PanelCore {
    surface: Option<SurfaceId>,
    destroy_timer: f32,
    // None until the panel or the host picks a delay
    destroy_delay: Option<f32>,
    /// Destroy the surface as soon as the hide animation completes
    pub immediate_destroy: bool,
    /// Skip this panel when others are batch-closed, and never age it out
    pub ignore_batch_close: bool,
    /// Pin the panel visible: hide requests and hide completion are ignored
    pub ignore_hide_guard: bool,
    pub tween: TweenSettings,
    tweens: TweenSet,
    pub open_sound: PlayMusic,
    pub close_sound: PlayMusic,
}

impl Default for PanelCore {
    fn default() -> Self {
        Self {
            surface: None,
            destroy_timer: DEFAULT_DESTROY_DELAY,
            destroy_delay: None,
            immediate_destroy: false,
            ignore_batch_close: false,
            ignore_hide_guard: false,
            tween: TweenSettings::default(),
            tweens: TweenSet::default(),
            open_sound: PlayMusic::None,
            close_sound: PlayMusic::None,
        }
    }
}

impl PanelCore {
    /// # Arguments
    /// * `destroy_delay` - Hidden time after which the sweep destroys the panel
    pub fn new(destroy_delay: f32) -> Self {
        Self::default().with_destroy_delay(destroy_delay)
    }

    pub fn with_destroy_delay(mut self, delay: f32) -> Self {
        self.set_destroy_delay(delay);
        self
    }

    pub fn with_tween(mut self, tween: TweenSettings) -> Self {
        self.tween = tween;
        self
    }

    pub fn with_sounds(mut self, open: PlayMusic, close: PlayMusic) -> Self {
        self.open_sound = open;
        self.close_sound = close;
        self
    }

    pub fn set_destroy_delay(&mut self, delay: f32) {
        self.destroy_delay = Some(delay);
        self.destroy_timer = delay;
    }

    pub fn destroy_delay(&self) -> f32 {
        self.destroy_delay.unwrap_or(DEFAULT_DESTROY_DELAY)
    }

    pub fn destroy_timer(&self) -> f32 {
        self.destroy_timer
    }

    pub fn reset_destroy_timer(&mut self) {
        self.destroy_timer = self.destroy_delay();
    }

    /// Surface the panel was attached to, once attached
    pub fn surface(&self) -> Option<SurfaceId> {
        self.surface
    }

    pub(crate) fn bind(&mut self, surface: SurfaceId) {
        self.surface = Some(surface);
    }

    /// Replaces the built-in delay and duration with host-wide defaults
    ///
    /// Values the panel picked itself are left alone, even when they equal the
    /// built-in ones.
    pub(crate) fn apply_defaults(&mut self, destroy_delay: f32, tween_duration: f32) {
        if self.destroy_delay.is_none() {
            self.set_destroy_delay(destroy_delay);
        }
        if self.tween.duration.is_none() {
            self.tween.duration = Some(tween_duration.max(0.0));
        }
    }

    /// Whether the surface is active; not cached
    pub fn is_visible(&self, scene: &Scene) -> bool {
        self.surface.is_some_and(|s| scene.is_active(s))
    }

    /// Ages a hidden panel by `delta`
    ///
    /// # Returns
    /// Remaining time, or `1.0` while the panel is visible or ignores batch close
    pub fn reduce_destroy_timer(&mut self, delta: f32, scene: &Scene) -> f32 {
        if self.ignore_batch_close || self.is_visible(scene) {
            return 1.0;
        }
        self.destroy_timer -= delta;
        self.destroy_timer
    }

    pub fn state(&self, scene: &Scene) -> PanelState {
        let Some(surface) = self.surface else {
            return PanelState::Hidden;
        };
        if !scene.is_alive(surface) {
            return PanelState::Destroyed;
        }
        match self.tweens.playing_direction(self.tween.kind) {
            Some(Direction::Forward) => PanelState::Showing,
            Some(Direction::Backward) => PanelState::Hiding,
            _ if scene.is_active(surface) => PanelState::Visible,
            _ if !self.ignore_batch_close && self.destroy_timer <= 0.0 => {
                PanelState::PendingDestroy
            }
            _ => PanelState::Hidden,
        }
    }

    /// Cached tweeners of this panel
    pub fn tweens(&self) -> &TweenSet {
        &self.tweens
    }

    /// Starts the configured animation
    ///
    /// # Returns
    /// `false` when the panel has no animation and the transition is already over
    pub fn play_tweens(&mut self, show: bool, scene: &Scene) -> bool {
        let Some(surface) = self.surface else {
            return false;
        };
        if self.tween.kind.axes().is_empty() {
            return false;
        }
        self.tweens.play(&self.tween, show, surface, scene);
        true
    }

    /// Steps the animation
    ///
    /// # Returns
    /// `Some(show)` when the transition completed during this step
    pub fn advance_tweens(&mut self, delta: f32, scene: &mut Scene) -> Option<bool> {
        let surface = self.surface?;
        self.tweens.advance(self.tween.kind, delta, surface, scene)
    }

    /// Default completion behaviour
    pub fn finish_transition(&mut self, show: bool, scene: &mut Scene) {
        if self.ignore_hide_guard || show {
            return;
        }
        self.reset_destroy_timer();
        if let Some(surface) = self.surface {
            scene.set_active(surface, false);
            if self.immediate_destroy {
                scene.destroy(surface);
            }
        }
    }

    /// Draws the panel above its siblings
    pub fn set_trans_to_top(&self, scene: &mut Scene) {
        if let Some(surface) = self.surface {
            scene.set_as_first_sibling(surface);
        }
    }

    /// Draws the panel below its siblings
    pub fn set_trans_to_bottom(&self, scene: &mut Scene) {
        if let Some(surface) = self.surface {
            scene.set_as_last_sibling(surface);
        }
    }
}

/// Behaviour attached to a panel surface
pub trait Panel: Any {
    fn core(&self) -> &PanelCore;

    fn core_mut(&mut self) -> &mut PanelCore;

    /// Unqualified type name, matched against the surface name on load
    fn name(&self) -> &'static str {
        short_type_name::<Self>()
    }

    /// Called once right after the behaviour is attached to its surface
    fn awake(&mut self, _ctx: &mut PanelContext<'_>) {}

    /// Receives the parameters passed when the panel was opened
    fn set_params(&mut self, _params: &Args) {}

    /// Deferred per-open setup, run one tick after the panel was created
    ///
    /// Skipped when the panel was deactivated in the meantime.
    fn on_async_load(&mut self, _ctx: &mut PanelContext<'_>) {}

    /// Plays the open or close sound
    fn on_play_sound(&mut self, show: bool, audio: &mut dyn AudioPlayer) {
        let sound = if show {
            self.core().open_sound
        } else {
            self.core().close_sound
        };
        if sound != PlayMusic::None {
            audio.play_sound(sound);
        }
    }

    /// Starts the open or close animation
    ///
    /// Panels without an animation complete the transition right away.
    fn on_start_animation(&mut self, show: bool, ctx: &mut PanelContext<'_>) {
        if !self.core_mut().play_tweens(show, ctx.scene) {
            self.on_transition_complete(show, ctx);
        }
    }

    /// Called when the open or close animation settles
    ///
    /// Overrides should call [`PanelCore::finish_transition`] after their own work.
    fn on_transition_complete(&mut self, show: bool, ctx: &mut PanelContext<'_>) {
        self.core_mut().finish_transition(show, ctx.scene);
    }

    /// Support for downcasting to concrete types
    fn as_any(&self) -> &dyn Any;

    /// Support for mutable downcasting to concrete types
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl dyn Panel {
    /// Shows or hides the panel
    ///
    /// Showing activates the surface before the animation starts so that input is
    /// live for the whole open animation. Hiding leaves the surface active until the
    /// close animation completes.
    pub fn set_visible(&mut self, show: bool, ctx: &mut PanelContext<'_>) {
        self.on_play_sound(show, ctx.audio);
        self.core_mut().reset_destroy_timer();
        if show {
            ctx.scene.set_active(ctx.surface, true);
        }
        self.on_start_animation(show, ctx);
    }

    pub fn is_visible(&self, scene: &Scene) -> bool {
        self.core().is_visible(scene)
    }

    pub fn downcast_ref<T: Panel>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Panel>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullAudio;
    use crate::ui::tween::{TweenKind, DEFAULT_TWEEN_DURATION};

    #[derive(Default)]
    struct TipPanel {
        core: PanelCore,
        completions: Vec<bool>,
    }

    impl Panel for TipPanel {
        fn core(&self) -> &PanelCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut PanelCore {
            &mut self.core
        }

        fn on_transition_complete(&mut self, show: bool, ctx: &mut PanelContext<'_>) {
            self.completions.push(show);
            self.core.finish_transition(show, ctx.scene);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct Fixture {
        scene: Scene,
        audio: NullAudio,
        commands: CommandQueue,
        listeners: ListenerTable,
        surface: SurfaceId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut scene = Scene::new();
            let surface = scene.spawn("TipPanel", None);
            scene.set_active(surface, false);
            Self {
                scene,
                audio: NullAudio,
                commands: CommandQueue::new(),
                listeners: ListenerTable::new(),
                surface,
            }
        }

        fn ctx(&mut self) -> PanelContext<'_> {
            PanelContext {
                surface: self.surface,
                scene: &mut self.scene,
                audio: &mut self.audio,
                commands: &self.commands,
                listeners: &mut self.listeners,
            }
        }
    }

    fn bound_panel(fixture: &Fixture) -> Box<dyn Panel> {
        let mut panel = PanelType::of::<TipPanel>().construct();
        panel.core_mut().bind(fixture.surface);
        panel
    }

    #[test]
    fn test_type_name_is_unqualified() {
        let kind = PanelType::of::<TipPanel>();
        assert_eq!(kind.name(), "TipPanel");
        assert_eq!(kind.construct().name(), "TipPanel");
        assert_eq!(kind, PanelType::of::<TipPanel>());
    }

    #[test]
    fn test_show_activates_before_animation() {
        let mut fixture = Fixture::new();
        let mut panel = bound_panel(&fixture);
        panel.core_mut().tween = TweenSettings::default()
            .with_kind(TweenKind::Scale)
            .with_duration(1.0);

        panel.set_visible(true, &mut fixture.ctx());
        assert!(fixture.scene.is_active(fixture.surface));
        assert_eq!(panel.core().state(&fixture.scene), PanelState::Showing);

        assert_eq!(panel.core_mut().advance_tweens(1.0, &mut fixture.scene), Some(true));
        assert_eq!(panel.core().state(&fixture.scene), PanelState::Visible);
    }

    #[test]
    fn test_hide_without_animation_deactivates_through_hook() {
        let mut fixture = Fixture::new();
        let mut panel = bound_panel(&fixture);

        panel.set_visible(true, &mut fixture.ctx());
        panel.set_visible(false, &mut fixture.ctx());

        assert!(!fixture.scene.is_active(fixture.surface));
        assert_eq!(panel.core().state(&fixture.scene), PanelState::Hidden);
        let tip = panel.downcast_ref::<TipPanel>().unwrap();
        assert_eq!(tip.completions, vec![true, false]);
    }

    #[test]
    fn test_hide_guard_keeps_panel_visible() {
        let mut fixture = Fixture::new();
        let mut panel = bound_panel(&fixture);
        panel.core_mut().ignore_hide_guard = true;

        panel.set_visible(true, &mut fixture.ctx());
        panel.set_visible(false, &mut fixture.ctx());
        assert!(fixture.scene.is_active(fixture.surface));
    }

    #[test]
    fn test_immediate_destroy_on_hide_completion() {
        let mut fixture = Fixture::new();
        let mut panel = bound_panel(&fixture);
        panel.core_mut().immediate_destroy = true;

        panel.set_visible(true, &mut fixture.ctx());
        panel.set_visible(false, &mut fixture.ctx());
        assert!(!fixture.scene.is_alive(fixture.surface));
        assert_eq!(panel.core().state(&fixture.scene), PanelState::Destroyed);
    }

    #[test]
    fn test_destroy_timer_only_runs_while_hidden() {
        let mut fixture = Fixture::new();
        let mut panel = bound_panel(&fixture);
        panel.core_mut().set_destroy_delay(10.0);

        panel.set_visible(true, &mut fixture.ctx());
        assert_eq!(panel.core_mut().reduce_destroy_timer(5.0, &fixture.scene), 1.0);

        panel.set_visible(false, &mut fixture.ctx());
        assert_eq!(panel.core_mut().reduce_destroy_timer(5.0, &fixture.scene), 5.0);
        assert_eq!(panel.core_mut().reduce_destroy_timer(5.0, &fixture.scene), 0.0);
        assert_eq!(panel.core().state(&fixture.scene), PanelState::PendingDestroy);

        panel.core_mut().ignore_batch_close = true;
        assert_eq!(panel.core_mut().reduce_destroy_timer(5.0, &fixture.scene), 1.0);
    }

    #[test]
    fn test_host_defaults_only_fill_unset_values() {
        let mut unset = PanelCore::default();
        unset.apply_defaults(4.0, 0.5);
        assert_eq!(unset.destroy_delay(), 4.0);
        assert_eq!(unset.destroy_timer(), 4.0);
        assert_eq!(unset.tween.duration(), 0.5);

        // Picked on purpose, even though they match the built-in values
        let mut chosen = PanelCore::new(DEFAULT_DESTROY_DELAY)
            .with_tween(TweenSettings::default().with_duration(DEFAULT_TWEEN_DURATION));
        chosen.apply_defaults(4.0, 0.5);
        assert_eq!(chosen.destroy_delay(), DEFAULT_DESTROY_DELAY);
        assert_eq!(chosen.tween.duration(), DEFAULT_TWEEN_DURATION);
    }

    #[test]
    fn test_sibling_order_helpers() {
        let mut fixture = Fixture::new();
        let root = fixture.scene.spawn("Container", None);
        let first = fixture.scene.spawn("Other", Some(root));
        let surface = fixture.scene.spawn("TipPanel", Some(root));
        let mut panel = PanelType::of::<TipPanel>().construct();
        panel.core_mut().bind(surface);

        panel.core().set_trans_to_top(&mut fixture.scene);
        assert_eq!(fixture.scene.sibling_index(surface), Some(0));
        panel.core().set_trans_to_bottom(&mut fixture.scene);
        assert_eq!(fixture.scene.sibling_index(first), Some(0));
    }

    #[test]
    fn test_command_queue_drains_in_order() {
        let commands = CommandQueue::new();
        let captured = commands.clone();
        captured.open_panel::<TipPanel>(Args::new());
        captured.hide_panel::<TipPanel>();

        let drained = commands.take();
        assert!(matches!(drained[0], UiCommand::Open { close_others: false, .. }));
        assert!(matches!(drained[1], UiCommand::Hide(kind) if kind == PanelType::of::<TipPanel>()));
        assert!(commands.is_empty());
    }
}
