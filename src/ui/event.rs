//! # Event Dispatch
//!
//! Per-surface input listeners. Each [`EventListener`] maps a [`TouchType`] to a
//! single replaceable [`TouchEvent`]: registering a second callback for the same
//! gesture replaces the first one, there is no fan-out.
//!
//! The input runtime does not know about touch types. It calls whichever capability
//! trait ([`Clickable`], [`Hoverable`], [`Selectable`], [`Draggable`], [`Scrollable`],
//! [`Navigable`]) matches the raw event, and the listener turns that into a gesture
//! dispatch. Single and double clicks are told apart by the click count the runtime
//! reports.
//!
//! ## Usage
//!
//! ```no_run
//! use perak::ui::{Args, EventListener, TouchType};
//! # use perak::gfx::scene::Scene;
//! # let mut scene = Scene::new();
//! # let button = scene.spawn("LoginBtn", None);
//!
//! let mut listener = EventListener::new(button);
//! listener.add_listener(TouchType::OnClick, |_, _, _| println!("clicked"), Args::new());
//! ```

use cgmath::{Vector2, Zero};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::args::Args;
use crate::audio::PlayMusic;
use crate::gfx::scene::SurfaceId;

/// Gesture kinds a listener can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchType {
    OnClick,
    OnDoubleClick,
    OnDown,
    OnUp,
    OnEnter,
    OnExit,
    OnSelect,
    OnUpdateSelect,
    OnDeSelect,
    OnDragBegin,
    OnDrag,
    OnDragEnd,
    OnDrop,
    OnScroll,
    OnMove,
}

/// Mouse button (or touch) that produced a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Pointer payload reported by the input runtime
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEventData {
    pub position: Vector2<f32>,
    pub delta: Vector2<f32>,
    pub scroll_delta: Vector2<f32>,
    pub click_count: u32,
    pub button: PointerButton,
}

impl Default for PointerEventData {
    fn default() -> Self {
        Self {
            position: Vector2::zero(),
            delta: Vector2::zero(),
            scroll_delta: Vector2::zero(),
            click_count: 0,
            button: PointerButton::Left,
        }
    }
}

impl PointerEventData {
    /// Pointer event at `position` with the given click count
    pub fn click(position: Vector2<f32>, click_count: u32) -> Self {
        Self {
            position,
            click_count,
            ..Self::default()
        }
    }
}

/// Selection payload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BaseEventData {
    /// Surface holding the selection when the event fired
    pub selected: Option<SurfaceId>,
}

/// Direction of a navigation move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoveDirection {
    Left,
    Up,
    Right,
    Down,
    #[default]
    None,
}

/// Navigation payload (keyboard or gamepad axes)
#[derive(Debug, Clone, PartialEq)]
pub struct AxisEventData {
    pub move_vector: Vector2<f32>,
    pub move_dir: MoveDirection,
}

impl AxisEventData {
    /// Builds the payload, deriving the dominant direction from the vector
    pub fn from_vector(move_vector: Vector2<f32>) -> Self {
        let move_dir = if move_vector.x == 0.0 && move_vector.y == 0.0 {
            MoveDirection::None
        } else if move_vector.x.abs() > move_vector.y.abs() {
            if move_vector.x > 0.0 {
                MoveDirection::Right
            } else {
                MoveDirection::Left
            }
        } else if move_vector.y > 0.0 {
            MoveDirection::Up
        } else {
            MoveDirection::Down
        };
        Self {
            move_vector,
            move_dir,
        }
    }
}

/// Payload handed to touch callbacks
#[derive(Debug, Clone, PartialEq)]
pub enum EventData {
    Pointer(PointerEventData),
    Base(BaseEventData),
    Axis(AxisEventData),
}

impl EventData {
    pub fn as_pointer(&self) -> Option<&PointerEventData> {
        match self {
            EventData::Pointer(data) => Some(data),
            _ => None,
        }
    }
}

/// Callback invoked with the listener's surface, the payload and the captured args
pub type TouchCallback = Rc<dyn Fn(SurfaceId, &EventData, &Args)>;

/// One registered gesture handler: a callback plus its captured arguments
#[derive(Clone)]
pub struct TouchEvent {
    touch_type: TouchType,
    callback: TouchCallback,
    args: Args,
}

impl TouchEvent {
    pub fn new(touch_type: TouchType, callback: TouchCallback, args: Args) -> Self {
        Self {
            touch_type,
            callback,
            args,
        }
    }

    pub fn touch_type(&self) -> TouchType {
        self.touch_type
    }

    pub fn args(&self) -> &Args {
        &self.args
    }

    /// Invokes the callback for `listener`
    pub fn call(&self, listener: SurfaceId, data: &EventData) {
        (self.callback)(listener, data, &self.args);
    }
}

impl fmt::Debug for TouchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TouchEvent")
            .field("touch_type", &self.touch_type)
            .field("args", &self.args)
            .finish()
    }
}

/// Gesture table attached to one surface
#[derive(Debug)]
pub struct EventListener {
    owner: SurfaceId,
    events: HashMap<TouchType, TouchEvent>,
    click_sound: PlayMusic,
}

impl EventListener {
    pub fn new(owner: SurfaceId) -> Self {
        Self {
            owner,
            events: HashMap::new(),
            click_sound: PlayMusic::ButtonClick,
        }
    }

    pub fn owner(&self) -> SurfaceId {
        self.owner
    }

    /// Registers `callback` for `touch_type`, replacing any previous one
    ///
    /// # Arguments
    /// * `touch_type` - Gesture to listen for
    /// * `callback` - Handler, called with the owner surface, the payload and `args`
    /// * `args` - Extra arguments captured now and passed on every call
    pub fn add_listener(
        &mut self,
        touch_type: TouchType,
        callback: impl Fn(SurfaceId, &EventData, &Args) + 'static,
        args: Args,
    ) {
        self.events.insert(
            touch_type,
            TouchEvent::new(touch_type, Rc::new(callback), args),
        );
    }

    /// Handler registered for `touch_type`
    pub fn get_event(&self, touch_type: TouchType) -> Option<&TouchEvent> {
        self.events.get(&touch_type)
    }

    /// Invokes the handler for `touch_type`; silent when none is registered
    ///
    /// # Returns
    /// Whether a handler ran
    pub fn dispatch(&self, touch_type: TouchType, data: &EventData) -> bool {
        match self.events.get(&touch_type) {
            Some(event) => {
                event.call(self.owner, data);
                true
            }
            None => false,
        }
    }

    pub fn remove_listener(&mut self, touch_type: TouchType) -> Option<TouchEvent> {
        self.events.remove(&touch_type)
    }

    /// Drops every registration
    pub fn remove_all(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Sound played when a click is delivered through the application
    pub fn click_sound(&self) -> PlayMusic {
        self.click_sound
    }

    pub fn set_click_sound(&mut self, sound: PlayMusic) {
        self.click_sound = sound;
    }

    fn pointer(&self, touch_type: TouchType, data: &PointerEventData) -> bool {
        self.dispatch(touch_type, &EventData::Pointer(data.clone()))
    }

    fn base(&self, touch_type: TouchType, data: &BaseEventData) -> bool {
        self.dispatch(touch_type, &EventData::Base(data.clone()))
    }
}

/// Click, press and release
pub trait Clickable {
    fn on_pointer_click(&self, data: &PointerEventData) -> bool;
    fn on_pointer_down(&self, data: &PointerEventData) -> bool;
    fn on_pointer_up(&self, data: &PointerEventData) -> bool;
}

/// Pointer entering and leaving
pub trait Hoverable {
    fn on_pointer_enter(&self, data: &PointerEventData) -> bool;
    fn on_pointer_exit(&self, data: &PointerEventData) -> bool;
}

/// Selection changes
pub trait Selectable {
    fn on_select(&self, data: &BaseEventData) -> bool;
    fn on_update_selected(&self, data: &BaseEventData) -> bool;
    fn on_deselect(&self, data: &BaseEventData) -> bool;
}

/// Drag family, including the drop on the target
pub trait Draggable {
    fn on_begin_drag(&self, data: &PointerEventData) -> bool;
    fn on_drag(&self, data: &PointerEventData) -> bool;
    fn on_end_drag(&self, data: &PointerEventData) -> bool;
    fn on_drop(&self, data: &PointerEventData) -> bool;
}

pub trait Scrollable {
    fn on_scroll(&self, data: &PointerEventData) -> bool;
}

/// Directional navigation while selected
pub trait Navigable {
    fn on_move(&self, data: &AxisEventData) -> bool;
}

impl Clickable for EventListener {
    fn on_pointer_click(&self, data: &PointerEventData) -> bool {
        match click_touch_type(data.click_count) {
            Some(touch_type) => self.pointer(touch_type, data),
            None => false,
        }
    }

    fn on_pointer_down(&self, data: &PointerEventData) -> bool {
        self.pointer(TouchType::OnDown, data)
    }

    fn on_pointer_up(&self, data: &PointerEventData) -> bool {
        self.pointer(TouchType::OnUp, data)
    }
}

impl Hoverable for EventListener {
    fn on_pointer_enter(&self, data: &PointerEventData) -> bool {
        self.pointer(TouchType::OnEnter, data)
    }

    fn on_pointer_exit(&self, data: &PointerEventData) -> bool {
        self.pointer(TouchType::OnExit, data)
    }
}

impl Selectable for EventListener {
    fn on_select(&self, data: &BaseEventData) -> bool {
        self.base(TouchType::OnSelect, data)
    }

    fn on_update_selected(&self, data: &BaseEventData) -> bool {
        self.base(TouchType::OnUpdateSelect, data)
    }

    fn on_deselect(&self, data: &BaseEventData) -> bool {
        self.base(TouchType::OnDeSelect, data)
    }
}

impl Draggable for EventListener {
    fn on_begin_drag(&self, data: &PointerEventData) -> bool {
        self.pointer(TouchType::OnDragBegin, data)
    }

    fn on_drag(&self, data: &PointerEventData) -> bool {
        self.pointer(TouchType::OnDrag, data)
    }

    fn on_end_drag(&self, data: &PointerEventData) -> bool {
        self.pointer(TouchType::OnDragEnd, data)
    }

    fn on_drop(&self, data: &PointerEventData) -> bool {
        self.pointer(TouchType::OnDrop, data)
    }
}

impl Scrollable for EventListener {
    fn on_scroll(&self, data: &PointerEventData) -> bool {
        self.pointer(TouchType::OnScroll, data)
    }
}

impl Navigable for EventListener {
    fn on_move(&self, data: &AxisEventData) -> bool {
        self.dispatch(TouchType::OnMove, &EventData::Axis(data.clone()))
    }
}

fn click_touch_type(click_count: u32) -> Option<TouchType> {
    match click_count {
        1 => Some(TouchType::OnClick),
        2 => Some(TouchType::OnDoubleClick),
        _ => None,
    }
}

/// Raw event as delivered by the input runtime
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Click(PointerEventData),
    Down(PointerEventData),
    Up(PointerEventData),
    Enter(PointerEventData),
    Exit(PointerEventData),
    Select(BaseEventData),
    UpdateSelected(BaseEventData),
    Deselect(BaseEventData),
    BeginDrag(PointerEventData),
    Drag(PointerEventData),
    EndDrag(PointerEventData),
    Drop(PointerEventData),
    Scroll(PointerEventData),
    Move(AxisEventData),
}

impl InputEvent {
    /// Gesture this event maps to; clicks with a count other than 1 or 2 map to none
    pub fn touch_type(&self) -> Option<TouchType> {
        Some(match self {
            InputEvent::Click(data) => return click_touch_type(data.click_count),
            InputEvent::Down(_) => TouchType::OnDown,
            InputEvent::Up(_) => TouchType::OnUp,
            InputEvent::Enter(_) => TouchType::OnEnter,
            InputEvent::Exit(_) => TouchType::OnExit,
            InputEvent::Select(_) => TouchType::OnSelect,
            InputEvent::UpdateSelected(_) => TouchType::OnUpdateSelect,
            InputEvent::Deselect(_) => TouchType::OnDeSelect,
            InputEvent::BeginDrag(_) => TouchType::OnDragBegin,
            InputEvent::Drag(_) => TouchType::OnDrag,
            InputEvent::EndDrag(_) => TouchType::OnDragEnd,
            InputEvent::Drop(_) => TouchType::OnDrop,
            InputEvent::Scroll(_) => TouchType::OnScroll,
            InputEvent::Move(_) => TouchType::OnMove,
        })
    }

    /// Payload handed to the callback
    pub fn data(&self) -> EventData {
        match self {
            InputEvent::Select(data)
            | InputEvent::UpdateSelected(data)
            | InputEvent::Deselect(data) => EventData::Base(data.clone()),
            InputEvent::Move(data) => EventData::Axis(data.clone()),
            InputEvent::Click(data)
            | InputEvent::Down(data)
            | InputEvent::Up(data)
            | InputEvent::Enter(data)
            | InputEvent::Exit(data)
            | InputEvent::BeginDrag(data)
            | InputEvent::Drag(data)
            | InputEvent::EndDrag(data)
            | InputEvent::Drop(data)
            | InputEvent::Scroll(data) => EventData::Pointer(data.clone()),
        }
    }

    /// Routes the event through the capability trait that handles it
    ///
    /// # Returns
    /// Whether a handler ran
    pub fn deliver<L>(&self, listener: &L) -> bool
    where
        L: Clickable + Hoverable + Selectable + Draggable + Scrollable + Navigable,
    {
        match self {
            InputEvent::Click(data) => listener.on_pointer_click(data),
            InputEvent::Down(data) => listener.on_pointer_down(data),
            InputEvent::Up(data) => listener.on_pointer_up(data),
            InputEvent::Enter(data) => listener.on_pointer_enter(data),
            InputEvent::Exit(data) => listener.on_pointer_exit(data),
            InputEvent::Select(data) => listener.on_select(data),
            InputEvent::UpdateSelected(data) => listener.on_update_selected(data),
            InputEvent::Deselect(data) => listener.on_deselect(data),
            InputEvent::BeginDrag(data) => listener.on_begin_drag(data),
            InputEvent::Drag(data) => listener.on_drag(data),
            InputEvent::EndDrag(data) => listener.on_end_drag(data),
            InputEvent::Drop(data) => listener.on_drop(data),
            InputEvent::Scroll(data) => listener.on_scroll(data),
            InputEvent::Move(data) => listener.on_move(data),
        }
    }
}

/// Listeners of every surface, created on demand
#[derive(Debug, Default)]
pub struct ListenerTable {
    listeners: HashMap<SurfaceId, EventListener>,
}

impl ListenerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listener attached to `surface`, attaching a fresh one if there is none
    pub fn get(&mut self, surface: SurfaceId) -> &mut EventListener {
        self.listeners
            .entry(surface)
            .or_insert_with(|| EventListener::new(surface))
    }

    /// Listener attached to `surface`, without attaching one
    pub fn find(&self, surface: SurfaceId) -> Option<&EventListener> {
        self.listeners.get(&surface)
    }

    /// Tears down the listeners of destroyed surfaces
    ///
    /// # Returns
    /// Number of listeners removed
    pub fn remove_destroyed(&mut self, destroyed: &[SurfaceId]) -> usize {
        let mut removed = 0;
        for surface in destroyed {
            if let Some(mut listener) = self.listeners.remove(surface) {
                listener.remove_all();
                removed += 1;
            }
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
