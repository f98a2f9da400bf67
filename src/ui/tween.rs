//! Open/close animations for panels
//!
//! A panel animates along up to three axes (position, scale, rotation). Each axis is
//! driven by a [`Tweener`] that is created lazily the first time it is needed, never
//! discarded, and replayed forward on show and backward on hide.
//!
//! Only the first axis of a combined [`TweenKind`] reports completion; the remaining
//! axes run alongside it without being awaited.

use cgmath::{Vector3, VectorSpace};

use crate::gfx::scene::{Scene, SurfaceId};

/// Which transform channel a tweener drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TweenAxis {
    /// Scene-space position
    Move,
    /// Position relative to the parent
    LocalMove,
    Scale,
    Rotate,
}

/// Animation played when a panel opens or closes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TweenKind {
    #[default]
    None,
    Move,
    LocalMove,
    Scale,
    Rotate,
    LocalMoveAndScale,
    LocalMoveAndRotate,
    ScaleAndRotate,
    LocalMoveAndScaleAndRotate,
}

impl TweenKind {
    /// Axes animated by this kind; the first one reports completion
    pub fn axes(self) -> &'static [TweenAxis] {
        use TweenAxis::*;
        match self {
            TweenKind::None => &[],
            TweenKind::Move => &[Move],
            TweenKind::LocalMove => &[LocalMove],
            TweenKind::Scale => &[Scale],
            TweenKind::Rotate => &[Rotate],
            TweenKind::LocalMoveAndScale => &[LocalMove, Scale],
            TweenKind::LocalMoveAndRotate => &[LocalMove, Rotate],
            TweenKind::ScaleAndRotate => &[Scale, Rotate],
            TweenKind::LocalMoveAndScaleAndRotate => &[LocalMove, Scale, Rotate],
        }
    }
}

/// Easing curve applied to tween progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ease {
    #[default]
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InSine,
    OutSine,
    InOutSine,
    OutBack,
}

impl Ease {
    /// Maps linear progress `t` in `[0, 1]` onto the curve
    pub fn apply(self, t: f32) -> f32 {
        use std::f32::consts::PI;
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::InQuad => t * t,
            Ease::OutQuad => t * (2.0 - t),
            Ease::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Ease::InCubic => t * t * t,
            Ease::OutCubic => {
                let f = t - 1.0;
                f * f * f + 1.0
            }
            Ease::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let f = 2.0 * t - 2.0;
                    0.5 * f * f * f + 1.0
                }
            }
            Ease::InSine => 1.0 - (t * PI / 2.0).cos(),
            Ease::OutSine => (t * PI / 2.0).sin(),
            Ease::InOutSine => -0.5 * ((PI * t).cos() - 1.0),
            Ease::OutBack => {
                let c1 = 1.70158;
                let c3 = c1 + 1.0;
                let f = t - 1.0;
                1.0 + c3 * f * f * f + c1 * f * f
            }
        }
    }
}

/// How a rotation target is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotateMode {
    /// Rotate to the target angles
    Absolute,
    /// Add the target angles to the starting rotation
    #[default]
    LocalAxisAdd,
}

/// Play direction of a tweener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Paused,
    Forward,
    Backward,
}

/// Reversible tween between two vectors
///
/// Tweeners are never killed on completion: they pause at either end and can be
/// played again in either direction from wherever they currently are.
#[derive(Debug, Clone)]
pub struct Tweener {
    axis: TweenAxis,
    from: Vector3<f32>,
    to: Vector3<f32>,
    duration: f32,
    ease: Ease,
    elapsed: f32,
    direction: Direction,
}

impl Tweener {
    /// Creates a paused tweener sitting at its start value
    pub fn new(
        axis: TweenAxis,
        from: Vector3<f32>,
        to: Vector3<f32>,
        duration: f32,
        ease: Ease,
    ) -> Self {
        Self {
            axis,
            from,
            to,
            duration: duration.max(0.0),
            ease,
            elapsed: 0.0,
            direction: Direction::Paused,
        }
    }

    pub fn play_forward(&mut self) {
        self.direction = Direction::Forward;
    }

    pub fn play_backwards(&mut self) {
        self.direction = Direction::Backward;
    }

    /// Steps the tweener by `delta`
    ///
    /// A tweener that is asked to play toward the end it already sits at completes
    /// on its next step.
    ///
    /// # Returns
    /// `true` if this step reached the end the tweener was playing toward
    pub fn advance(&mut self, delta: f32) -> bool {
        match self.direction {
            Direction::Paused => false,
            Direction::Forward => {
                self.elapsed = (self.elapsed + delta).min(self.duration);
                if self.elapsed >= self.duration {
                    self.direction = Direction::Paused;
                    true
                } else {
                    false
                }
            }
            Direction::Backward => {
                self.elapsed = (self.elapsed - delta).max(0.0);
                if self.elapsed <= 0.0 {
                    self.direction = Direction::Paused;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Linear progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            if self.elapsed > 0.0 || self.direction == Direction::Forward {
                1.0
            } else {
                0.0
            }
        } else {
            self.elapsed / self.duration
        }
    }

    /// Current eased value
    pub fn value(&self) -> Vector3<f32> {
        self.from.lerp(self.to, self.ease.apply(self.progress()))
    }

    pub fn axis(&self) -> TweenAxis {
        self.axis
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_playing(&self) -> bool {
        self.direction != Direction::Paused
    }

    /// Writes the current value into the surface's transform
    pub fn apply(&self, surface: SurfaceId, scene: &mut Scene) {
        let value = self.value();
        match self.axis {
            TweenAxis::Move => scene.set_world_position(surface, value),
            axis => {
                if let Some(transform) = scene.transform_mut(surface) {
                    match axis {
                        TweenAxis::LocalMove => transform.local_position = value,
                        TweenAxis::Scale => transform.scale = value,
                        _ => transform.rotation = value,
                    }
                }
            }
        }
    }
}

/// Duration of panels that don't pick their own
pub const DEFAULT_TWEEN_DURATION: f32 = 0.3;

/// Animation descriptor configured by each panel type
#[derive(Debug, Clone, PartialEq)]
pub struct TweenSettings {
    pub kind: TweenKind,
    pub move_end: Vector3<f32>,
    pub local_move_end: Vector3<f32>,
    pub scale_end: Vector3<f32>,
    pub rotate_end: Vector3<f32>,
    pub rotate_mode: RotateMode,
    pub ease: Ease,
    /// `None` plays for the host's default duration
    pub duration: Option<f32>,
}

impl Default for TweenSettings {
    fn default() -> Self {
        Self {
            kind: TweenKind::None,
            move_end: Vector3::new(0.0, 0.0, 0.0),
            local_move_end: Vector3::new(0.0, 0.0, 0.0),
            scale_end: Vector3::new(1.0, 1.0, 1.0),
            rotate_end: Vector3::new(0.0, 0.0, -720.0),
            rotate_mode: RotateMode::LocalAxisAdd,
            ease: Ease::Linear,
            duration: None,
        }
    }
}

impl TweenSettings {
    pub fn with_kind(mut self, kind: TweenKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Self {
        self.duration = Some(duration.max(0.0));
        self
    }

    pub fn duration(&self) -> f32 {
        self.duration.unwrap_or(DEFAULT_TWEEN_DURATION)
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Start and end values for an axis, reading the start from the surface
    fn endpoints(
        &self,
        axis: TweenAxis,
        surface: SurfaceId,
        scene: &Scene,
    ) -> (Vector3<f32>, Vector3<f32>) {
        let transform = scene.transform(surface).unwrap_or_default();
        match axis {
            TweenAxis::Move => (
                scene
                    .world_position(surface)
                    .unwrap_or(transform.local_position),
                self.move_end,
            ),
            TweenAxis::LocalMove => (transform.local_position, self.local_move_end),
            TweenAxis::Scale => (transform.scale, self.scale_end),
            TweenAxis::Rotate => {
                let to = match self.rotate_mode {
                    RotateMode::Absolute => self.rotate_end,
                    RotateMode::LocalAxisAdd => transform.rotation + self.rotate_end,
                };
                (transform.rotation, to)
            }
        }
    }
}

/// Per-panel cache of tweeners, one slot per axis
#[derive(Debug, Clone, Default)]
pub struct TweenSet {
    move_tween: Option<Tweener>,
    local_move_tween: Option<Tweener>,
    scale_tween: Option<Tweener>,
    rotate_tween: Option<Tweener>,
    requested_show: Option<bool>,
}

impl TweenSet {
    fn slot(&mut self, axis: TweenAxis) -> &mut Option<Tweener> {
        match axis {
            TweenAxis::Move => &mut self.move_tween,
            TweenAxis::LocalMove => &mut self.local_move_tween,
            TweenAxis::Scale => &mut self.scale_tween,
            TweenAxis::Rotate => &mut self.rotate_tween,
        }
    }

    /// Cached tweener for an axis, if it was ever built
    pub fn get(&self, axis: TweenAxis) -> Option<&Tweener> {
        match axis {
            TweenAxis::Move => self.move_tween.as_ref(),
            TweenAxis::LocalMove => self.local_move_tween.as_ref(),
            TweenAxis::Scale => self.scale_tween.as_ref(),
            TweenAxis::Rotate => self.rotate_tween.as_ref(),
        }
    }

    /// Plays every axis of `settings.kind` forward (show) or backward (hide)
    ///
    /// Tweeners missing for an axis are built from the surface's current transform.
    pub fn play(
        &mut self,
        settings: &TweenSettings,
        show: bool,
        surface: SurfaceId,
        scene: &Scene,
    ) {
        for &axis in settings.kind.axes() {
            let tweener = self.slot(axis).get_or_insert_with(|| {
                let (from, to) = settings.endpoints(axis, surface, scene);
                Tweener::new(axis, from, to, settings.duration(), settings.ease)
            });
            if show {
                tweener.play_forward();
            } else {
                tweener.play_backwards();
            }
        }
        if !settings.kind.axes().is_empty() {
            self.requested_show = Some(show);
        }
    }

    /// Steps every playing axis of `kind` and writes the values to the surface
    ///
    /// # Returns
    /// `Some(show)` when the first axis of `kind` completed during this step, carrying
    /// the direction of the most recent play request
    pub fn advance(
        &mut self,
        kind: TweenKind,
        delta: f32,
        surface: SurfaceId,
        scene: &mut Scene,
    ) -> Option<bool> {
        let mut completed = false;
        for (index, &axis) in kind.axes().iter().enumerate() {
            if let Some(tweener) = self.slot(axis).as_mut() {
                if !tweener.is_playing() {
                    continue;
                }
                let finished = tweener.advance(delta);
                tweener.apply(surface, scene);
                if index == 0 && finished {
                    completed = true;
                }
            }
        }
        if completed {
            self.requested_show.take()
        } else {
            None
        }
    }

    /// Whether any axis of `kind` is still playing, and in which direction
    pub fn playing_direction(&self, kind: TweenKind) -> Option<Direction> {
        kind.axes()
            .iter()
            .filter_map(|axis| self.get(*axis))
            .map(Tweener::direction)
            .find(|d| *d != Direction::Paused)
    }
}
