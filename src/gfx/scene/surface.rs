use cgmath::{Vector3, Zero};

/// Handle to a surface living in a [`Scene`](super::Scene)
///
/// Ids are never reused, so a handle to a destroyed surface stays dead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceId(pub(crate) u64);

impl SurfaceId {
    /// Raw numeric value, mostly useful for logging
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Local transform of a surface
///
/// Rotation is stored as Euler angles in degrees so that additive rotations past
/// 360° (a full spin on open) survive round trips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub local_position: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub rotation: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            local_position: Vector3::zero(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: Vector3::zero(),
        }
    }
}

impl Transform {
    pub fn with_local_position(mut self, position: Vector3<f32>) -> Self {
        self.local_position = position;
        self
    }

    pub fn with_scale(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_rotation(mut self, rotation: Vector3<f32>) -> Self {
        self.rotation = rotation;
        self
    }
}

/// One node of the scene graph
#[derive(Debug, Clone)]
pub struct Surface {
    pub name: String,
    pub tag: Option<String>,
    pub transform: Transform,
    pub(crate) active: bool,
    pub(crate) parent: Option<SurfaceId>,
    pub(crate) children: Vec<SurfaceId>,
    pub(crate) persistent: bool,
}

impl Surface {
    pub(crate) fn new(name: impl Into<String>, parent: Option<SurfaceId>) -> Self {
        Self {
            name: name.into(),
            tag: None,
            transform: Transform::default(),
            active: true,
            parent,
            children: Vec::new(),
            persistent: false,
        }
    }

    /// The surface's own active flag (ignores ancestors)
    pub fn active_self(&self) -> bool {
        self.active
    }

    pub fn parent(&self) -> Option<SurfaceId> {
        self.parent
    }

    pub fn children(&self) -> &[SurfaceId] {
        &self.children
    }

    /// Whether the surface survives scene transitions
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }
}
