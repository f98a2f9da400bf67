use crate::gfx::scene::Transform;
use crate::ui::panel::PanelType;

/// Instantiable description of a surface tree
///
/// Templates are what the resource provider hands out. A template may come with a
/// panel behaviour already attached; the registry checks that attachment against
/// the panel type it actually asked for.
#[derive(Debug, Clone)]
pub struct Template {
    pub name: String,
    pub tag: Option<String>,
    pub transform: Transform,
    pub active: bool,
    pub behaviour: Option<PanelType>,
    pub children: Vec<Template>,
}

impl Template {
    /// Create an active, untagged template with an identity transform
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: None,
            transform: Transform::default(),
            active: true,
            behaviour: None,
            children: Vec::new(),
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Attach a panel behaviour that instances come with
    pub fn with_behaviour(mut self, behaviour: PanelType) -> Self {
        self.behaviour = Some(behaviour);
        self
    }

    pub fn with_child(mut self, child: Template) -> Self {
        self.children.push(child);
        self
    }
}
