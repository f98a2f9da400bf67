use cgmath::{Vector3, Zero};
use log::debug;
use std::collections::HashMap;

use super::surface::{Surface, SurfaceId, Transform};
use crate::gfx::resources::Template;

/// Scene graph holding every live surface
///
/// Panels never own their surfaces: the scene does. The registry only keeps
/// [`SurfaceId`]s and asks the scene whether they are still alive.
#[derive(Debug, Default)]
pub struct Scene {
    surfaces: HashMap<SurfaceId, Surface>,
    roots: Vec<SurfaceId>,
    next_id: u64,
    destroyed: Vec<SurfaceId>,
}

impl Scene {
    /// Creates an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bare, active surface
    ///
    /// # Arguments
    /// * `name` - Surface name
    /// * `parent` - Optional parent; a dead parent makes the surface a root
    pub fn spawn(&mut self, name: impl Into<String>, parent: Option<SurfaceId>) -> SurfaceId {
        let id = SurfaceId(self.next_id);
        self.next_id += 1;

        let parent = parent.filter(|p| self.surfaces.contains_key(p));
        self.surfaces.insert(id, Surface::new(name, parent));
        match parent.and_then(|p| self.surfaces.get_mut(&p)) {
            Some(parent) => parent.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Instantiates a template (and its children) under `parent`
    ///
    /// The new surface takes the template's name, tag, transform and active flag.
    ///
    /// # Returns
    /// Id of the instantiated root surface
    pub fn instantiate(&mut self, template: &Template, parent: Option<SurfaceId>) -> SurfaceId {
        let id = self.spawn(template.name.clone(), parent);
        if let Some(surface) = self.surfaces.get_mut(&id) {
            surface.tag = template.tag.clone();
            surface.transform = template.transform;
            surface.active = template.active;
        }
        for child in &template.children {
            self.instantiate(child, Some(id));
        }
        id
    }

    pub fn get(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(&id)
    }

    pub fn get_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surfaces.get_mut(&id)
    }

    /// Whether the surface has not been destroyed
    pub fn is_alive(&self, id: SurfaceId) -> bool {
        self.surfaces.contains_key(&id)
    }

    /// The surface's own active flag; dead surfaces are never active
    pub fn is_active(&self, id: SurfaceId) -> bool {
        self.surfaces.get(&id).is_some_and(|s| s.active)
    }

    /// Activates or deactivates a surface
    ///
    /// # Returns
    /// `false` if the surface is dead
    pub fn set_active(&mut self, id: SurfaceId, active: bool) -> bool {
        match self.surfaces.get_mut(&id) {
            Some(surface) => {
                surface.active = active;
                true
            }
            None => false,
        }
    }

    pub fn name(&self, id: SurfaceId) -> Option<&str> {
        self.surfaces.get(&id).map(|s| s.name.as_str())
    }

    pub fn set_tag(&mut self, id: SurfaceId, tag: impl Into<String>) {
        if let Some(surface) = self.surfaces.get_mut(&id) {
            surface.tag = Some(tag.into());
        }
    }

    /// First live surface carrying `tag`, lowest id first
    pub fn find_by_tag(&self, tag: &str) -> Option<SurfaceId> {
        self.surfaces
            .iter()
            .filter(|(_, s)| s.tag.as_deref() == Some(tag))
            .map(|(id, _)| *id)
            .min()
    }

    /// First live surface named `name`, lowest id first
    pub fn find_by_name(&self, name: &str) -> Option<SurfaceId> {
        self.surfaces
            .iter()
            .filter(|(_, s)| s.name == name)
            .map(|(id, _)| *id)
            .min()
    }

    /// Direct child of `parent` named `name`
    pub fn find_child(&self, parent: SurfaceId, name: &str) -> Option<SurfaceId> {
        self.surfaces.get(&parent)?.children.iter().copied().find(|c| {
            self.surfaces.get(c).is_some_and(|s| s.name == name)
        })
    }

    /// Descendant of `root` reached by a `/`-separated path of child names
    pub fn find_path(&self, root: SurfaceId, path: &str) -> Option<SurfaceId> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(root, |current, segment| self.find_child(current, segment))
    }

    pub fn transform(&self, id: SurfaceId) -> Option<Transform> {
        self.surfaces.get(&id).map(|s| s.transform)
    }

    pub fn transform_mut(&mut self, id: SurfaceId) -> Option<&mut Transform> {
        self.surfaces.get_mut(&id).map(|s| &mut s.transform)
    }

    /// Position in scene space: the sum of local positions up the parent chain
    pub fn world_position(&self, id: SurfaceId) -> Option<Vector3<f32>> {
        let mut surface = self.surfaces.get(&id)?;
        let mut position = surface.transform.local_position;
        while let Some(parent) = surface.parent.and_then(|p| self.surfaces.get(&p)) {
            position += parent.transform.local_position;
            surface = parent;
        }
        Some(position)
    }

    /// Moves a surface so that its scene-space position becomes `position`
    pub fn set_world_position(&mut self, id: SurfaceId, position: Vector3<f32>) {
        let parent_position = self
            .surfaces
            .get(&id)
            .and_then(|s| s.parent)
            .and_then(|p| self.world_position(p))
            .unwrap_or_else(Vector3::zero);
        if let Some(surface) = self.surfaces.get_mut(&id) {
            surface.transform.local_position = position - parent_position;
        }
    }

    /// Moves the surface to the front of its sibling list
    pub fn set_as_first_sibling(&mut self, id: SurfaceId) {
        self.reorder_sibling(id, true);
    }

    /// Moves the surface to the back of its sibling list
    pub fn set_as_last_sibling(&mut self, id: SurfaceId) {
        self.reorder_sibling(id, false);
    }

    /// Position of the surface among its siblings
    pub fn sibling_index(&self, id: SurfaceId) -> Option<usize> {
        let siblings = match self.surfaces.get(&id)?.parent {
            Some(parent) => &self.surfaces.get(&parent)?.children,
            None => &self.roots,
        };
        siblings.iter().position(|s| *s == id)
    }

    fn reorder_sibling(&mut self, id: SurfaceId, first: bool) {
        let Some(parent) = self.surfaces.get(&id).map(|s| s.parent) else {
            return;
        };
        let siblings = match parent {
            Some(parent) => match self.surfaces.get_mut(&parent) {
                Some(p) => &mut p.children,
                None => return,
            },
            None => &mut self.roots,
        };
        siblings.retain(|s| *s != id);
        if first {
            siblings.insert(0, id);
        } else {
            siblings.push(id);
        }
    }

    /// Keeps the surface alive across [`Scene::unload_transient`]
    ///
    /// Like the host engine, only root surfaces can persist, so the surface is
    /// detached from its parent first.
    pub fn mark_persistent(&mut self, id: SurfaceId) {
        let Some(parent) = self.surfaces.get(&id).map(|s| s.parent) else {
            return;
        };
        if let Some(parent) = parent {
            if let Some(p) = self.surfaces.get_mut(&parent) {
                p.children.retain(|c| *c != id);
            }
            self.roots.push(id);
        }
        if let Some(surface) = self.surfaces.get_mut(&id) {
            surface.parent = None;
            surface.persistent = true;
        }
    }

    /// Destroys a surface and all of its descendants
    ///
    /// # Returns
    /// `false` if the surface was already dead
    pub fn destroy(&mut self, id: SurfaceId) -> bool {
        let Some(parent) = self.surfaces.get(&id).map(|s| s.parent) else {
            return false;
        };
        match parent {
            Some(parent) => {
                if let Some(p) = self.surfaces.get_mut(&parent) {
                    p.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }

        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(removed) = self.surfaces.remove(&next) {
                stack.extend(removed.children);
                self.destroyed.push(next);
            }
        }
        true
    }

    /// Destroys every root that was not marked persistent
    ///
    /// # Returns
    /// Number of roots destroyed
    pub fn unload_transient(&mut self) -> usize {
        let transient: Vec<SurfaceId> = self
            .roots
            .iter()
            .copied()
            .filter(|r| self.surfaces.get(r).is_some_and(|s| !s.persistent))
            .collect();
        for root in &transient {
            self.destroy(*root);
        }
        debug!("unloaded {} transient roots", transient.len());
        transient.len()
    }

    /// Drains the ids torn down since the last call
    pub fn take_destroyed(&mut self) -> Vec<SurfaceId> {
        std::mem::take(&mut self.destroyed)
    }

    /// Number of live surfaces
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}
