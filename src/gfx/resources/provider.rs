//! Resource lookup
//!
//! The registry resolves a panel type to a path and asks a [`ResourceProvider`] for
//! the template stored there. [`ResourceTable`] is the in-memory provider used by
//! hosts that register their templates up front, and by the tests.

use std::collections::HashMap;

use super::template::Template;

/// Synchronous load-by-path collaborator
pub trait ResourceProvider {
    /// Template stored at `path`, or `None` on a miss
    fn load(&self, path: &str) -> Option<Template>;
}

/// In-memory resource provider keyed by path
#[derive(Debug, Default, Clone)]
pub struct ResourceTable {
    templates: HashMap<String, Template>,
}

impl ResourceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any previous one at the same path
    ///
    /// # Arguments
    /// * `path` - Resource path, e.g. `Prefabs/UI/LoginPanel`
    /// * `template` - Template to hand out for that path
    pub fn insert(&mut self, path: impl Into<String>, template: Template) {
        self.templates.insert(path.into(), template);
    }

    /// Builder-style [`ResourceTable::insert`]
    pub fn with(mut self, path: impl Into<String>, template: Template) -> Self {
        self.insert(path, template);
        self
    }

    pub fn remove(&mut self, path: &str) -> Option<Template> {
        self.templates.remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.templates.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl ResourceProvider for ResourceTable {
    fn load(&self, path: &str) -> Option<Template> {
        self.templates.get(path).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_load_and_miss() {
        let table = ResourceTable::new().with("Prefabs/UI/LoginPanel", Template::new("LoginPanel"));

        let loaded = table.load("Prefabs/UI/LoginPanel").unwrap();
        assert_eq!(loaded.name, "LoginPanel");
        assert!(table.load("Prefabs/UI/Missing").is_none());
        assert_eq!(table.len(), 1);
    }
}
