use std::any::TypeId;
use std::collections::HashMap;

use super::panel::PanelType;

/// Memoized panel-type to resource-path resolution
///
/// A panel's resource lives at the configured prefix followed by its type name,
/// e.g. `Prefabs/UI/LoginPanel`. Paths can also be registered up front for panels
/// stored elsewhere.
#[derive(Debug, Clone)]
pub struct ResourcePaths {
    prefix: String,
    cache: HashMap<TypeId, String>,
}

impl ResourcePaths {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            cache: HashMap::new(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Path of the resource backing `kind`
    ///
    /// The first resolution for a type stores the path; later calls return it as is.
    pub fn resolve(&mut self, kind: &PanelType) -> &str {
        let prefix = &self.prefix;
        self.cache
            .entry(kind.id())
            .or_insert_with(|| format!("{prefix}{}", kind.name()))
    }

    /// Overrides the path of `kind`
    pub fn register(&mut self, kind: &PanelType, path: impl Into<String>) {
        self.cache.insert(kind.id(), path.into());
    }

    /// Cached path of `kind`, without resolving it
    pub fn cached(&self, kind: &PanelType) -> Option<&str> {
        self.cache.get(&kind.id()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::panel::{Panel, PanelCore};
    use std::any::Any;

    #[derive(Default)]
    struct InventoryPanel {
        core: PanelCore,
    }

    impl Panel for InventoryPanel {
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

    #[test]
    fn test_resolution_is_memoized() {
        let kind = PanelType::of::<InventoryPanel>();
        let mut paths = ResourcePaths::new("Prefabs/UI/");
        assert!(paths.cached(&kind).is_none());

        let first = paths.resolve(&kind).to_string();
        assert_eq!(first, "Prefabs/UI/InventoryPanel");
        assert_eq!(paths.len(), 1);

        let second = paths.resolve(&kind).to_string();
        assert_eq!(first, second);
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn test_registered_path_wins() {
        let kind = PanelType::of::<InventoryPanel>();
        let mut paths = ResourcePaths::new("Prefabs/UI/");
        paths.register(&kind, "Prefabs/UI/Bag/InventoryPanel");
        assert_eq!(paths.resolve(&kind), "Prefabs/UI/Bag/InventoryPanel");
    }
}
