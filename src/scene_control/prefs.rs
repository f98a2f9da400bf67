use std::collections::HashMap;

/// String preference store
///
/// Holds the handful of values that must survive a scene transition, such as the
/// name of the scene a loading panel is about to load.
#[derive(Debug, Default, Clone)]
pub struct Prefs {
    values: HashMap<String, String>,
}

impl Prefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or(default).to_string()
    }

    pub fn set_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn has_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn delete_key(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    pub fn delete_all(&mut self) {
        self.values.clear();
    }
}
