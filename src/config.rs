//! Framework configuration
//!
//! Every constant the framework needs (resource prefixes, tags, timings) lives on
//! [`FrameworkConfig`]. The defaults match the layout the client project ships with;
//! hosts override individual values with the `with_*` setters or from the environment.

use log::warn;

/// Environment variable overriding [`FrameworkConfig::sweep_interval`]
pub const ENV_SWEEP_INTERVAL: &str = "PERAK_SWEEP_INTERVAL";
/// Environment variable overriding [`FrameworkConfig::ui_prefab_prefix`]
pub const ENV_UI_PREFAB_PREFIX: &str = "PERAK_UI_PREFAB_PREFIX";

/// Tunables shared by the registry, the audio manager and scene control
#[derive(Debug, Clone, PartialEq)]
pub struct FrameworkConfig {
    /// Prefix prepended to a panel type name to form its resource path
    pub ui_prefab_prefix: String,
    /// Resource instantiated when no UI root exists in the scene
    pub root_ui_path: String,
    /// Tag identifying the UI root surface
    pub root_ui_tag: String,
    /// Name of the child under the UI root that parents every panel
    pub container_name: String,
    /// Name of the persistent surface that hosts long-lived managers
    pub persistent_root_name: String,
    /// Tag given to the background music source surface
    pub audio_source_tag: String,
    /// Preference key holding the scene to load after a loading panel
    pub next_scene_key: String,
    /// Time between two destroy sweeps
    pub sweep_interval: f32,
    /// Destroy delay applied to panels that don't choose their own
    pub default_destroy_delay: f32,
    /// Tween duration applied to panels that don't choose their own
    pub default_tween_duration: f32,
    /// Volume used for background music
    pub bgm_volume: f32,
}

impl Default for FrameworkConfig {
    fn default() -> Self {
        Self {
            ui_prefab_prefix: "Prefabs/UI/".to_string(),
            root_ui_path: "Prefabs/RootUI".to_string(),
            root_ui_tag: "RootUI".to_string(),
            container_name: "Container".to_string(),
            persistent_root_name: "DDOLGameManager".to_string(),
            audio_source_tag: "AudioSource".to_string(),
            next_scene_key: "NextSceneName".to_string(),
            sweep_interval: 5.0,
            default_destroy_delay: 10.0,
            default_tween_duration: 0.3,
            bgm_volume: 0.5,
        }
    }
}

impl FrameworkConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Default configuration overlaid with values from the environment
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        Self::default().overlay(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up through `lookup`
    fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(raw) = lookup(ENV_SWEEP_INTERVAL) {
            match raw.trim().parse::<f32>() {
                Ok(interval) if interval > 0.0 => self.sweep_interval = interval,
                _ => warn!("ignoring {ENV_SWEEP_INTERVAL}={raw:?}: expected a positive number"),
            }
        }
        if let Some(prefix) = lookup(ENV_UI_PREFAB_PREFIX) {
            if prefix.is_empty() {
                warn!("ignoring empty {ENV_UI_PREFAB_PREFIX}");
            } else {
                self.ui_prefab_prefix = prefix;
            }
        }
        self
    }

    pub fn with_ui_prefab_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.ui_prefab_prefix = prefix.into();
        self
    }

    pub fn with_root_ui_path(mut self, path: impl Into<String>) -> Self {
        self.root_ui_path = path.into();
        self
    }

    /// Set the sweep interval, clamped to a small positive value
    pub fn with_sweep_interval(mut self, interval: f32) -> Self {
        self.sweep_interval = interval.max(f32::EPSILON);
        self
    }

    pub fn with_default_destroy_delay(mut self, delay: f32) -> Self {
        self.default_destroy_delay = delay;
        self
    }

    pub fn with_default_tween_duration(mut self, duration: f32) -> Self {
        self.default_tween_duration = duration.max(0.0);
        self
    }

    pub fn with_bgm_volume(mut self, volume: f32) -> Self {
        self.bgm_volume = volume.clamp(0.0, 1.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_client_layout() {
        let config = FrameworkConfig::default();
        assert_eq!(config.ui_prefab_prefix, "Prefabs/UI/");
        assert_eq!(config.sweep_interval, 5.0);
        assert_eq!(config.default_destroy_delay, 10.0);
        assert_eq!(config.next_scene_key, "NextSceneName");
    }

    #[test]
    fn test_overlay_applies_valid_values_only() {
        let env: HashMap<&str, &str> = [
            (ENV_SWEEP_INTERVAL, "2.5"),
            (ENV_UI_PREFAB_PREFIX, "Ui/"),
        ]
        .into_iter()
        .collect();
        let config = FrameworkConfig::default().overlay(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.sweep_interval, 2.5);
        assert_eq!(config.ui_prefab_prefix, "Ui/");

        let bad = FrameworkConfig::default().overlay(|k| match k {
            ENV_SWEEP_INTERVAL => Some("soon".to_string()),
            _ => None,
        });
        assert_eq!(bad.sweep_interval, 5.0);
    }

    #[test]
    fn test_setters_clamp() {
        let config = FrameworkConfig::new()
            .with_bgm_volume(3.0)
            .with_sweep_interval(-1.0);
        assert_eq!(config.bgm_volume, 1.0);
        assert!(config.sweep_interval > 0.0);
    }
}
