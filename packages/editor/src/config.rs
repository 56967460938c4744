use crate::access::PREMIUM_COMPONENTS;
use crate::history::DEFAULT_MAX_DEPTH;
use serde::{Deserialize, Serialize};

/// Touch movement (px, any axis) before a touch becomes a drag
pub const DEFAULT_TOUCH_DRAG_THRESHOLD: f64 = 10.0;

/// Editor session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Undo checkpoints retained
    #[serde(default = "default_max_history_depth")]
    pub max_history_depth: usize,

    #[serde(default = "default_touch_drag_threshold")]
    pub touch_drag_threshold: f64,

    /// Capability that unlocks premium component types
    #[serde(default = "default_premium_capability")]
    pub premium_capability: String,

    /// Emit `save_requested` after every committed change
    #[serde(default = "default_autosave")]
    pub autosave: bool,
}

fn default_max_history_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_touch_drag_threshold() -> f64 {
    DEFAULT_TOUCH_DRAG_THRESHOLD
}

fn default_premium_capability() -> String {
    PREMIUM_COMPONENTS.to_string()
}

fn default_autosave() -> bool {
    true
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_history_depth: default_max_history_depth(),
            touch_drag_threshold: default_touch_drag_threshold(),
            premium_capability: default_premium_capability(),
            autosave: default_autosave(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "maxHistoryDepth": 20,
            "touchDragThreshold": 6.5,
            "autosave": false
        }"#;

        let config = EditorConfig::from_json(json).unwrap();
        assert_eq!(config.max_history_depth, 20);
        assert_eq!(config.touch_drag_threshold, 6.5);
        assert_eq!(config.premium_capability, "premiumComponents");
        assert!(!config.autosave);
    }

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config, EditorConfig::from_json("{}").unwrap());
        assert_eq!(config.max_history_depth, 50);
        assert_eq!(config.touch_drag_threshold, 10.0);
    }
}
