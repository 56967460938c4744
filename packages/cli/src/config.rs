use mediakit_editor::{EditorConfig, Tier};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "mediakit.config.json";

/// Media kit tool configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Settings handed to every edit session
    #[serde(default)]
    pub editor: EditorConfig,

    /// Access tier used when replaying scripts
    #[serde(default)]
    pub tier: Tier,

    /// Directory new documents are written to
    #[serde(default = "default_documents_dir")]
    pub documents_dir: String,
}

fn default_documents_dir() -> String {
    "kits".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Load an explicit config file
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Get absolute path to the documents directory
    pub fn get_documents_dir(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.documents_dir)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            tier: Tier::default(),
            documents_dir: default_documents_dir(),
        }
    }
}
