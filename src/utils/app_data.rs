use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

const APP_NAME: &str = "aboutme";
const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides the config file location
pub const CONFIG_ENV: &str = "ABOUTME_CONFIG";

/// Index location used when neither the CLI nor the config names one
pub const DEFAULT_INDEX_PATH: &str = ".claude/aboutme-index.json";

/// Application configuration stored in the user config directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Index file path, relative to the project root unless absolute
    #[serde(default = "default_index_path")]
    pub index_path: String,

    /// Default log level (`error`, `warn`, `info`, `debug`, `trace`)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Per-module log level overrides, e.g. `{"aboutme::index": "debug"}`
    #[serde(default)]
    pub log_modules: BTreeMap<String, String>,
}

fn default_index_path() -> String {
    DEFAULT_INDEX_PATH.to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            index_path: default_index_path(),
            log_level: default_log_level(),
            log_modules: BTreeMap::new(),
        }
    }
}

impl AppConfig {
    /// Load config from the config directory, or return default if not found
    pub fn load() -> Result<Self> {
        match get_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load config from an explicit path, or return default if it does not exist
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;
        let config: AppConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;
        Ok(config)
    }

    /// Build the `EnvFilter` directive string for this config
    pub fn log_filter(&self) -> String {
        let mut filter = self.log_level.clone();
        for (module, level) in &self.log_modules {
            filter.push_str(&format!(",{module}={level}"));
        }
        filter
    }
}

/// Get the path to the config file
///
/// `ABOUTME_CONFIG` wins; otherwise `<config dir>/aboutme/config.json`.
pub fn get_config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|base| base.join(APP_NAME).join(CONFIG_FILE))
}
