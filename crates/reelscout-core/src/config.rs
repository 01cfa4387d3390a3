use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use reelscout_api::omdb::PlotMode;
use reelscout_api::traits::ApiKey;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::CoreError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Environment variable (and `.env` key) holding the OMDb API key.
pub const API_KEY_VAR: &str = "OMDB_API_KEY";

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub plot: PlotMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub pacing_ms: u64,
    pub banner_secs: u64,
    pub min_query_len: usize,
}

impl UiConfig {
    /// Delay between two appended result cards.
    pub fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_ms)
    }

    /// How long a transient banner stays up.
    pub fn banner_duration(&self) -> Duration {
        Duration::from_secs(self.banner_secs)
    }
}

impl AppConfig {
    /// Load config: user file (if exists) merged over built-in defaults.
    pub fn load() -> Result<Self, CoreError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load an explicit config file, merged over built-in defaults.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        let user_str = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&user_str)?;
        debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Parse a (possibly partial) TOML document over the built-in defaults.
    pub fn from_toml(user_str: &str) -> Result<Self, CoreError> {
        let mut merged: toml::Table =
            toml::from_str(DEFAULT_CONFIG).map_err(|e| CoreError::Config(e.to_string()))?;
        let user: toml::Table =
            toml::from_str(user_str).map_err(|e| CoreError::Config(e.to_string()))?;
        merge_tables(&mut merged, user);

        let config: AppConfig = toml::Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| CoreError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no session can run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        url::Url::parse(&self.api.base_url)
            .map_err(|e| CoreError::Config(format!("api.base_url: {e}")))?;
        if self.ui.min_query_len == 0 {
            return Err(CoreError::Config("ui.min_query_len must be at least 1".into()));
        }
        Ok(())
    }

    /// Write this config as TOML, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        debug!(path = %path.display(), "saved config file");
        Ok(())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Resolve the API key from the process environment, then `env_file`,
    /// then the config file.
    pub fn resolve_api_key(&self, env_file: &Path) -> Option<ApiKey> {
        self.resolve_api_key_from(std::env::var(API_KEY_VAR).ok(), env_file)
    }

    pub fn resolve_api_key_from(&self, env_value: Option<String>, env_file: &Path) -> Option<ApiKey> {
        if let Some(key) = env_value.and_then(ApiKey::new) {
            debug!(source = "environment", "API key resolved");
            return Some(key);
        }
        if let Some(key) = key_from_env_file(env_file) {
            debug!(source = %env_file.display(), "API key resolved");
            return Some(key);
        }
        if let Some(key) = self.api.key.clone().and_then(ApiKey::new) {
            debug!(source = "config", "API key resolved");
            return Some(key);
        }
        warn!("no API key found; searches are disabled");
        None
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "reelscout")
}

/// Overlay `overlay` onto `base`, recursing into tables present in both.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(overlay_table) = value {
            if let Some(toml::Value::Table(base_table)) = base.get_mut(&key) {
                merge_tables(base_table, overlay_table);
                continue;
            }
            base.insert(key, toml::Value::Table(overlay_table));
        } else {
            base.insert(key, value);
        }
    }
}

/// Look up the API key in a `KEY=VALUE` file. A missing or unreadable file
/// is not an error.
fn key_from_env_file(path: &Path) -> Option<ApiKey> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "env file not read");
            return None;
        }
    };

    iter.filter_map(|item| match item {
        Ok(pair) => Some(pair),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "skipping malformed env line");
            None
        }
    })
    .filter(|(k, _)| k == API_KEY_VAR)
    .last()
    .and_then(|(_, v)| ApiKey::new(v))
}
