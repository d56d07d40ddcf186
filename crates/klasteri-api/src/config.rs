use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::platform;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub night: NightConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend base URL. A bare host is allowed; the client adds `https://`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// The night window that gates the tonight rail and the daily summary.
/// Half-open: `start_hour` inclusive, `end_hour` exclusive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NightConfig {
    #[serde(default = "default_night_start")]
    pub start_hour: u32,
    #[serde(default = "default_night_end")]
    pub end_hour: u32,
    /// Show the night-gated panels regardless of the clock.
    #[serde(default)]
    pub force_show: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How often the active feed is re-fetched.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    /// Result cap passed to the search endpoint.
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Default for NightConfig {
    fn default() -> Self {
        Self {
            start_hour: default_night_start(),
            end_hour: default_night_end(),
            force_show: false,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_secs: default_refresh_secs(),
            search_limit: default_search_limit(),
        }
    }
}

fn default_base_url() -> String {
    "https://clusta-8d555484de44.herokuapp.com".to_string()
}

fn default_night_start() -> u32 {
    19
}

fn default_night_end() -> u32 {
    5
}

fn default_refresh_secs() -> u64 {
    60
}

fn default_search_limit() -> u32 {
    20
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api.base_url.starts_with("https://"));
        assert_eq!(config.night.start_hour, 19);
        assert_eq!(config.night.end_hour, 5);
        assert!(!config.night.force_show);
        assert_eq!(config.ui.refresh_secs, 60);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[night]\nstart_hour = 21\n").unwrap();
        assert_eq!(config.night.start_hour, 21);
        assert_eq!(config.night.end_hour, 5);
        assert_eq!(config.ui.search_limit, 20);
    }
}
