use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{client::DEFAULT_API_URL, history::DEFAULT_HISTORY_LIMIT};

/// Environment variable that overrides the configured backend URL.
pub const API_URL_ENV: &str = "WEATHER_API_URL";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_url = "http://localhost:5000"
/// history_limit = 10
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the weather backend.
    pub api_url: Option<String>,

    /// How many recent searches to show.
    pub history_limit: Option<u32>,
}

impl Config {
    /// Effective backend URL: `WEATHER_API_URL`, then the file, then the
    /// default.
    pub fn api_url(&self) -> String {
        self.resolve_api_url(std::env::var(API_URL_ENV).ok())
    }

    fn resolve_api_url(&self, env_value: Option<String>) -> String {
        env_value
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_url.clone().filter(|url| !url.trim().is_empty()))
            .map(|url| url.trim().to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    pub fn set_api_url(&mut self, url: impl Into<String>) {
        self.api_url = Some(url.into());
    }

    pub fn history_limit(&self) -> u32 {
        self.history_limit.filter(|limit| *limit >= 1).unwrap_or(DEFAULT_HISTORY_LIMIT)
    }

    pub fn set_history_limit(&mut self, limit: u32) -> Result<()> {
        if limit == 0 {
            bail!("History limit must be at least 1");
        }
        self.history_limit = Some(limit);
        Ok(())
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-dashboard", "weather-dashboard")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
