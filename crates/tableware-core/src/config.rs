//! Application configuration management.
//!
//! Configuration holds the remote endpoint URLs, the data directory for
//! the local store and the default venue. It is stored at
//! `~/.config/tableware/config.json`; every field is optional and
//! `TABLEWARE_*` environment variables take precedence over the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::Venue;

/// Application name used for config/data directory paths
const APP_NAME: &str = "tableware";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Inventory function used when nothing else is configured
pub const DEFAULT_API_URL: &str =
    "https://functions.poehali.dev/d7f59bfc-56d2-4795-a257-4b6fb9f4652c";

pub const ENV_API_URL: &str = "TABLEWARE_API_URL";
pub const ENV_BACKUP_URL: &str = "TABLEWARE_BACKUP_URL";
pub const ENV_DATA_DIR: &str = "TABLEWARE_DATA_DIR";

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    pub api_url: Option<String>,
    pub backup_url: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub default_venue: Option<Venue>,
}

impl Config {
    /// Load the config file (defaults if absent) and apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Override fields from the environment. `lookup` is `std::env::var`
    /// in production; empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty(ENV_API_URL) {
            self.api_url = Some(url);
        }
        if let Some(url) = non_empty(ENV_BACKUP_URL) {
            self.backup_url = Some(url);
        }
        if let Some(dir) = non_empty(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Directory holding the local store files
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    pub fn default_venue(&self) -> Venue {
        self.default_venue.unwrap_or(Venue::Port)
    }
}
