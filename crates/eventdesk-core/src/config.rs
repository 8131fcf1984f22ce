//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! which spreadsheet holds the registrations, which tab to read, and the
//! column labels of the registration form.
//!
//! Configuration is stored at `~/.config/eventdesk/config.json`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::sheet::SheetLabels;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "eventdesk";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Log directory name under the cache root
const LOG_DIR: &str = "logs";

/// Default tab written by the form
const DEFAULT_RANGE: &str = "Form Responses 1";

/// Environment variable holding the Sheets API key
pub const API_KEY_ENV: &str = "SHEETS_API_KEY";

/// Environment variable overriding the cache location
pub const CACHE_DIR_ENV: &str = "EVENTDESK_CACHE_DIR";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub spreadsheet_id: Option<String>,
    #[serde(default = "default_range")]
    pub range: String,
    pub event_name: Option<String>,
    #[serde(default)]
    pub labels: SheetLabels,
}

fn default_range() -> String {
    DEFAULT_RANGE.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            range: default_range(),
            event_name: None,
            labels: SheetLabels::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Read the config at `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config: {}", path.display()))?;
            Self::from_json(&contents)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        serde_json::from_str(contents).context("Failed to parse config")
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Point the config at a registration spreadsheet, optionally with a new tab range
    pub fn set_sheet(&mut self, spreadsheet_id: &str, range: Option<&str>) -> Result<()> {
        let spreadsheet_id = spreadsheet_id.trim();
        if spreadsheet_id.is_empty() {
            anyhow::bail!("Spreadsheet id must not be empty");
        }
        self.spreadsheet_id = Some(spreadsheet_id.to_string());
        if let Some(range) = range.map(str::trim).filter(|r| !r.is_empty()) {
            self.range = range.to_string();
        }
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    fn cache_override() -> Option<PathBuf> {
        std::env::var_os(CACHE_DIR_ENV)
            .filter(|d| !d.is_empty())
            .map(PathBuf::from)
    }

    fn cache_root() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = Self::cache_override() {
            return Ok(dir);
        }

        let mut path = Self::cache_root()?;
        if let Some(ref sheet) = self.spreadsheet_id {
            path = path.join(sheet);
        }
        Ok(path)
    }

    /// Log directory, independent of the loaded config so logging can start first
    pub fn log_dir() -> Result<PathBuf> {
        let base = match Self::cache_override() {
            Some(dir) => dir,
            None => Self::cache_root()?,
        };
        Ok(base.join(LOG_DIR))
    }

    pub fn require_spreadsheet_id(&self) -> Result<&str> {
        self.spreadsheet_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!("No spreadsheet_id set in {}", CONFIG_FILE)
            })
    }

    pub fn api_key() -> Result<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| anyhow::anyhow!("{} is not set", API_KEY_ENV))
    }
}
