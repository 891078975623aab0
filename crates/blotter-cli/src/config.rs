//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use blotter_scrape::ScrapeConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Portal base URL
    #[serde(default = "default_portal_url")]
    pub portal_url: String,

    /// Search defaults
    #[serde(default)]
    pub search: SearchDefaults,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Default knobs for scrape runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchDefaults {
    /// Concurrent searches (1-10)
    #[serde(default = "default_workers")]
    pub max_workers: usize,

    /// Minimum delay between requests (seconds)
    #[serde(default = "default_min_delay")]
    pub min_delay_secs: u64,

    /// Maximum delay between requests (seconds)
    #[serde(default = "default_max_delay")]
    pub max_delay_secs: u64,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

/// Output format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".blotter").join("config.toml"))
    }

    /// Load configuration from file or create default.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, contents)?;
        Ok(())
    }

    /// Scrape configuration built from the search defaults.
    pub fn scrape_config(&self) -> ScrapeConfig {
        ScrapeConfig {
            max_concurrency: self.search.max_workers,
            min_delay_secs: self.search.min_delay_secs,
            max_delay_secs: self.search.max_delay_secs,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            portal_url: default_portal_url(),
            search: SearchDefaults::default(),
            settings: Settings::default(),
        }
    }
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            max_workers: default_workers(),
            min_delay_secs: default_min_delay(),
            max_delay_secs: default_max_delay(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
        }
    }
}

fn default_portal_url() -> String {
    blotter_portal::http::DEFAULT_BASE_URL.to_string()
}

fn default_workers() -> usize {
    3
}

fn default_min_delay() -> u64 {
    2
}

fn default_max_delay() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}
