//! Configuration management
//!
//! Loads and saves configuration from XDG-compliant paths.
//! Config location: ~/.config/ride-places/config.toml

pub mod defaults;

use crate::error::{Error, Result};
use crate::places::Registry;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Where the place registry lives
    #[serde(default)]
    pub storage: StorageConfig,

    /// Listing output settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Registry file path; empty means the default location
    #[serde(default)]
    pub locations_path: String,
}

/// Display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Default listing format
    #[serde(default = "default_format")]
    pub format: String,

    /// Addresses longer than this are truncated in text listings
    #[serde(default = "default_address_width")]
    pub address_width: usize,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions for serde
fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}
fn default_address_width() -> usize {
    DEFAULT_ADDRESS_WIDTH
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            address_width: default_address_width(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Load configuration from the default path
    ///
    /// Creates default config if file doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file: {}", e))
            })?;

            toml::from_str(&content).map_err(|e| {
                Error::Config(format!("Failed to parse config file: {}", e))
            })
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            Error::Config(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(&path, content).map_err(|e| {
            Error::Config(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Registry path: the configured one, or the default location
    pub fn locations_path(&self) -> Result<PathBuf> {
        if self.storage.locations_path.trim().is_empty() {
            Registry::default_path()
        } else {
            Ok(PathBuf::from(self.storage.locations_path.trim()))
        }
    }

    /// Get a configuration value by key path
    ///
    /// Key format: "section.key"
    pub fn get(&self, key: &str) -> Option<String> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["storage", "locations_path"] => Some(self.storage.locations_path.clone()),
            ["display", "format"] => Some(self.display.format.clone()),
            ["display", "address_width"] => Some(self.display.address_width.to_string()),
            ["logging", "level"] => Some(self.logging.level.clone()),
            _ => None,
        }
    }

    /// Set a configuration value by key path
    ///
    /// Returns error if key is invalid or value type is wrong
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let parts: Vec<&str> = key.split('.').collect();

        match parts.as_slice() {
            ["storage", "locations_path"] => {
                self.storage.locations_path = value.to_string();
            }
            ["display", "format"] => {
                if crate::format::get_formatter(value).is_none() {
                    return Err(Error::Config(format!("Unknown format: {}", value)));
                }
                self.display.format = value.to_lowercase();
            }
            ["display", "address_width"] => {
                self.display.address_width = value.parse().map_err(|_| {
                    Error::Config(format!("Invalid width value: {}", value))
                })?;
            }
            ["logging", "level"] => {
                self.logging.level = value.to_string();
            }
            _ => {
                return Err(Error::Config(format!("Unknown config key: {}", key)));
            }
        }

        Ok(())
    }

    /// List all available config keys
    pub fn available_keys() -> Vec<&'static str> {
        vec![
            "storage.locations_path",
            "display.format",
            "display.address_width",
            "logging.level",
        ]
    }
}
