//! Configuration file handling.
//!
//! Reads from `~/.config/warlist/warlist.toml`

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use warlist_core::StoreKind;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the war list store file.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Which store variant `store_path` holds.
    #[serde(default)]
    pub backend: Backend,
    /// Snapshot the store before every write.
    #[serde(default = "default_backup")]
    pub backup: bool,
    /// Look for a newer release in the background on startup.
    #[serde(default = "default_check_updates")]
    pub check_updates: bool,
}

/// Store variant named in the config file and on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// TaterClient text config with `add_war_entry` lines.
    #[default]
    Text,
    /// DDNet SQLite database with a `wars` table.
    Sqlite,
}

impl Backend {
    pub fn kind(self) -> StoreKind {
        match self {
            Backend::Text => StoreKind::Text,
            Backend::Sqlite => StoreKind::Sqlite,
        }
    }
}

fn default_store_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_default()
        .join("DDNet")
        .join("tclient_warlist.cfg")
}

fn default_backup() -> bool {
    true
}

fn default_check_updates() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            backend: Backend::default(),
            backup: default_backup(),
            check_updates: default_check_updates(),
        }
    }
}

impl Config {
    /// Load configuration from the config file.
    ///
    /// If `custom_path` is provided, load from that path.
    /// Otherwise, load from the default XDG config location.
    /// Creates a default config file if it doesn't exist (only for default path).
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self> {
        let is_custom = custom_path.is_some();
        let config_path = match custom_path {
            Some(path) => path,
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            // Only create default config for the default path
            if !is_custom {
                let config = Config::default();
                config.save()?;
                tracing::info!("Created default config: {:?}", config);
                return Ok(config);
            } else {
                anyhow::bail!("Config file not found: {}", config_path.display());
            }
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        tracing::debug!("Loaded config from {}: {:?}", config_path.display(), config);
        Ok(config)
    }

    /// Save configuration to the config file.
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents)
            .with_context(|| format!("Failed to write config file: {}", config_path.display()))
    }

    /// Get the path to the config file.
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;

        Ok(config_dir.join("warlist").join("warlist.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_fills_defaults() {
        let config: Config = toml::from_str("store_path = \"/tmp/warlist.cfg\"").unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/warlist.cfg"));
        assert_eq!(config.backend, Backend::Text);
        assert!(config.backup);
        assert!(config.check_updates);
    }

    #[test]
    fn backend_names_are_lowercase() {
        let config: Config = toml::from_str(
            "store_path = \"wars.sqlite\"\nbackend = \"sqlite\"\nbackup = false",
        )
        .unwrap();
        assert_eq!(config.backend, Backend::Sqlite);
        assert!(!config.backup);
    }

    #[test]
    fn default_round_trips_through_toml() {
        let rendered = toml::to_string_pretty(&Config::default()).unwrap();
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed.backend, Backend::Text);
        assert_eq!(parsed.store_path, default_store_path());
    }
}
