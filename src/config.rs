//! Configuration loading and management
//!
//! Handles parsing of `levelup.toml` in the data directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::penalty;

/// File name of the configuration inside the data directory
pub const CONFIG_FILE: &str = "levelup.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Progression rules
    #[serde(default)]
    pub progression: ProgressionConfig,

    /// Missed-day penalties
    #[serde(default)]
    pub penalties: PenaltyConfig,
}

/// Progression-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Award one reward point per completed task
    #[serde(default = "default_true")]
    pub award_points: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            award_points: default_true(),
        }
    }
}

/// Penalty configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PenaltyConfig {
    /// Penalties drawn from when more than one task was missed
    #[serde(default = "penalty::default_catalog")]
    pub catalog: Vec<String>,
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            catalog: penalty::default_catalog(),
        }
    }
}

impl PenaltyConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.catalog.is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "penalties.catalog cannot be empty".to_string(),
            ));
        }
        for entry in &self.catalog {
            if entry.trim().is_empty() {
                return Err(crate::error::Error::InvalidConfig(
                    "penalties.catalog cannot include empty entries".to_string(),
                ));
            }
            if entry.contains('\n') {
                return Err(crate::error::Error::InvalidConfig(format!(
                    "penalties.catalog entry '{}' spans multiple lines",
                    entry.escape_debug()
                )));
            }
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from a `levelup.toml` file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = Self::path_in(data_dir);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Path of the configuration file inside `data_dir`
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(CONFIG_FILE)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> crate::error::Result<()> {
        let content = toml::to_string_pretty(self)?;
        crate::store::write_atomic(path, content.as_bytes())?;
        Ok(())
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.penalties.validate()?;
        Ok(())
    }
}
