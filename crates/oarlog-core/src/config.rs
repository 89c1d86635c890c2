//! Importer configuration.
//!
//! This module handles loading the import settings: distance cap, output
//! directory and output encoding. Command-line flags override whatever is
//! stored here.
//!
//! Configuration is stored at `~/.config/oarlog/config.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ImportError, Result};
use crate::normalizer::DEFAULT_MAX_DISTANCE_KM;

/// Application name used for the config directory path
const APP_NAME: &str = "oarlog";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default output directory, relative to the working directory
const DEFAULT_OUTPUT_DIR: &str = "output";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Entries reporting more than this many kilometres are dropped
    pub max_distance_km: u32,
    pub output_dir: PathBuf,
    /// Write gzip-compressed tables (`*.json.gz`)
    pub compress: bool,
    /// Indent JSON output
    pub pretty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            compress: true,
            pretty: false,
        }
    }
}

impl Config {
    /// Load from the user config directory, or defaults if there is none
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load from an explicit file; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| ImportError::io(path, e))?;
        let config: Config = serde_json::from_str(&contents)
            .map_err(|e| ImportError::Config(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), ?config, "Config loaded");
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ImportError::io(parent, e))?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|e| ImportError::io(path, e))?;
        Ok(())
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
    }
}
