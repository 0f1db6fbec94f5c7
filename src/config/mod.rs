//! Configuration loading and platform default paths.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration errors.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML.
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Tool configuration, loaded from TOML with per-field defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Journal directory; falls back to the platform default when unset.
    pub journal_dir: Option<PathBuf>,
    /// Screenshots directory; falls back to the platform default when unset.
    pub screenshots_dir: Option<PathBuf>,
    /// Tail poll interval in seconds.
    pub poll_interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            journal_dir: None,
            screenshots_dir: None,
            poll_interval_secs: 1,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Load the default config file if it exists, else defaults.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(path) = default_config_path() else {
            return Self::default();
        };
        if !path.is_file() {
            return Self::default();
        }
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Journal directory after applying the platform default.
    #[must_use]
    pub fn resolved_journal_dir(&self) -> Option<PathBuf> {
        self.journal_dir.clone().or_else(default_journal_dir)
    }

    /// Screenshots directory after applying the platform default.
    #[must_use]
    pub fn resolved_screenshots_dir(&self) -> Option<PathBuf> {
        self.screenshots_dir.clone().or_else(default_screenshots_dir)
    }

    /// Tail poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

/// Default config file location, `<config dir>/edwatch/config.toml`.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    Some(dirs::config_dir()?.join("edwatch").join("config.toml"))
}

/// Platform default journal directory, if it exists.
#[must_use]
pub fn default_journal_dir() -> Option<PathBuf> {
    let saved_games = if cfg!(windows) {
        dirs::home_dir()?.join("Saved Games")
    } else {
        // Steam Proton prefix on Linux.
        dirs::home_dir()?.join(
            ".steam/steam/steamapps/compatdata/359320/pfx/drive_c/users/steamuser/Saved Games",
        )
    };
    let dir = saved_games
        .join("Frontier Developments")
        .join("Elite Dangerous");
    dir.is_dir().then_some(dir)
}

/// Platform default screenshots directory, if it exists.
#[must_use]
pub fn default_screenshots_dir() -> Option<PathBuf> {
    let dir = dirs::picture_dir()?
        .join("Frontier Developments")
        .join("Elite Dangerous");
    dir.is_dir().then_some(dir)
}
