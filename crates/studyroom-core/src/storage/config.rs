//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Focus countdown length
//! - Calendar grid appearance
//!
//! Configuration is stored at `~/.config/studyroom/config.toml`.
//! Weeks always start on Monday; that is a property of the calendar
//! math, not a preference.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;

/// Timer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerConfig {
    /// Length of one focus countdown in minutes.
    #[serde(default = "default_focus_duration_min")]
    pub focus_duration_min: u64,
}

/// UI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Pixel height of one hour row in the day grid.
    #[serde(default = "default_hour_height")]
    pub hour_height: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/studyroom/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

// Default functions
fn default_focus_duration_min() -> u64 {
    25
}
fn default_hour_height() -> u32 {
    60
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            focus_duration_min: default_focus_duration_min(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            hour_height: default_hour_height(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerConfig::default(),
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults out on first run.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))
            }
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Focus countdown length in seconds, as the timer engine takes it.
    pub fn focus_duration_secs(&self) -> u64 {
        self.timer.focus_duration_min * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.timer.focus_duration_min, 25);
        assert_eq!(parsed.ui.hour_height, 60);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: Config = toml::from_str("[timer]\nfocus_duration_min = 50\n").unwrap();
        assert_eq!(parsed.timer.focus_duration_min, 50);
        assert_eq!(parsed.ui.hour_height, 60);

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn focus_duration_converts_to_seconds() {
        let cfg = Config::default();
        assert_eq!(cfg.focus_duration_secs(), 1500);
    }
}
