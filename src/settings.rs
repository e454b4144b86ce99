// Settings - tuning constants loaded from settings.json
// Follows the dictionary store pattern: a missing file means defaults, a
// malformed file is an error.

use crate::listening::ListeningConfig;
use crate::voice_commands::executor::DEFAULT_SEARCH_ENGINE_URL;
use crate::voice_commands::websites::ResolverConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Directory name under the platform config dir
pub const APP_DIR_NAME: &str = "kutty";
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Error types for settings loading
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Could not determine the platform config directory
    #[error("Could not determine config directory")]
    NoConfigDir,
    /// The file exists but could not be read
    #[error("Failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid settings JSON
    #[error("Failed to parse settings from {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// A value is out of range
    #[error("Invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// All user-tunable settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub listening: ListeningConfig,
    pub resolver: ResolverConfig,
    /// Search endpoint; the query is appended as `q`
    pub search_engine_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            listening: ListeningConfig::default(),
            resolver: ResolverConfig::default(),
            search_engine_url: DEFAULT_SEARCH_ENGINE_URL.to_string(),
        }
    }
}

/// `<config dir>/kutty/settings.json`
pub fn default_settings_path() -> Result<PathBuf, SettingsError> {
    let config_dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
    Ok(config_dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME))
}

impl Settings {
    /// Load and validate settings from `path`
    ///
    /// A missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        crate::debug!("Loading settings from {:?}", path);

        if !path.exists() {
            crate::info!("No settings file at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings =
            serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        settings.validate()?;
        crate::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Check every value is in range
    pub fn validate(&self) -> Result<(), SettingsError> {
        fn unit_interval(field: &'static str, value: f64) -> Result<(), SettingsError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(SettingsError::Invalid {
                    field,
                    reason: format!("{} is outside [0, 1]", value),
                })
            }
        }

        unit_interval("resolver.threshold", self.resolver.threshold)?;
        unit_interval("resolver.relatedTermWeight", self.resolver.related_term_weight)?;

        if self.listening.command_timeout_ms == 0 {
            return Err(SettingsError::Invalid {
                field: "listening.commandTimeoutMs",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.listening.wake_phrase.trim().is_empty() {
            return Err(SettingsError::Invalid {
                field: "listening.wakePhrase",
                reason: "must not be empty".to_string(),
            });
        }
        if self.listening.terminator.trim().is_empty() {
            return Err(SettingsError::Invalid {
                field: "listening.terminator",
                reason: "must not be empty".to_string(),
            });
        }
        if let Err(e) = Url::parse(&self.search_engine_url) {
            return Err(SettingsError::Invalid {
                field: "searchEngineUrl",
                reason: e.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
