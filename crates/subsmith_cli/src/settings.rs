//! Settings file for the command line front end.
//!
//! A small TOML file holding the defaults the flags fall back to. Saved
//! atomically (temp file, then rename) so an interrupted write never
//! leaves a truncated config behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use subsmith_core::logging::LogLevel;
use thiserror::Error;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Read(#[from] io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Root settings structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Transcription defaults.
    #[serde(default)]
    pub transcription: TranscriptionSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Defaults applied when `transcribe` flags are omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptionSettings {
    /// Model used when `--model` is not given.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Export format tag used when `--format` is not given.
    #[serde(default = "default_format")]
    pub default_format: String,
}

fn default_model() -> String {
    "ggerganov/whisper.cpp".to_string()
}

fn default_format() -> String {
    ".srt".to_string()
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            default_model: default_model(),
            default_format: default_format(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level when `RUST_LOG` is unset.
    #[serde(default)]
    pub level: LogLevel,
}

/// Default settings location: XDG config dir, falling back to the
/// current directory.
pub fn default_settings_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("subsmith").join("settings.toml")
    } else {
        PathBuf::from("settings.toml")
    }
}

/// Manages the settings file.
pub struct SettingsManager {
    settings_path: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Create a manager for the given path.
    ///
    /// Does not load the file - call `load_or_create()` after.
    pub fn new(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
            settings: Settings::default(),
        }
    }

    /// Get the settings file path.
    pub fn path(&self) -> &Path {
        &self.settings_path
    }

    /// Get a reference to the current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load from file, creating it with defaults if it doesn't exist.
    pub fn load_or_create(&mut self) -> Result<(), SettingsError> {
        if self.settings_path.exists() {
            let content = fs::read_to_string(&self.settings_path)?;
            self.settings = toml::from_str(&content)?;
        } else {
            self.settings = Settings::default();
            self.save()?;
        }
        Ok(())
    }

    /// Save the settings atomically.
    pub fn save(&self) -> Result<(), SettingsError> {
        let content = toml::to_string_pretty(&self.settings)?;
        self.atomic_write(&content)?;
        Ok(())
    }

    /// Write to a temp file in the same directory, then rename.
    fn atomic_write(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.settings_path.with_extension("toml.tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&temp_path, &self.settings_path)?;

        Ok(())
    }
}
