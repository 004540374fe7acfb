use crate::defaults;
use crate::error::{MemoscribeError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub audio: AudioConfig,
    pub stt: SttConfig,
    pub notes: NotesConfig,
    pub local: LocalConfig,
}

/// Remote folder layout
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StorageConfig {
    pub audio_folder: String,
    pub text_folder: String,
}

/// Audio chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    pub chunk_minutes: u64,
}

/// Hosted speech-to-text configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SttConfig {
    pub model: String,
    pub api_base: String,
}

/// Meeting-notes summarization configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NotesConfig {
    pub enabled: bool,
    pub model: String,
    pub api_base: String,
}

/// Local filesystem configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LocalConfig {
    pub work_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            audio_folder: defaults::AUDIO_FOLDER.to_string(),
            text_folder: defaults::TEXT_FOLDER.to_string(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            chunk_minutes: defaults::CHUNK_MINUTES,
        }
    }
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: defaults::STT_MODEL.to_string(),
            api_base: defaults::API_BASE.to_string(),
        }
    }
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: defaults::NOTES_MODEL.to_string(),
            api_base: defaults::API_BASE.to_string(),
        }
    }
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("."),
        }
    }
}

impl AudioConfig {
    /// Chunk duration as a [`Duration`].
    pub fn chunk_duration(&self) -> Duration {
        Duration::from_secs(self.chunk_minutes * 60)
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    // Re-panic on invalid TOML or other errors
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - MEMOSCRIBE_AUDIO_FOLDER → storage.audio_folder
    /// - MEMOSCRIBE_TEXT_FOLDER → storage.text_folder
    /// - MEMOSCRIBE_CHUNK_MINUTES → audio.chunk_minutes
    /// - MEMOSCRIBE_STT_MODEL → stt.model
    /// - MEMOSCRIBE_NOTES_MODEL → notes.model
    /// - MEMOSCRIBE_WORK_DIR → local.work_dir
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(folder) = std::env::var("MEMOSCRIBE_AUDIO_FOLDER")
            && !folder.is_empty()
        {
            self.storage.audio_folder = folder;
        }

        if let Ok(folder) = std::env::var("MEMOSCRIBE_TEXT_FOLDER")
            && !folder.is_empty()
        {
            self.storage.text_folder = folder;
        }

        if let Ok(minutes) = std::env::var("MEMOSCRIBE_CHUNK_MINUTES")
            && let Ok(minutes) = minutes.parse::<u64>()
        {
            self.audio.chunk_minutes = minutes;
        }

        if let Ok(model) = std::env::var("MEMOSCRIBE_STT_MODEL")
            && !model.is_empty()
        {
            self.stt.model = model;
        }

        if let Ok(model) = std::env::var("MEMOSCRIBE_NOTES_MODEL")
            && !model.is_empty()
        {
            self.notes.model = model;
        }

        if let Ok(dir) = std::env::var("MEMOSCRIBE_WORK_DIR")
            && !dir.is_empty()
        {
            self.local.work_dir = PathBuf::from(dir);
        }

        self
    }

    /// Validate the effective configuration once at startup.
    pub fn validate(&self) -> Result<()> {
        if self.audio.chunk_minutes == 0 {
            return Err(MemoscribeError::ConfigInvalidValue {
                key: "audio.chunk_minutes".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        if self.storage.audio_folder.is_empty() {
            return Err(MemoscribeError::ConfigInvalidValue {
                key: "storage.audio_folder".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.storage.text_folder.is_empty() {
            return Err(MemoscribeError::ConfigInvalidValue {
                key: "storage.text_folder".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/memoscribe/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("memoscribe")
            .join("config.toml")
    }
}

/// Required secrets, read from the environment once at startup.
///
/// Every missing variable is collected before failing so the user sees the
/// full list in one pass. Empty values count as missing.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub dropbox_app_key: String,
    pub dropbox_app_secret: String,
    pub dropbox_refresh_token: String,
    pub openai_api_key: String,
}

impl Credentials {
    /// Read all required secrets, reporting every missing variable at once.
    pub fn from_env() -> Result<Self> {
        let mut missing = Vec::new();
        let mut get = |name: &'static str| match std::env::var(name) {
            Ok(value) if !value.is_empty() => value,
            _ => {
                missing.push(name.to_string());
                String::new()
            }
        };

        let credentials = Self {
            dropbox_app_key: get("DROPBOX_APP_KEY"),
            dropbox_app_secret: get("DROPBOX_APP_SECRET"),
            dropbox_refresh_token: get("DROPBOX_REFRESH_TOKEN"),
            openai_api_key: get("OPENAI_API_KEY"),
        };

        if missing.is_empty() {
            Ok(credentials)
        } else {
            Err(MemoscribeError::MissingEnv { vars: missing })
        }
    }
}
