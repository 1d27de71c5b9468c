use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::{Path, PathBuf}};
use tracing::warn;

use crate::error::ConfigError;

pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const OPENWEATHER_API_KEY_VAR: &str = "OPENWEATHERMAP_API_KEY";

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// The two service credentials, read once at startup.
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub openweather_api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field("openweather_api_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary variable lookup.
    ///
    /// Empty values count as missing. The OpenAI key is checked first.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingEnvVar(name))
        };

        Ok(Self {
            openai_api_key: required(OPENAI_API_KEY_VAR)?,
            openweather_api_key: required(OPENWEATHER_API_KEY_VAR)?,
        })
    }
}

/// Optional settings stored on disk.
///
/// Example TOML:
/// model = "gpt-4.1-mini"
/// openai_base_url = "https://api.openai.com/v1"
/// weather_base_url = "https://api.openweathermap.org/data/2.5"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub model: String,
    pub openai_base_url: String,
    pub weather_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            weather_base_url: crate::provider::openweather::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the platform config file, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Like [`load`](Self::load), but an unreadable or invalid file only warns.
    pub fn load_or_default() -> Self {
        Self::config_file_path()
            .and_then(|path| Self::load_from(&path))
            .unwrap_or_else(Self::fallback)
    }

    pub fn load_from_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(Self::fallback)
    }

    fn fallback(err: ConfigError) -> Self {
        warn!("{err}; using default settings");
        Self::default()
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf, ConfigError> {
        let dirs = ProjectDirs::from("dev", "weather-agent", "weather-agent")
            .ok_or(ConfigError::NoConfigDir)?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Everything the agent needs to run.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: Credentials,
    pub settings: Settings,
}

impl Config {
    /// Credentials from the environment plus settings from disk.
    ///
    /// Credentials are checked before the settings file is touched. Missing
    /// credentials are the only error; a broken settings file falls back to defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let credentials = Credentials::from_env()?;
        let settings = Settings::load_or_default();
        Ok(Self {
            credentials,
            settings,
        })
    }

    pub fn with_model(mut self, model: Option<String>) -> Self {
        if let Some(model) = model {
            self.settings.model = model;
        }
        self
    }
}
