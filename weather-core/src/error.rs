use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by a weather provider.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Location \"{location}\" not found. Please try a different location name.")]
    LocationNotFound { location: String },

    #[error("Weather service authentication failed. Please check your API key.")]
    AuthenticationFailure,

    #[error("Unable to get weather data: {message}")]
    ProviderError { message: String },
}

impl WeatherError {
    pub fn provider<S: Into<String>>(message: S) -> Self {
        Self::ProviderError {
            message: message.into(),
        }
    }
}

/// Internal outcome of a failed query, kept typed until the answer is rendered.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Language model call failed: {0:#}")]
    Model(anyhow::Error),

    #[error("Malformed tool arguments: {0}")]
    MalformedToolArguments(String),

    #[error(transparent)]
    Lookup(#[from] WeatherError),
}

pub const LOOKUP_APOLOGY: &str = "I'm sorry, I couldn't get the weather information for that location. \
     Please check the location name and try again.";

pub const GENERIC_ERROR: &str =
    "I encountered an error while processing your request. Please try again.";

impl AgentError {
    /// The only text a caller of the agent ever sees for a failure.
    ///
    /// Lookup failures collapse into one apology regardless of kind.
    pub fn user_message(&self) -> &'static str {
        match self {
            AgentError::Lookup(_) => LOOKUP_APOLOGY,
            AgentError::Model(_) | AgentError::MalformedToolArguments(_) => GENERIC_ERROR,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {0} environment variable")]
    MissingEnvVar(&'static str),

    #[error("Failed to read config file: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine platform config directory")]
    NoConfigDir,
}
