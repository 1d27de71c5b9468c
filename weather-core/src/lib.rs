//! Core library for the `weather-agent` CLI.
//!
//! This crate defines:
//! - Credentials and settings handling
//! - A language-model client with tool calling
//! - Abstraction over weather providers
//! - The query orchestrator tying the two together
//!
//! It is used by `weather-agent-cli`, but can also be reused by other binaries or services.

pub mod agent;
pub mod config;
pub mod error;
mod http;
pub mod llm;
pub mod model;
pub mod provider;
pub mod tool;

pub use agent::WeatherAgent;
pub use config::{Config, Credentials, Settings};
pub use error::{AgentError, ConfigError, WeatherError};
pub use llm::{LanguageModel, ModelRequest, ModelResponse};
pub use model::WeatherReading;
pub use provider::WeatherProvider;
