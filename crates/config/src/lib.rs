//! Configuration management for the AgroBot assistant
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default.*`, `config/{env}.*`)
//! - Environment variables (AGROBOT__ prefix, `__` as section separator)
//! - Conventional provider key variables (`GOOGLE_API_KEY`, `GROQ_API_KEY`,
//!   `OPENWEATHER_API_KEY`) and `PORT`, used as defaults

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, load_settings_from, AgentSettings, LlmSettings, ObservabilityConfig,
    PromptSettings, RuntimeEnvironment, ServerConfig, Settings, SttSettings, TranslationProvider,
    TranslationSettings, TtsSettings, WeatherSettings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
