//! Configuration management for the voice-agent harness
//!
//! Supports loading configuration from:
//! - TOML/YAML files (`config/default`, `config/{env}`)
//! - Environment variables (`PARLANCE` prefix, `__` separator)
//!
//! A handful of single-value overrides mirror the conventional environment
//! names (`LLM_CHOICE`, `LOG_LEVEL`) so deployments can tweak the model or
//! log verbosity without a config file.

pub mod settings;
pub mod telemetry;

pub use settings::{
    load_settings, LlmSettings, ObservabilitySettings, SessionSettings, Settings, SttSettings,
    TtsSettings,
};
pub use telemetry::init_tracing;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Environment error: {0}")]
    Environment(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
