//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Language model configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Speech-to-text configuration
    #[serde(default)]
    pub stt: SttSettings,

    /// Text-to-speech configuration
    #[serde(default)]
    pub tts: TtsSettings,

    /// Session behavior configuration
    #[serde(default)]
    pub session: SessionSettings,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilitySettings,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session.validate()?;

        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "llm.model".to_string(),
                message: "Model name cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Language model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Model identifier, overridable via the LLM_CHOICE environment variable
    #[serde(default = "default_llm_model")]
    pub model: String,
}

fn default_llm_model() -> String {
    std::env::var("LLM_CHOICE").unwrap_or_else(|_| "gpt-4o-mini".to_string())
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: default_llm_model(),
        }
    }
}

/// Speech-to-text settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttSettings {
    /// Model identifier
    #[serde(default = "default_stt_model")]
    pub model: String,
}

fn default_stt_model() -> String {
    "nova-2".to_string()
}

impl Default for SttSettings {
    fn default() -> Self {
        Self {
            model: default_stt_model(),
        }
    }
}

/// Text-to-speech settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsSettings {
    /// Voice identifier
    #[serde(default = "default_tts_voice")]
    pub voice: String,
}

fn default_tts_voice() -> String {
    "alloy".to_string()
}

impl Default for TtsSettings {
    fn default() -> Self {
        Self {
            voice: default_tts_voice(),
        }
    }
}

/// Session behavior settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Maximum tool-call rounds within one model turn
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,

    /// Maximum retained non-system conversation turns
    #[serde(default = "default_max_history_turns")]
    pub max_history_turns: usize,

    /// Cap on buffered utterance audio (seconds)
    #[serde(default = "default_utterance_max_secs")]
    pub utterance_max_secs: u64,

    /// Directive used for the system-initiated greeting
    #[serde(default = "default_greeting")]
    pub greeting: String,
}

fn default_max_tool_rounds() -> usize {
    4
}
fn default_max_history_turns() -> usize {
    64
}
fn default_utterance_max_secs() -> u64 {
    30
}
fn default_greeting() -> String {
    "Greet the user and offer your assistance.".to_string()
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_tool_rounds: default_max_tool_rounds(),
            max_history_turns: default_max_history_turns(),
            utterance_max_secs: default_utterance_max_secs(),
            greeting: default_greeting(),
        }
    }
}

impl SessionSettings {
    /// Validate session settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_tool_rounds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "session.max_tool_rounds".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if self.max_history_turns < 2 {
            return Err(ConfigError::InvalidValue {
                field: "session.max_history_turns".to_string(),
                message: "Must be at least 2".to_string(),
            });
        }

        if self.utterance_max_secs == 0 || self.utterance_max_secs > 300 {
            return Err(ConfigError::InvalidValue {
                field: "session.utterance_max_secs".to_string(),
                message: format!(
                    "Must be between 1 and 300 seconds, got {}",
                    self.utterance_max_secs
                ),
            });
        }

        if self.greeting.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "session.greeting".to_string(),
                message: "Greeting directive cannot be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilitySettings {
    /// Log level, overridable via the LOG_LEVEL environment variable
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (PARLANCE prefix, e.g. PARLANCE__LLM__MODEL)
/// 2. config/{env} (if env specified)
/// 3. config/default
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("PARLANCE")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}
