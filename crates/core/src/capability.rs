//! Capability acquisition
//!
//! A capability handle is an opaque reference to an external service binding
//! (STT/LLM/TTS/VAD) usable for exactly one session's lifetime. Handles are
//! acquired independently at session start; any one of them may fail on its
//! own, and the failing capability is named in the error.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::traits::{LanguageModel, SpeechToText, TextToSpeech, VoiceActivity};

/// The four capabilities a session depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    Stt,
    Llm,
    Tts,
    Vad,
}

impl CapabilityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::Stt => "speech-to-text",
            CapabilityKind::Llm => "language-model",
            CapabilityKind::Tts => "text-to-speech",
            CapabilityKind::Vad => "voice-activity-detection",
        }
    }
}

impl std::fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A capability could not be acquired, or became unavailable mid-session
#[derive(Debug, Clone, Error)]
#[error("{kind} capability unavailable: {message}")]
pub struct CapabilityError {
    /// The capability responsible for the failure
    pub kind: CapabilityKind,
    /// Backend-supplied detail
    pub message: String,
}

impl CapabilityError {
    pub fn new(kind: CapabilityKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Source of capability handles for new sessions
///
/// Each acquisition is independent; a provider may hand out shared handles
/// (`Arc` clones) or construct per-session bindings.
#[async_trait]
pub trait CapabilityProvider: Send + Sync {
    async fn acquire_stt(&self) -> Result<Arc<dyn SpeechToText>, CapabilityError>;
    async fn acquire_llm(&self) -> Result<Arc<dyn LanguageModel>, CapabilityError>;
    async fn acquire_tts(&self) -> Result<Arc<dyn TextToSpeech>, CapabilityError>;
    async fn acquire_vad(&self) -> Result<Arc<dyn VoiceActivity>, CapabilityError>;
}

/// The full set of handles bound to one session
#[derive(Clone)]
pub struct CapabilitySet {
    pub stt: Arc<dyn SpeechToText>,
    pub llm: Arc<dyn LanguageModel>,
    pub tts: Arc<dyn TextToSpeech>,
    pub vad: Arc<dyn VoiceActivity>,
}

/// Provider backed by pre-built handles
///
/// Hosts that construct their backends up front register them here; any
/// capability left unset fails acquisition with that capability named.
#[derive(Default)]
pub struct StaticCapabilities {
    stt: Option<Arc<dyn SpeechToText>>,
    llm: Option<Arc<dyn LanguageModel>>,
    tts: Option<Arc<dyn TextToSpeech>>,
    vad: Option<Arc<dyn VoiceActivity>>,
}

impl StaticCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stt(mut self, stt: Arc<dyn SpeechToText>) -> Self {
        self.stt = Some(stt);
        self
    }

    pub fn with_llm(mut self, llm: Arc<dyn LanguageModel>) -> Self {
        self.llm = Some(llm);
        self
    }

    pub fn with_tts(mut self, tts: Arc<dyn TextToSpeech>) -> Self {
        self.tts = Some(tts);
        self
    }

    pub fn with_vad(mut self, vad: Arc<dyn VoiceActivity>) -> Self {
        self.vad = Some(vad);
        self
    }

    fn missing(kind: CapabilityKind) -> CapabilityError {
        CapabilityError::new(kind, "no backend configured")
    }
}

#[async_trait]
impl CapabilityProvider for StaticCapabilities {
    async fn acquire_stt(&self) -> Result<Arc<dyn SpeechToText>, CapabilityError> {
        self.stt
            .clone()
            .ok_or_else(|| Self::missing(CapabilityKind::Stt))
    }

    async fn acquire_llm(&self) -> Result<Arc<dyn LanguageModel>, CapabilityError> {
        self.llm
            .clone()
            .ok_or_else(|| Self::missing(CapabilityKind::Llm))
    }

    async fn acquire_tts(&self) -> Result<Arc<dyn TextToSpeech>, CapabilityError> {
        self.tts
            .clone()
            .ok_or_else(|| Self::missing(CapabilityKind::Tts))
    }

    async fn acquire_vad(&self) -> Result<Arc<dyn VoiceActivity>, CapabilityError> {
        self.vad
            .clone()
            .ok_or_else(|| Self::missing(CapabilityKind::Vad))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_error_names_capability() {
        let err = CapabilityError::new(CapabilityKind::Tts, "connection refused");
        let rendered = err.to_string();
        assert!(rendered.contains("text-to-speech"));
        assert!(rendered.contains("connection refused"));
    }

    #[tokio::test]
    async fn test_static_capabilities_missing() {
        let provider = StaticCapabilities::new();
        let err = provider.acquire_llm().await.unwrap_err();
        assert_eq!(err.kind, CapabilityKind::Llm);
    }
}
