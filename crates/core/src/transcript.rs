//! Transcription result types

use serde::{Deserialize, Serialize};

/// Result of transcribing one utterance
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Transcript {
    /// Transcribed text
    pub text: String,
    /// Confidence score (0.0 - 1.0)
    pub confidence: f32,
}

impl Transcript {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }

    /// True when no speech was recognized
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}
