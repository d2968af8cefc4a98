//! Speech processing traits

use async_trait::async_trait;

use crate::{AudioFrame, Result, Transcript};

/// Speech-to-Text interface
///
/// # Example
///
/// ```ignore
/// let stt: Arc<dyn SpeechToText> = provider.acquire_stt().await?;
/// let transcript = stt.transcribe(&utterance).await?;
/// println!("heard: {}", transcript.text);
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync + 'static {
    /// Transcribe a complete utterance
    async fn transcribe(&self, audio: &AudioFrame) -> Result<Transcript>;

    /// Model identifier for logging
    fn model_name(&self) -> &str;
}

/// Text-to-Speech interface
#[async_trait]
pub trait TextToSpeech: Send + Sync + 'static {
    /// Synthesize text to audio
    async fn synthesize(&self, text: &str) -> Result<AudioFrame>;

    /// Voice identifier for logging
    fn voice(&self) -> &str;
}
