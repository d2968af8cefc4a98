//! Voice activity detection trait

use crate::{AudioFrame, Result};

/// Classification of one audio frame relative to the speaker's turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VadEvent {
    /// No speech in this frame
    Silence,
    /// Speech began with this frame
    SpeechStart,
    /// Speech continues
    Speech,
    /// The speaker finished their turn; buffered audio forms one utterance
    UtteranceEnd,
}

/// Voice activity detector
///
/// Implementations keep whatever per-stream state they need internally;
/// `classify` is called once per inbound frame in arrival order.
pub trait VoiceActivity: Send + Sync + 'static {
    /// Classify the next frame of the stream
    fn classify(&self, frame: &AudioFrame) -> Result<VadEvent>;

    /// Reset stream state between utterances or sessions
    fn reset(&self) {}
}
