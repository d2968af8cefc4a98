//! Capability traits
//!
//! The seams between the session core and its external collaborators. Real
//! deployments bind provider-backed implementations; tests inject fakes
//! honoring the same contracts.

pub mod channel;
pub mod llm;
pub mod speech;
pub mod vad;

pub use channel::AudioChannel;
pub use llm::LanguageModel;
pub use speech::{SpeechToText, TextToSpeech};
pub use vad::{VadEvent, VoiceActivity};
