//! Core traits and types for the parlance voice-agent harness
//!
//! This crate provides the foundational pieces used across all other crates:
//! - Capability traits for pluggable backends (STT, LLM, TTS, VAD, channel)
//! - Audio frame types and buffering
//! - Conversation history and LLM exchange types
//! - Error types

pub mod audio;
pub mod capability;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod transcript;
pub mod traits;

pub use audio::{AudioBuffer, AudioFrame, Channels, SampleRate};
pub use capability::{CapabilityError, CapabilityKind, CapabilityProvider, CapabilitySet, StaticCapabilities};
pub use conversation::{Conversation, Turn, TurnRole};
pub use error::{Error, Result};
pub use llm::{Completion, ToolCallRequest, ToolDefinition};
pub use transcript::Transcript;

pub use traits::{AudioChannel, LanguageModel, SpeechToText, TextToSpeech, VadEvent, VoiceActivity};
