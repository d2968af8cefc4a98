//! Agent definition and session lifecycle orchestration
//!
//! Wires the capability traits from `parlance-core` and the tool dispatch
//! from `parlance-tools` into a running voice session: audio in, VAD, STT,
//! LLM turns (including tool calls), TTS, audio out, repeating until the
//! channel closes.

pub mod agent;
pub mod channel;
pub mod session;
pub mod vad;

pub use agent::Agent;
pub use channel::{ChannelPeer, LocalChannel};
pub use session::{Session, SessionEvent, SessionOrchestrator, SessionState};
pub use vad::EnergyVad;

use parlance_core::CapabilityError;
use thiserror::Error;

/// Agent-level errors
#[derive(Debug, Error)]
pub enum AgentError {
    /// A capability could not be acquired or failed mid-session
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// The communication channel was unusable
    #[error("channel error: {0}")]
    Channel(String),
}
