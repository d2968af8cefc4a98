//! Error types shared across the harness

use crate::capability::CapabilityError;
use thiserror::Error;

/// Core error type
#[derive(Debug, Error)]
pub enum Error {
    /// A capability could not be acquired or stopped responding
    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// The communication channel is closed
    #[error("channel closed")]
    ChannelClosed,

    /// A capability backend reported a failure
    #[error("backend error: {0}")]
    Backend(String),
}

impl Error {
    /// Convenience constructor for backend failures
    pub fn backend(message: impl Into<String>) -> Self {
        Error::Backend(message.into())
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
