//! Communication channel trait

use async_trait::async_trait;

use crate::{AudioFrame, Result};

/// Bidirectional audio channel binding a session to its remote party
///
/// The session only consumes this narrow surface: frames in, frames out,
/// and a closed signal. Transports (WebRTC rooms, websockets, in-process
/// test channels) live behind it.
#[async_trait]
pub trait AudioChannel: Send + Sync + 'static {
    /// Channel identifier for logging
    fn id(&self) -> &str;

    /// Send synthesized audio to the remote party
    async fn send_audio(&self, frame: AudioFrame) -> Result<()>;

    /// Receive the next inbound frame; `None` once the channel is closed
    async fn receive_audio(&self) -> Option<AudioFrame>;

    /// Resolve when the channel has been closed by either side
    async fn closed(&self);

    /// Check whether the channel is closed
    fn is_closed(&self) -> bool;

    /// Close the channel from this side
    async fn close(&self);
}
