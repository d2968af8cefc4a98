//! In-process audio channel
//!
//! A `LocalChannel` pairs a session with a `ChannelPeer` over bounded
//! in-memory queues. It exists for tests and local harnesses; production
//! transports implement `AudioChannel` over their own wire.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex};

use parlance_core::{AudioChannel, AudioFrame, Error, Result};

const CHANNEL_CAPACITY: usize = 64;

/// Session-facing endpoint of an in-process channel
pub struct LocalChannel {
    id: String,
    incoming: Mutex<mpsc::Receiver<AudioFrame>>,
    outgoing: mpsc::Sender<AudioFrame>,
    closed: Arc<watch::Sender<bool>>,
}

/// Remote-party endpoint used to drive a `LocalChannel`
pub struct ChannelPeer {
    to_session: mpsc::Sender<AudioFrame>,
    from_session: Mutex<mpsc::Receiver<AudioFrame>>,
    closed: Arc<watch::Sender<bool>>,
}

impl LocalChannel {
    /// Create a connected channel/peer pair
    pub fn pair(id: impl Into<String>) -> (Arc<LocalChannel>, ChannelPeer) {
        let (to_session_tx, to_session_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (from_session_tx, from_session_rx) = mpsc::channel(CHANNEL_CAPACITY);
        let (closed_tx, _) = watch::channel(false);
        let closed = Arc::new(closed_tx);

        let channel = Arc::new(LocalChannel {
            id: id.into(),
            incoming: Mutex::new(to_session_rx),
            outgoing: from_session_tx,
            closed: Arc::clone(&closed),
        });

        let peer = ChannelPeer {
            to_session: to_session_tx,
            from_session: Mutex::new(from_session_rx),
            closed,
        };

        (channel, peer)
    }
}

#[async_trait]
impl AudioChannel for LocalChannel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn send_audio(&self, frame: AudioFrame) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ChannelClosed);
        }
        self.outgoing
            .send(frame)
            .await
            .map_err(|_| Error::ChannelClosed)
    }

    async fn receive_audio(&self) -> Option<AudioFrame> {
        if self.is_closed() {
            return None;
        }

        let mut incoming = self.incoming.lock().await;
        let mut closed = self.closed.subscribe();
        tokio::select! {
            frame = incoming.recv() => frame,
            _ = closed.wait_for(|c| *c) => None,
        }
    }

    async fn closed(&self) {
        let mut rx = self.closed.subscribe();
        let _ = rx.wait_for(|c| *c).await;
    }

    fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    async fn close(&self) {
        let _ = self.closed.send(true);
    }
}

impl ChannelPeer {
    /// Send caller audio toward the session
    pub async fn send_audio(&self, frame: AudioFrame) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ChannelClosed);
        }
        self.to_session
            .send(frame)
            .await
            .map_err(|_| Error::ChannelClosed)
    }

    /// Receive the next frame the session sent; `None` once closed
    pub async fn recv_audio(&self) -> Option<AudioFrame> {
        let mut from_session = self.from_session.lock().await;
        let mut closed = self.closed.subscribe();
        tokio::select! {
            frame = from_session.recv() => frame,
            _ = closed.wait_for(|c| *c) => from_session.try_recv().ok(),
        }
    }

    /// Close the channel from the remote side
    pub fn close(&self) {
        let _ = self.closed.send(true);
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlance_core::{Channels, SampleRate};

    fn frame() -> AudioFrame {
        AudioFrame::new(vec![0.1; 320], SampleRate::Hz16000, Channels::Mono, 0)
    }

    #[tokio::test]
    async fn test_round_trip() {
        let (channel, peer) = LocalChannel::pair("room-1");

        peer.send_audio(frame()).await.unwrap();
        let received = channel.receive_audio().await.unwrap();
        assert_eq!(received.samples.len(), 320);

        channel.send_audio(frame()).await.unwrap();
        assert!(peer.recv_audio().await.is_some());
    }

    #[tokio::test]
    async fn test_close_from_peer() {
        let (channel, peer) = LocalChannel::pair("room-1");
        assert!(!channel.is_closed());

        peer.close();
        assert!(channel.is_closed());
        assert!(channel.receive_audio().await.is_none());
        assert!(channel.send_audio(frame()).await.is_err());
    }

    #[tokio::test]
    async fn test_closed_signal_resolves() {
        let (channel, peer) = LocalChannel::pair("room-1");

        let waiter = {
            let channel = Arc::clone(&channel);
            tokio::spawn(async move { channel.closed().await })
        };

        peer.close();
        waiter.await.unwrap();
    }
}
