//! Audio sink abstraction
//!
//! The host's audio output acceptor. The receive loop pushes each decoded
//! frame to the sink and keeps no reference to it afterwards.

use std::sync::mpsc;

use super::frame::{AudioFrame, OwnedAudioFrame};

/// Destination for decoded audio
///
/// Called from the receive thread once per packet. Implementations should
/// return quickly; the loop does not read the socket while a call is running.
pub trait AudioSink: Send + Sync {
    /// Accept one frame
    fn output_audio(&self, frame: &AudioFrame<'_>);
}

impl<F> AudioSink for F
where
    F: Fn(&AudioFrame<'_>) + Send + Sync,
{
    fn output_audio(&self, frame: &AudioFrame<'_>) {
        self(frame);
    }
}

/// Sink that forwards owned frames over a bounded channel
///
/// Frames are dropped when the channel is full or disconnected, so a slow
/// consumer never blocks the receive loop.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::SyncSender<OwnedAudioFrame>,
}

impl ChannelSink {
    /// Create a sink and the receiving end of its channel
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<OwnedAudioFrame>) {
        let (tx, rx) = mpsc::sync_channel(capacity);
        (Self { tx }, rx)
    }
}

impl AudioSink for ChannelSink {
    fn output_audio(&self, frame: &AudioFrame<'_>) {
        if let Err(mpsc::TrySendError::Full(_)) = self.tx.try_send(frame.to_owned_frame()) {
            tracing::trace!("Audio channel full, dropping frame at {}", frame.timestamp);
        }
    }
}
