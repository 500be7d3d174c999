//! Sink that records every frame it receives

use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

use crate::audio::{AudioFrame, AudioSink, OwnedAudioFrame};

/// Keeps owned copies of delivered frames for inspection
#[derive(Debug, Default)]
pub struct RecordingSink {
    frames: Mutex<Vec<OwnedAudioFrame>>,
    delivered: Condvar,
}

impl RecordingSink {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All frames received so far
    #[must_use]
    pub fn frames(&self) -> Vec<OwnedAudioFrame> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// RTP timestamps of the received frames, in arrival order
    #[must_use]
    pub fn timestamps(&self) -> Vec<u32> {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|f| f.timestamp)
            .collect()
    }

    /// Number of frames received
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether nothing has been received
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Block until at least `count` frames arrived or `timeout` passed
    ///
    /// Returns whether the count was reached.
    pub fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let frames = self.frames.lock().unwrap_or_else(PoisonError::into_inner);
        let (frames, _) = self
            .delivered
            .wait_timeout_while(frames, timeout, |f| f.len() < count)
            .unwrap_or_else(PoisonError::into_inner);
        frames.len() >= count
    }
}

impl AudioSink for RecordingSink {
    fn output_audio(&self, frame: &AudioFrame<'_>) {
        self.frames
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(frame.to_owned_frame());
        self.delivered.notify_all();
    }
}
