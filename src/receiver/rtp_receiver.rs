//! RTP receive loop
//!
//! Reads datagrams from the session socket, decodes them, converts the
//! payload and hands each frame to the sink. Runs on the session's
//! dedicated thread and owns everything it touches except the run flag
//! and the counters.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use super::sequence_tracker::{SequenceEvent, SequenceTracker};
use super::socket::{DatagramSocket, is_timeout};
use super::stats::ReceiverStats;
use crate::audio::{AudioSink, SampleConverter, StreamFormat};
use crate::error::Result;
use crate::protocol::rtp::RtpPacket;

/// Maximum UDP packet size
const MAX_PACKET_SIZE: usize = 2048;

/// Background receive loop for one session
pub(crate) struct RtpReceiveLoop {
    socket: Box<dyn DatagramSocket>,
    buf: Box<[u8]>,
    packet: RtpPacket,
    converter: SampleConverter,
    tracker: SequenceTracker,
    sink: Arc<dyn AudioSink>,
    running: Arc<AtomicBool>,
    stats: Arc<ReceiverStats>,
    error_backoff: Duration,
}

impl RtpReceiveLoop {
    pub(crate) fn new(
        socket: Box<dyn DatagramSocket>,
        format: StreamFormat,
        sink: Arc<dyn AudioSink>,
        running: Arc<AtomicBool>,
        stats: Arc<ReceiverStats>,
        error_backoff: Duration,
    ) -> Self {
        Self {
            socket,
            buf: vec![0; MAX_PACKET_SIZE].into_boxed_slice(),
            packet: RtpPacket::default(),
            converter: SampleConverter::new(format),
            tracker: SequenceTracker::new(),
            sink,
            running,
            stats,
            error_backoff,
        }
    }

    /// Run until the run flag is cleared
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a payload cannot be converted; the
    /// run flag is cleared before returning.
    pub(crate) fn run(mut self) -> Result<()> {
        tracing::debug!("RTP receive loop started");

        while self.running.load(Ordering::Acquire) {
            match self.socket.recv(&mut self.buf) {
                Ok(len) => {
                    if let Err(e) = self.process_datagram(len) {
                        tracing::error!("Receive loop stopping: {}", e);
                        self.running.store(false, Ordering::Release);
                        return Err(e);
                    }
                }
                Err(e) if is_timeout(&e) => {}
                Err(e) => {
                    tracing::warn!("RTP socket error: {}", e);
                    self.stats.record_socket_error();
                    thread::sleep(self.error_backoff);
                }
            }
        }

        tracing::debug!("RTP receive loop exited");
        Ok(())
    }

    /// Handle one datagram
    ///
    /// Malformed packets are dropped here; only conversion failures escape.
    fn process_datagram(&mut self, len: usize) -> Result<()> {
        self.stats.record_datagram(len);

        if let Err(e) = self.packet.decode_from(&self.buf[..len]) {
            tracing::warn!("Dropping malformed RTP packet ({} bytes): {}", len, e);
            self.stats.record_malformed();
            return Ok(());
        }

        self.track_sequence();

        let frame = self
            .converter
            .convert(self.packet.payload(), self.packet.timestamp)?;
        if frame.frames == 0 {
            return Ok(());
        }

        self.sink.output_audio(&frame);
        self.stats.record_delivered();
        Ok(())
    }

    fn track_sequence(&mut self) {
        match self
            .tracker
            .record(self.packet.ssrc, self.packet.sequence_number)
        {
            SequenceEvent::Gap(gap) => {
                tracing::trace!("Lost {} packets starting at {}", gap.count, gap.start);
                self.stats.record_lost(gap.count);
            }
            SequenceEvent::SsrcChanged { previous } => {
                tracing::debug!(
                    "Stream source changed from {:08x} to {:08x}",
                    previous,
                    self.packet.ssrc
                );
                self.stats.record_ssrc_change();
            }
            SequenceEvent::First => {
                tracing::debug!("First packet from source {:08x}", self.packet.ssrc);
            }
            SequenceEvent::InOrder | SequenceEvent::Late | SequenceEvent::Resync => {}
        }
    }
}
