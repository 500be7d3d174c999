use bytes::Bytes;
use thiserror::Error;

use super::constants::{HEADER_SIZE, MAX_PACKET_LENGTH};
use super::packet::{RtpDecodeError, RtpEncodeError, RtpPacket};

/// Packetizer errors
#[derive(Debug, Error)]
pub enum RtpCodecError {
    #[error("encode error: {0}")]
    Encode(#[from] RtpEncodeError),

    #[error("payload error: {0}")]
    Payload(#[from] RtpDecodeError),

    #[error("invalid audio data size: {0} bytes")]
    InvalidAudioSize(usize),
}

/// Splits interleaved big-endian PCM into consecutive RTP packets
///
/// Keeps the sender-side stream state: sequence numbers advance by one per
/// packet and timestamps by the number of frames carried.
pub struct RtpPacketizer {
    /// SSRC for outgoing packets
    ssrc: u32,
    /// Payload type for outgoing packets
    payload_type: u8,
    /// Current sequence number
    sequence: u16,
    /// Current RTP timestamp
    timestamp: u32,
    /// Bytes per frame (sample width * channels)
    bytes_per_frame: usize,
    /// Frames carried by a full packet
    frames_per_packet: usize,
    /// Set the marker bit on the next packet
    marker_pending: bool,
    /// Scratch packet reused between calls
    packet: RtpPacket,
}

impl RtpPacketizer {
    /// Frames per packet at the AES67 default packet time (1 ms at 48 kHz)
    pub const DEFAULT_FRAMES_PER_PACKET: usize = 48;

    /// Create a new packetizer
    ///
    /// `bytes_per_frame` is the sample width in bytes times the channel count.
    #[must_use]
    pub fn new(ssrc: u32, payload_type: u8, bytes_per_frame: usize) -> Self {
        let bytes_per_frame = bytes_per_frame.max(1);
        Self {
            ssrc,
            payload_type,
            sequence: 0,
            timestamp: 0,
            bytes_per_frame,
            frames_per_packet: Self::DEFAULT_FRAMES_PER_PACKET
                .min(Self::max_frames(bytes_per_frame)),
            marker_pending: true,
            packet: RtpPacket::default(),
        }
    }

    /// Set the number of frames per full packet, capped to what fits in one MTU
    #[must_use]
    pub fn with_frames_per_packet(mut self, frames: usize) -> Self {
        self.frames_per_packet = frames.clamp(1, Self::max_frames(self.bytes_per_frame));
        self
    }

    /// Start from the given sequence number and timestamp
    #[must_use]
    pub fn with_initial_state(mut self, sequence: u16, timestamp: u32) -> Self {
        self.sequence = sequence;
        self.timestamp = timestamp;
        self
    }

    fn max_frames(bytes_per_frame: usize) -> usize {
        ((MAX_PACKET_LENGTH - HEADER_SIZE) / bytes_per_frame).max(1)
    }

    /// Reset sequence and timestamp
    pub fn reset(&mut self) {
        self.sequence = 0;
        self.timestamp = 0;
        self.marker_pending = true;
    }

    /// Get current sequence number
    #[must_use]
    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    /// Get current timestamp
    #[must_use]
    pub fn timestamp(&self) -> u32 {
        self.timestamp
    }

    /// Frames carried by a full packet
    #[must_use]
    pub fn frames_per_packet(&self) -> usize {
        self.frames_per_packet
    }

    /// Encode one packet worth of PCM
    ///
    /// # Errors
    ///
    /// Returns `RtpCodecError::InvalidAudioSize` unless `pcm` holds between one and
    /// `frames_per_packet` whole frames.
    pub fn encode_audio(&mut self, pcm: &[u8]) -> Result<Bytes, RtpCodecError> {
        if pcm.is_empty()
            || pcm.len() % self.bytes_per_frame != 0
            || pcm.len() > self.frames_per_packet * self.bytes_per_frame
        {
            return Err(RtpCodecError::InvalidAudioSize(pcm.len()));
        }
        let frames = pcm.len() / self.bytes_per_frame;

        self.packet.payload_type = self.payload_type & 0x7F;
        self.packet.ssrc = self.ssrc;
        self.packet.sequence_number = self.sequence;
        self.packet.timestamp = self.timestamp;
        self.packet.marker = self.marker_pending;
        self.packet.set_payload(pcm)?;

        let encoded = self.packet.encode()?;

        // Update state for next packet
        self.marker_pending = false;
        self.sequence = self.sequence.wrapping_add(1);
        #[allow(clippy::cast_possible_truncation)]
        {
            self.timestamp = self.timestamp.wrapping_add(frames as u32);
        }

        Ok(encoded)
    }

    /// Encode an arbitrary run of PCM into as many packets as needed
    ///
    /// A trailing partial frame is dropped.
    ///
    /// # Errors
    ///
    /// Returns `RtpCodecError` if a packet cannot be encoded.
    pub fn packetize(&mut self, pcm: &[u8]) -> Result<Vec<Bytes>, RtpCodecError> {
        let chunk_size = self.frames_per_packet * self.bytes_per_frame;
        let whole = pcm.len() - pcm.len() % self.bytes_per_frame;

        pcm[..whole]
            .chunks(chunk_size)
            .map(|chunk| self.encode_audio(chunk))
            .collect()
    }
}
