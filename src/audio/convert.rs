//! Wire PCM to frame conversion

use super::format::{SampleFormat, SampleRate, SpeakerLayout, StreamFormat};
use super::frame::{AudioFrame, Samples};
use crate::protocol::rtp::constants::MAX_SAMPLES_PER_PACKET;

/// Gain applied to widened L24 samples.
///
/// Compensates the ~48 dB between the 24-bit (~145 dB) and 32-bit (~193 dB)
/// dynamic ranges. Must stay at 251 for output parity with existing receivers.
pub const L24_GAIN: i32 = 251;

/// Scratch capacity in samples (all channels)
pub const MAX_SCRATCH_SAMPLES: usize = MAX_SAMPLES_PER_PACKET * SpeakerLayout::MAX_CHANNELS;

/// Conversion errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    /// The declared sample format cannot be converted
    #[error("unsupported sample format: {0}")]
    UnsupportedSampleFormat(SampleFormat),
}

/// Number of whole frames in an L16 payload
#[must_use]
pub fn l16_frame_count(payload_len: usize, channels: usize) -> usize {
    (payload_len / 2) / channels.max(1)
}

/// Number of whole frames in an L24 payload
#[must_use]
pub fn l24_frame_count(payload_len: usize, channels: usize) -> usize {
    (payload_len / 3) / channels.max(1)
}

/// Sign-extend a big-endian 24-bit sample into the top 24 bits of an i32 and apply [`L24_GAIN`].
///
/// The multiplication wraps exactly like the two's complement arithmetic the
/// gain was calibrated against.
#[must_use]
pub fn widen_l24(bytes: [u8; 3]) -> i32 {
    i32::from_be_bytes([bytes[0], bytes[1], bytes[2], 0]).wrapping_mul(L24_GAIN)
}

/// Converts RTP payloads into [`AudioFrame`]s
///
/// Owns fixed scratch buffers sized for the largest packet so steady-state
/// conversion never allocates. One converter belongs to one receive loop.
pub struct SampleConverter {
    format: StreamFormat,
    scratch16: Box<[i16]>,
    scratch32: Box<[i32]>,
}

impl SampleConverter {
    /// Create a converter for the given stream
    #[must_use]
    pub fn new(format: StreamFormat) -> Self {
        Self {
            format,
            scratch16: vec![0; MAX_SCRATCH_SAMPLES].into_boxed_slice(),
            scratch32: vec![0; MAX_SCRATCH_SAMPLES].into_boxed_slice(),
        }
    }

    /// Stream format this converter was built for
    #[must_use]
    pub fn format(&self) -> StreamFormat {
        self.format
    }

    /// Convert one payload
    ///
    /// Trailing bytes that do not make up a whole frame are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ConvertError::UnsupportedSampleFormat` for formats other than L16 and L24.
    pub fn convert(&mut self, payload: &[u8], timestamp: u32) -> Result<AudioFrame<'_>, ConvertError> {
        let StreamFormat {
            sample_format,
            sample_rate,
            layout,
        } = self.format;
        let channels = usize::from(layout.channels());

        let (frames, samples) = match sample_format {
            SampleFormat::L16 => {
                let frames = l16_frame_count(payload.len(), channels).min(MAX_SCRATCH_SAMPLES / channels);
                let count = frames * channels;
                for (out, bytes) in self.scratch16[..count]
                    .iter_mut()
                    .zip(payload.chunks_exact(2))
                {
                    *out = i16::from_be_bytes([bytes[0], bytes[1]]);
                }
                (frames, Samples::S16(&self.scratch16[..count]))
            }
            SampleFormat::L24 => {
                let frames = l24_frame_count(payload.len(), channels).min(MAX_SCRATCH_SAMPLES / channels);
                let count = frames * channels;
                for (out, bytes) in self.scratch32[..count]
                    .iter_mut()
                    .zip(payload.chunks_exact(3))
                {
                    *out = widen_l24([bytes[0], bytes[1], bytes[2]]);
                }
                (frames, Samples::S32(&self.scratch32[..count]))
            }
            other => return Err(ConvertError::UnsupportedSampleFormat(other)),
        };

        Ok(AudioFrame {
            sample_rate,
            layout,
            frames,
            samples,
            timestamp,
        })
    }
}

impl Default for SampleConverter {
    fn default() -> Self {
        Self::new(StreamFormat::new(
            SampleFormat::default(),
            SampleRate::default(),
            SpeakerLayout::default(),
        ))
    }
}
