//! Decoded audio frames handed to the sink

use super::format::{SampleRate, SpeakerLayout};

/// Width of the samples carried by a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleWidth {
    /// Signed 16-bit
    Bits16,
    /// Signed 32-bit
    Bits32,
}

impl SampleWidth {
    /// Get bits per sample
    #[must_use]
    pub fn bits(self) -> u8 {
        match self {
            SampleWidth::Bits16 => 16,
            SampleWidth::Bits32 => 32,
        }
    }
}

/// Interleaved native-endian samples, borrowed from the converter scratch buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Samples<'a> {
    /// 16-bit samples (L16 passthrough)
    S16(&'a [i16]),
    /// 32-bit samples (widened L24)
    S32(&'a [i32]),
}

impl Samples<'_> {
    /// Sample width tag
    #[must_use]
    pub fn width(&self) -> SampleWidth {
        match self {
            Samples::S16(_) => SampleWidth::Bits16,
            Samples::S32(_) => SampleWidth::Bits32,
        }
    }

    /// Total number of samples across all channels
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Samples::S16(s) => s.len(),
            Samples::S32(s) => s.len(),
        }
    }

    /// Whether there are no samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One RTP packet worth of decoded audio
///
/// Only valid for the duration of a single sink call; use
/// [`to_owned_frame`](Self::to_owned_frame) to keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFrame<'a> {
    /// Sample rate
    pub sample_rate: SampleRate,
    /// Speaker layout
    pub layout: SpeakerLayout,
    /// Frames (samples per channel)
    pub frames: usize,
    /// Interleaved samples, `frames * channels` long
    pub samples: Samples<'a>,
    /// RTP timestamp of the first frame
    pub timestamp: u32,
}

impl AudioFrame<'_> {
    /// Sample width tag
    #[must_use]
    pub fn width(&self) -> SampleWidth {
        self.samples.width()
    }

    /// RTP timestamp converted to nanoseconds at the stream sample rate
    #[must_use]
    pub fn timestamp_nanos(&self) -> u64 {
        u64::from(self.timestamp) * 1_000_000_000 / u64::from(self.sample_rate.as_u32())
    }

    /// Samples for one channel, de-interleaved and widened to i32
    pub fn channel(&self, index: usize) -> impl Iterator<Item = i32> + '_ {
        let stride = usize::from(self.layout.channels());
        let (s16, s32): (&[i16], &[i32]) = match self.samples {
            Samples::S16(s) => (s, &[]),
            Samples::S32(s) => (&[], s),
        };
        let skip = if index < stride { index } else { usize::MAX };
        s16.iter()
            .skip(skip)
            .step_by(stride)
            .map(|&s| i32::from(s))
            .chain(s32.iter().skip(skip).step_by(stride).copied())
    }

    /// Copy into an owned frame
    #[must_use]
    pub fn to_owned_frame(&self) -> OwnedAudioFrame {
        OwnedAudioFrame {
            sample_rate: self.sample_rate,
            layout: self.layout,
            frames: self.frames,
            samples: match self.samples {
                Samples::S16(s) => OwnedSamples::S16(s.to_vec()),
                Samples::S32(s) => OwnedSamples::S32(s.to_vec()),
            },
            timestamp: self.timestamp,
        }
    }
}

/// Owned counterpart of [`Samples`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedSamples {
    /// 16-bit samples
    S16(Vec<i16>),
    /// 32-bit samples
    S32(Vec<i32>),
}

/// Owned counterpart of [`AudioFrame`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedAudioFrame {
    /// Sample rate
    pub sample_rate: SampleRate,
    /// Speaker layout
    pub layout: SpeakerLayout,
    /// Frames (samples per channel)
    pub frames: usize,
    /// Interleaved samples
    pub samples: OwnedSamples,
    /// RTP timestamp of the first frame
    pub timestamp: u32,
}

impl OwnedAudioFrame {
    /// Borrow as an [`AudioFrame`]
    #[must_use]
    pub fn as_frame(&self) -> AudioFrame<'_> {
        AudioFrame {
            sample_rate: self.sample_rate,
            layout: self.layout,
            frames: self.frames,
            samples: match &self.samples {
                OwnedSamples::S16(s) => Samples::S16(s),
                OwnedSamples::S32(s) => Samples::S32(s),
            },
            timestamp: self.timestamp,
        }
    }
}
