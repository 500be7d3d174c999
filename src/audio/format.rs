//! Audio format definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error parsing a format, rate or layout from its external representation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseFormatError {
    kind: &'static str,
    value: String,
}

impl ParseFormatError {
    fn new(kind: &'static str, value: impl fmt::Display) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Linear PCM wire encoding (big-endian, signed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SampleFormat {
    /// 16-bit linear PCM
    L16,
    /// 24-bit linear PCM (packed)
    #[default]
    L24,
    /// 32-bit linear PCM, announced by some RAVENNA devices; not decoded
    L32,
}

impl SampleFormat {
    /// Get bytes per sample on the wire
    #[must_use]
    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleFormat::L16 => 2,
            SampleFormat::L24 => 3,
            SampleFormat::L32 => 4,
        }
    }

    /// Get bits per sample on the wire
    #[must_use]
    pub fn bits_per_sample(self) -> u8 {
        match self {
            SampleFormat::L16 => 16,
            SampleFormat::L24 => 24,
            SampleFormat::L32 => 32,
        }
    }

    /// Whether the receive pipeline can convert this encoding
    #[must_use]
    pub fn is_supported(self) -> bool {
        matches!(self, SampleFormat::L16 | SampleFormat::L24)
    }
}

impl fmt::Display for SampleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleFormat::L16 => "L16",
            SampleFormat::L24 => "L24",
            SampleFormat::L32 => "L32",
        };
        f.write_str(name)
    }
}

impl FromStr for SampleFormat {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L16" => Ok(SampleFormat::L16),
            "L24" => Ok(SampleFormat::L24),
            "L32" => Ok(SampleFormat::L32),
            _ => Err(ParseFormatError::new("sample format", s)),
        }
    }
}

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum SampleRate {
    /// 44.1 kHz
    Hz44100,
    /// 48 kHz (AES67 mandatory rate)
    #[default]
    Hz48000,
    /// 96 kHz
    Hz96000,
}

impl SampleRate {
    /// Get the rate as u32
    #[must_use]
    pub fn as_u32(self) -> u32 {
        match self {
            SampleRate::Hz44100 => 44100,
            SampleRate::Hz48000 => 48000,
            SampleRate::Hz96000 => 96000,
        }
    }

    /// Create from Hz value
    #[must_use]
    pub fn from_hz(hz: u32) -> Option<Self> {
        match hz {
            44100 => Some(SampleRate::Hz44100),
            48000 => Some(SampleRate::Hz48000),
            96000 => Some(SampleRate::Hz96000),
            _ => None,
        }
    }
}

impl TryFrom<u32> for SampleRate {
    type Error = ParseFormatError;

    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        Self::from_hz(hz).ok_or_else(|| ParseFormatError::new("sample rate", hz))
    }
}

impl From<SampleRate> for u32 {
    fn from(rate: SampleRate) -> Self {
        rate.as_u32()
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.as_u32())
    }
}

/// Speaker layout of the incoming stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SpeakerLayout {
    /// Mono (1 channel)
    #[serde(rename = "mono")]
    Mono,
    /// Stereo (2 channels)
    #[default]
    #[serde(rename = "stereo")]
    Stereo,
    /// 7.1 surround (8 channels)
    #[serde(rename = "7.1")]
    Surround71,
}

impl SpeakerLayout {
    /// Largest channel count of any layout
    pub const MAX_CHANNELS: usize = 8;

    /// Get number of channels
    #[must_use]
    pub fn channels(self) -> u8 {
        match self {
            SpeakerLayout::Mono => 1,
            SpeakerLayout::Stereo => 2,
            SpeakerLayout::Surround71 => 8,
        }
    }

    /// Create from a channel count
    #[must_use]
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            1 => Some(SpeakerLayout::Mono),
            2 => Some(SpeakerLayout::Stereo),
            8 => Some(SpeakerLayout::Surround71),
            _ => None,
        }
    }
}

impl fmt::Display for SpeakerLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SpeakerLayout::Mono => "mono",
            SpeakerLayout::Stereo => "stereo",
            SpeakerLayout::Surround71 => "7.1",
        };
        f.write_str(name)
    }
}

impl FromStr for SpeakerLayout {
    type Err = ParseFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mono" => Ok(SpeakerLayout::Mono),
            "stereo" => Ok(SpeakerLayout::Stereo),
            "7.1" => Ok(SpeakerLayout::Surround71),
            _ => Err(ParseFormatError::new("speaker layout", s)),
        }
    }
}

/// Complete description of an incoming stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StreamFormat {
    /// Wire encoding
    pub sample_format: SampleFormat,
    /// Sample rate
    pub sample_rate: SampleRate,
    /// Speaker layout
    pub layout: SpeakerLayout,
}

impl StreamFormat {
    /// Create a new stream format
    #[must_use]
    pub fn new(sample_format: SampleFormat, sample_rate: SampleRate, layout: SpeakerLayout) -> Self {
        Self {
            sample_format,
            sample_rate,
            layout,
        }
    }

    /// Get bytes per frame on the wire (all channels for one sample)
    #[must_use]
    pub fn bytes_per_frame(self) -> usize {
        self.sample_format.bytes_per_sample() * usize::from(self.layout.channels())
    }

    /// Calculate duration for given number of frames
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn frames_to_duration(self, frames: usize) -> std::time::Duration {
        std::time::Duration::from_secs_f64(frames as f64 / f64::from(self.sample_rate.as_u32()))
    }
}
