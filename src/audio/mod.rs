//! Audio handling module
//!
//! Sample formats, wire-to-frame conversion and the sink interface the
//! receive loop delivers into.

pub mod convert;
pub mod format;
pub mod frame;
pub mod sink;


pub use convert::{ConvertError, L24_GAIN, SampleConverter};
pub use format::{ParseFormatError, SampleFormat, SampleRate, SpeakerLayout, StreamFormat};
pub use frame::{AudioFrame, OwnedAudioFrame, OwnedSamples, SampleWidth, Samples};
pub use sink::{AudioSink, ChannelSink};
