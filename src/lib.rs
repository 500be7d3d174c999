//! # aes67
//!
//! A pure Rust receiver for AES67 audio-over-IP streams.
//!
//! ## Features
//!
//! - RTP packet decoding and encoding (RFC 3550 subset)
//! - L16 and L24 linear PCM conversion
//! - Multicast receive session with a dedicated background thread
//! - Pluggable audio sink, socket binder and scheduling hint
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use aes67::audio::ChannelSink;
//! use aes67::{ReceiverConfig, ReceiverSession};
//!
//! # fn example() -> Result<(), aes67::Aes67Error> {
//! let config = ReceiverConfig::new("239.69.83.133");
//! let (sink, frames) = ChannelSink::new(64);
//!
//! let mut session = ReceiverSession::new(config, Arc::new(sink));
//! session.start()?;
//!
//! for frame in frames.iter().take(100) {
//!     println!("{} frames at {}", frame.frames, frame.timestamp);
//! }
//!
//! session.stop();
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Session**: `ReceiverSession` - start/stop/reconfigure lifecycle
//! - **Pipeline**: receive loop, `SampleConverter`, `AudioSink`
//! - **Wire**: `RtpPacket` codec and `RtpPacketizer`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
/// Error types
pub mod error;

/// Testing utilities
pub mod testing;

pub mod audio;
pub mod protocol;
pub mod receiver;

// Re-exports
pub use audio::{
    AudioFrame, AudioSink, SampleConverter, SampleFormat, SampleRate, SpeakerLayout, StreamFormat,
};
pub use error::{Aes67Error, Result};
pub use protocol::rtp::{RtpDecodeError, RtpEncodeError, RtpPacket, RtpPacketizer};
pub use receiver::{ReceiverConfig, ReceiverSession, SessionState};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
