//! AES67 multicast receiver
//!
//! A [`ReceiverSession`] binds a multicast socket, runs a background
//! receive loop and pushes decoded [`AudioFrame`](crate::audio::AudioFrame)s
//! into an [`AudioSink`](crate::audio::AudioSink).

pub mod config;
pub mod hint;
mod rtp_receiver;
pub mod sequence_tracker;
pub mod session;
pub mod socket;
pub mod stats;

#[cfg(test)]
mod tests;

pub use config::ReceiverConfig;
pub use hint::{NoPerformanceHint, PerformanceHint, PerformanceToken};
pub use sequence_tracker::{SequenceEvent, SequenceTracker};
pub use session::{ReceiverSession, SessionState};
pub use socket::{DatagramSocket, MulticastBinder, SocketBinder};
pub use stats::{ReceiverStats, ReceiverStatsSnapshot};
