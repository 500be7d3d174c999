//! Test doubles for driving a receiver without a real network
//!
//! Used by the crate's own unit and integration tests; also handy for
//! applications that want to exercise their sinks.

pub mod loopback;
pub mod mock_socket;
pub mod recording_sink;


use std::sync::atomic::{AtomicUsize, Ordering};

pub use loopback::LoopbackBinder;
pub use mock_socket::{ScriptedBinder, ScriptedFeed, ScriptedSocket};
pub use recording_sink::RecordingSink;

use crate::protocol::rtp::RtpPacket;
use crate::protocol::rtp::constants::DEFAULT_PAYLOAD_TYPE;
use crate::receiver::PerformanceHint;

/// Build the wire bytes of a minimal RTP packet
///
/// # Panics
///
/// Panics if `payload` does not fit in one packet.
#[must_use]
pub fn rtp_datagram(sequence: u16, timestamp: u32, ssrc: u32, payload: &[u8]) -> Vec<u8> {
    let mut packet = RtpPacket::new(DEFAULT_PAYLOAD_TYPE, sequence, timestamp, ssrc);
    packet.set_payload(payload).expect("payload fits in one packet");
    packet.encode().expect("packet is consistent").to_vec()
}

/// Encode samples as big-endian L16
#[must_use]
pub fn l16_payload(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_be_bytes()).collect()
}

/// Encode samples as big-endian packed L24 (low 24 bits of each value)
#[must_use]
pub fn l24_payload(samples: &[i32]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|s| {
            let [_, b1, b2, b3] = s.to_be_bytes();
            [b1, b2, b3]
        })
        .collect()
}

/// Performance hint that counts acquire and release calls
#[derive(Debug, Default)]
pub struct CountingHint {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl CountingHint {
    /// Number of `acquire` calls
    #[must_use]
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    /// Number of `release` calls
    #[must_use]
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

impl PerformanceHint for CountingHint {
    fn acquire(&self) {
        self.acquired.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
