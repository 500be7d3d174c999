//! RTP packet codec for AES67 audio streams

#![allow(missing_docs)]

mod codec;
mod packet;

#[cfg(test)]
mod packet_proptest;

pub use codec::{RtpCodecError, RtpPacketizer};
pub use packet::{RtpDecodeError, RtpEncodeError, RtpPacket};

/// RTP protocol constants for AES67
pub mod constants {
    /// AES67 default RTP port
    pub const AES67_PORT: u16 = 5004;

    /// RTP protocol version carried in every packet
    pub const RTP_VERSION: u8 = 2;

    /// Fixed RTP header size
    pub const HEADER_SIZE: usize = 12;

    /// Ethernet MTU (1500) - IP header (60) - UDP header (8)
    pub const MAX_PACKET_LENGTH: usize = 1432;

    /// Maximum number of contributing sources (4-bit field)
    pub const MAX_CSRC_COUNT: usize = 15;

    /// Samples per channel in the largest AES67 packet (5 ms at 48 kHz)
    pub const MAX_SAMPLES_PER_PACKET: usize = 240;

    /// Dynamic payload type conventionally used for AES67 L24 streams
    pub const DEFAULT_PAYLOAD_TYPE: u8 = 96;
}
