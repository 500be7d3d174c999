use arrayvec::ArrayVec;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

use super::constants::{HEADER_SIZE, MAX_CSRC_COUNT, MAX_PACKET_LENGTH, RTP_VERSION};

/// Size of the extension preamble (profile id + length)
const EXTENSION_PREAMBLE_SIZE: usize = 4;

/// RTP decode errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RtpDecodeError {
    #[error("packet too short: {len} bytes")]
    TooShort { len: usize },

    #[error("unsupported RTP version: {0}")]
    UnsupportedVersion(u8),

    #[error("invalid CSRC count: {0} (should not be above 15)")]
    InvalidCsrcCount(u8),

    #[error("buffer too short for {field}: need {needed} bytes, have {have}")]
    BufferTooShort {
        field: &'static str,
        needed: usize,
        have: usize,
    },

    #[error("{field} too large: {len} bytes (max {max})")]
    PayloadTooLarge {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

/// RTP encode errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RtpEncodeError {
    #[error("unsupported RTP version: {0}")]
    UnsupportedVersion(u8),

    #[error("invalid CSRC count: {0} (should not be above 15)")]
    InvalidCsrcCount(u8),

    #[error("CSRC count {declared} does not match {actual} identifiers")]
    CsrcCountMismatch { declared: u8, actual: usize },

    #[error("extension header length {declared} does not match {actual} bytes")]
    ExtensionLengthMismatch { declared: u16, actual: usize },

    #[error("payload length {0} declared but no payload set")]
    NullPayload(usize),

    #[error("payload length {declared} does not match {actual} bytes")]
    PayloadLengthMismatch { declared: usize, actual: usize },

    #[error("output buffer too small: need {needed} bytes, have {have}")]
    BufferTooSmall { needed: usize, have: usize },
}

/// A decoded RTP datagram (RFC 3550 subset)
///
/// Variable-length sections live in fixed-capacity storage sized for one
/// MTU, so a single packet value can be decoded into over and over without
/// touching the heap. The `csrc_count`, `extension_header_length` and
/// `payload_length` fields mirror the wire counts and are checked against
/// the stored data when encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpPacket {
    /// Version (2 bits, always 2)
    pub version: u8,
    /// Padding flag
    pub padding: bool,
    /// Extension flag
    pub extension: bool,
    /// CSRC count (4 bits)
    pub csrc_count: u8,
    /// Marker bit
    pub marker: bool,
    /// Payload type (7 bits)
    pub payload_type: u8,
    /// Sequence number (16 bits)
    pub sequence_number: u16,
    /// Timestamp (32 bits)
    pub timestamp: u32,
    /// Synchronization source ID (32 bits)
    pub ssrc: u32,
    /// Contributing sources, `csrc_count` entries
    pub csrc: ArrayVec<u32, MAX_CSRC_COUNT>,
    /// Profile-defined extension id
    pub extension_header_id: u16,
    /// Extension body length in bytes
    pub extension_header_length: u16,
    /// Extension body, only meaningful when `extension` is set
    pub extension_header: ArrayVec<u8, MAX_PACKET_LENGTH>,
    /// Payload length in bytes
    pub payload_length: usize,
    /// Payload data (raw PCM for AES67)
    pub payload: ArrayVec<u8, MAX_PACKET_LENGTH>,
}

impl Default for RtpPacket {
    fn default() -> Self {
        Self {
            version: RTP_VERSION,
            padding: false,
            extension: false,
            csrc_count: 0,
            marker: false,
            payload_type: 0,
            sequence_number: 0,
            timestamp: 0,
            ssrc: 0,
            csrc: ArrayVec::new(),
            extension_header_id: 0,
            extension_header_length: 0,
            extension_header: ArrayVec::new(),
            payload_length: 0,
            payload: ArrayVec::new(),
        }
    }
}

impl RtpPacket {
    /// Create an empty version 2 packet
    #[must_use]
    pub fn new(payload_type: u8, sequence_number: u16, timestamp: u32, ssrc: u32) -> Self {
        Self {
            payload_type: payload_type & 0x7F,
            sequence_number,
            timestamp,
            ssrc,
            ..Self::default()
        }
    }

    /// Set marker bit
    #[must_use]
    pub fn with_marker(mut self, marker: bool) -> Self {
        self.marker = marker;
        self
    }

    /// Replace the payload, keeping `payload_length` in step
    ///
    /// # Errors
    ///
    /// Returns `RtpDecodeError::PayloadTooLarge` if the data does not fit in one packet.
    pub fn set_payload(&mut self, data: &[u8]) -> Result<(), RtpDecodeError> {
        copy_bounded(&mut self.payload, data, "payload")?;
        self.payload_length = data.len();
        Ok(())
    }

    /// Replace the CSRC list, keeping `csrc_count` in step
    ///
    /// # Errors
    ///
    /// Returns `RtpDecodeError::InvalidCsrcCount` for more than 15 identifiers.
    pub fn set_csrc(&mut self, csrc: &[u32]) -> Result<(), RtpDecodeError> {
        let count = u8::try_from(csrc.len()).unwrap_or(u8::MAX);
        if csrc.len() > MAX_CSRC_COUNT {
            return Err(RtpDecodeError::InvalidCsrcCount(count));
        }
        self.csrc.clear();
        self.csrc.extend(csrc.iter().copied());
        self.csrc_count = count;
        Ok(())
    }

    /// Attach a header extension and set the extension flag
    ///
    /// # Errors
    ///
    /// Returns `RtpDecodeError::PayloadTooLarge` if the body does not fit in one packet.
    pub fn set_extension(&mut self, id: u16, body: &[u8]) -> Result<(), RtpDecodeError> {
        let length = u16::try_from(body.len()).map_err(|_| RtpDecodeError::PayloadTooLarge {
            field: "extension header",
            len: body.len(),
            max: MAX_PACKET_LENGTH,
        })?;
        copy_bounded(&mut self.extension_header, body, "extension header")?;
        self.extension = true;
        self.extension_header_id = id;
        self.extension_header_length = length;
        Ok(())
    }

    /// Payload bytes
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Number of bytes this packet occupies on the wire
    ///
    /// Computed from the declared counts, so it is also the size `encode`
    /// validates output buffers against.
    #[must_use]
    pub fn byte_count(&self) -> usize {
        let mut size =
            HEADER_SIZE + 4 * usize::from(self.csrc_count) + self.payload_length;
        if self.extension {
            size += EXTENSION_PREAMBLE_SIZE + usize::from(self.extension_header_length);
        }
        size
    }

    /// Decode a packet from bytes
    ///
    /// # Errors
    ///
    /// Returns `RtpDecodeError` if the buffer is truncated or the header is invalid.
    pub fn decode(buf: &[u8]) -> Result<Self, RtpDecodeError> {
        let mut packet = Self::default();
        packet.decode_from(buf)?;
        Ok(packet)
    }

    /// Decode into this packet, reusing its storage
    ///
    /// On error the packet contents are unspecified and must not be used.
    ///
    /// # Errors
    ///
    /// Returns `RtpDecodeError` if the buffer is truncated or the header is invalid.
    pub fn decode_from(&mut self, buf: &[u8]) -> Result<(), RtpDecodeError> {
        if buf.len() <= HEADER_SIZE {
            return Err(RtpDecodeError::TooShort { len: buf.len() });
        }

        let version = (buf[0] >> 6) & 0x03;
        if version != RTP_VERSION {
            return Err(RtpDecodeError::UnsupportedVersion(version));
        }

        let mut cursor = buf;

        // Byte 0: V(2) | P(1) | X(1) | CC(4)
        let first = cursor.get_u8();
        self.version = version;
        self.padding = (first >> 5) & 0x01 != 0;
        self.extension = (first >> 4) & 0x01 != 0;
        self.csrc_count = first & 0x0F;

        // Byte 1: M(1) | PT(7)
        let second = cursor.get_u8();
        self.marker = (second >> 7) & 0x01 != 0;
        self.payload_type = second & 0x7F;

        self.sequence_number = cursor.get_u16();
        self.timestamp = cursor.get_u32();
        self.ssrc = cursor.get_u32();

        if usize::from(self.csrc_count) > MAX_CSRC_COUNT {
            return Err(RtpDecodeError::InvalidCsrcCount(self.csrc_count));
        }

        self.csrc.clear();
        if self.csrc_count > 0 {
            let needed = usize::from(self.csrc_count) * 4;
            ensure_remaining(cursor, needed, "CSRC list")?;
            for _ in 0..self.csrc_count {
                self.csrc.push(cursor.get_u32());
            }
        }

        self.extension_header.clear();
        if self.extension {
            ensure_remaining(cursor, EXTENSION_PREAMBLE_SIZE, "extension preamble")?;
            self.extension_header_id = cursor.get_u16();
            self.extension_header_length = cursor.get_u16();

            let len = usize::from(self.extension_header_length);
            ensure_remaining(cursor, len, "extension header")?;
            copy_bounded(&mut self.extension_header, &cursor[..len], "extension header")?;
            cursor.advance(len);
        } else {
            self.extension_header_id = 0;
            self.extension_header_length = 0;
        }

        copy_bounded(&mut self.payload, cursor, "payload")?;
        self.payload_length = cursor.len();

        Ok(())
    }

    fn validate_for_encode(&self) -> Result<(), RtpEncodeError> {
        if self.version != RTP_VERSION {
            return Err(RtpEncodeError::UnsupportedVersion(self.version));
        }
        if usize::from(self.csrc_count) > MAX_CSRC_COUNT {
            return Err(RtpEncodeError::InvalidCsrcCount(self.csrc_count));
        }
        if usize::from(self.csrc_count) != self.csrc.len() {
            return Err(RtpEncodeError::CsrcCountMismatch {
                declared: self.csrc_count,
                actual: self.csrc.len(),
            });
        }
        if self.extension && usize::from(self.extension_header_length) != self.extension_header.len()
        {
            return Err(RtpEncodeError::ExtensionLengthMismatch {
                declared: self.extension_header_length,
                actual: self.extension_header.len(),
            });
        }
        if self.payload_length > 0 && self.payload.is_empty() {
            return Err(RtpEncodeError::NullPayload(self.payload_length));
        }
        if self.payload_length != self.payload.len() {
            return Err(RtpEncodeError::PayloadLengthMismatch {
                declared: self.payload_length,
                actual: self.payload.len(),
            });
        }
        Ok(())
    }

    fn write_to<B: BufMut>(&self, buf: &mut B) {
        // Byte 0: V(2) | P(1) | X(1) | CC(4)
        buf.put_u8(
            (self.version << 6)
                | (u8::from(self.padding) << 5)
                | (u8::from(self.extension) << 4)
                | (self.csrc_count & 0x0F),
        );

        // Byte 1: M(1) | PT(7)
        buf.put_u8((u8::from(self.marker) << 7) | (self.payload_type & 0x7F));

        buf.put_u16(self.sequence_number);
        buf.put_u32(self.timestamp);
        buf.put_u32(self.ssrc);

        for csrc in &self.csrc {
            buf.put_u32(*csrc);
        }

        if self.extension {
            buf.put_u16(self.extension_header_id);
            buf.put_u16(self.extension_header_length);
            buf.put_slice(&self.extension_header);
        }

        buf.put_slice(&self.payload);
    }

    /// Encode into a caller-supplied buffer, returning the number of bytes written
    ///
    /// # Errors
    ///
    /// Returns `RtpEncodeError` if the packet is inconsistent or `out` is smaller than
    /// [`byte_count`](Self::byte_count).
    pub fn encode_into(&self, out: &mut [u8]) -> Result<usize, RtpEncodeError> {
        self.validate_for_encode()?;

        let size = self.byte_count();
        if out.len() < size {
            return Err(RtpEncodeError::BufferTooSmall {
                needed: size,
                have: out.len(),
            });
        }

        let mut target = &mut out[..size];
        self.write_to(&mut target);
        Ok(size)
    }

    /// Encode packet to bytes
    ///
    /// # Errors
    ///
    /// Returns `RtpEncodeError` if the declared counts disagree with the stored data.
    pub fn encode(&self) -> Result<Bytes, RtpEncodeError> {
        self.validate_for_encode()?;

        let mut buf = BytesMut::with_capacity(self.byte_count());
        self.write_to(&mut buf);
        Ok(buf.freeze())
    }
}

fn ensure_remaining(cursor: &[u8], needed: usize, field: &'static str) -> Result<(), RtpDecodeError> {
    if cursor.len() < needed {
        return Err(RtpDecodeError::BufferTooShort {
            field,
            needed,
            have: cursor.len(),
        });
    }
    Ok(())
}

/// Replace `dst` with `src`, reusing the existing storage
fn copy_bounded<const N: usize>(
    dst: &mut ArrayVec<u8, N>,
    src: &[u8],
    field: &'static str,
) -> Result<(), RtpDecodeError> {
    dst.clear();
    dst.try_extend_from_slice(src)
        .map_err(|_| RtpDecodeError::PayloadTooLarge {
            field,
            len: src.len(),
            max: N,
        })
}
