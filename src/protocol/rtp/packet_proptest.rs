use super::constants::HEADER_SIZE;
use super::*;
use proptest::prelude::*;

prop_compose! {
    fn arb_packet()(
        padding in any::<bool>(),
        marker in any::<bool>(),
        payload_type in 0u8..128,
        sequence in any::<u16>(),
        timestamp in any::<u32>(),
        ssrc in any::<u32>(),
        csrc in proptest::collection::vec(any::<u32>(), 0..=15),
        extension in proptest::option::of((any::<u16>(), proptest::collection::vec(any::<u8>(), 0..64))),
        payload in proptest::collection::vec(any::<u8>(), 0..512),
    ) -> RtpPacket {
        let mut packet = RtpPacket::new(payload_type, sequence, timestamp, ssrc).with_marker(marker);
        packet.padding = padding;
        packet.set_csrc(&csrc).unwrap();
        if let Some((id, body)) = extension {
            packet.set_extension(id, &body).unwrap();
        }
        packet.set_payload(&payload).unwrap();
        packet
    }
}

proptest! {
    #[test]
    fn test_encode_decode_roundtrip(packet in arb_packet()) {
        // A bare header with no payload is rejected as too short
        prop_assume!(packet.byte_count() > HEADER_SIZE);

        let encoded = packet.encode().unwrap();
        let decoded = RtpPacket::decode(&encoded).unwrap();
        prop_assert_eq!(decoded, packet);
    }

    #[test]
    fn test_byte_count_matches_encoded_length(packet in arb_packet()) {
        let encoded = packet.encode().unwrap();
        prop_assert_eq!(packet.byte_count(), encoded.len());

        let mut out = vec![0u8; packet.byte_count()];
        prop_assert_eq!(packet.encode_into(&mut out).unwrap(), encoded.len());
        prop_assert_eq!(&out[..], &encoded[..]);
    }

    // Every cut point either fails cleanly or yields the shortened payload
    #[test]
    fn test_truncation_at_every_cut_point(packet in arb_packet()) {
        let encoded = packet.encode().unwrap();
        let header_len = packet.byte_count() - packet.payload_length;

        for cut in 0..encoded.len() {
            let result = RtpPacket::decode(&encoded[..cut]);
            if cut <= HEADER_SIZE {
                prop_assert_eq!(result, Err(RtpDecodeError::TooShort { len: cut }));
            } else if cut < header_len {
                let is_buffer_too_short = matches!(result, Err(RtpDecodeError::BufferTooShort { .. }));
                prop_assert!(is_buffer_too_short);
            } else {
                let decoded = result.unwrap();
                prop_assert_eq!(decoded.payload_length, cut - header_len);
                prop_assert_eq!(decoded.payload(), &packet.payload()[..cut - header_len]);
            }
        }
    }

    #[test]
    fn test_wrong_version_rejected(
        version in prop_oneof![Just(0u8), Just(1u8), Just(3u8)],
        low_bits in 0u8..64,
        rest in proptest::collection::vec(any::<u8>(), 12..64),
    ) {
        let mut buf = vec![(version << 6) | low_bits];
        buf.extend_from_slice(&rest);

        prop_assert_eq!(
            RtpPacket::decode(&buf),
            Err(RtpDecodeError::UnsupportedVersion(version))
        );
    }

    // Garbage on the wire must never panic
    #[test]
    fn test_decode_random_garbage(garbage in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let mut packet = RtpPacket::default();
        let _ = packet.decode_from(&garbage);
    }
}
