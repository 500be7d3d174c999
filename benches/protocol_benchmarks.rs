use aes67::protocol::rtp::constants::DEFAULT_PAYLOAD_TYPE;
use aes67::{RtpPacket, RtpPacketizer};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn rtp_benchmark(c: &mut Criterion) {
    // 1 ms of 48 kHz 7.1 L24
    let mut packet = RtpPacket::new(DEFAULT_PAYLOAD_TYPE, 1, 48_000, 0x1234_5678);
    packet.set_payload(&vec![0x5A; 48 * 8 * 3]).unwrap();
    let encoded = packet.encode().unwrap();

    c.bench_function("rtp_decode", |b| {
        b.iter(|| RtpPacket::decode(black_box(&encoded)).unwrap())
    });

    let mut scratch = RtpPacket::default();
    c.bench_function("rtp_decode_reuse", |b| {
        b.iter(|| scratch.decode_from(black_box(&encoded)).unwrap())
    });

    c.bench_function("rtp_encode", |b| b.iter(|| black_box(&packet).encode().unwrap()));

    let mut out = vec![0u8; packet.byte_count()];
    c.bench_function("rtp_encode_into", |b| {
        b.iter(|| black_box(&packet).encode_into(&mut out).unwrap())
    });

    let pcm = vec![0u8; 4800 * 6];
    let mut packetizer = RtpPacketizer::new(1, DEFAULT_PAYLOAD_TYPE, 6);
    c.bench_function("rtp_packetize_100ms", |b| {
        b.iter(|| packetizer.packetize(black_box(&pcm)).unwrap())
    });
}

criterion_group!(benches, rtp_benchmark);
criterion_main!(benches);
