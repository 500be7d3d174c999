use aes67::audio::{SampleConverter, SampleFormat, SampleRate, SpeakerLayout, StreamFormat};
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn benchmark_convert(c: &mut Criterion) {
    // 1 ms of 48 kHz stereo
    let frames = 48;

    let mut l24 = SampleConverter::new(StreamFormat::new(
        SampleFormat::L24,
        SampleRate::Hz48000,
        SpeakerLayout::Stereo,
    ));
    let payload_l24 = vec![0x7Fu8; frames * 2 * 3];
    c.bench_function("convert_l24_stereo", |b| {
        b.iter(|| l24.convert(black_box(&payload_l24), 0).unwrap().frames)
    });

    let mut l16 = SampleConverter::new(StreamFormat::new(
        SampleFormat::L16,
        SampleRate::Hz48000,
        SpeakerLayout::Stereo,
    ));
    let payload_l16 = vec![0x7Fu8; frames * 2 * 2];
    c.bench_function("convert_l16_stereo", |b| {
        b.iter(|| l16.convert(black_box(&payload_l16), 0).unwrap().frames)
    });

    // Largest packet the MTU allows for 7.1 L24
    let mut surround = SampleConverter::new(StreamFormat::new(
        SampleFormat::L24,
        SampleRate::Hz48000,
        SpeakerLayout::Surround71,
    ));
    let payload_surround = vec![0x01u8; 59 * 8 * 3];
    c.bench_function("convert_l24_surround", |b| {
        b.iter(|| surround.convert(black_box(&payload_surround), 0).unwrap().frames)
    });
}

criterion_group!(benches, benchmark_convert);
criterion_main!(benches);
