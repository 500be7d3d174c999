//! Send a 1 kHz L24 stereo test tone to a multicast group
//!
//! Usage: `cargo run --example send_tone -- [group] [seconds]`

use std::f64::consts::TAU;
use std::net::{Ipv4Addr, UdpSocket};
use std::thread;
use std::time::{Duration, Instant};

use aes67::audio::{SampleFormat, SampleRate, SpeakerLayout, StreamFormat};
use aes67::protocol::rtp::constants::{AES67_PORT, DEFAULT_PAYLOAD_TYPE};
use aes67::RtpPacketizer;

const TONE_HZ: f64 = 1000.0;
const AMPLITUDE: f64 = 0.25 * 8_388_607.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let group: Ipv4Addr = args
        .next()
        .unwrap_or_else(|| "239.69.83.133".to_string())
        .parse()?;
    let seconds: u64 = args.next().map_or(Ok(10), |s| s.parse())?;

    let format = StreamFormat::new(SampleFormat::L24, SampleRate::Hz48000, SpeakerLayout::Stereo);
    let rate = format.sample_rate.as_u32();
    let mut packetizer =
        RtpPacketizer::new(rand_ssrc(), DEFAULT_PAYLOAD_TYPE, format.bytes_per_frame());
    let frames_per_packet = packetizer.frames_per_packet();
    let packet_time = format.frames_to_duration(frames_per_packet);

    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
    socket.set_multicast_ttl_v4(16)?;
    socket.connect((group, AES67_PORT))?;

    println!("Sending {TONE_HZ} Hz to {group}:{AES67_PORT} for {seconds}s");

    let start = Instant::now();
    let mut frame_index: u64 = 0;
    let mut pcm = Vec::with_capacity(frames_per_packet * format.bytes_per_frame());

    while start.elapsed() < Duration::from_secs(seconds) {
        pcm.clear();
        for _ in 0..frames_per_packet {
            #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
            let sample = ((frame_index as f64 * TAU * TONE_HZ / f64::from(rate)).sin() * AMPLITUDE)
                as i32;
            let [_, b1, b2, b3] = sample.to_be_bytes();
            pcm.extend_from_slice(&[b1, b2, b3, b1, b2, b3]);
            frame_index += 1;
        }

        let packet = packetizer.encode_audio(&pcm)?;
        socket.send(&packet)?;

        // Pace against the wall clock so drift does not accumulate
        let due = packet_time * u32::try_from(frame_index / frames_per_packet as u64)?;
        if let Some(wait) = due.checked_sub(start.elapsed()) {
            thread::sleep(wait);
        }
    }

    Ok(())
}

fn rand_ssrc() -> u32 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0x4145_5336, |d| d.subsec_nanos())
}
