use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use crate::audio::{OwnedSamples, SampleFormat, SampleRate, SpeakerLayout, StreamFormat};
use crate::error::Aes67Error;
use crate::receiver::rtp_receiver::*;
use crate::receiver::stats::ReceiverStats;
use crate::testing::{RecordingSink, ScriptedFeed, ScriptedSocket, l16_payload, rtp_datagram};

const TICK: Duration = Duration::from_millis(1);
const WAIT: Duration = Duration::from_secs(5);

struct Harness {
    feed: ScriptedFeed,
    sink: Arc<RecordingSink>,
    running: Arc<AtomicBool>,
    stats: Arc<ReceiverStats>,
    handle: thread::JoinHandle<crate::error::Result<()>>,
}

fn spawn_loop(format: StreamFormat) -> Harness {
    let feed = ScriptedFeed::new();
    let sink = Arc::new(RecordingSink::new());
    let running = Arc::new(AtomicBool::new(true));
    let stats = Arc::new(ReceiverStats::new());

    let receive_loop = RtpReceiveLoop::new(
        Box::new(ScriptedSocket::new(feed.clone(), TICK)),
        format,
        sink.clone(),
        running.clone(),
        stats.clone(),
        TICK,
    );
    let handle = thread::spawn(move || receive_loop.run());

    Harness {
        feed,
        sink,
        running,
        stats,
        handle,
    }
}

fn mono_l16() -> StreamFormat {
    StreamFormat::new(SampleFormat::L16, SampleRate::Hz48000, SpeakerLayout::Mono)
}

#[test]
fn test_delivers_frames_in_order() {
    let h = spawn_loop(mono_l16());

    for seq in 0..3u16 {
        let payload = l16_payload(&[i16::try_from(seq).unwrap(); 4]);
        h.feed.push(rtp_datagram(seq, u32::from(seq) * 4, 1, &payload));
    }

    assert!(h.sink.wait_for(3, WAIT));
    h.running.store(false, Ordering::Release);
    h.handle.join().unwrap().unwrap();

    assert_eq!(h.sink.timestamps(), vec![0, 4, 8]);
    let frames = h.sink.frames();
    assert_eq!(frames[2].samples, OwnedSamples::S16(vec![2; 4]));
    assert_eq!(frames[2].sample_rate, SampleRate::Hz48000);

    let stats = h.stats.snapshot();
    assert_eq!(stats.packets_received, 3);
    assert_eq!(stats.frames_delivered, 3);
    assert_eq!(stats.malformed_packets, 0);
}

#[test]
fn test_malformed_packets_are_dropped() {
    let h = spawn_loop(mono_l16());

    let valid = rtp_datagram(1, 100, 1, &l16_payload(&[1, 2]));
    let mut bad_version = valid.clone();
    bad_version[0] = 0x40;

    h.feed.push(vec![0x80; 12]); // header only
    h.feed.push(bad_version);
    h.feed.push(valid[..10].to_vec());
    h.feed.push(valid);

    assert!(h.sink.wait_for(1, WAIT));
    h.running.store(false, Ordering::Release);
    h.handle.join().unwrap().unwrap();

    assert_eq!(h.sink.timestamps(), vec![100]);
    let stats = h.stats.snapshot();
    assert_eq!(stats.packets_received, 4);
    assert_eq!(stats.malformed_packets, 3);
}

#[test]
fn test_sequence_gaps_counted() {
    let h = spawn_loop(mono_l16());
    let payload = l16_payload(&[0; 2]);

    h.feed.push(rtp_datagram(10, 0, 7, &payload));
    h.feed.push(rtp_datagram(13, 0, 7, &payload));
    h.feed.push(rtp_datagram(0, 0, 8, &payload));

    assert!(h.sink.wait_for(3, WAIT));
    h.running.store(false, Ordering::Release);
    h.handle.join().unwrap().unwrap();

    let stats = h.stats.snapshot();
    assert_eq!(stats.packets_lost, 2);
    assert_eq!(stats.ssrc_changes, 1);
}

#[test]
fn test_socket_errors_do_not_stop_loop() {
    let h = spawn_loop(mono_l16());

    h.feed.push_error(std::io::ErrorKind::ConnectionRefused);
    h.feed.push(rtp_datagram(1, 5, 1, &l16_payload(&[9])));

    assert!(h.sink.wait_for(1, WAIT));
    h.running.store(false, Ordering::Release);
    h.handle.join().unwrap().unwrap();

    assert_eq!(h.stats.snapshot().socket_errors, 1);
}

#[test]
fn test_partial_frame_not_dispatched() {
    let h = spawn_loop(StreamFormat::new(
        SampleFormat::L24,
        SampleRate::Hz48000,
        SpeakerLayout::Stereo,
    ));

    h.feed.push(rtp_datagram(1, 0, 1, &[0; 4]));
    h.feed.push(rtp_datagram(2, 1, 1, &[0; 6]));

    assert!(h.sink.wait_for(1, WAIT));
    h.running.store(false, Ordering::Release);
    h.handle.join().unwrap().unwrap();

    assert_eq!(h.sink.timestamps(), vec![1]);
    assert_eq!(h.stats.snapshot().frames_delivered, 1);
}

#[test]
fn test_unsupported_format_is_fatal() {
    let h = spawn_loop(StreamFormat::new(
        SampleFormat::L32,
        SampleRate::Hz48000,
        SpeakerLayout::Stereo,
    ));

    h.feed.push(rtp_datagram(1, 0, 1, &[0; 8]));
    h.feed.push(rtp_datagram(2, 2, 1, &[0; 8]));

    let result = h.handle.join().unwrap();
    assert!(matches!(
        result,
        Err(Aes67Error::UnsupportedSampleFormat { .. })
    ));
    assert!(!h.running.load(Ordering::Acquire));
    assert!(h.sink.is_empty());
    assert_eq!(h.feed.pending(), 1);
}

#[test]
fn test_exits_when_flag_cleared() {
    let h = spawn_loop(mono_l16());

    h.running.store(false, Ordering::Release);
    h.handle.join().unwrap().unwrap();

    assert_eq!(h.feed.open_sockets(), 0);
}
