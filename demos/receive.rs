//! Receive an AES67 multicast stream and print per-second levels
//!
//! Usage: `cargo run --example receive -- <group> [interface] [config.json]`

use std::sync::Arc;
use std::time::{Duration, Instant};

use aes67::audio::ChannelSink;
use aes67::{ReceiverConfig, ReceiverSession};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let group = args.next().unwrap_or_else(|| "239.69.83.133".to_string());
    let interface = args.next();

    let mut config = match args.next() {
        Some(path) => ReceiverConfig::from_file(path)?,
        None => ReceiverConfig::default(),
    };
    config.multicast_group = group;
    if let Some(interface) = interface {
        config = config.interface(interface);
    }

    println!(
        "Listening on {}:{} ({} {} {})",
        config.multicast_group,
        config.port,
        config.sample_format,
        config.sample_rate,
        config.speaker_layout
    );

    let (sink, frames) = ChannelSink::new(256);
    let mut session = ReceiverSession::new(config, Arc::new(sink));
    session.start()?;

    let mut window_start = Instant::now();
    let mut peak = 0i64;
    let mut count = 0usize;

    loop {
        match frames.recv_timeout(Duration::from_secs(1)) {
            Ok(frame) => {
                count += frame.frames;
                let frame = frame.as_frame();
                for channel in 0..usize::from(frame.layout.channels()) {
                    for sample in frame.channel(channel) {
                        peak = peak.max(i64::from(sample).abs());
                    }
                }
            }
            Err(_) => {
                if let Some(err) = session.poll() {
                    eprintln!("Receiver stopped: {err}");
                    break;
                }
            }
        }

        if window_start.elapsed() >= Duration::from_secs(1) {
            let stats = session.stats();
            println!(
                "{count} frames, peak {peak}, {} packets ({} malformed, {} lost)",
                stats.packets_received, stats.malformed_packets, stats.packets_lost
            );
            window_start = Instant::now();
            peak = 0;
            count = 0;
        }
    }

    session.stop();
    Ok(())
}
