use std::io::Write;
use std::time::Duration;

use crate::audio::{SampleFormat, SampleRate, SpeakerLayout};
use crate::error::Aes67Error;
use crate::receiver::config::*;

#[test]
fn test_defaults() {
    let config = ReceiverConfig::default();

    assert!(config.multicast_group.is_empty());
    assert!(!config.has_group());
    assert_eq!(config.multicast_interface, None);
    assert_eq!(config.sample_rate, SampleRate::Hz48000);
    assert_eq!(config.speaker_layout, SpeakerLayout::Stereo);
    assert_eq!(config.sample_format, SampleFormat::L24);
    assert_eq!(config.port, 5004);
    assert_eq!(config.receive_timeout, Duration::from_millis(5));
    assert!(config.validate().is_ok());
}

#[test]
fn test_builder() {
    let config = ReceiverConfig::new("239.69.1.2")
        .interface("192.168.1.10")
        .sample_rate(SampleRate::Hz96000)
        .speaker_layout(SpeakerLayout::Surround71)
        .sample_format(SampleFormat::L16)
        .port(5006)
        .receive_timeout(Duration::from_millis(2));

    assert!(config.has_group());
    assert_eq!(config.interface_addr(), Some("192.168.1.10"));
    assert_eq!(config.port, 5006);

    let format = config.stream_format();
    assert_eq!(format.sample_format, SampleFormat::L16);
    assert_eq!(format.sample_rate, SampleRate::Hz96000);
    assert_eq!(format.bytes_per_frame(), 16);
}

#[test]
fn test_blank_interface_means_any() {
    let config = ReceiverConfig::new("239.69.1.2").interface("  ");
    assert_eq!(config.interface_addr(), None);
}

#[test]
fn test_from_json_partial() {
    let config = ReceiverConfig::from_json(
        r#"{ "multicast_group": "239.1.2.3", "sample_format": "L16", "speaker_layout": "mono" }"#,
    )
    .unwrap();

    assert_eq!(config.multicast_group, "239.1.2.3");
    assert_eq!(config.sample_format, SampleFormat::L16);
    assert_eq!(config.speaker_layout, SpeakerLayout::Mono);
    assert_eq!(config.sample_rate, SampleRate::Hz48000);
    assert_eq!(config.port, 5004);
    assert_eq!(config.receive_timeout, DEFAULT_RECEIVE_TIMEOUT);
}

#[test]
fn test_from_json_rejects_unknown_rate() {
    let err = ReceiverConfig::from_json(r#"{ "sample_rate": 22050 }"#).unwrap_err();
    assert!(matches!(err, Aes67Error::Config(_)));
    assert!(err.is_configuration_error());
}

#[test]
fn test_l32_parses_but_fails_validation() {
    let config = ReceiverConfig::from_json(r#"{ "sample_format": "L32" }"#).unwrap();

    let err = config.validate().unwrap_err();
    assert!(matches!(
        err,
        Aes67Error::UnsupportedSampleFormat { ref format } if format == "L32"
    ));
}

#[test]
fn test_zero_timeout_invalid() {
    let config = ReceiverConfig::default().receive_timeout(Duration::ZERO);
    assert!(matches!(
        config.validate(),
        Err(Aes67Error::InvalidConfig { ref field, .. }) if field == "receive_timeout"
    ));
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "multicast_group": "239.69.0.7", "multicast_interface": "10.0.0.2", "sample_rate": 44100 }}"#
    )
    .unwrap();

    let config = ReceiverConfig::from_file(file.path()).unwrap();
    assert_eq!(config.multicast_group, "239.69.0.7");
    assert_eq!(config.interface_addr(), Some("10.0.0.2"));
    assert_eq!(config.sample_rate, SampleRate::Hz44100);
}

#[test]
fn test_from_missing_file() {
    let err = ReceiverConfig::from_file("/nonexistent/aes67.json").unwrap_err();
    assert!(matches!(err, Aes67Error::Io(_)));
}

#[test]
fn test_json_roundtrip_keeps_timeout_default() {
    let config = ReceiverConfig::new("239.69.0.1")
        .receive_timeout(Duration::from_millis(20));

    let json = serde_json::to_string(&config).unwrap();
    let parsed = ReceiverConfig::from_json(&json).unwrap();

    assert_eq!(parsed.multicast_group, config.multicast_group);
    assert_eq!(parsed.receive_timeout, DEFAULT_RECEIVE_TIMEOUT);
}
