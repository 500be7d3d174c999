use std::io;

use crate::error::Aes67Error;
use crate::receiver::config::ReceiverConfig;
use crate::receiver::socket::*;

fn bind_message(config: &ReceiverConfig) -> String {
    match MulticastBinder.bind(config) {
        Err(Aes67Error::BindFailed { group, message, .. }) => {
            assert_eq!(group, config.multicast_group);
            message
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("bind unexpectedly succeeded"),
    }
}

#[test]
fn test_unparseable_group() {
    let message = bind_message(&ReceiverConfig::new("not-an-address"));
    assert!(message.contains("invalid group address"));
}

#[test]
fn test_unicast_group_rejected() {
    let message = bind_message(&ReceiverConfig::new("10.1.2.3"));
    assert!(message.contains("multicast"));
}

#[test]
fn test_invalid_interface() {
    let message = bind_message(&ReceiverConfig::new("239.69.0.1").interface("eth0"));
    assert!(message.contains("invalid interface address eth0"));
}

#[test]
fn test_timeout_classification() {
    assert!(is_timeout(&io::ErrorKind::WouldBlock.into()));
    assert!(is_timeout(&io::ErrorKind::TimedOut.into()));
    assert!(!is_timeout(&io::ErrorKind::ConnectionRefused.into()));
}
