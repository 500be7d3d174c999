//! Multicast socket setup
//!
//! The receive loop reads through [`DatagramSocket`] and obtains it from a
//! [`SocketBinder`], so the transport can be swapped out in tests.

use std::io;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

use socket2::{Domain, Protocol, Socket, Type};

use super::config::ReceiverConfig;
use crate::error::{Aes67Error, Result};

/// A bound datagram source
///
/// `recv` must honour a read timeout so the loop can observe a stop request;
/// timeouts are reported as `WouldBlock` or `TimedOut`.
pub trait DatagramSocket: Send {
    /// Receive one datagram into `buf`, returning its length
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error, including timeouts.
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

impl DatagramSocket for UdpSocket {
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        UdpSocket::recv(self, buf)
    }
}

/// Creates the socket for a session
pub trait SocketBinder: Send + Sync {
    /// Bind a socket for `config`
    ///
    /// # Errors
    ///
    /// Returns `Aes67Error::BindFailed` when the socket cannot be set up.
    fn bind(&self, config: &ReceiverConfig) -> Result<Box<dyn DatagramSocket>>;
}

/// Binds a UDP socket and joins the configured IPv4 multicast group
#[derive(Debug, Clone, Copy, Default)]
pub struct MulticastBinder;

impl MulticastBinder {
    fn open(group: Ipv4Addr, interface: Ipv4Addr, config: &ReceiverConfig) -> io::Result<UdpSocket> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;

        // Several receivers on one host may listen to the same group
        socket.set_reuse_address(true)?;

        // Binding to the group filters out unicast traffic to the same port;
        // Windows only accepts local addresses here.
        #[cfg(unix)]
        let bind_ip = group;
        #[cfg(not(unix))]
        let bind_ip = Ipv4Addr::UNSPECIFIED;

        socket.bind(&SocketAddrV4::new(bind_ip, config.port).into())?;
        socket.join_multicast_v4(&group, &interface)?;
        socket.set_read_timeout(Some(config.receive_timeout))?;

        Ok(socket.into())
    }
}

impl SocketBinder for MulticastBinder {
    fn bind(&self, config: &ReceiverConfig) -> Result<Box<dyn DatagramSocket>> {
        let group_str = config.multicast_group.trim();

        let group: Ipv4Addr = group_str
            .parse()
            .map_err(|e| bind_failed(config, format!("invalid group address: {e}"), None))?;
        if !group.is_multicast() {
            return Err(bind_failed(
                config,
                "not an IPv4 multicast address".to_string(),
                None,
            ));
        }

        let interface = match config.interface_addr() {
            Some(addr) => addr.parse().map_err(|e| {
                bind_failed(config, format!("invalid interface address {addr}: {e}"), None)
            })?,
            None => Ipv4Addr::UNSPECIFIED,
        };

        let socket = Self::open(group, interface, config)
            .map_err(|e| bind_failed(config, e.to_string(), Some(e)))?;

        tracing::debug!(
            "Joined {}:{} on interface {}",
            group,
            config.port,
            interface
        );

        Ok(Box::new(socket))
    }
}

pub(crate) fn bind_failed(
    config: &ReceiverConfig,
    message: String,
    source: Option<io::Error>,
) -> Aes67Error {
    Aes67Error::BindFailed {
        group: config.multicast_group.clone(),
        message,
        source,
    }
}

/// Whether an error from [`DatagramSocket::recv`] is a read timeout
#[must_use]
pub fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}
