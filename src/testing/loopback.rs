//! Loopback transport for integration tests
//!
//! Binds a unicast UDP socket on 127.0.0.1 with an OS-assigned port, so
//! tests can send real datagrams without multicast routing.

use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::sync::{Mutex, PoisonError};

use crate::error::Result;
use crate::receiver::socket::bind_failed;
use crate::receiver::{DatagramSocket, ReceiverConfig, SocketBinder};

/// Hands out one pre-bound loopback socket
///
/// The configured group and port are ignored. A second bind fails with
/// `BindFailed` until [`rebind`](Self::rebind) is called.
#[derive(Debug)]
pub struct LoopbackBinder {
    addr: Mutex<SocketAddr>,
    socket: Mutex<Option<UdpSocket>>,
}

impl LoopbackBinder {
    /// Bind a fresh loopback socket
    ///
    /// # Errors
    ///
    /// Returns the I/O error if no socket can be bound.
    pub fn new() -> io::Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0))?;
        Ok(Self {
            addr: Mutex::new(socket.local_addr()?),
            socket: Mutex::new(Some(socket)),
        })
    }

    /// Address to send datagrams to
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        *self.addr.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Bind a new socket for the next session start
    ///
    /// # Errors
    ///
    /// Returns the I/O error if no socket can be bound.
    pub fn rebind(&self) -> io::Result<SocketAddr> {
        let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0))?;
        let addr = socket.local_addr()?;
        *self.addr.lock().unwrap_or_else(PoisonError::into_inner) = addr;
        *self.socket.lock().unwrap_or_else(PoisonError::into_inner) = Some(socket);
        Ok(addr)
    }
}

impl SocketBinder for LoopbackBinder {
    fn bind(&self, config: &ReceiverConfig) -> Result<Box<dyn DatagramSocket>> {
        let socket = self
            .socket
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| bind_failed(config, "loopback socket already taken".to_string(), None))?;

        socket
            .set_read_timeout(Some(config.receive_timeout))
            .map_err(|e| bind_failed(config, e.to_string(), Some(e)))?;

        Ok(Box::new(socket))
    }
}
