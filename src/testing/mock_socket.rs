//! Scripted socket and binder
//!
//! Tests push datagrams (or errors) into a [`ScriptedFeed`]; the receive
//! loop reads them through a [`ScriptedSocket`] handed out by a
//! [`ScriptedBinder`]. An empty feed behaves like a read timeout.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::Duration;

use crate::error::Result;
use crate::receiver::socket::bind_failed;
use crate::receiver::{DatagramSocket, ReceiverConfig, SocketBinder};

#[derive(Debug)]
enum Scripted {
    Datagram(Vec<u8>),
    Error(io::ErrorKind),
}

#[derive(Debug, Default)]
struct FeedState {
    queue: Mutex<VecDeque<Scripted>>,
    ready: Condvar,
    sockets_open: AtomicUsize,
    consumed: AtomicUsize,
}

/// Shared queue feeding every socket a [`ScriptedBinder`] creates
#[derive(Debug, Clone, Default)]
pub struct ScriptedFeed {
    state: Arc<FeedState>,
}

impl ScriptedFeed {
    /// Create an empty feed
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a datagram
    pub fn push(&self, datagram: impl Into<Vec<u8>>) {
        self.enqueue(Scripted::Datagram(datagram.into()));
    }

    /// Queue a socket error
    pub fn push_error(&self, kind: io::ErrorKind) {
        self.enqueue(Scripted::Error(kind));
    }

    fn enqueue(&self, item: Scripted) {
        self.state
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(item);
        self.state.ready.notify_all();
    }

    /// Items still waiting to be read
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state
            .queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Items read so far
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.state.consumed.load(Ordering::SeqCst)
    }

    /// Sockets created from this feed that have not been dropped
    #[must_use]
    pub fn open_sockets(&self) -> usize {
        self.state.sockets_open.load(Ordering::SeqCst)
    }
}

/// In-memory [`DatagramSocket`]
#[derive(Debug)]
pub struct ScriptedSocket {
    feed: ScriptedFeed,
    timeout: Duration,
}

impl ScriptedSocket {
    /// Create a socket reading from `feed`
    #[must_use]
    pub fn new(feed: ScriptedFeed, timeout: Duration) -> Self {
        feed.state.sockets_open.fetch_add(1, Ordering::SeqCst);
        Self { feed, timeout }
    }
}

impl DatagramSocket for ScriptedSocket {
    fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let state = &self.feed.state;
        let queue = state.queue.lock().unwrap_or_else(PoisonError::into_inner);
        let (mut queue, _) = state
            .ready
            .wait_timeout_while(queue, self.timeout, |q| q.is_empty())
            .unwrap_or_else(PoisonError::into_inner);

        let Some(item) = queue.pop_front() else {
            return Err(io::ErrorKind::WouldBlock.into());
        };
        state.consumed.fetch_add(1, Ordering::SeqCst);

        match item {
            Scripted::Datagram(data) => {
                // Truncate like a real datagram socket
                let len = data.len().min(buf.len());
                buf[..len].copy_from_slice(&data[..len]);
                Ok(len)
            }
            Scripted::Error(kind) => Err(kind.into()),
        }
    }
}

impl Drop for ScriptedSocket {
    fn drop(&mut self) {
        self.feed.state.sockets_open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// [`SocketBinder`] producing [`ScriptedSocket`]s
#[derive(Debug, Default)]
pub struct ScriptedBinder {
    feed: ScriptedFeed,
    fail: AtomicBool,
    binds: AtomicUsize,
    last_config: Mutex<Option<ReceiverConfig>>,
}

impl ScriptedBinder {
    /// Create a binder whose sockets read from `feed`
    #[must_use]
    pub fn new(feed: ScriptedFeed) -> Self {
        Self {
            feed,
            ..Self::default()
        }
    }

    /// Make subsequent binds fail (or succeed again)
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of successful binds
    #[must_use]
    pub fn bind_count(&self) -> usize {
        self.binds.load(Ordering::SeqCst)
    }

    /// Configuration passed to the most recent bind
    #[must_use]
    pub fn last_config(&self) -> Option<ReceiverConfig> {
        self.last_config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SocketBinder for ScriptedBinder {
    fn bind(&self, config: &ReceiverConfig) -> Result<Box<dyn DatagramSocket>> {
        *self
            .last_config
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(config.clone());

        if self.fail.load(Ordering::SeqCst) {
            return Err(bind_failed(
                config,
                "scripted bind failure".to_string(),
                Some(io::ErrorKind::AddrNotAvailable.into()),
            ));
        }

        self.binds.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSocket::new(
            self.feed.clone(),
            config.receive_timeout,
        )))
    }
}
