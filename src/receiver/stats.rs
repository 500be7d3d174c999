//! Receiver counters shared between the receive thread and its owner

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Lock-free receive statistics
///
/// Written by the receive thread only; read from anywhere via [`snapshot`](Self::snapshot).
#[derive(Debug, Default)]
pub struct ReceiverStats {
    packets_received: AtomicU64,
    bytes_received: AtomicU64,
    malformed_packets: AtomicU64,
    frames_delivered: AtomicU64,
    packets_lost: AtomicU64,
    ssrc_changes: AtomicU64,
    socket_errors: AtomicU64,
}

/// Point-in-time copy of [`ReceiverStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReceiverStatsSnapshot {
    /// Datagrams read from the socket
    pub packets_received: u64,
    /// Bytes read from the socket
    pub bytes_received: u64,
    /// Datagrams dropped because they failed to decode
    pub malformed_packets: u64,
    /// Audio frames handed to the sink
    pub frames_delivered: u64,
    /// Packets missing according to sequence numbers
    pub packets_lost: u64,
    /// Times the stream source changed
    pub ssrc_changes: u64,
    /// Socket errors other than read timeouts
    pub socket_errors: u64,
}

impl ReceiverStats {
    /// Create zeroed counters
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_datagram(&self, len: usize) {
        self.packets_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_received
            .fetch_add(len as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_malformed(&self) {
        self.malformed_packets.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_delivered(&self) {
        self.frames_delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_lost(&self, count: u16) {
        self.packets_lost
            .fetch_add(u64::from(count), Ordering::Relaxed);
    }

    pub(crate) fn record_ssrc_change(&self) {
        self.ssrc_changes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_socket_error(&self) {
        self.socket_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Read all counters
    #[must_use]
    pub fn snapshot(&self) -> ReceiverStatsSnapshot {
        ReceiverStatsSnapshot {
            packets_received: self.packets_received.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            malformed_packets: self.malformed_packets.load(Ordering::Relaxed),
            frames_delivered: self.frames_delivered.load(Ordering::Relaxed),
            packets_lost: self.packets_lost.load(Ordering::Relaxed),
            ssrc_changes: self.ssrc_changes.load(Ordering::Relaxed),
            socket_errors: self.socket_errors.load(Ordering::Relaxed),
        }
    }

    /// Zero all counters
    pub fn reset(&self) {
        for counter in [
            &self.packets_received,
            &self.bytes_received,
            &self.malformed_packets,
            &self.frames_delivered,
            &self.packets_lost,
            &self.ssrc_changes,
            &self.socket_errors,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}
