//! RTP sequence number tracking and packet loss detection

use std::collections::VecDeque;

/// Forward jumps at or above this size are treated as a resync, not loss
const MAX_GAP: u16 = 1000;

/// Tracks RTP sequence numbers of one source to detect gaps
///
/// Purely informational: packets are never held back or reordered.
pub struct SequenceTracker {
    /// Source currently being tracked
    ssrc: Option<u32>,
    /// Expected next sequence number
    expected_seq: Option<u16>,
    /// Recent gap history for statistics
    recent_gaps: VecDeque<GapInfo>,
    /// Maximum history size
    max_history: usize,
    /// Total packets received
    packets_received: u64,
    /// Total gaps detected
    total_gaps: u64,
    /// Total packets lost
    total_lost: u64,
    /// Packets that arrived behind the expected sequence number
    late_packets: u64,
}

/// Information about a detected gap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapInfo {
    /// First missing sequence
    pub start: u16,
    /// Count of missing packets
    pub count: u16,
}

/// Outcome of recording one packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceEvent {
    /// First packet seen
    First,
    /// Packet followed its predecessor
    InOrder,
    /// One or more packets were skipped
    Gap(GapInfo),
    /// Packet is older than the expected one (duplicate or reordered)
    Late,
    /// Sequence jumped too far forward to count as loss
    Resync,
    /// A new source took over the stream; tracking restarted
    SsrcChanged {
        /// Source tracked before this packet
        previous: u32,
    },
}

impl SequenceTracker {
    /// Create a new sequence tracker
    #[must_use]
    pub fn new() -> Self {
        Self {
            ssrc: None,
            expected_seq: None,
            recent_gaps: VecDeque::with_capacity(100),
            max_history: 100,
            packets_received: 0,
            total_gaps: 0,
            total_lost: 0,
            late_packets: 0,
        }
    }

    /// Record a received packet
    pub fn record(&mut self, ssrc: u32, seq: u16) -> SequenceEvent {
        let event = match self.ssrc {
            Some(previous) if previous != ssrc => {
                self.reset();
                SequenceEvent::SsrcChanged { previous }
            }
            _ => self.advance(seq),
        };

        self.ssrc = Some(ssrc);
        self.packets_received += 1;

        if !matches!(event, SequenceEvent::Late) {
            self.expected_seq = Some(seq.wrapping_add(1));
        }

        event
    }

    fn advance(&mut self, seq: u16) -> SequenceEvent {
        let Some(expected) = self.expected_seq else {
            return SequenceEvent::First;
        };

        // Handles 16-bit wraparound
        let gap_size = seq.wrapping_sub(expected);

        match gap_size {
            0 => SequenceEvent::InOrder,
            1..MAX_GAP => {
                self.total_gaps += 1;
                self.total_lost += u64::from(gap_size);

                let gap_info = GapInfo {
                    start: expected,
                    count: gap_size,
                };

                if self.recent_gaps.len() >= self.max_history {
                    self.recent_gaps.pop_front();
                }
                self.recent_gaps.push_back(gap_info.clone());

                SequenceEvent::Gap(gap_info)
            }
            0x8000.. => {
                self.late_packets += 1;
                SequenceEvent::Late
            }
            _ => SequenceEvent::Resync,
        }
    }

    /// Source currently tracked
    #[must_use]
    pub fn ssrc(&self) -> Option<u32> {
        self.ssrc
    }

    /// Most recent gaps, oldest first
    pub fn recent_gaps(&self) -> impl Iterator<Item = &GapInfo> {
        self.recent_gaps.iter()
    }

    /// Get packet loss ratio (0.0 to 1.0)
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        reason = "Precision loss acceptable for ratio calculation"
    )]
    pub fn loss_ratio(&self) -> f64 {
        if self.packets_received == 0 {
            return 0.0;
        }
        let total = self.packets_received + self.total_lost;
        self.total_lost as f64 / total as f64
    }

    /// Get statistics
    #[must_use]
    pub fn stats(&self) -> SequenceStats {
        SequenceStats {
            packets_received: self.packets_received,
            total_gaps: self.total_gaps,
            total_lost: self.total_lost,
            late_packets: self.late_packets,
            loss_ratio: self.loss_ratio(),
        }
    }

    /// Reset the tracker
    pub fn reset(&mut self) {
        self.ssrc = None;
        self.expected_seq = None;
        self.recent_gaps.clear();
        self.packets_received = 0;
        self.total_gaps = 0;
        self.total_lost = 0;
        self.late_packets = 0;
    }
}

/// Statistics for sequence tracking
#[derive(Debug, Clone)]
pub struct SequenceStats {
    /// Total packets received
    pub packets_received: u64,
    /// Total gaps detected
    pub total_gaps: u64,
    /// Total packets lost
    pub total_lost: u64,
    /// Packets that arrived out of order or duplicated
    pub late_packets: u64,
    /// Loss ratio (0.0 to 1.0)
    pub loss_ratio: f64,
}

impl Default for SequenceTracker {
    fn default() -> Self {
        Self::new()
    }
}
