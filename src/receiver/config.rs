//! AES67 receiver configuration

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::audio::{SampleFormat, SampleRate, SpeakerLayout, StreamFormat};
use crate::error::{Aes67Error, Result};
use crate::protocol::rtp::constants::AES67_PORT;

/// Default receive timeout between run-flag checks
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_millis(5);

/// Receiver configuration
///
/// An immutable snapshot for one session. Changing any field of a running
/// session goes through [`ReceiverSession::reconfigure`](super::ReceiverSession::reconfigure).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiverConfig {
    /// IPv4 multicast group to join (empty = idle)
    pub multicast_group: String,

    /// Local interface address used for the IGMP join (None = any)
    pub multicast_interface: Option<String>,

    /// Stream sample rate
    pub sample_rate: SampleRate,

    /// Stream speaker layout
    pub speaker_layout: SpeakerLayout,

    /// Wire sample encoding
    pub sample_format: SampleFormat,

    /// UDP port
    pub port: u16,

    /// How long one socket read may block before the run flag is re-checked
    #[serde(skip)]
    pub receive_timeout: Duration,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            multicast_group: String::new(),
            multicast_interface: None,
            sample_rate: SampleRate::default(),
            speaker_layout: SpeakerLayout::default(),
            sample_format: SampleFormat::default(),
            port: AES67_PORT,
            receive_timeout: DEFAULT_RECEIVE_TIMEOUT,
        }
    }
}

impl ReceiverConfig {
    /// Create with a multicast group
    pub fn new(multicast_group: impl Into<String>) -> Self {
        Self {
            multicast_group: multicast_group.into(),
            ..Default::default()
        }
    }

    /// Parse from a JSON document; missing fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns `Aes67Error::Config` if the document is malformed.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `Aes67Error::Io` if the file cannot be read, or
    /// `Aes67Error::Config` if it is malformed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Set the interface used for the multicast join
    #[must_use]
    pub fn interface(mut self, interface: impl Into<String>) -> Self {
        self.multicast_interface = Some(interface.into());
        self
    }

    /// Set sample rate
    #[must_use]
    pub fn sample_rate(mut self, rate: SampleRate) -> Self {
        self.sample_rate = rate;
        self
    }

    /// Set speaker layout
    #[must_use]
    pub fn speaker_layout(mut self, layout: SpeakerLayout) -> Self {
        self.speaker_layout = layout;
        self
    }

    /// Set sample format
    #[must_use]
    pub fn sample_format(mut self, format: SampleFormat) -> Self {
        self.sample_format = format;
        self
    }

    /// Set port
    #[must_use]
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set receive timeout
    #[must_use]
    pub fn receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = timeout;
        self
    }

    /// Whether a multicast group is configured
    #[must_use]
    pub fn has_group(&self) -> bool {
        !self.multicast_group.trim().is_empty()
    }

    /// Interface address, if one is set and non-empty
    #[must_use]
    pub fn interface_addr(&self) -> Option<&str> {
        self.multicast_interface
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The stream description handed to the converter
    #[must_use]
    pub fn stream_format(&self) -> StreamFormat {
        StreamFormat::new(self.sample_format, self.sample_rate, self.speaker_layout)
    }

    /// Check the settings the receive loop depends on
    ///
    /// Group and interface addresses are checked when the socket is bound.
    ///
    /// # Errors
    ///
    /// Returns `Aes67Error::UnsupportedSampleFormat` or `Aes67Error::InvalidConfig`.
    pub fn validate(&self) -> Result<()> {
        if !self.sample_format.is_supported() {
            return Err(Aes67Error::UnsupportedSampleFormat {
                format: self.sample_format.to_string(),
            });
        }
        if self.receive_timeout.is_zero() {
            return Err(Aes67Error::InvalidConfig {
                field: "receive_timeout".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
