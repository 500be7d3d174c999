use std::io;
use thiserror::Error;

use crate::audio::ConvertError;
use crate::protocol::rtp::{RtpDecodeError, RtpEncodeError};

/// Errors that can occur while receiving an AES67 stream
#[derive(Debug, Error)]
pub enum Aes67Error {
    // ===== Protocol Errors =====
    /// Malformed RTP datagram
    #[error("RTP decode error: {0}")]
    Decode(#[from] RtpDecodeError),

    /// RTP packet could not be serialized
    #[error("RTP encode error: {0}")]
    Encode(#[from] RtpEncodeError),

    // ===== Configuration Errors =====
    /// Sample format the converter cannot handle
    #[error("unsupported sample format: {format}")]
    UnsupportedSampleFormat {
        /// The rejected format
        format: String,
    },

    /// Configuration value out of range
    #[error("invalid configuration: {field} - {message}")]
    InvalidConfig {
        /// The offending field
        field: String,
        /// Description of the problem
        message: String,
    },

    /// Configuration document could not be parsed
    #[error("configuration parse error: {0}")]
    Config(#[from] serde_json::Error),

    // ===== Resource Errors =====
    /// Multicast socket could not be created, bound or joined
    #[error("failed to bind multicast group {group}: {message}")]
    BindFailed {
        /// The configured multicast group
        group: String,
        /// Description of the failure
        message: String,
        /// The underlying source of the error
        #[source]
        source: Option<io::Error>,
    },

    /// Receive thread could not be spawned
    #[error("failed to spawn receive thread: {0}")]
    ThreadSpawn(#[source] io::Error),

    /// Receive thread panicked
    #[error("receive thread panicked")]
    ReceiverPanicked,

    /// General I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl From<ConvertError> for Aes67Error {
    fn from(err: ConvertError) -> Self {
        match err {
            ConvertError::UnsupportedSampleFormat(format) => Self::UnsupportedSampleFormat {
                format: format.to_string(),
            },
        }
    }
}

impl Aes67Error {
    /// Malformed wire data; the datagram is dropped and the session continues
    #[must_use]
    pub fn is_protocol_error(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Encode(_))
    }

    /// Configuration problem; fatal to the current session
    #[must_use]
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedSampleFormat { .. } | Self::InvalidConfig { .. } | Self::Config(_)
        )
    }

    /// Socket or thread allocation failure reported at start time
    #[must_use]
    pub fn is_resource_error(&self) -> bool {
        matches!(
            self,
            Self::BindFailed { .. } | Self::ThreadSpawn(_) | Self::Io(_)
        )
    }
}

/// Result type alias for AES67 operations
pub type Result<T> = std::result::Result<T, Aes67Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SampleFormat;

    #[test]
    fn test_error_display() {
        let err = Aes67Error::BindFailed {
            group: "239.69.0.1".to_string(),
            message: "address in use".to_string(),
            source: None,
        };
        assert_eq!(
            err.to_string(),
            "failed to bind multicast group 239.69.0.1: address in use"
        );
    }

    #[test]
    fn test_error_classification() {
        let decode: Aes67Error = RtpDecodeError::TooShort { len: 4 }.into();
        assert!(decode.is_protocol_error());
        assert!(!decode.is_configuration_error());

        let format: Aes67Error = ConvertError::UnsupportedSampleFormat(SampleFormat::L32).into();
        assert!(format.is_configuration_error());
        assert!(!format.is_resource_error());

        let bind = Aes67Error::BindFailed {
            group: String::new(),
            message: String::new(),
            source: None,
        };
        assert!(bind.is_resource_error());
    }

    #[test]
    fn test_unsupported_format_conversion() {
        let err: Aes67Error = ConvertError::UnsupportedSampleFormat(SampleFormat::L32).into();
        assert_eq!(err.to_string(), "unsupported sample format: L32");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::AddrInUse, "in use");
        let err: Aes67Error = io_err.into();

        assert!(matches!(err, Aes67Error::Io(_)));
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Aes67Error>();
    }
}
