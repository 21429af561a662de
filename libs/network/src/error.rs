//! Transport Error Types
//!
//! Hard failures of the session boundary and of framed message exchange.
//! "Try again" conditions are not errors here; sessions report them as
//! [`crate::IoProgress::Pending`] and the channel retries.

use codec::CodecError;
use messaging_actors::TupleError;
use thiserror::Error;

/// Main transport error type
#[derive(Error, Debug)]
pub enum TransportError {
    /// The peer closed the connection or the socket failed
    #[error("Connection closed: {reason}")]
    ConnectionClosed { reason: String },

    /// Session establishment failed
    #[error("Handshake failed: {message}")]
    Handshake { message: String },

    /// The peer sent something this side cannot accept
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },

    /// Generic I/O errors
    #[error("I/O error: {message}")]
    Io {
        message: String,
        source: std::io::Error,
    },

    /// Frame or element encoding failures
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Tuple access or serialization failures
    #[error("Tuple error: {0}")]
    Tuple(#[from] TupleError),
}

/// Result type alias for transport operations
pub type Result<T> = std::result::Result<T, TransportError>;

impl TransportError {
    /// Create a connection closed error
    pub fn connection_closed(reason: impl Into<String>) -> Self {
        Self::ConnectionClosed {
            reason: reason.into(),
        }
    }

    /// Create a handshake error
    pub fn handshake(message: impl Into<String>) -> Self {
        Self::Handshake {
            message: message.into(),
        }
    }

    /// Create a protocol error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>, field: Option<&str>) -> Self {
        Self::Configuration {
            message: message.into(),
            field: field.map(|s| s.to_string()),
        }
    }

    /// Create an I/O error
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Whether the connection this error came from is unusable
    pub fn is_connection_closed(&self) -> bool {
        matches!(self, TransportError::ConnectionClosed { .. })
    }

    /// Check if a new attempt (usually on a new connection) may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            TransportError::ConnectionClosed { .. } => false,
            TransportError::Handshake { .. } => false,
            TransportError::Protocol { .. } => false,
            TransportError::Configuration { .. } => false,
            TransportError::Io { .. } => true,
            TransportError::Codec(_) => false,
            TransportError::Tuple(_) => false,
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            TransportError::ConnectionClosed { .. } => "connection_closed",
            TransportError::Handshake { .. } => "handshake",
            TransportError::Protocol { .. } => "protocol",
            TransportError::Configuration { .. } => "configuration",
            TransportError::Io { .. } => "io",
            TransportError::Codec(_) => "codec",
            TransportError::Tuple(_) => "tuple",
        }
    }
}
