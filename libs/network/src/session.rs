//! # Session Boundary
//!
//! ## Purpose
//!
//! A [`Session`] moves raw bytes over an established socket, optionally
//! transforming them (e.g. encryption). Every operation is non-blocking and
//! reports one of three outcomes:
//!
//! - progress: the handshake completed or some bytes were transferred
//! - try again: the underlying transport wants the socket to become
//!   readable or writable first ([`IoProgress::Pending`],
//!   [`Handshake::Pending`]); this is never an error
//! - closed: the peer closed the connection or the socket failed
//!   ([`TransportError::ConnectionClosed`])
//!
//! [`handle_condition`] is the single place that decides which low-level
//! conditions mean "try again" and which mean "closed".
//!
//! ## Architecture Role
//!
//! ```text
//! MessageChannel ──frames──▶ Session::write_some ──▶ TcpStream
//!       ▲                         │ Pending(Interest)
//!       └───── await readiness ◀──┘ then retry
//! ```

use crate::error::{Result, TransportError};
use std::fmt;
use std::io;
use tokio::io::Interest;
use tokio::net::TcpStream;
use tracing::debug;

/// Low-level outcome of a session operation that made no progress
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCondition {
    /// Retry once the socket is readable
    WantRead,
    /// Retry once the socket is writable
    WantWrite,
    /// The peer closed the connection in an orderly way
    ZeroReturn,
    /// The socket failed
    Syscall(io::ErrorKind),
    /// Any other session-specific failure
    Other(String),
}

impl fmt::Display for SessionCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionCondition::WantRead => f.write_str("want read"),
            SessionCondition::WantWrite => f.write_str("want write"),
            SessionCondition::ZeroReturn => f.write_str("peer closed the connection"),
            SessionCondition::Syscall(kind) => write!(f, "socket failure: {}", kind),
            SessionCondition::Other(reason) => f.write_str(reason),
        }
    }
}

/// Map a condition to "retry after readiness" or a hard failure
pub fn handle_condition(condition: SessionCondition) -> Result<Interest> {
    match condition {
        SessionCondition::WantRead => Ok(Interest::READABLE),
        SessionCondition::WantWrite => Ok(Interest::WRITABLE),
        closed => {
            debug!(condition = %closed, "Session condition closes the connection");
            Err(TransportError::connection_closed(closed.to_string()))
        }
    }
}

/// Classify an I/O error of a non-blocking socket call
///
/// `retry` is the condition to report when the call would block.
pub fn classify_io_error(err: &io::Error, retry: SessionCondition) -> SessionCondition {
    match err.kind() {
        io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => retry,
        kind => SessionCondition::Syscall(kind),
    }
}

/// Result of a handshake step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handshake {
    Established,
    /// Call again once the socket has the given readiness
    Pending(Interest),
}

/// Result of a read or write step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoProgress {
    /// Bytes moved; zero only for an empty buffer
    Transferred(usize),
    /// Call again once the socket has the given readiness
    Pending(Interest),
}

impl IoProgress {
    /// Progress for a condition that made no progress
    pub fn from_condition(condition: SessionCondition) -> Result<Self> {
        handle_condition(condition).map(IoProgress::Pending)
    }
}

/// Byte transport over an established socket
pub trait Session: Send {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Client side handshake step
    fn connect(&mut self, socket: &TcpStream) -> Result<Handshake>;

    /// Server side handshake step
    fn accept(&mut self, socket: &TcpStream) -> Result<Handshake>;

    /// Read up to `buffer.len()` bytes
    ///
    /// An empty buffer completes immediately with `Transferred(0)`.
    fn read_some(&mut self, socket: &TcpStream, buffer: &mut [u8]) -> Result<IoProgress>;

    /// Write up to `buffer.len()` bytes
    ///
    /// An empty buffer completes immediately with `Transferred(0)`.
    fn write_some(&mut self, socket: &TcpStream, buffer: &[u8]) -> Result<IoProgress>;
}
