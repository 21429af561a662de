//! Plain Session
//!
//! Moves bytes unchanged over a TCP socket. It cannot authenticate peers, so
//! it refuses to be created when certificate material is configured.

use crate::error::{Result, TransportError};
use crate::session::{
    classify_io_error, Handshake, IoProgress, Session, SessionCondition,
};
use messaging_config::SessionSettings;
use tokio::net::TcpStream;
use tracing::{debug, warn};

/// Session without encryption or authentication
#[derive(Debug, Default)]
pub struct PlainSession {
    established: bool,
    bytes_read: u64,
    bytes_written: u64,
}

impl PlainSession {
    pub fn new(settings: &SessionSettings) -> Result<Self> {
        if settings.authentication_enabled() {
            warn!("Refusing plain session: peer authentication is configured");
            return Err(TransportError::configuration(
                "Plain sessions cannot authenticate peers; remove certificate, key, cafile and capath",
                Some("session"),
            ));
        }
        Ok(Self::default())
    }

    pub fn is_established(&self) -> bool {
        self.established
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    fn establish(&mut self, socket: &TcpStream, role: &'static str) -> Result<Handshake> {
        let peer = socket.peer_addr().map_err(|e| {
            TransportError::handshake(format!("{} without a connected peer: {}", role, e))
        })?;
        self.established = true;
        debug!(%peer, role, "Plain session established");
        Ok(Handshake::Established)
    }
}

impl Session for PlainSession {
    fn name(&self) -> &'static str {
        "plain"
    }

    fn connect(&mut self, socket: &TcpStream) -> Result<Handshake> {
        self.establish(socket, "connect")
    }

    fn accept(&mut self, socket: &TcpStream) -> Result<Handshake> {
        self.establish(socket, "accept")
    }

    fn read_some(&mut self, socket: &TcpStream, buffer: &mut [u8]) -> Result<IoProgress> {
        if buffer.is_empty() {
            return Ok(IoProgress::Transferred(0));
        }
        match socket.try_read(buffer) {
            Ok(0) => IoProgress::from_condition(SessionCondition::ZeroReturn),
            Ok(n) => {
                self.bytes_read += n as u64;
                Ok(IoProgress::Transferred(n))
            }
            Err(e) => IoProgress::from_condition(classify_io_error(&e, SessionCondition::WantRead)),
        }
    }

    fn write_some(&mut self, socket: &TcpStream, buffer: &[u8]) -> Result<IoProgress> {
        if buffer.is_empty() {
            return Ok(IoProgress::Transferred(0));
        }
        match socket.try_write(buffer) {
            Ok(n) => {
                self.bytes_written += n as u64;
                Ok(IoProgress::Transferred(n))
            }
            Err(e) => {
                IoProgress::from_condition(classify_io_error(&e, SessionCondition::WantWrite))
            }
        }
    }
}
