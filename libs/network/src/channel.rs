//! # Message Channel
//!
//! ## Purpose
//!
//! Carries serialized tuples between two peers over one TCP connection and
//! a [`Session`]. Each tuple travels as one frame (see [`codec::frame`]):
//! the header's type token tells the receiver whether the payload has the
//! shape of the tuple it is about to load into, because the payload itself
//! carries no element count or type information.
//!
//! ## Retry Policy
//!
//! Sessions never block. Whenever one reports
//! [`IoProgress::Pending`]/[`Handshake::Pending`] the channel awaits the
//! requested socket readiness and calls it again; every such round is
//! counted in [`ChannelStats::retries`]. Hard failures end the exchange.

use crate::error::{Result, TransportError};
use crate::session::{Handshake, IoProgress, Session};
use bytes::{Bytes, BytesMut};
use codec::{encode_frame, BinaryDeserializer, BinarySerializer, CodecError, FrameHeader, FRAME_HEADER_SIZE};
use messaging_actors::{MessageTuple, TypeErasedTuple};
use messaging_config::TransportSettings;
use std::net::SocketAddr;
use tokio::io::{AsyncWriteExt, Interest};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tracing::{debug, info, trace, warn};

/// Channel traffic counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    pub frames_sent: u64,
    pub frames_received: u64,
    pub bytes_sent: u64,
    pub bytes_received: u64,
    /// Session calls repeated after waiting for readiness
    pub retries: u64,
}

#[derive(Debug, Clone, Copy)]
enum Role {
    Client,
    Server,
}

/// Framed tuple exchange over one connection
pub struct MessageChannel<S: Session> {
    stream: TcpStream,
    session: S,
    peer: SocketAddr,
    settings: TransportSettings,
    read_buffer: BytesMut,
    sink: BinarySerializer,
    stats: ChannelStats,
}

impl<S: Session> MessageChannel<S> {
    /// Connect to `addr` and run the client side handshake
    pub async fn connect(
        addr: impl ToSocketAddrs,
        session: S,
        settings: &TransportSettings,
    ) -> Result<Self> {
        validate(settings)?;
        let stream = TcpStream::connect(addr)
            .await
            .map_err(|e| TransportError::io("Failed to connect to peer", e))?;
        let mut channel = Self::from_stream(stream, session, settings)?;
        channel.handshake(Role::Client).await?;
        info!(
            peer = %channel.peer,
            session = channel.session.name(),
            "Connected message channel"
        );
        Ok(channel)
    }

    /// Accept one connection from `listener` and run the server side handshake
    pub async fn accept(
        listener: &TcpListener,
        session: S,
        settings: &TransportSettings,
    ) -> Result<Self> {
        validate(settings)?;
        let (stream, _) = listener
            .accept()
            .await
            .map_err(|e| TransportError::io("Failed to accept connection", e))?;
        let mut channel = Self::from_stream(stream, session, settings)?;
        channel.handshake(Role::Server).await?;
        info!(
            peer = %channel.peer,
            session = channel.session.name(),
            "Accepted message channel"
        );
        Ok(channel)
    }

    fn from_stream(stream: TcpStream, session: S, settings: &TransportSettings) -> Result<Self> {
        if let Err(e) = stream.set_nodelay(true) {
            warn!("Failed to set TCP_NODELAY: {}", e);
        }
        let peer = stream
            .peer_addr()
            .map_err(|e| TransportError::io("Failed to get peer address", e))?;
        Ok(Self {
            stream,
            session,
            peer,
            settings: settings.clone(),
            read_buffer: BytesMut::with_capacity(settings.read_chunk_size),
            sink: BinarySerializer::new(),
            stats: ChannelStats::default(),
        })
    }

    async fn handshake(&mut self, role: Role) -> Result<()> {
        loop {
            let step = match role {
                Role::Client => self.session.connect(&self.stream)?,
                Role::Server => self.session.accept(&self.stream)?,
            };
            match step {
                Handshake::Established => return Ok(()),
                Handshake::Pending(interest) => {
                    trace!(?role, "Handshake wants to continue");
                    self.wait(interest).await?;
                }
            }
        }
    }

    async fn wait(&mut self, interest: Interest) -> Result<()> {
        self.stats.retries += 1;
        self.stream
            .ready(interest)
            .await
            .map_err(|e| TransportError::io("Failed waiting for socket readiness", e))?;
        Ok(())
    }

    /// Send one tuple as one frame
    pub async fn send(&mut self, tuple: &dyn TypeErasedTuple) -> Result<()> {
        self.sink.clear();
        tuple.save(&mut self.sink)?;
        if self.sink.len() > self.settings.max_frame_size {
            return Err(CodecError::FrameTooLarge {
                size: self.sink.len(),
                limit: self.settings.max_frame_size,
            }
            .into());
        }

        let frame = encode_frame(tuple.type_token(), self.sink.as_bytes())?;
        self.write_all(&frame).await?;

        self.stats.frames_sent += 1;
        self.stats.bytes_sent += frame.len() as u64;
        debug!(
            peer = %self.peer,
            arity = tuple.size(),
            type_token = format_args!("{:#010x}", tuple.type_token()),
            bytes = frame.len(),
            "Sent tuple"
        );
        Ok(())
    }

    /// Receive one frame and load it into `tuple`
    ///
    /// The frame must carry `tuple`'s type token.
    pub async fn receive_into(&mut self, tuple: &mut dyn TypeErasedTuple) -> Result<()> {
        let (header, payload) = self.read_frame().await?;
        if header.type_token != tuple.type_token() {
            warn!(
                peer = %self.peer,
                frame_token = format_args!("{:#010x}", header.type_token),
                tuple_token = format_args!("{:#010x}", tuple.type_token()),
                "Frame shape does not match receiving tuple"
            );
            return Err(TransportError::protocol(format!(
                "Frame type token {:#010x} does not match receiving tuple {:#010x} of arity {}",
                header.type_token,
                tuple.type_token(),
                tuple.size()
            )));
        }
        load_payload(tuple, &payload)
    }

    /// Receive one frame into a copy of the first prototype with the same
    /// type token
    pub async fn receive_any(&mut self, prototypes: &[MessageTuple]) -> Result<MessageTuple> {
        let (header, payload) = self.read_frame().await?;
        let prototype = prototypes
            .iter()
            .find(|p| p.type_token() == header.type_token)
            .ok_or_else(|| {
                TransportError::protocol(format!(
                    "No expected tuple shape has type token {:#010x}",
                    header.type_token
                ))
            })?;
        let mut tuple = prototype.clone();
        load_payload(&mut tuple, &payload)?;
        Ok(tuple)
    }

    /// Send `request` and load the answer into `response`
    pub async fn request(
        &mut self,
        request: &dyn TypeErasedTuple,
        response: &mut dyn TypeErasedTuple,
    ) -> Result<()> {
        self.send(request).await?;
        self.receive_into(response).await
    }

    /// Close the write half; the peer sees an orderly close
    pub async fn shutdown(&mut self) -> Result<()> {
        self.stream
            .shutdown()
            .await
            .map_err(|e| TransportError::io("Failed to shut down connection", e))?;
        debug!(peer = %self.peer, "Shut down message channel");
        Ok(())
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn stats(&self) -> ChannelStats {
        self.stats
    }

    async fn write_all(&mut self, mut data: &[u8]) -> Result<()> {
        while !data.is_empty() {
            match self.session.write_some(&self.stream, data)? {
                IoProgress::Transferred(0) => {
                    return Err(TransportError::connection_closed(
                        "Session accepted no bytes for a non-empty write",
                    ));
                }
                IoProgress::Transferred(n) => data = &data[n..],
                IoProgress::Pending(interest) => self.wait(interest).await?,
            }
        }
        Ok(())
    }

    /// Read until at least `needed` bytes are buffered
    async fn fill(&mut self, needed: usize) -> Result<()> {
        while self.read_buffer.len() < needed {
            let start = self.read_buffer.len();
            let chunk = self.settings.read_chunk_size;
            self.read_buffer.resize(start + chunk, 0);
            let progress = self
                .session
                .read_some(&self.stream, &mut self.read_buffer[start..]);
            match progress {
                Ok(IoProgress::Transferred(0)) => {
                    self.read_buffer.truncate(start);
                    return Err(TransportError::connection_closed(
                        "Session returned no bytes for a non-empty read",
                    ));
                }
                Ok(IoProgress::Transferred(n)) => self.read_buffer.truncate(start + n),
                Ok(IoProgress::Pending(interest)) => {
                    self.read_buffer.truncate(start);
                    self.wait(interest).await?;
                }
                Err(e) => {
                    self.read_buffer.truncate(start);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    async fn read_frame(&mut self) -> Result<(FrameHeader, Bytes)> {
        self.fill(FRAME_HEADER_SIZE).await?;
        let header = FrameHeader::parse(&self.read_buffer[..FRAME_HEADER_SIZE])?;
        header.check_limit(self.settings.max_frame_size)?;

        let total = FRAME_HEADER_SIZE + header.payload_len as usize;
        self.fill(total).await?;
        let payload = self
            .read_buffer
            .split_to(total)
            .split_off(FRAME_HEADER_SIZE)
            .freeze();
        header.verify(&payload)?;

        self.stats.frames_received += 1;
        self.stats.bytes_received += total as u64;
        debug!(
            peer = %self.peer,
            type_token = format_args!("{:#010x}", header.type_token),
            bytes = total,
            "Received frame"
        );
        Ok((header, payload))
    }
}

fn validate(settings: &TransportSettings) -> Result<()> {
    settings
        .validate()
        .map_err(|e| TransportError::configuration(e.to_string(), Some("transport")))
}

/// Load a whole payload; leftover bytes mean the shapes disagree
fn load_payload(tuple: &mut dyn TypeErasedTuple, payload: &[u8]) -> Result<()> {
    let mut source = BinaryDeserializer::new(payload);
    tuple.load(&mut source)?;
    source.finish()?;
    Ok(())
}
