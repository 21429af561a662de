//! # Network - Session Boundary and Message Channels
//!
//! ## Purpose
//!
//! Moves serialized tuples between processes:
//!
//! - [`Session`]: non-blocking byte transport with an explicit distinction
//!   between "try again" ([`IoProgress::Pending`]) and "closed"
//!   ([`TransportError::ConnectionClosed`])
//! - [`PlainSession`]: session over a TCP socket without encryption
//! - [`MessageChannel`]: one tuple per frame over a session, retrying
//!   pending operations once the socket is ready
//!
//! ## Architecture Role
//!
//! ```text
//! libs/actors ──save/load──▶ [network] ──frames──▶ TCP peer
//!      ▲                         │
//!  TypeErasedTuple         libs/config (TransportSettings, SessionSettings)
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use messaging_actors::MessageTuple;
//! use messaging_config::MessagingConfig;
//! use network::{MessageChannel, PlainSession};
//! use types::TypeRegistry;
//!
//! # async fn run() -> network::Result<()> {
//! let config = MessagingConfig::default();
//! let registry = TypeRegistry::new();
//!
//! let session = PlainSession::new(&config.session)?;
//! let mut channel = MessageChannel::connect("127.0.0.1:4242", session, &config.transport).await?;
//!
//! let request = MessageTuple::builder(&registry).push(1i32).build();
//! let mut reply = MessageTuple::builder(&registry).push(0i32).build();
//! channel.request(&request, &mut reply).await?;
//! # Ok(())
//! # }
//! ```

pub mod channel;
pub mod error;
pub mod plain;
pub mod session;

pub use channel::{ChannelStats, MessageChannel};
pub use error::{Result, TransportError};
pub use plain::PlainSession;
pub use session::{
    classify_io_error, handle_condition, Handshake, IoProgress, Session, SessionCondition,
};
