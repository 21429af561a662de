//! # Codec - Serializer Streams and Wire Frames
//!
//! ## Purpose
//!
//! The encoding layer underneath type-erased message tuples:
//! - [`BinarySerializer`]: sink that each tuple element writes itself into
//! - [`BinaryDeserializer`]: source that each tuple element reads itself from
//! - [`FrameHeader`] / [`encode_frame`]: framing used by the transport to move
//!   one serialized tuple between peers
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → [codec] → libs/actors → libs/network
//!                 ↓            ↓             ↓
//!           Element bytes   save/load     Frames on sockets
//! ```
//!
//! ## What This Crate Does NOT Contain
//! - Knowledge of tuples or element types (belongs in libs/actors)
//! - Socket handling (belongs in libs/network)
//!
//! Elements are encoded with `bincode`. The serializer never writes counts or
//! length prefixes of its own: a reader must know the element types in order.

pub mod constants;
pub mod deserializer;
pub mod error;
pub mod frame;
pub mod serializer;

pub use constants::*;
pub use deserializer::BinaryDeserializer;
pub use error::{CodecError, CodecResult};
pub use frame::{encode_frame, FrameHeader};
pub use serializer::BinarySerializer;
