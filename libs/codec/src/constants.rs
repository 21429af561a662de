//! # Wire Constants
//!
//! Values that define the frame layout and must stay stable for
//! compatibility between peers.

/// Magic number opening every frame ("ETUP")
pub const FRAME_MAGIC: u32 = 0x4554_5550;

/// Size of the fixed frame header in bytes
pub const FRAME_HEADER_SIZE: usize = 16;

/// Default upper bound for a frame payload
pub const DEFAULT_MAX_FRAME_SIZE: usize = 16 * 1024 * 1024; // 16MB

/// Initial capacity of a serializer buffer
pub const DEFAULT_SERIALIZER_CAPACITY: usize = 256;
