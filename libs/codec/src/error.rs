//! Codec errors for element encoding and frame parsing
//!
//! Every variant carries enough context to tell which element or which part
//! of a frame failed. Element failures abort the surrounding tuple operation
//! unchanged.

use thiserror::Error;

/// Encoding, decoding and framing errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// A value could not be written to the sink
    #[error("Failed to encode {type_name}: {reason}")]
    Encode {
        type_name: &'static str,
        reason: String,
    },

    /// A value could not be read from the source (malformed or truncated stream)
    #[error("Failed to decode {type_name} at byte {offset}: {reason}")]
    Decode {
        type_name: &'static str,
        offset: usize,
        reason: String,
    },

    /// Input left over after the last expected value
    #[error("Trailing bytes after decoding: {remaining} of {total} bytes unread")]
    TrailingBytes { remaining: usize, total: usize },

    /// Buffer too small for the structure being parsed
    #[error("Message too small: need {need} bytes, got {got} (context: {context})")]
    MessageTooSmall {
        need: usize,
        got: usize,
        context: String,
    },

    /// Frame magic number validation failed
    #[error("Invalid frame magic: expected {expected:#010x}, got {actual:#010x} (indicates: {diagnosis})")]
    InvalidMagic {
        expected: u32,
        actual: u32,
        diagnosis: String,
    },

    /// Payload checksum validation failed
    #[error("Checksum mismatch: expected {expected:#010x}, calculated {calculated:#010x} ({payload_size} byte payload)")]
    ChecksumMismatch {
        expected: u32,
        calculated: u32,
        payload_size: usize,
    },

    /// Declared payload exceeds the configured limit
    #[error("Frame too large: {size} bytes exceeds limit {limit}")]
    FrameTooLarge { size: usize, limit: usize },
}

impl CodecError {
    pub fn encode(type_name: &'static str, reason: impl ToString) -> Self {
        Self::Encode {
            type_name,
            reason: reason.to_string(),
        }
    }

    pub fn decode(type_name: &'static str, offset: usize, reason: impl ToString) -> Self {
        Self::Decode {
            type_name,
            offset,
            reason: reason.to_string(),
        }
    }

    pub fn message_too_small(need: usize, got: usize, context: impl Into<String>) -> Self {
        Self::MessageTooSmall {
            need,
            got,
            context: context.into(),
        }
    }

    /// Create InvalidMagic error with a guess at the cause
    pub fn invalid_magic(expected: u32, actual: u32) -> Self {
        let diagnosis = match actual {
            0x00000000 => "uninitialized buffer",
            _ if actual.swap_bytes() == expected => "byte order (endianness) mismatch",
            _ => "stream out of sync or foreign protocol",
        };

        Self::InvalidMagic {
            expected,
            actual,
            diagnosis: diagnosis.to_string(),
        }
    }

    /// Get error category for metrics
    pub fn category(&self) -> &'static str {
        match self {
            CodecError::Encode { .. } => "encode",
            CodecError::Decode { .. } => "decode",
            CodecError::TrailingBytes { .. } => "trailing_bytes",
            CodecError::MessageTooSmall { .. } => "message_too_small",
            CodecError::InvalidMagic { .. } => "invalid_magic",
            CodecError::ChecksumMismatch { .. } => "checksum",
            CodecError::FrameTooLarge { .. } => "frame_too_large",
        }
    }
}

/// Result type for codec operations
pub type CodecResult<T> = std::result::Result<T, CodecError>;
