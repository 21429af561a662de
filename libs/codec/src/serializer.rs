//! # Binary Serializer
//!
//! Sink for element values. Each `write` appends the `bincode` encoding of one
//! value; nothing else is written, so a sequence of writes is only readable by
//! a reader that knows the sequence of types in advance.

use crate::constants::DEFAULT_SERIALIZER_CAPACITY;
use crate::error::{CodecError, CodecResult};
use serde::Serialize;

/// Growable byte sink
#[derive(Debug, Clone, Default)]
pub struct BinarySerializer {
    buffer: Vec<u8>,
}

impl BinarySerializer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SERIALIZER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Append one value
    pub fn write<T: Serialize + ?Sized>(&mut self, value: &T) -> CodecResult<()> {
        let start = self.buffer.len();
        if let Err(e) = bincode::serialize_into(&mut self.buffer, value) {
            // never leave a half-written value behind
            self.buffer.truncate(start);
            return Err(CodecError::encode(std::any::type_name::<T>(), e));
        }
        Ok(())
    }

    /// Bytes written so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Discard everything written after the first `len` bytes
    pub fn truncate(&mut self, len: usize) {
        self.buffer.truncate(len);
    }

    /// Drop all written bytes, keeping the allocation
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_are_concatenated_without_framing() {
        let mut sink = BinarySerializer::new();
        sink.write(&42i32).unwrap();
        assert_eq!(sink.as_bytes(), &42i32.to_le_bytes());

        sink.write(&true).unwrap();
        assert_eq!(sink.len(), 5);

        sink.truncate(4);
        assert_eq!(sink.as_bytes(), &42i32.to_le_bytes());

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_string_encoding() {
        let mut sink = BinarySerializer::new();
        sink.write("hi").unwrap();
        // u64 length followed by the bytes
        assert_eq!(sink.len(), 8 + 2);
        assert_eq!(&sink.into_vec()[8..], b"hi");
    }
}
