//! # Binary Deserializer
//!
//! Source for element values: a cursor over a borrowed byte slice. Each `read`
//! consumes exactly the encoding of one value.
//!
//! Decoding is limited to the unread input, so a length prefix claiming more
//! bytes than exist fails as a decode error before anything is allocated.

use crate::error::{CodecError, CodecResult};
use bincode::Options;
use serde::de::DeserializeOwned;

/// Cursor over encoded values
#[derive(Debug, Clone)]
pub struct BinaryDeserializer<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> BinaryDeserializer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, position: 0 }
    }

    /// Consume one value
    ///
    /// On failure the cursor does not move.
    pub fn read<T: DeserializeOwned>(&mut self) -> CodecResult<T> {
        let mut remaining = &self.input[self.position..];
        let value = bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .with_limit(remaining.len() as u64)
            .deserialize_from(&mut remaining)
            .map_err(|e| CodecError::decode(std::any::type_name::<T>(), self.position, e))?;
        self.position = self.input.len() - remaining.len();
        Ok(value)
    }

    /// Byte offset of the next read
    pub fn position(&self) -> usize {
        self.position
    }

    /// Unread bytes
    pub fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Require that every byte was consumed
    pub fn finish(self) -> CodecResult<()> {
        if self.is_exhausted() {
            Ok(())
        } else {
            Err(CodecError::TrailingBytes {
                remaining: self.remaining(),
                total: self.input.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::BinarySerializer;

    #[test]
    fn test_sequential_reads() {
        let mut sink = BinarySerializer::new();
        sink.write(&7u16).unwrap();
        sink.write(&"seven".to_string()).unwrap();

        let mut source = BinaryDeserializer::new(sink.as_bytes());
        assert_eq!(source.read::<u16>().unwrap(), 7);
        assert_eq!(source.position(), 2);
        assert_eq!(source.read::<String>().unwrap(), "seven");
        assert!(source.is_exhausted());
        source.finish().unwrap();
    }

    #[test]
    fn test_truncated_input_does_not_advance() {
        let bytes = [1u8, 0];
        let mut source = BinaryDeserializer::new(&bytes);
        let err = source.read::<u32>().unwrap_err();
        assert!(matches!(err, CodecError::Decode { offset: 0, .. }));
        assert_eq!(source.position(), 0);
        assert_eq!(source.read::<u16>().unwrap(), 1);
    }

    #[test]
    fn test_oversized_length_prefix_is_decode_error() {
        for claimed in [1u64 << 40, u64::MAX] {
            let mut sink = BinarySerializer::new();
            sink.write(&claimed).unwrap();
            sink.write(&0u16).unwrap();

            let mut source = BinaryDeserializer::new(sink.as_bytes());
            let err = source.read::<String>().unwrap_err();
            assert!(matches!(err, CodecError::Decode { offset: 0, .. }), "{err}");
            assert_eq!(source.position(), 0);

            let err = source.read::<Vec<u8>>().unwrap_err();
            assert!(matches!(err, CodecError::Decode { offset: 0, .. }), "{err}");
            assert_eq!(source.read::<u64>().unwrap(), claimed);
        }
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let bytes = [1u8, 2, 3];
        let mut source = BinaryDeserializer::new(&bytes);
        source.read::<u8>().unwrap();
        assert_eq!(
            source.finish(),
            Err(CodecError::TrailingBytes {
                remaining: 2,
                total: 3
            })
        );
    }
}
