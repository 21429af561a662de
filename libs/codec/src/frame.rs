//! # Wire Frames
//!
//! A frame carries one serialized tuple between peers:
//!
//! ```text
//! ┌──────────┬────────────┬─────────────┬──────────┬─────────────────┐
//! │ magic u32│ token u32  │ length u32  │ crc32 u32│ payload (length)│
//! └──────────┴────────────┴─────────────┴──────────┴─────────────────┘
//!   big-endian, 16 byte header
//! ```
//!
//! The type token lets the receiver confirm that the payload has the shape it
//! expects before handing it to a tuple; the payload itself is the plain
//! concatenation of element encodings.

use crate::constants::{FRAME_HEADER_SIZE, FRAME_MAGIC};
use crate::error::{CodecError, CodecResult};
use byteorder::{BigEndian, ByteOrder};
use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

/// Parsed frame header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    pub type_token: u32,
    pub payload_len: u32,
    pub checksum: u32,
}

impl FrameHeader {
    /// Header describing `payload`
    pub fn for_payload(type_token: u32, payload: &[u8]) -> CodecResult<Self> {
        let payload_len = u32::try_from(payload.len()).map_err(|_| CodecError::FrameTooLarge {
            size: payload.len(),
            limit: u32::MAX as usize,
        })?;
        Ok(Self {
            type_token,
            payload_len,
            checksum: crc32fast::hash(payload),
        })
    }

    /// Parse the fixed-size header at the start of `data`
    pub fn parse(data: &[u8]) -> CodecResult<Self> {
        if data.len() < FRAME_HEADER_SIZE {
            return Err(CodecError::message_too_small(
                FRAME_HEADER_SIZE,
                data.len(),
                "frame header",
            ));
        }

        let magic = BigEndian::read_u32(&data[0..4]);
        if magic != FRAME_MAGIC {
            return Err(CodecError::invalid_magic(FRAME_MAGIC, magic));
        }

        Ok(Self {
            type_token: BigEndian::read_u32(&data[4..8]),
            payload_len: BigEndian::read_u32(&data[8..12]),
            checksum: BigEndian::read_u32(&data[12..16]),
        })
    }

    /// Reject payloads larger than `limit`
    pub fn check_limit(&self, limit: usize) -> CodecResult<()> {
        let size = self.payload_len as usize;
        if size > limit {
            return Err(CodecError::FrameTooLarge { size, limit });
        }
        Ok(())
    }

    /// Validate `payload` against the declared length and checksum
    pub fn verify(&self, payload: &[u8]) -> CodecResult<()> {
        if payload.len() != self.payload_len as usize {
            return Err(CodecError::message_too_small(
                self.payload_len as usize,
                payload.len(),
                "frame payload",
            ));
        }
        let calculated = crc32fast::hash(payload);
        if calculated != self.checksum {
            return Err(CodecError::ChecksumMismatch {
                expected: self.checksum,
                calculated,
                payload_size: payload.len(),
            });
        }
        Ok(())
    }

    /// Write the 16 header bytes
    pub fn write_to(&self, out: &mut BytesMut) {
        out.put_u32(FRAME_MAGIC);
        out.put_u32(self.type_token);
        out.put_u32(self.payload_len);
        out.put_u32(self.checksum);
    }
}

/// Build a complete frame
pub fn encode_frame(type_token: u32, payload: &[u8]) -> CodecResult<Bytes> {
    let header = FrameHeader::for_payload(type_token, payload)?;
    let mut out = BytesMut::with_capacity(FRAME_HEADER_SIZE + payload.len());
    header.write_to(&mut out);
    out.extend_from_slice(payload);
    trace!(
        type_token = format_args!("{:#010x}", type_token),
        payload_len = payload.len(),
        "Encoded frame"
    );
    Ok(out.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_layout() {
        let frame = encode_frame(0xAABB_CCDD, b"payload").unwrap();
        assert_eq!(frame.len(), FRAME_HEADER_SIZE + 7);
        assert_eq!(&frame[0..4], &FRAME_MAGIC.to_be_bytes());
        assert_eq!(&frame[4..8], &[0xAA, 0xBB, 0xCC, 0xDD]);
        assert_eq!(&frame[8..12], &7u32.to_be_bytes());

        let header = FrameHeader::parse(&frame).unwrap();
        assert_eq!(header.type_token, 0xAABB_CCDD);
        header.verify(&frame[FRAME_HEADER_SIZE..]).unwrap();
    }

    #[test]
    fn test_corrupted_payload_detected() {
        let frame = encode_frame(1, b"abc").unwrap();
        let header = FrameHeader::parse(&frame).unwrap();
        assert!(matches!(
            header.verify(b"abd"),
            Err(CodecError::ChecksumMismatch { .. })
        ));
        assert!(matches!(
            header.verify(b"ab"),
            Err(CodecError::MessageTooSmall { .. })
        ));
    }

    #[test]
    fn test_bad_magic_and_short_header() {
        let mut frame = encode_frame(1, b"").unwrap().to_vec();
        assert!(matches!(
            FrameHeader::parse(&frame[..10]),
            Err(CodecError::MessageTooSmall { need: 16, got: 10, .. })
        ));
        frame[0] = 0;
        assert!(matches!(
            FrameHeader::parse(&frame),
            Err(CodecError::InvalidMagic { .. })
        ));
    }

    #[test]
    fn test_limit() {
        let header = FrameHeader::for_payload(1, &[0u8; 64]).unwrap();
        header.check_limit(64).unwrap();
        assert_eq!(
            header.check_limit(63),
            Err(CodecError::FrameTooLarge { size: 64, limit: 63 })
        );
    }
}
