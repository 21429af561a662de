//! Type Token Digest
//!
//! 32-bit FNV-1a digest over the ordered element type numbers of a tuple.
//! Identical shapes always produce identical tokens; the token is only a
//! pre-filter and never replaces per-element matching.

use crate::identity::{RttiPair, TypeNumber, NO_TYPE_NUMBER};

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Type token of a tuple without elements
pub const EMPTY_TYPE_TOKEN: u32 = FNV_OFFSET_BASIS;

/// Incremental type token computation
#[derive(Debug, Clone, Copy)]
pub struct TypeTokenBuilder {
    state: u32,
}

impl TypeTokenBuilder {
    pub fn new() -> Self {
        Self {
            state: FNV_OFFSET_BASIS,
        }
    }

    fn absorb(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.state ^= u32::from(byte);
            self.state = self.state.wrapping_mul(FNV_PRIME);
        }
    }

    /// Append one element type number
    pub fn push_number(&mut self, number: TypeNumber) -> &mut Self {
        self.absorb(&number.to_le_bytes());
        self
    }

    /// Append one element; unregistered types contribute their name instead
    /// of the shared zero number.
    pub fn push(&mut self, rtti: &RttiPair) -> &mut Self {
        if rtti.number == NO_TYPE_NUMBER {
            self.absorb(rtti.runtime.name().as_bytes());
        } else {
            self.push_number(rtti.number);
        }
        self
    }

    pub fn finish(&self) -> u32 {
        self.state
    }
}

impl Default for TypeTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Digest of an ordered sequence of element identities
pub fn make_type_token<'a, I>(elements: I) -> u32
where
    I: IntoIterator<Item = &'a RttiPair>,
{
    let mut builder = TypeTokenBuilder::new();
    for rtti in elements {
        builder.push(rtti);
    }
    builder.finish()
}
