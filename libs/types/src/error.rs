//! Registry errors

use crate::identity::TypeNumber;
use thiserror::Error;

/// Errors raised while building a [`crate::TypeRegistry`]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The Rust type already has a type number
    #[error("Type {type_name} is already registered as #{number}")]
    DuplicateType {
        type_name: &'static str,
        number: TypeNumber,
    },

    /// Another type already uses this name
    #[error("Type name '{name}' is already taken by type #{number}")]
    DuplicateName { name: String, number: TypeNumber },

    /// The 16-bit number pool is used up
    #[error("Type number pool exhausted after #{last}")]
    Exhausted { last: TypeNumber },
}

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
