//! Runtime Type Identity
//!
//! [`RuntimeType`] is the authoritative identity of a Rust type at runtime.
//! [`RttiPair`] couples it with the registry-assigned [`TypeNumber`].

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Small integer assigned to a type by the [`crate::TypeRegistry`]
pub type TypeNumber = u16;

/// Type number of types the registry does not know
pub const NO_TYPE_NUMBER: TypeNumber = 0;

/// Language-level runtime type token
///
/// Equality and hashing use the `TypeId` only; the name is carried for
/// diagnostics and for digesting unregistered types.
#[derive(Clone, Copy)]
pub struct RuntimeType {
    id: TypeId,
    name: &'static str,
}

impl RuntimeType {
    /// Runtime type token of `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Underlying `TypeId`
    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Compiler-provided type name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check whether this token identifies `T`
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for RuntimeType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RuntimeType {}

impl Hash for RuntimeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RuntimeType").field(&self.name).finish()
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Type number plus runtime type token of one element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RttiPair {
    /// Fast-path hint
    pub number: TypeNumber,
    /// Authoritative identity
    pub runtime: RuntimeType,
}

impl RttiPair {
    pub fn new(number: TypeNumber, runtime: RuntimeType) -> Self {
        Self { number, runtime }
    }

    /// True iff both the number and the runtime token agree.
    ///
    /// The number alone may collide when types from foreign domains share
    /// the integer pool; the runtime token rejects those.
    pub fn matches(&self, number: TypeNumber, runtime: &RuntimeType) -> bool {
        self.number == number && self.runtime == *runtime
    }

    /// Whether the registry assigned a number to this type
    pub fn is_registered(&self) -> bool {
        self.number != NO_TYPE_NUMBER
    }
}

impl fmt::Display for RttiPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {}", self.number, self.runtime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_type_equality_ignores_name() {
        let a = RuntimeType::of::<i32>();
        let b = RuntimeType::of::<i32>();
        assert_eq!(a, b);
        assert_ne!(a, RuntimeType::of::<u32>());
        assert!(a.is::<i32>());
        assert!(!a.is::<i64>());
        assert_eq!(a.name(), "i32");
    }

    #[test]
    fn test_rtti_pair_requires_both_parts() {
        let pair = RttiPair::new(4, RuntimeType::of::<i32>());
        assert!(pair.matches(4, &RuntimeType::of::<i32>()));

        // same number, foreign type
        assert!(!pair.matches(4, &RuntimeType::of::<u32>()));
        // same type, wrong number
        assert!(!pair.matches(5, &RuntimeType::of::<i32>()));
    }

    #[test]
    fn test_rtti_display() {
        let pair = RttiPair::new(13, RuntimeType::of::<String>());
        assert_eq!(pair.to_string(), "#13 alloc::string::String");
        assert!(pair.is_registered());
        assert!(!RttiPair::new(NO_TYPE_NUMBER, RuntimeType::of::<()>()).is_registered());
    }
}
