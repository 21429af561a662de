//! Type Registry
//!
//! Assigns stable type numbers to Rust types. The registry is an explicit
//! object: build it once at startup, register message types, then share it
//! (usually behind an `Arc`) with everything that constructs tuples.

use crate::error::{RegistryError, Result};
use crate::identity::{RttiPair, RuntimeType, TypeNumber, NO_TYPE_NUMBER};
use crate::token::TypeTokenBuilder;
use crate::type_list::TypeList;
use std::any::TypeId;
use std::collections::HashMap;
use tracing::debug;

/// First number handed out to custom types
pub const FIRST_CUSTOM_TYPE_NUMBER: TypeNumber = 32;

/// Types registered by every [`TypeRegistry`] with fixed numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum BuiltinType {
    Bool = 1,
    I8 = 2,
    I16 = 3,
    I32 = 4,
    I64 = 5,
    U8 = 6,
    U16 = 7,
    U32 = 8,
    U64 = 9,
    F32 = 10,
    F64 = 11,
    Char = 12,
    String = 13,
    Bytes = 14,
    Strings = 15,
}

impl BuiltinType {
    pub const ALL: [BuiltinType; 15] = [
        BuiltinType::Bool,
        BuiltinType::I8,
        BuiltinType::I16,
        BuiltinType::I32,
        BuiltinType::I64,
        BuiltinType::U8,
        BuiltinType::U16,
        BuiltinType::U32,
        BuiltinType::U64,
        BuiltinType::F32,
        BuiltinType::F64,
        BuiltinType::Char,
        BuiltinType::String,
        BuiltinType::Bytes,
        BuiltinType::Strings,
    ];

    pub fn number(self) -> TypeNumber {
        self as TypeNumber
    }

    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Bool => "bool",
            BuiltinType::I8 => "i8",
            BuiltinType::I16 => "i16",
            BuiltinType::I32 => "i32",
            BuiltinType::I64 => "i64",
            BuiltinType::U8 => "u8",
            BuiltinType::U16 => "u16",
            BuiltinType::U32 => "u32",
            BuiltinType::U64 => "u64",
            BuiltinType::F32 => "f32",
            BuiltinType::F64 => "f64",
            BuiltinType::Char => "char",
            BuiltinType::String => "String",
            BuiltinType::Bytes => "Vec<u8>",
            BuiltinType::Strings => "Vec<String>",
        }
    }

    fn runtime_type(self) -> RuntimeType {
        match self {
            BuiltinType::Bool => RuntimeType::of::<bool>(),
            BuiltinType::I8 => RuntimeType::of::<i8>(),
            BuiltinType::I16 => RuntimeType::of::<i16>(),
            BuiltinType::I32 => RuntimeType::of::<i32>(),
            BuiltinType::I64 => RuntimeType::of::<i64>(),
            BuiltinType::U8 => RuntimeType::of::<u8>(),
            BuiltinType::U16 => RuntimeType::of::<u16>(),
            BuiltinType::U32 => RuntimeType::of::<u32>(),
            BuiltinType::U64 => RuntimeType::of::<u64>(),
            BuiltinType::F32 => RuntimeType::of::<f32>(),
            BuiltinType::F64 => RuntimeType::of::<f64>(),
            BuiltinType::Char => RuntimeType::of::<char>(),
            BuiltinType::String => RuntimeType::of::<String>(),
            BuiltinType::Bytes => RuntimeType::of::<Vec<u8>>(),
            BuiltinType::Strings => RuntimeType::of::<Vec<String>>(),
        }
    }
}

#[derive(Debug, Clone)]
struct RegisteredType {
    name: String,
    runtime: RuntimeType,
}

/// Mapping between Rust types and type numbers
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    by_type: HashMap<TypeId, TypeNumber>,
    by_name: HashMap<String, TypeNumber>,
    entries: HashMap<TypeNumber, RegisteredType>,
    next_custom: TypeNumber,
}

impl TypeRegistry {
    /// Registry with all [`BuiltinType`]s
    pub fn new() -> Self {
        let mut registry = Self {
            by_type: HashMap::new(),
            by_name: HashMap::new(),
            entries: HashMap::new(),
            next_custom: FIRST_CUSTOM_TYPE_NUMBER,
        };
        for builtin in BuiltinType::ALL {
            registry.insert(builtin.number(), builtin.name().to_string(), builtin.runtime_type());
        }
        registry
    }

    fn insert(&mut self, number: TypeNumber, name: String, runtime: RuntimeType) {
        self.by_type.insert(runtime.id(), number);
        self.by_name.insert(name.clone(), number);
        self.entries.insert(number, RegisteredType { name, runtime });
    }

    /// Register a custom message type under `name`
    pub fn register<T: 'static>(&mut self, name: impl Into<String>) -> Result<TypeNumber> {
        let name = name.into();
        let runtime = RuntimeType::of::<T>();

        if let Some(&number) = self.by_type.get(&runtime.id()) {
            return Err(RegistryError::DuplicateType {
                type_name: runtime.name(),
                number,
            });
        }
        if let Some(&number) = self.by_name.get(&name) {
            return Err(RegistryError::DuplicateName { name, number });
        }
        if self.next_custom == TypeNumber::MAX {
            return Err(RegistryError::Exhausted {
                last: self.next_custom,
            });
        }

        let number = self.next_custom;
        self.next_custom += 1;
        debug!(number, name = %name, rust_type = runtime.name(), "Registered message type");
        self.insert(number, name, runtime);
        Ok(number)
    }

    /// Type number of `T`, [`NO_TYPE_NUMBER`] if unregistered
    pub fn number_of<T: ?Sized + 'static>(&self) -> TypeNumber {
        self.number_of_runtime(&RuntimeType::of::<T>())
    }

    /// Type number for a runtime token, [`NO_TYPE_NUMBER`] if unregistered
    pub fn number_of_runtime(&self, runtime: &RuntimeType) -> TypeNumber {
        self.by_type
            .get(&runtime.id())
            .copied()
            .unwrap_or(NO_TYPE_NUMBER)
    }

    /// Full identity of `T`
    pub fn rtti_of<T: ?Sized + 'static>(&self) -> RttiPair {
        let runtime = RuntimeType::of::<T>();
        RttiPair::new(self.number_of_runtime(&runtime), runtime)
    }

    /// Full identity for a runtime token
    pub fn rtti_of_runtime(&self, runtime: RuntimeType) -> RttiPair {
        RttiPair::new(self.number_of_runtime(&runtime), runtime)
    }

    /// Registered name of a type number
    pub fn name_of(&self, number: TypeNumber) -> Option<&str> {
        self.entries.get(&number).map(|entry| entry.name.as_str())
    }

    /// Runtime token registered for a type number
    pub fn runtime_of(&self, number: TypeNumber) -> Option<RuntimeType> {
        self.entries.get(&number).map(|entry| entry.runtime)
    }

    /// Number registered under `name`
    pub fn lookup(&self, name: &str) -> Option<TypeNumber> {
        self.by_name.get(name).copied()
    }

    /// Whether `T` has a type number
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.number_of::<T>() != NO_TYPE_NUMBER
    }

    /// Number of registered types, builtins included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Type token of a static type list
    pub fn type_token_of<L: TypeList>(&self) -> u32 {
        let mut builder = TypeTokenBuilder::new();
        for index in 0..L::LEN {
            if let Some(runtime) = L::runtime_type(index) {
                builder.push(&self.rtti_of_runtime(runtime));
            }
        }
        builder.finish()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{make_type_token, EMPTY_TYPE_TOKEN};

    #[derive(Debug)]
    struct Ping;

    #[test]
    fn test_builtins_have_fixed_numbers() {
        let registry = TypeRegistry::new();
        assert_eq!(registry.number_of::<i32>(), BuiltinType::I32.number());
        assert_eq!(registry.number_of::<String>(), 13);
        assert_eq!(registry.name_of(14), Some("Vec<u8>"));
        assert_eq!(registry.len(), BuiltinType::ALL.len());
        assert_eq!(registry.runtime_of(1), Some(RuntimeType::of::<bool>()));
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = TypeRegistry::new();
        assert_eq!(registry.number_of::<Ping>(), NO_TYPE_NUMBER);

        let number = registry.register::<Ping>("Ping").unwrap();
        assert_eq!(number, FIRST_CUSTOM_TYPE_NUMBER);
        assert_eq!(registry.number_of::<Ping>(), number);
        assert_eq!(registry.lookup("Ping"), Some(number));
        assert!(registry.contains::<Ping>());

        let next = registry.register::<Vec<i32>>("Vec<i32>").unwrap();
        assert_eq!(next, FIRST_CUSTOM_TYPE_NUMBER + 1);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = TypeRegistry::new();
        registry.register::<Ping>("Ping").unwrap();

        assert!(matches!(
            registry.register::<Ping>("Pong"),
            Err(RegistryError::DuplicateType { .. })
        ));
        assert!(matches!(
            registry.register::<Vec<i32>>("Ping"),
            Err(RegistryError::DuplicateName { .. })
        ));
        assert!(matches!(
            registry.register::<i32>("int"),
            Err(RegistryError::DuplicateType { number: 4, .. })
        ));
    }

    #[test]
    fn test_static_token_matches_dynamic_token() {
        let registry = TypeRegistry::new();
        let elements = [registry.rtti_of::<i32>(), registry.rtti_of::<String>()];
        assert_eq!(
            registry.type_token_of::<(i32, String)>(),
            make_type_token(elements.iter())
        );
        assert_eq!(registry.type_token_of::<()>(), EMPTY_TYPE_TOKEN);
    }
}
