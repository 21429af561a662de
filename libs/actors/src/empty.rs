//! Empty Tuple
//!
//! The tuple without elements. Stateless, so one value serves every empty
//! message.

use crate::error::{Result, TupleError};
use crate::tuple::TypeErasedTuple;
use crate::value::ErasedValue;
use codec::{BinaryDeserializer, BinarySerializer};
use std::any::Any;
use std::fmt;
use types::{RttiPair, EMPTY_TYPE_TOKEN};

/// Tuple of size zero
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EmptyTuple;

impl TypeErasedTuple for EmptyTuple {
    fn get_mutable(&mut self, pos: usize) -> Result<&mut dyn Any> {
        Err(TupleError::out_of_range(pos, 0))
    }

    fn elements_mut(&mut self) -> Vec<&mut dyn Any> {
        Vec::new()
    }

    fn load_at(&mut self, pos: usize, _source: &mut BinaryDeserializer<'_>) -> Result<()> {
        Err(TupleError::out_of_range(pos, 0))
    }

    fn size(&self) -> usize {
        0
    }

    fn type_token(&self) -> u32 {
        EMPTY_TYPE_TOKEN
    }

    fn element_type(&self, pos: usize) -> Result<RttiPair> {
        Err(TupleError::out_of_range(pos, 0))
    }

    fn get(&self, pos: usize) -> Result<&dyn Any> {
        Err(TupleError::out_of_range(pos, 0))
    }

    fn stringify_at(&self, pos: usize) -> Result<String> {
        Err(TupleError::out_of_range(pos, 0))
    }

    fn copy(&self, pos: usize) -> Result<ErasedValue> {
        Err(TupleError::out_of_range(pos, 0))
    }

    fn save_at(&self, pos: usize, _sink: &mut BinarySerializer) -> Result<()> {
        Err(TupleError::out_of_range(pos, 0))
    }
}

impl fmt::Display for EmptyTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("()")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuple::TupleExt;
    use types::{RuntimeType, TypeRegistry};

    #[test]
    fn test_empty_shape() {
        let tuple = EmptyTuple;
        assert_eq!(tuple.size(), 0);
        assert!(tuple.empty());
        assert!(!tuple.shared());
        assert_eq!(tuple.type_token(), EMPTY_TYPE_TOKEN);
        assert_eq!(tuple.type_token(), TypeRegistry::new().type_token_of::<()>());
        assert_eq!(tuple.stringify(), "()");
        assert_eq!(tuple.to_string(), "()");
    }

    #[test]
    fn test_every_position_is_out_of_range() {
        let mut tuple = EmptyTuple;
        assert_eq!(tuple.get(0).err(), Some(TupleError::out_of_range(0, 0)));
        assert!(tuple.get_mutable(0).is_err());
        assert!(tuple.element_type(3).is_err());
        assert!(tuple.copy(0).is_err());
        assert!(tuple.stringify_at(0).is_err());
        assert!(!tuple.matches(0, 4, &RuntimeType::of::<i32>()));
        assert!(tuple.elements_mut().is_empty());
    }

    #[test]
    fn test_serialization_is_a_no_op() {
        let mut tuple = EmptyTuple;
        let mut sink = BinarySerializer::new();
        tuple.save(&mut sink).unwrap();
        assert!(sink.is_empty());

        let bytes = [1u8, 2, 3];
        let mut source = BinaryDeserializer::new(&bytes);
        tuple.load(&mut source).unwrap();
        assert_eq!(source.position(), 0);
        assert!(tuple.save_at(0, &mut sink).is_err());
    }

    #[test]
    fn test_apply() {
        let mut tuple = EmptyTuple;
        assert_eq!(tuple.apply(|| 7), Some(7));
        assert_eq!(tuple.apply(|_: &i32| 7), None);
        assert_eq!(tuple.apply_mut(|| ()), Some(()));
    }
}
