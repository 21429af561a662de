//! # Message Elements
//!
//! [`Element`] is the object-safe capability set every value carried in a
//! tuple provides: downcasting, rendering, deep copy and self-serialization.
//! It is implemented automatically for every
//! `Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static` type,
//! so plain data types and `#[derive]`d structs are messages without
//! further work.

use codec::{BinaryDeserializer, BinarySerializer, CodecResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::fmt;
use types::RuntimeType;

/// Value that can be stored in a type-erased tuple
pub trait Element: Any + Send + Sync {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Runtime type token of the concrete type
    fn runtime_type(&self) -> RuntimeType;

    /// Human-readable rendering
    fn render(&self) -> String;

    /// Deep copy behind a new box
    fn clone_element(&self) -> Box<dyn Element>;

    /// Replace this value with `other` if both have the same concrete type
    fn assign_from(&mut self, other: Box<dyn Element>) -> bool;

    /// Write the value to `sink`
    fn save_to(&self, sink: &mut BinarySerializer) -> CodecResult<()>;

    /// Overwrite the value from `source`; unchanged on failure
    fn load_from(&mut self, source: &mut BinaryDeserializer<'_>) -> CodecResult<()>;
}

impl<T> Element for T
where
    T: Any + Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn runtime_type(&self) -> RuntimeType {
        RuntimeType::of::<T>()
    }

    fn render(&self) -> String {
        format!("{:?}", self)
    }

    fn clone_element(&self) -> Box<dyn Element> {
        Box::new(self.clone())
    }

    fn assign_from(&mut self, other: Box<dyn Element>) -> bool {
        match other.into_any().downcast::<T>() {
            Ok(value) => {
                *self = *value;
                true
            }
            Err(_) => false,
        }
    }

    fn save_to(&self, sink: &mut BinarySerializer) -> CodecResult<()> {
        sink.write(self)
    }

    fn load_from(&mut self, source: &mut BinaryDeserializer<'_>) -> CodecResult<()> {
        *self = source.read::<T>()?;
        Ok(())
    }
}

impl fmt::Debug for dyn Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_uses_debug() {
        let value: Box<dyn Element> = Box::new("hi".to_string());
        assert_eq!(value.render(), "\"hi\"");
        assert_eq!(value.runtime_type(), RuntimeType::of::<String>());

        let value: Box<dyn Element> = Box::new(vec![1i32, 2]);
        assert_eq!(value.render(), "[1, 2]");
    }

    #[test]
    fn test_clone_is_independent() {
        let mut original: Box<dyn Element> = Box::new(vec![1i32]);
        let copy = original.clone_element();

        original
            .as_any_mut()
            .downcast_mut::<Vec<i32>>()
            .unwrap()
            .push(2);

        assert_eq!(copy.as_any().downcast_ref::<Vec<i32>>(), Some(&vec![1]));
    }

    #[test]
    fn test_assign_requires_same_type() {
        let mut target: Box<dyn Element> = Box::new(1i32);
        assert!(!target.assign_from(Box::new(2u32)));
        assert!(target.assign_from(Box::new(7i32)));
        assert_eq!(target.as_any().downcast_ref::<i32>(), Some(&7));
    }

    #[test]
    fn test_failed_load_leaves_value() {
        let mut value: Box<dyn Element> = Box::new("kept".to_string());
        let bytes = [0xFFu8; 3];
        let mut source = BinaryDeserializer::new(&bytes);
        assert!(value.load_from(&mut source).is_err());
        assert_eq!(value.render(), "\"kept\"");
    }
}
