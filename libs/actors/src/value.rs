//! # Type-Erased Values
//!
//! A single element together with its type identity. Tuples are composed of
//! these:
//!
//! - [`ErasedValue`]: owns its element (used by [`crate::MessageTuple`])
//! - [`ErasedRef`]: borrows an element living elsewhere (used by
//!   [`crate::TupleView`])
//!
//! Copying either kind always produces an owning [`ErasedValue`].

use crate::element::Element;
use crate::error::Result;
use codec::{BinaryDeserializer, BinarySerializer};
use std::any::Any;
use std::fmt;
use types::{RttiPair, RuntimeType, TypeNumber, TypeRegistry};

/// Single element with type identity
pub trait TypeErasedValue: Send + Sync {
    fn get(&self) -> &dyn Any;

    fn get_mutable(&mut self) -> &mut dyn Any;

    /// Type number and runtime type of the element
    fn element_type(&self) -> RttiPair;

    fn stringify(&self) -> String;

    /// Independent owning copy
    fn copy(&self) -> ErasedValue;

    fn save(&self, sink: &mut BinarySerializer) -> Result<()>;

    fn load(&mut self, source: &mut BinaryDeserializer<'_>) -> Result<()>;
}

impl dyn TypeErasedValue + '_ {
    pub fn matches(&self, number: TypeNumber, runtime: &RuntimeType) -> bool {
        self.element_type().matches(number, runtime)
    }

    pub fn get_as<T: Any>(&self) -> Option<&T> {
        self.get().downcast_ref::<T>()
    }

    pub fn get_mutable_as<T: Any>(&mut self) -> Option<&mut T> {
        self.get_mutable().downcast_mut::<T>()
    }
}

/// Owning type-erased value
pub struct ErasedValue {
    pub(crate) rtti: RttiPair,
    pub(crate) value: Box<dyn Element>,
}

impl ErasedValue {
    pub fn new<T: Element>(registry: &TypeRegistry, value: T) -> Self {
        Self {
            rtti: registry.rtti_of::<T>(),
            value: Box::new(value),
        }
    }

    /// Recover the concrete value, `None` on a type mismatch
    pub fn into_inner<T: Any>(self) -> Option<T> {
        self.value.into_any().downcast::<T>().ok().map(|value| *value)
    }

    pub fn element(&self) -> &dyn Element {
        &*self.value
    }
}

impl TypeErasedValue for ErasedValue {
    fn get(&self) -> &dyn Any {
        self.value.as_any()
    }

    fn get_mutable(&mut self) -> &mut dyn Any {
        self.value.as_any_mut()
    }

    fn element_type(&self) -> RttiPair {
        self.rtti
    }

    fn stringify(&self) -> String {
        self.value.render()
    }

    fn copy(&self) -> ErasedValue {
        self.clone()
    }

    fn save(&self, sink: &mut BinarySerializer) -> Result<()> {
        Ok(self.value.save_to(sink)?)
    }

    fn load(&mut self, source: &mut BinaryDeserializer<'_>) -> Result<()> {
        Ok(self.value.load_from(source)?)
    }
}

impl Clone for ErasedValue {
    fn clone(&self) -> Self {
        Self {
            rtti: self.rtti,
            value: self.value.clone_element(),
        }
    }
}

impl fmt::Debug for ErasedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedValue")
            .field("type", &self.rtti)
            .field("value", &self.value.render())
            .finish()
    }
}

/// Borrowed type-erased value
pub struct ErasedRef<'a> {
    pub(crate) rtti: RttiPair,
    pub(crate) value: &'a mut (dyn Element + 'static),
}

impl<'a> ErasedRef<'a> {
    pub fn new<T: Element>(registry: &TypeRegistry, value: &'a mut T) -> Self {
        Self {
            rtti: registry.rtti_of::<T>(),
            value,
        }
    }

    /// Shorter-lived reference to the same external value
    pub fn reborrow(&mut self) -> ErasedRef<'_> {
        ErasedRef {
            rtti: self.rtti,
            value: &mut *self.value,
        }
    }
}

impl TypeErasedValue for ErasedRef<'_> {
    fn get(&self) -> &dyn Any {
        self.value.as_any()
    }

    fn get_mutable(&mut self) -> &mut dyn Any {
        self.value.as_any_mut()
    }

    fn element_type(&self) -> RttiPair {
        self.rtti
    }

    fn stringify(&self) -> String {
        self.value.render()
    }

    fn copy(&self) -> ErasedValue {
        ErasedValue {
            rtti: self.rtti,
            value: self.value.clone_element(),
        }
    }

    fn save(&self, sink: &mut BinarySerializer) -> Result<()> {
        Ok(self.value.save_to(sink)?)
    }

    fn load(&mut self, source: &mut BinaryDeserializer<'_>) -> Result<()> {
        Ok(self.value.load_from(source)?)
    }
}

impl fmt::Debug for ErasedRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedRef")
            .field("type", &self.rtti)
            .field("value", &self.value.render())
            .finish()
    }
}

/// Decode into every target or into none of them
///
/// Each element is read into a staged copy first; targets are only
/// overwritten once all reads succeeded. On failure `source` does not move.
pub(crate) fn load_all(
    targets: &mut [&mut (dyn Element + 'static)],
    source: &mut BinaryDeserializer<'_>,
) -> Result<()> {
    let mut cursor = source.clone();
    let mut staged = Vec::with_capacity(targets.len());
    for target in targets.iter() {
        let mut value = target.clone_element();
        value.load_from(&mut cursor)?;
        staged.push(value);
    }

    for (target, value) in targets.iter_mut().zip(staged) {
        let assigned = target.assign_from(value);
        debug_assert!(assigned, "staged copy changed its type");
    }

    *source = cursor;
    Ok(())
}
