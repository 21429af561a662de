//! # Type-Erased Tuple Contract
//!
//! ## Purpose
//!
//! [`TypeErasedTuple`] is the runtime-polymorphic container carrying the
//! arguments of one message through code that does not know their types.
//! Implementations provide positional access, type identity per element,
//! rendering, copying and per-element serialization; everything else
//! (whole-tuple rendering and serialization, matching) is derived here.
//!
//! [`TupleExt`] adds the generic conveniences on top, most importantly
//! [`TupleExt::apply`]: invoke a statically typed handler iff the tuple's
//! elements match its parameter list.
//!
//! ## Architecture Role
//!
//! ```text
//!                     TypeErasedTuple
//!        ┌──────────────┬────┴─────────┬──────────────┐
//!   EmptyTuple     TupleView<N>    MessageTuple     Message
//!   (no elements)  (borrows)       (owns)           (Arc, copy-on-write)
//!                                       │
//!                         apply / Behavior / MessageChannel
//! ```
//!
//! Every positional operation checks `pos < size()` and reports
//! [`TupleError::OutOfRange`] otherwise.

use crate::dispatch::{self, Handler, HandlerMut};
use crate::error::{Result, TupleError};
use crate::value::ErasedValue;
use codec::{BinaryDeserializer, BinarySerializer};
use std::any::Any;
use tracing::trace;
use types::{RttiPair, RuntimeType, TypeList, TypeNumber};

/// Heterogeneous, fixed-arity message payload
pub trait TypeErasedTuple: Send + Sync {
    // -- modifiers ----------------------------------------------------------

    /// Mutable access to the element at `pos`
    ///
    /// Callers must not mutate a tuple whose [`shared`](Self::shared) is true.
    fn get_mutable(&mut self, pos: usize) -> Result<&mut dyn Any>;

    /// Mutable access to all elements in order
    fn elements_mut(&mut self) -> Vec<&mut dyn Any>;

    /// Overwrite the element at `pos` from `source`
    fn load_at(&mut self, pos: usize, source: &mut BinaryDeserializer<'_>) -> Result<()>;

    // -- observers ----------------------------------------------------------

    fn size(&self) -> usize;

    /// Digest of the element type numbers in order
    fn type_token(&self) -> u32;

    fn element_type(&self, pos: usize) -> Result<RttiPair>;

    fn get(&self, pos: usize) -> Result<&dyn Any>;

    fn stringify_at(&self, pos: usize) -> Result<String>;

    /// Independent owning copy of the element at `pos`
    fn copy(&self, pos: usize) -> Result<ErasedValue>;

    fn save_at(&self, pos: usize, sink: &mut BinarySerializer) -> Result<()>;

    /// Whether more than one owner can observe this tuple
    fn shared(&self) -> bool {
        false
    }

    // -- derived ------------------------------------------------------------

    fn empty(&self) -> bool {
        self.size() == 0
    }

    /// `(e0, e1, ...)`
    fn stringify(&self) -> String {
        let parts: Vec<String> = (0..self.size())
            .map(|pos| {
                self.stringify_at(pos)
                    .unwrap_or_else(|e| format!("<{}>", e))
            })
            .collect();
        format!("({})", parts.join(", "))
    }

    /// Write every element in ascending position order, without framing
    ///
    /// Stops at the first failing element and leaves `sink` as it was.
    fn save(&self, sink: &mut BinarySerializer) -> Result<()> {
        let start = sink.len();
        for pos in 0..self.size() {
            if let Err(e) = self.save_at(pos, sink) {
                sink.truncate(start);
                return Err(e);
            }
        }
        Ok(())
    }

    /// Read every element in ascending position order
    fn load(&mut self, source: &mut BinaryDeserializer<'_>) -> Result<()> {
        for pos in 0..self.size() {
            self.load_at(pos, source)?;
        }
        Ok(())
    }

    /// True iff the element at `pos` has type number `number` and runtime
    /// type `runtime`; false for any out-of-range position.
    fn matches(&self, pos: usize, number: TypeNumber, runtime: &RuntimeType) -> bool {
        self.element_type(pos)
            .map(|rtti| rtti.matches(number, runtime))
            .unwrap_or(false)
    }
}

/// Generic conveniences for every [`TypeErasedTuple`]
pub trait TupleExt: TypeErasedTuple {
    /// Type number of the element at `pos`
    fn type_nr(&self, pos: usize) -> Result<TypeNumber> {
        Ok(self.element_type(pos)?.number)
    }

    fn matches_rtti(&self, pos: usize, rtti: &RttiPair) -> bool {
        self.matches(pos, rtti.number, &rtti.runtime)
    }

    /// Checked typed access
    fn get_as<T: Any>(&self, pos: usize) -> Result<&T> {
        let actual = self.element_type(pos)?.runtime;
        self.get(pos)?
            .downcast_ref::<T>()
            .ok_or_else(|| TupleError::type_mismatch(pos, RuntimeType::of::<T>(), actual))
    }

    /// Checked typed mutable access
    fn get_mutable_as<T: Any>(&mut self, pos: usize) -> Result<&mut T> {
        let actual = self.element_type(pos)?.runtime;
        self.get_mutable(pos)?
            .downcast_mut::<T>()
            .ok_or_else(|| TupleError::type_mismatch(pos, RuntimeType::of::<T>(), actual))
    }

    /// Whether the element at `pos` is a `T`
    fn match_element<T: Any>(&self, pos: usize) -> bool {
        self.element_type(pos)
            .map(|rtti| rtti.runtime.is::<T>())
            .unwrap_or(false)
    }

    /// Whether the tuple's elements are exactly the types of `L`, in order
    ///
    /// Arity is compared first, without inspecting any element.
    fn match_elements<L: TypeList>(&self) -> bool {
        if self.size() != L::LEN {
            return false;
        }
        (0..L::LEN).all(|pos| match (L::runtime_type(pos), self.element_type(pos)) {
            (Some(expected), Ok(rtti)) => rtti.runtime == expected,
            _ => false,
        })
    }

    /// Invoke `handler` with read-only references to the elements iff they
    /// match its parameter list
    ///
    /// `None` means no match; a matched handler returning `()` yields
    /// `Some(())`.
    fn apply<Args, F>(&self, mut handler: F) -> Option<<F as Handler<Args>>::Output>
    where
        Args: TypeList,
        F: Handler<Args>,
    {
        dispatch::dispatch::<Args, F, Self>(self, &mut handler)
    }

    /// Invoke `handler` with mutable references to the elements iff they
    /// match its parameter list
    ///
    /// A shared tuple only exposes its elements read-only, so a mutable
    /// handler never matches it.
    fn apply_mut<Args, F>(&mut self, mut handler: F) -> Option<<F as HandlerMut<Args>>::Output>
    where
        Args: TypeList,
        F: HandlerMut<Args>,
    {
        dispatch::dispatch_mut::<Args, F, Self>(self, &mut handler)
    }
}

impl<T: TypeErasedTuple + ?Sized> TupleExt for T {}

/// Bounds check shared by the tuple implementations
pub(crate) fn check_pos(pos: usize, size: usize) -> Result<()> {
    if pos < size {
        Ok(())
    } else {
        trace!(pos, size, "Tuple position out of range");
        Err(TupleError::out_of_range(pos, size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EmptyTuple, MessageTuple};
    use types::TypeRegistry;

    fn sample(registry: &TypeRegistry) -> MessageTuple {
        MessageTuple::builder(registry)
            .push(42i32)
            .push("hi".to_string())
            .build()
    }

    #[test]
    fn test_stringify() {
        let registry = TypeRegistry::new();
        let tuple = sample(&registry);
        assert_eq!(tuple.stringify(), "(42, \"hi\")");
        assert_eq!(tuple.stringify_at(0).unwrap(), "42");
        assert_eq!(EmptyTuple.stringify(), "()");
    }

    #[test]
    fn test_typed_access() {
        let registry = TypeRegistry::new();
        let mut tuple = sample(&registry);

        assert_eq!(*tuple.get_as::<i32>(0).unwrap(), 42);
        assert_eq!(
            tuple.get_as::<i32>(1),
            Err(TupleError::type_mismatch(
                1,
                RuntimeType::of::<i32>(),
                RuntimeType::of::<String>()
            ))
        );
        assert_eq!(tuple.get_as::<i32>(2), Err(TupleError::out_of_range(2, 2)));

        tuple.get_mutable_as::<String>(1).unwrap().push('!');
        assert_eq!(tuple.get_as::<String>(1).unwrap(), "hi!");
    }

    #[test]
    fn test_matching() {
        let registry = TypeRegistry::new();
        let tuple = sample(&registry);
        let int = registry.rtti_of::<i32>();

        assert!(tuple.matches(0, int.number, &int.runtime));
        assert!(tuple.matches_rtti(0, &int));
        assert!(!tuple.matches_rtti(1, &int));
        assert!(!tuple.matches_rtti(7, &int));
        assert_eq!(tuple.type_nr(1).unwrap(), registry.number_of::<String>());

        assert!(tuple.match_element::<String>(1));
        assert!(!tuple.match_element::<String>(0));
        assert!(tuple.match_elements::<(i32, String)>());
        assert!(!tuple.match_elements::<(String, i32)>());
        assert!(!tuple.match_elements::<(i32,)>());
    }

    #[test]
    fn test_matches_rejects_foreign_type_with_same_number() {
        let registry = TypeRegistry::new();
        let tuple = sample(&registry);
        let number = tuple.type_nr(0).unwrap();
        assert!(!tuple.matches(0, number, &RuntimeType::of::<u32>()));
    }

    #[test]
    fn test_apply_example() {
        let registry = TypeRegistry::new();
        let tuple = sample(&registry);

        let joined = tuple.apply(|n: &i32, s: &String| format!("{}{}", n, s));
        assert_eq!(joined.as_deref(), Some("42hi"));

        let reversed = tuple.apply(|s: &String, n: &i32| format!("{}{}", s, n));
        assert_eq!(reversed, None);
    }

    #[test]
    fn test_apply_unit_handler_is_some() {
        let registry = TypeRegistry::new();
        let tuple = sample(&registry);
        let mut calls = 0;
        assert_eq!(tuple.apply(|_: &i32, _: &String| calls += 1), Some(()));
        assert_eq!(calls, 1);
        assert_eq!(EmptyTuple.apply(|| "nothing"), Some("nothing"));
    }

    #[test]
    fn test_save_writes_elements_back_to_back() {
        let registry = TypeRegistry::new();
        let tuple = sample(&registry);
        let mut sink = BinarySerializer::new();
        sink.write(&1u8).unwrap();

        tuple.save(&mut sink).unwrap();
        assert_eq!(sink.len(), 1 + 4 + 8 + 2);

        let mut source = BinaryDeserializer::new(&sink.as_bytes()[1..]);
        let mut target = MessageTuple::builder(&registry)
            .push(0i32)
            .push(String::new())
            .build();
        target.load(&mut source).unwrap();
        assert_eq!(target.stringify(), "(42, \"hi\")");
    }
}
