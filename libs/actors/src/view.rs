//! # Tuple Views
//!
//! ## Purpose
//!
//! [`TupleView`] presents already-typed local values as a
//! [`TypeErasedTuple`] without copying them: it holds one borrowed slot per
//! value in a fixed-size array, so building a view never allocates.
//! Mutations through the view write through to the original values, and the
//! borrow checker keeps the values alive and unaliased for as long as the
//! view exists.
//!
//! ```rust
//! use messaging_actors::{make_view, TupleExt, TypeErasedTuple};
//! use types::TypeRegistry;
//!
//! let registry = TypeRegistry::new();
//! let mut count = 41i32;
//! let mut label = "hi".to_string();
//!
//! let mut view = make_view(&registry, (&mut count, &mut label));
//! view.apply_mut(|n: &mut i32, _: &mut String| *n += 1);
//! assert_eq!(view.stringify(), "(42, \"hi\")");
//! drop(view);
//! assert_eq!(count, 42);
//! ```
//!
//! A view is never cloned; [`TupleView::reborrow`] yields a second view onto
//! the same values and [`TupleView::to_message`] makes an owning deep copy.

use crate::element::Element;
use crate::error::Result;
use crate::message::MessageTuple;
use crate::tuple::{check_pos, TypeErasedTuple};
use crate::value::{load_all, ErasedRef, ErasedValue, TypeErasedValue};
use codec::{BinaryDeserializer, BinarySerializer};
use std::any::Any;
use std::fmt;
use tracing::trace;
use types::{make_type_token, RttiPair, TypeRegistry};

/// Tuple of `&mut` references convertible into view slots
pub trait IntoViewSlots<'a, const N: usize> {
    fn into_slots(self, registry: &TypeRegistry) -> [ErasedRef<'a>; N];
}

impl<'a> IntoViewSlots<'a, 0> for () {
    fn into_slots(self, _registry: &TypeRegistry) -> [ErasedRef<'a>; 0] {
        []
    }
}

macro_rules! impl_view_slots {
    ($n:literal; $($T:ident $arg:ident),+) => {
        impl<'a, $($T: Element),+> IntoViewSlots<'a, $n> for ($(&'a mut $T,)+) {
            fn into_slots(self, registry: &TypeRegistry) -> [ErasedRef<'a>; $n] {
                let ($($arg,)+) = self;
                [$(ErasedRef::new(registry, $arg)),+]
            }
        }
    };
}

impl_view_slots!(1; A a);
impl_view_slots!(2; A a, B b);
impl_view_slots!(3; A a, B b, C c);
impl_view_slots!(4; A a, B b, C c, D d);
impl_view_slots!(5; A a, B b, C c, D d, E e);
impl_view_slots!(6; A a, B b, C c, D d, E e, F f);
impl_view_slots!(7; A a, B b, C c, D d, E e, F f, G g);
impl_view_slots!(8; A a, B b, C c, D d, E e, F f, G g, H h);

/// Zero-copy tuple over `N` external values
pub struct TupleView<'a, const N: usize> {
    slots: [ErasedRef<'a>; N],
    token: u32,
}

/// Build a view over a tuple of `&mut` references
pub fn make_view<'a, R, const N: usize>(registry: &TypeRegistry, refs: R) -> TupleView<'a, N>
where
    R: IntoViewSlots<'a, N>,
{
    TupleView::new(registry, refs)
}

impl<'a, const N: usize> TupleView<'a, N> {
    pub fn new<R>(registry: &TypeRegistry, refs: R) -> Self
    where
        R: IntoViewSlots<'a, N>,
    {
        Self::from_slots(refs.into_slots(registry))
    }

    /// View over prepared slots; the type token is computed once here
    pub fn from_slots(slots: [ErasedRef<'a>; N]) -> Self {
        let token = make_type_token(slots.iter().map(|slot| &slot.rtti));
        trace!(
            arity = N,
            type_token = format_args!("{:#010x}", token),
            "Created tuple view"
        );
        Self { slots, token }
    }

    /// Second view onto the same values, usable while `self` is borrowed
    pub fn reborrow(&mut self) -> TupleView<'_, N> {
        TupleView {
            slots: self.slots.each_mut().map(|slot| slot.reborrow()),
            token: self.token,
        }
    }

    /// Owning deep copy
    pub fn to_message(&self) -> MessageTuple {
        MessageTuple::from_values(self.slots.iter().map(|slot| slot.copy()).collect())
    }

    fn slot(&self, pos: usize) -> Result<&ErasedRef<'a>> {
        check_pos(pos, N)?;
        Ok(&self.slots[pos])
    }

    fn slot_mut(&mut self, pos: usize) -> Result<&mut ErasedRef<'a>> {
        check_pos(pos, N)?;
        Ok(&mut self.slots[pos])
    }
}

impl<const N: usize> TypeErasedTuple for TupleView<'_, N> {
    fn get_mutable(&mut self, pos: usize) -> Result<&mut dyn Any> {
        Ok(self.slot_mut(pos)?.get_mutable())
    }

    fn elements_mut(&mut self) -> Vec<&mut dyn Any> {
        self.slots
            .iter_mut()
            .map(|slot| slot.value.as_any_mut())
            .collect()
    }

    fn load_at(&mut self, pos: usize, source: &mut BinaryDeserializer<'_>) -> Result<()> {
        self.slot_mut(pos)?.load(source)
    }

    fn size(&self) -> usize {
        N
    }

    fn type_token(&self) -> u32 {
        self.token
    }

    fn element_type(&self, pos: usize) -> Result<RttiPair> {
        Ok(self.slot(pos)?.rtti)
    }

    fn get(&self, pos: usize) -> Result<&dyn Any> {
        Ok(self.slot(pos)?.get())
    }

    fn stringify_at(&self, pos: usize) -> Result<String> {
        Ok(self.slot(pos)?.stringify())
    }

    fn copy(&self, pos: usize) -> Result<ErasedValue> {
        Ok(self.slot(pos)?.copy())
    }

    fn save_at(&self, pos: usize, sink: &mut BinarySerializer) -> Result<()> {
        self.slot(pos)?.save(sink)
    }

    fn load(&mut self, source: &mut BinaryDeserializer<'_>) -> Result<()> {
        let mut targets: Vec<&mut (dyn Element + 'static)> =
            self.slots.iter_mut().map(|slot| &mut *slot.value).collect();
        load_all(&mut targets, source)
    }
}

impl<const N: usize> fmt::Display for TupleView<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.stringify())
    }
}

impl<const N: usize> fmt::Debug for TupleView<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TupleView")
            .field("type_token", &format_args!("{:#010x}", self.token))
            .field("elements", &self.slots)
            .finish()
    }
}
