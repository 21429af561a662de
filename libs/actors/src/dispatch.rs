//! # Handler Dispatch
//!
//! Pattern matching of a dynamic payload against a statically typed
//! parameter list. Plain closures and functions become handlers:
//!
//! - [`Handler<(A, B, ..)>`](Handler) for `FnMut(&A, &B, ..) -> R`
//! - [`HandlerMut<(A, B, ..)>`](HandlerMut) for `FnMut(&mut A, &mut B, ..) -> R`
//!
//! for up to [`MAX_ARITY`] parameters. Dispatch checks the arity first, then
//! every element's runtime type in order, and only then builds the argument
//! list and calls the handler. Any mismatch returns `None` without invoking
//! anything; a mismatch is never an error.

use crate::tuple::{TupleExt, TypeErasedTuple};
use std::any::Any;
use tracing::{debug, trace};
use types::TypeList;

/// Largest handler parameter list
pub const MAX_ARITY: usize = 8;

/// Handler taking read-only references to the elements
pub trait Handler<Args: TypeList> {
    type Output;

    /// Call with type-erased arguments; `None` unless every argument
    /// downcasts to its parameter type
    fn invoke(&mut self, args: &[&dyn Any]) -> Option<Self::Output>;
}

/// Handler taking mutable references to the elements
pub trait HandlerMut<Args: TypeList> {
    type Output;

    fn invoke_mut(&mut self, args: &mut [&mut dyn Any]) -> Option<Self::Output>;
}

impl<Func, R> Handler<()> for Func
where
    Func: FnMut() -> R,
{
    type Output = R;

    fn invoke(&mut self, args: &[&dyn Any]) -> Option<R> {
        match args {
            [] => Some(self()),
            _ => None,
        }
    }
}

impl<Func, R> HandlerMut<()> for Func
where
    Func: FnMut() -> R,
{
    type Output = R;

    fn invoke_mut(&mut self, args: &mut [&mut dyn Any]) -> Option<R> {
        match args {
            [] => Some(self()),
            _ => None,
        }
    }
}

macro_rules! impl_handlers {
    ($($T:ident $arg:ident),+) => {
        impl<Func, R, $($T: Any),+> Handler<($($T,)+)> for Func
        where
            Func: FnMut($(&$T),+) -> R,
        {
            type Output = R;

            fn invoke(&mut self, args: &[&dyn Any]) -> Option<R> {
                match args {
                    [$($arg),+] => Some(self($($arg.downcast_ref::<$T>()?),+)),
                    _ => None,
                }
            }
        }

        impl<Func, R, $($T: Any),+> HandlerMut<($($T,)+)> for Func
        where
            Func: FnMut($(&mut $T),+) -> R,
        {
            type Output = R;

            fn invoke_mut(&mut self, args: &mut [&mut dyn Any]) -> Option<R> {
                match args {
                    [$($arg),+] => Some(self($($arg.downcast_mut::<$T>()?),+)),
                    _ => None,
                }
            }
        }
    };
}

impl_handlers!(A a);
impl_handlers!(A a, B b);
impl_handlers!(A a, B b, C c);
impl_handlers!(A a, B b, C c, D d);
impl_handlers!(A a, B b, C c, D d, E e);
impl_handlers!(A a, B b, C c, D d, E e, F f);
impl_handlers!(A a, B b, C c, D d, E e, F f, G g);
impl_handlers!(A a, B b, C c, D d, E e, F f, G g, H h);

/// Filler for unused argument slots
static UNUSED: () = ();

/// Invoke `handler` on read-only elements of `tuple` if they match
pub fn dispatch<Args, F, T>(tuple: &T, handler: &mut F) -> Option<F::Output>
where
    Args: TypeList,
    F: Handler<Args>,
    T: TypeErasedTuple + ?Sized,
{
    if !tuple.match_elements::<Args>() {
        trace!(
            arity = tuple.size(),
            expected = Args::LEN,
            "Handler does not match tuple"
        );
        return None;
    }

    let mut args: [&dyn Any; MAX_ARITY] = [&UNUSED as &dyn Any; MAX_ARITY];
    for (pos, slot) in args.iter_mut().enumerate().take(Args::LEN) {
        *slot = tuple.get(pos).ok()?;
    }
    handler.invoke(&args[..Args::LEN])
}

/// Invoke `handler` on mutable elements of `tuple` if they match
///
/// Never invokes a mutable handler on a shared tuple.
pub fn dispatch_mut<Args, F, T>(tuple: &mut T, handler: &mut F) -> Option<F::Output>
where
    Args: TypeList,
    F: HandlerMut<Args>,
    T: TypeErasedTuple + ?Sized,
{
    if !tuple.match_elements::<Args>() {
        trace!(
            arity = tuple.size(),
            expected = Args::LEN,
            "Handler does not match tuple"
        );
        return None;
    }
    if tuple.shared() {
        debug!(
            arity = tuple.size(),
            "Refusing mutable dispatch on a shared tuple"
        );
        return None;
    }

    let mut args = tuple.elements_mut();
    handler.invoke_mut(&mut args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MessageTuple;
    use types::TypeRegistry;

    #[test]
    fn test_invoke_checks_each_argument() {
        let a = 1i32;
        let b = "two".to_string();
        let args: [&dyn Any; 2] = [&a, &b];

        let mut handler = |x: &i32, y: &String| format!("{}{}", x, y);
        assert_eq!(
            Handler::<(i32, String)>::invoke(&mut handler, &args),
            Some("1two".to_string())
        );
        assert_eq!(Handler::<(i32, String)>::invoke(&mut handler, &args[..1]), None);

        let swapped: [&dyn Any; 2] = [&b, &a];
        assert_eq!(Handler::<(i32, String)>::invoke(&mut handler, &swapped), None);
    }

    #[test]
    fn test_dispatch_max_arity() {
        let registry = TypeRegistry::new();
        let tuple = MessageTuple::builder(&registry)
            .push(1u8)
            .push(2u16)
            .push(3u32)
            .push(4u64)
            .push(5i8)
            .push(6i16)
            .push(7i32)
            .push(8i64)
            .build();

        let sum = tuple.apply(
            |a: &u8, b: &u16, c: &u32, d: &u64, e: &i8, f: &i16, g: &i32, h: &i64| {
                *a as i64
                    + *b as i64
                    + *c as i64
                    + *d as i64
                    + *e as i64
                    + *f as i64
                    + *g as i64
                    + *h
            },
        );
        assert_eq!(sum, Some(36));
    }

    #[test]
    fn test_dispatch_mut_writes_through() {
        let registry = TypeRegistry::new();
        let mut tuple = MessageTuple::builder(&registry)
            .push(vec![1i32])
            .push(false)
            .build();

        let result = tuple.apply_mut(|values: &mut Vec<i32>, flag: &mut bool| {
            values.push(2);
            *flag = true;
            values.len()
        });
        assert_eq!(result, Some(2));
        assert_eq!(tuple.stringify(), "([1, 2], true)");

        assert_eq!(tuple.apply_mut(|_: &mut bool, _: &mut Vec<i32>| ()), None);
    }
}
