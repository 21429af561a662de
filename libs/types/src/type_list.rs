//! Static Type Lists
//!
//! A [`TypeList`] is an ordered list of Rust types known at compile time, such as
//! the parameter list of a message handler. Tuples of up to eight types
//! implement it.

use crate::identity::RuntimeType;

/// Ordered list of static types
pub trait TypeList: 'static {
    /// Number of types in the list
    const LEN: usize;

    /// Runtime token of the type at `index`, `None` past the end
    fn runtime_type(index: usize) -> Option<RuntimeType>;

    /// All runtime tokens in order
    fn runtime_types() -> Vec<RuntimeType> {
        (0..Self::LEN).filter_map(Self::runtime_type).collect()
    }
}

impl TypeList for () {
    const LEN: usize = 0;

    fn runtime_type(_index: usize) -> Option<RuntimeType> {
        None
    }
}

macro_rules! impl_type_list {
    ($len:expr; $($T:ident => $idx:tt),+) => {
        impl<$($T: 'static),+> TypeList for ($($T,)+) {
            const LEN: usize = $len;

            fn runtime_type(index: usize) -> Option<RuntimeType> {
                match index {
                    $($idx => Some(RuntimeType::of::<$T>()),)+
                    _ => None,
                }
            }
        }
    };
}

impl_type_list!(1; A => 0);
impl_type_list!(2; A => 0, B => 1);
impl_type_list!(3; A => 0, B => 1, C => 2);
impl_type_list!(4; A => 0, B => 1, C => 2, D => 3);
impl_type_list!(5; A => 0, B => 1, C => 2, D => 3, E => 4);
impl_type_list!(6; A => 0, B => 1, C => 2, D => 3, E => 4, F => 5);
impl_type_list!(7; A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6);
impl_type_list!(8; A => 0, B => 1, C => 2, D => 3, E => 4, F => 5, G => 6, H => 7);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_list_order() {
        assert_eq!(<(i32, String, bool) as TypeList>::LEN, 3);
        assert_eq!(
            <(i32, String, bool)>::runtime_types(),
            vec![
                RuntimeType::of::<i32>(),
                RuntimeType::of::<String>(),
                RuntimeType::of::<bool>(),
            ]
        );
        assert_eq!(<(i32, String, bool)>::runtime_type(3), None);
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(<() as TypeList>::LEN, 0);
        assert!(<()>::runtime_types().is_empty());
    }
}
