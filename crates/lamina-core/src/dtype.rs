//! Element types and their built-in arithmetic bindings.
//!
//! Any `Copy` value can be *stored* in a [`Matrix`](crate::Matrix); doing
//! arithmetic with it needs an [`Operators`] binding, resolved through the
//! [`provider`](crate::provider). This module generates the bindings that
//! ship with the crate:
//!
//! ```text
//! Element
//!   ├── f32, f64                      (trig + fused multiply-add)
//!   └── i8, i16, i32, i64, i128, isize  (truncating division)
//! ```
//!
//! Unsigned integers have no `-1` and are deliberately left unbound.

use core::any::{Any, TypeId};
use core::fmt;

use crate::provider::{Division, Operators};

/// Storage bound for matrix and vector elements.
///
/// Blanket-implemented; it says nothing about arithmetic.
pub trait Element: Copy + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static {}

impl<T> Element for T where T: Copy + fmt::Debug + fmt::Display + PartialEq + Send + Sync + 'static {}

/// Element types whose binding is compiled into the crate.
pub(crate) trait Builtin: Element {
    fn binding() -> Operators<Self>;
}

// ===========================================================================
// Macro implementations
// ===========================================================================

macro_rules! impl_builtin_float {
    ($ty:ty) => {
        impl Builtin for $ty {
            #[allow(clippy::cast_precision_loss, clippy::float_cmp)]
            fn binding() -> Operators<Self> {
                Operators {
                    add: |a, b| a + b,
                    sub: |a, b| a - b,
                    mul: |a, b| a * b,
                    div: |a, b| a / b,
                    neg: |a| -a,
                    mul_add: <$ty>::mul_add,
                    eq: |a, b| a == b,
                    ne: |a, b| a != b,
                    is_even: |a| a % 2.0 == 0.0,
                    partial_cmp: |a, b| a.partial_cmp(&b),
                    abs: <$ty>::abs,
                    from_i32: |v| v as $ty,
                    zero: 0.0,
                    one: 1.0,
                    neg_one: -1.0,
                    division: Division::Field,
                    epsilon: <$ty>::EPSILON,
                    sin: Some(<$ty>::sin as fn($ty) -> $ty),
                    cos: Some(<$ty>::cos as fn($ty) -> $ty),
                }
            }
        }
    };
}

macro_rules! impl_builtin_int {
    ($ty:ty) => {
        impl Builtin for $ty {
            #[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
            fn binding() -> Operators<Self> {
                Operators {
                    add: |a, b| a + b,
                    sub: |a, b| a - b,
                    mul: |a, b| a * b,
                    div: |a, b| a / b,
                    neg: |a| -a,
                    mul_add: |a, b, c| a * b + c,
                    eq: |a, b| a == b,
                    ne: |a, b| a != b,
                    is_even: |a| a % 2 == 0,
                    partial_cmp: |a, b| a.partial_cmp(&b),
                    abs: <$ty>::wrapping_abs,
                    from_i32: |v| v as $ty,
                    zero: 0,
                    one: 1,
                    neg_one: -1,
                    division: Division::Truncating,
                    epsilon: 0,
                    sin: None,
                    cos: None,
                }
            }
        }
    };
}

impl_builtin_float!(f32);
impl_builtin_float!(f64);

impl_builtin_int!(i8);
impl_builtin_int!(i16);
impl_builtin_int!(i32);
impl_builtin_int!(i64);
impl_builtin_int!(i128);
impl_builtin_int!(isize);

macro_rules! builtin_table {
    ($($ty:ty),* $(,)?) => {
        /// Look up the compiled-in binding for a type id, boxed for the
        /// provider's type-erased cache.
        pub(crate) fn builtin_binding(id: TypeId) -> Option<Box<dyn Any + Send + Sync>> {
            $(
                if id == TypeId::of::<$ty>() {
                    return Some(Box::new(<$ty as Builtin>::binding()));
                }
            )*
            None
        }

        pub(crate) fn has_builtin(id: TypeId) -> bool {
            $(id == TypeId::of::<$ty>())||*
        }
    };
}

builtin_table!(f32, f64, i8, i16, i32, i64, i128, isize);

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use core::cmp::Ordering;

    use super::*;

    #[test]
    fn test_float_binding_constants() {
        let ops = f64::binding();
        assert_eq!(ops.zero, 0.0);
        assert_eq!(ops.one, 1.0);
        assert_eq!(ops.neg_one, -1.0);
        assert_eq!((ops.from_i32)(-7), -7.0);
        assert_eq!(ops.division, Division::Field);
        assert_eq!(ops.epsilon, f64::EPSILON);
    }

    #[test]
    fn test_float_binding_ops() {
        let ops = f32::binding();
        assert_eq!((ops.add)(1.5, 2.0), 3.5);
        assert_eq!((ops.mul_add)(2.0, 3.0, 1.0), 7.0);
        assert!((ops.is_even)(4.0));
        assert!(!(ops.is_even)(3.0));
        assert_eq!((ops.partial_cmp)(1.0, 2.0), Some(Ordering::Less));
        assert!(ops.sin.is_some());
    }

    #[test]
    fn test_int_binding() {
        let ops = i32::binding();
        assert_eq!((ops.div)(7, 2), 3);
        assert_eq!((ops.neg)(5), -5);
        assert_eq!((ops.abs)(-9), 9);
        assert!((ops.is_even)(-4));
        assert!(ops.cos.is_none());
        assert_eq!(ops.division, Division::Truncating);
        assert_eq!(ops.epsilon, 0);
    }

    #[test]
    fn test_builtin_table() {
        assert!(has_builtin(TypeId::of::<i64>()));
        assert!(!has_builtin(TypeId::of::<u32>()));
        assert!(builtin_binding(TypeId::of::<u8>()).is_none());
        let boxed = builtin_binding(TypeId::of::<i16>()).unwrap();
        assert!(boxed.downcast_ref::<Operators<i16>>().is_some());
    }
}
