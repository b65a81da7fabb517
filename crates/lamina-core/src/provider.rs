//! Numeric operation provider.
//!
//! Matrix algorithms never use `+` or `*` on their elements directly. They
//! ask [`resolve`] for the element type's [`Operators`] once per call and
//! apply the function pointers it holds. Bindings come from two places:
//!
//! 1. the built-in table in [`dtype`](crate::dtype) (`f32`, `f64`, signed
//!    integers), bound lazily on first use;
//! 2. [`register`], for caller-defined element types.
//!
//! Each type is bound at most once per process. The cache is a
//! read-mostly map guarded by a `RwLock`; a miss re-checks under the write
//! lock, so concurrent first use converges on a single binding.

use core::any::{Any, TypeId, type_name};
use core::cmp::Ordering;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use log::debug;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use crate::dtype::{self, Element};
use crate::error::{MatrixError, Result};

/// What `div` means for an element type. Elimination picks its strategy
/// from this.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Division {
    /// Every nonzero element has a reciprocal: floats, finite fields,
    /// rationals.
    Field,
    /// `div` truncates (the built-in integers). Elimination stays
    /// fraction-free and refuses steps that would need a fraction.
    Truncating,
}

/// The arithmetic binding for one element type.
///
/// All fields are plain function pointers or constants, so a binding is
/// `Copy`, `Send` and `Sync` and can be shared freely once resolved.
#[derive(Debug, Clone, Copy)]
pub struct Operators<T> {
    pub add: fn(T, T) -> T,
    pub sub: fn(T, T) -> T,
    pub mul: fn(T, T) -> T,
    pub div: fn(T, T) -> T,
    pub neg: fn(T) -> T,
    /// `mul_add(a, b, c) = a * b + c`, fused where the type supports it.
    pub mul_add: fn(T, T, T) -> T,
    pub eq: fn(T, T) -> bool,
    pub ne: fn(T, T) -> bool,
    pub is_even: fn(T) -> bool,
    pub partial_cmp: fn(T, T) -> Option<Ordering>,
    pub abs: fn(T) -> T,
    pub from_i32: fn(i32) -> T,
    pub zero: T,
    pub one: T,
    pub neg_one: T,
    pub division: Division,
    /// Smallest meaningful step near one; `zero` for exact types. LU
    /// treats pivots within `1000 * epsilon` of zero as singular.
    pub epsilon: T,
    /// Trig bindings; `None` for types without a meaningful sine.
    pub sin: Option<fn(T) -> T>,
    pub cos: Option<fn(T) -> T>,
}

impl<T: Element> Operators<T> {
    #[inline]
    pub fn is_zero(&self, value: T) -> bool {
        (self.eq)(value, self.zero)
    }

    /// `|a - b| <= tolerance`. Unordered values (NaN) are never within
    /// tolerance.
    #[inline]
    pub fn within(&self, a: T, b: T, tolerance: T) -> bool {
        let diff = (self.abs)((self.sub)(a, b));
        matches!(
            (self.partial_cmp)(diff, tolerance),
            Some(Ordering::Less | Ordering::Equal)
        )
    }

    /// `a / b` when `b` divides `a` without remainder, `None` otherwise.
    /// Always `Some` for a nonzero divisor of a [`Division::Field`] type.
    #[inline]
    pub fn divide_exact(&self, a: T, b: T) -> Option<T> {
        if self.is_zero(b) {
            return None;
        }
        let q = (self.div)(a, b);
        match self.division {
            Division::Field => Some(q),
            Division::Truncating => (self.eq)((self.mul)(q, b), a).then_some(q),
        }
    }

    /// Sine through the trig binding.
    pub fn sine(&self, value: T) -> Result<T> {
        self.sin
            .map(|sin| sin(value))
            .ok_or_else(|| unbound::<T>("no sine binding"))
    }

    /// Cosine through the trig binding.
    pub fn cosine(&self, value: T) -> Result<T> {
        self.cos
            .map(|cos| cos(value))
            .ok_or_else(|| unbound::<T>("no cosine binding"))
    }
}

type Binding = &'static (dyn Any + Send + Sync);

static REGISTRY: Lazy<RwLock<HashMap<TypeId, Binding>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Resolve the operator binding for `T`, binding it on first use.
///
/// # Errors
///
/// [`MatrixError::Configuration`] if `T` has neither a built-in nor a
/// registered binding.
///
/// ```
/// # use lamina_core::provider;
/// let ops = provider::resolve::<f64>().unwrap();
/// assert_eq!((ops.add)(1.0, 2.0), 3.0);
/// assert!(provider::resolve::<u32>().is_err());
/// ```
pub fn resolve<T: Element>() -> Result<&'static Operators<T>> {
    let id = TypeId::of::<T>();

    // Fast path: already bound.
    if let Some(&binding) = REGISTRY.read().get(&id) {
        return downcast(binding);
    }

    let mut registry = REGISTRY.write();
    let binding = match registry.entry(id) {
        Entry::Occupied(slot) => *slot.get(),
        Entry::Vacant(slot) => {
            let Some(boxed) = dtype::builtin_binding(id) else {
                return Err(unbound::<T>("no built-in or registered binding"));
            };
            debug!("bound built-in operators for `{}`", type_name::<T>());
            let leaked: Binding = Box::leak(boxed);
            *slot.insert(leaked)
        }
    };
    downcast(binding)
}

/// Install a binding for a caller-defined element type.
///
/// # Errors
///
/// [`MatrixError::Configuration`] if `T` already has a binding, either
/// built-in or previously registered. Bindings never change once made.
pub fn register<T: Element>(operators: Operators<T>) -> Result<()> {
    let id = TypeId::of::<T>();
    if dtype::has_builtin(id) {
        return Err(unbound::<T>("built-in bindings cannot be replaced"));
    }

    let mut registry = REGISTRY.write();
    match registry.entry(id) {
        Entry::Occupied(_) => Err(unbound::<T>("type is already bound")),
        Entry::Vacant(slot) => {
            debug!("registered operators for `{}`", type_name::<T>());
            slot.insert(Box::leak(Box::new(operators)));
            Ok(())
        }
    }
}

/// Whether `T` can currently be resolved without error.
pub fn is_bound<T: Element>() -> bool {
    let id = TypeId::of::<T>();
    dtype::has_builtin(id) || REGISTRY.read().contains_key(&id)
}

fn downcast<T: Element>(binding: Binding) -> Result<&'static Operators<T>> {
    binding
        .downcast_ref::<Operators<T>>()
        .ok_or_else(|| unbound::<T>("cached binding has a foreign element type"))
}

pub(crate) fn unbound<T>(reason: &'static str) -> MatrixError {
    MatrixError::Configuration {
        type_name: type_name::<T>(),
        reason,
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use std::fmt;
    use std::thread;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_resolve_builtin() {
        let ops = resolve::<f64>().unwrap();
        assert_eq!((ops.mul)(3.0, 4.0), 12.0);
        assert_eq!(ops.neg_one, -1.0);
        let ops = resolve::<i64>().unwrap();
        assert_eq!((ops.sub)(3, 4), -1);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let a = resolve::<i16>().unwrap();
        let b = resolve::<i16>().unwrap();
        assert!(core::ptr::eq(a, b));
    }

    #[test]
    fn test_concurrent_first_use_converges() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| core::ptr::from_ref(resolve::<f32>().unwrap()) as usize))
            .collect();
        let addrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_unsigned_is_unbound() {
        let err = resolve::<u8>().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(!is_bound::<u64>());
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Mod7(i32);

    impl fmt::Display for Mod7 {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{} (mod 7)", self.0)
        }
    }

    fn mod7() -> Operators<Mod7> {
        Operators {
            add: |a, b| Mod7((a.0 + b.0).rem_euclid(7)),
            sub: |a, b| Mod7((a.0 - b.0).rem_euclid(7)),
            mul: |a, b| Mod7((a.0 * b.0).rem_euclid(7)),
            // Multiply by the inverse: b^5 == b^-1 in Z/7.
            div: |a, b| Mod7((a.0 * b.0.pow(5)).rem_euclid(7)),
            neg: |a| Mod7((-a.0).rem_euclid(7)),
            mul_add: |a, b, c| Mod7((a.0 * b.0 + c.0).rem_euclid(7)),
            eq: |a, b| a == b,
            ne: |a, b| a != b,
            is_even: |a| a.0 % 2 == 0,
            partial_cmp: |a, b| a.0.partial_cmp(&b.0),
            abs: |a| a,
            from_i32: |v| Mod7(v.rem_euclid(7)),
            zero: Mod7(0),
            one: Mod7(1),
            neg_one: Mod7(6),
            division: Division::Field,
            epsilon: Mod7(0),
            sin: None,
            cos: None,
        }
    }

    #[test]
    fn test_register_custom_type() {
        assert!(!is_bound::<Mod7>());
        assert_eq!(
            resolve::<Mod7>().unwrap_err().kind(),
            ErrorKind::Configuration
        );
        register(mod7()).unwrap();
        assert!(is_bound::<Mod7>());
        let ops = resolve::<Mod7>().unwrap();
        assert_eq!((ops.add)(Mod7(5), Mod7(4)), Mod7(2));
        assert_eq!((ops.div)(Mod7(1), Mod7(3)), Mod7(5));
        // Rebinding is refused.
        assert!(register(mod7()).is_err());
    }

    #[test]
    fn test_register_refuses_builtin() {
        let existing = *resolve::<f64>().unwrap();
        let err = register(existing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_within_and_trig() {
        let ops = resolve::<f64>().unwrap();
        assert!(ops.within(1.0, 1.0 + 1e-12, 1e-9));
        assert!(!ops.within(1.0, 1.1, 1e-9));
        assert!(!ops.within(f64::NAN, 1.0, 1e9));
        assert_eq!(ops.sine(0.0).unwrap(), 0.0);
        assert_eq!(ops.cosine(0.0).unwrap(), 1.0);

        let ops = resolve::<i32>().unwrap();
        assert_eq!(ops.sine(1).unwrap_err().kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_divide_exact() {
        let ops = resolve::<i64>().unwrap();
        assert_eq!(ops.divide_exact(12, -4), Some(-3));
        assert_eq!(ops.divide_exact(1, 2), None);
        assert_eq!(ops.divide_exact(3, 0), None);

        let ops = resolve::<f64>().unwrap();
        assert_eq!(ops.divide_exact(1.0, 4.0), Some(0.25));
        assert_eq!(ops.divide_exact(1.0, 0.0), None);
    }
}
