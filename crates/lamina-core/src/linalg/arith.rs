//! Algebraic operators: element-wise arithmetic, products and powers.
//!
//! Every function validates shapes before touching a buffer and takes an
//! optional `out` matrix whose storage is reused when its length matches
//! the result. The `Matrix` methods at the bottom of this file are the
//! aliased forms, where `self` is both an operand and the destination.

use log::trace;

use crate::dtype::Element;
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::provider::{self, Operators};
use crate::vector::Vector;

// ======================================================================
// Element-wise
// ======================================================================

fn check_same_shape<T: Element>(
    operation: &'static str,
    a: &Matrix<T>,
    b: &Matrix<T>,
) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(MatrixError::shapes(operation, a.shape(), b.shape()));
    }
    Ok(())
}

fn zip_into<T: Element>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    out: Option<Matrix<T>>,
    f: impl Fn(T, T) -> T,
) -> Matrix<T> {
    let mut c = Matrix::prepare_output(out, a.rows, a.columns, a.data[0]);
    for ((z, &x), &y) in c.data.iter_mut().zip(&a.data).zip(&b.data) {
        *z = f(x, y);
    }
    c
}

fn map_into<T: Element>(a: &Matrix<T>, out: Option<Matrix<T>>, f: impl Fn(T) -> T) -> Matrix<T> {
    let mut c = Matrix::prepare_output(out, a.rows, a.columns, a.data[0]);
    for (z, &x) in c.data.iter_mut().zip(&a.data) {
        *z = f(x);
    }
    c
}

/// Element-wise `a + b`. Shapes must be identical.
///
/// ```
/// # use lamina_core::{Matrix, linalg};
/// let a = Matrix::from_vec(1, 3, vec![1, 2, 3]).unwrap();
/// let b = Matrix::from_vec(1, 3, vec![10, 20, 30]).unwrap();
/// let c = linalg::add(&a, &b, None).unwrap();
/// assert_eq!(c.as_slice(), &[11, 22, 33]);
/// ```
pub fn add<T: Element>(a: &Matrix<T>, b: &Matrix<T>, out: Option<Matrix<T>>) -> Result<Matrix<T>> {
    check_same_shape("add", a, b)?;
    let ops = provider::resolve::<T>()?;
    Ok(zip_into(a, b, out, ops.add))
}

/// Element-wise `a - b`. Shapes must be identical.
pub fn subtract<T: Element>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    out: Option<Matrix<T>>,
) -> Result<Matrix<T>> {
    check_same_shape("subtract", a, b)?;
    let ops = provider::resolve::<T>()?;
    Ok(zip_into(a, b, out, ops.sub))
}

/// Element-wise `-a`.
pub fn negate<T: Element>(a: &Matrix<T>, out: Option<Matrix<T>>) -> Result<Matrix<T>> {
    let ops = provider::resolve::<T>()?;
    Ok(map_into(a, out, ops.neg))
}

/// `a * scalar`, element-wise.
pub fn scale<T: Element>(a: &Matrix<T>, scalar: T, out: Option<Matrix<T>>) -> Result<Matrix<T>> {
    let ops = provider::resolve::<T>()?;
    Ok(map_into(a, out, |x| (ops.mul)(x, scalar)))
}

/// `a / scalar`, element-wise. Division by zero follows the element type.
pub fn divide<T: Element>(a: &Matrix<T>, scalar: T, out: Option<Matrix<T>>) -> Result<Matrix<T>> {
    let ops = provider::resolve::<T>()?;
    Ok(map_into(a, out, |x| (ops.div)(x, scalar)))
}

// ======================================================================
// Products
// ======================================================================

fn check_multiply<T: Element>(a: &Matrix<T>, b: &Matrix<T>) -> Result<()> {
    if a.columns != b.rows {
        return Err(MatrixError::shapes("multiply", a.shape(), b.shape()));
    }
    Ok(())
}

/// `a * b` into `out`, shapes already validated.
fn multiply_with<T: Element>(
    ops: &Operators<T>,
    a: &Matrix<T>,
    b: &Matrix<T>,
    out: Option<Matrix<T>>,
) -> Matrix<T> {
    let (m, k, n) = (a.rows, a.columns, b.columns);
    let mut c = Matrix::prepare_output(out, m, n, ops.zero);
    // ijk loop order (row-major friendly for A and C)
    for i in 0..m {
        let a_row = &a.data[i * k..(i + 1) * k];
        for j in 0..n {
            let mut acc = ops.zero;
            for (p, &x) in a_row.iter().enumerate() {
                acc = (ops.mul_add)(x, b.data[p * n + j], acc);
            }
            c.data[i * n + j] = acc;
        }
    }
    c
}

/// Matrix product `a * b`; requires `a.columns() == b.rows()`.
///
/// ```
/// # use lamina_core::{Matrix, linalg};
/// let a = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let b = Matrix::from_vec(2, 2, vec![5.0, 6.0, 7.0, 8.0]).unwrap();
/// let c = linalg::multiply(&a, &b, None).unwrap();
/// assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
/// ```
pub fn multiply<T: Element>(
    a: &Matrix<T>,
    b: &Matrix<T>,
    out: Option<Matrix<T>>,
) -> Result<Matrix<T>> {
    check_multiply(a, b)?;
    let ops = provider::resolve::<T>()?;
    Ok(multiply_with(ops, a, b, out))
}

/// Matrix-vector product `a * v`; requires `a.columns() == v.dimensions()`.
pub fn multiply_vector<T: Element>(a: &Matrix<T>, v: &Vector<T>) -> Result<Vector<T>> {
    if a.columns != v.dimensions() {
        return Err(MatrixError::shapes(
            "multiply_vector",
            a.shape(),
            (v.dimensions(), 1),
        ));
    }
    let ops = provider::resolve::<T>()?;
    let x = v.as_slice();
    let y = a
        .data
        .chunks(a.columns)
        .map(|row| {
            row.iter()
                .zip(x)
                .fold(ops.zero, |acc, (&r, &xi)| (ops.mul_add)(r, xi, acc))
        })
        .collect();
    Vector::from_vec(y)
}

/// `a` raised to a non-negative integer power; `a` must be square and
/// `a^0` is the identity.
///
/// Computed by binary exponentiation: `O(n^3 log exponent)`.
///
/// ```
/// # use lamina_core::{Matrix, linalg};
/// let fib = Matrix::from_vec(2, 2, vec![1_i64, 1, 1, 0]).unwrap();
/// let p = linalg::power(&fib, 10, None).unwrap();
/// assert_eq!(p.as_slice(), &[89, 55, 55, 34]);
/// ```
pub fn power<T: Element>(a: &Matrix<T>, exponent: u32, out: Option<Matrix<T>>) -> Result<Matrix<T>> {
    if !a.is_square() {
        return Err(MatrixError::Domain {
            operation: "power",
            reason: "matrix must be square",
        });
    }
    let ops = provider::resolve::<T>()?;
    let n = a.rows;

    let mut result = Matrix::prepare_output(out, n, n, ops.zero);
    if exponent == 0 {
        result.fill(|r, c| if r == c { ops.one } else { ops.zero });
        return Ok(result);
    }

    let mut base = a.clone();
    let mut acc: Option<Matrix<T>> = None;
    let mut scratch: Option<Matrix<T>> = None;
    let mut e = exponent;
    loop {
        if e & 1 == 1 {
            acc = Some(match acc {
                None => base.clone(),
                Some(prev) => {
                    let next = multiply_with(ops, &prev, &base, scratch.take());
                    scratch = Some(prev);
                    next
                }
            });
        }
        e >>= 1;
        if e == 0 {
            break;
        }
        let squared = multiply_with(ops, &base, &base, scratch.take());
        scratch = Some(core::mem::replace(&mut base, squared));
    }

    if let Some(acc) = acc {
        result.data.copy_from_slice(&acc.data);
    }
    Ok(result)
}

// ======================================================================
// Aliased (in-place) forms
// ======================================================================

impl<T: Element> Matrix<T> {
    /// `self += rhs`.
    pub fn add_in_place(&mut self, rhs: &Matrix<T>) -> Result<()> {
        check_same_shape("add", self, rhs)?;
        let ops = provider::resolve::<T>()?;
        for (x, &y) in self.data.iter_mut().zip(&rhs.data) {
            *x = (ops.add)(*x, y);
        }
        Ok(())
    }

    /// `self -= rhs`.
    pub fn sub_in_place(&mut self, rhs: &Matrix<T>) -> Result<()> {
        check_same_shape("subtract", self, rhs)?;
        let ops = provider::resolve::<T>()?;
        for (x, &y) in self.data.iter_mut().zip(&rhs.data) {
            *x = (ops.sub)(*x, y);
        }
        Ok(())
    }

    pub fn negate_in_place(&mut self) -> Result<()> {
        let ops = provider::resolve::<T>()?;
        for x in &mut self.data {
            *x = (ops.neg)(*x);
        }
        Ok(())
    }

    pub fn scale_in_place(&mut self, scalar: T) -> Result<()> {
        let ops = provider::resolve::<T>()?;
        for x in &mut self.data {
            *x = (ops.mul)(*x, scalar);
        }
        Ok(())
    }

    pub fn divide_in_place(&mut self, scalar: T) -> Result<()> {
        let ops = provider::resolve::<T>()?;
        for x in &mut self.data {
            *x = (ops.div)(*x, scalar);
        }
        Ok(())
    }

    /// `self = self * rhs`. The left operand is cloned first; the result
    /// reuses `self`'s buffer when the shape allows.
    pub fn multiply_assign(&mut self, rhs: &Matrix<T>) -> Result<()> {
        check_multiply(self, rhs)?;
        let ops = provider::resolve::<T>()?;
        trace!("multiply_assign: cloning aliased left operand");
        let lhs = self.clone();
        let out = self.take_storage();
        *self = multiply_with(ops, &lhs, rhs, Some(out));
        Ok(())
    }

    /// `self = lhs * self`.
    pub fn premultiply_assign(&mut self, lhs: &Matrix<T>) -> Result<()> {
        check_multiply(lhs, self)?;
        let ops = provider::resolve::<T>()?;
        trace!("premultiply_assign: cloning aliased right operand");
        let rhs = self.clone();
        let out = self.take_storage();
        *self = multiply_with(ops, lhs, &rhs, Some(out));
        Ok(())
    }

    /// `self = self * self`; the aliased form of `multiply(a, a, a)`.
    pub fn square_in_place(&mut self) -> Result<()> {
        check_multiply(self, self)?;
        let ops = provider::resolve::<T>()?;
        trace!("square_in_place: cloning aliased operand");
        let operand = self.clone();
        let out = self.take_storage();
        *self = multiply_with(ops, &operand, &operand, Some(out));
        Ok(())
    }
}
