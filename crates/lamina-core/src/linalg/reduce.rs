//! Elimination-based reductions: echelon forms, determinant, cofactors,
//! adjoint and inverse.
//!
//! All mutation goes through the elementary row operations on
//! [`Matrix`]. Pivoting picks the *first* nonzero entry below the
//! diagonal, not the largest, so results are exact for exact element types
//! (rationals, finite fields) and reproducible for floats.
//!
//! Types with [`Division::Truncating`] (the built-in integers) never
//! divide inexactly:
//! - echelon forms divide a pivot row only when the pivot divides every
//!   entry, and fail with [`MatrixError::Domain`] otherwise;
//! - determinants use fraction-free Bareiss elimination, whose divisions
//!   are exact by construction;
//! - [`inverse`] fails with [`MatrixError::Domain`] when the inverse has
//!   non-integral entries.

use log::trace;

use crate::dtype::Element;
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::provider::{self, Division, Operators};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pivot {
    InPlace,
    Swapped,
    Missing,
}

/// Make `(i, i)` nonzero by swapping in the first row below with a nonzero
/// entry in column `i`.
fn seat_pivot<T: Element>(ops: &Operators<T>, m: &mut Matrix<T>, i: usize) -> Pivot {
    let cols = m.columns;
    if !ops.is_zero(m.data[i * cols + i]) {
        return Pivot::InPlace;
    }
    match ((i + 1)..m.rows).find(|&r| !ops.is_zero(m.data[r * cols + i])) {
        Some(r) => {
            m.swap_rows_unchecked(i, r);
            Pivot::Swapped
        }
        None => Pivot::Missing,
    }
}

/// Scale row `i` by the reciprocal of its pivot and return the pivot.
/// Field types only.
fn scale_by_reciprocal<T: Element>(ops: &Operators<T>, m: &mut Matrix<T>, i: usize) -> T {
    let idx = i * m.columns + i;
    let pivot = m.data[idx];
    m.scale_row_with(ops, i, (ops.div)(ops.one, pivot));
    m.data[idx] = ops.one;
    pivot
}

/// Make the pivot of row `i` exactly one.
fn normalize_pivot<T: Element>(
    ops: &Operators<T>,
    m: &mut Matrix<T>,
    i: usize,
    operation: &'static str,
) -> Result<()> {
    match ops.division {
        Division::Field => {
            scale_by_reciprocal(ops, m, i);
        }
        Division::Truncating => {
            let cols = m.columns;
            let pivot = m.data[i * cols + i];
            let row = &m.data[i * cols..(i + 1) * cols];
            if row.iter().any(|&x| ops.divide_exact(x, pivot).is_none()) {
                return Err(MatrixError::Domain {
                    operation,
                    reason: "pivot does not divide its row exactly",
                });
            }
            m.divide_row_with(ops, i, pivot);
        }
    }
    Ok(())
}

/// Zero column `i` in the given rows using the (normalized) pivot row.
fn clear_column<T: Element>(
    ops: &Operators<T>,
    m: &mut Matrix<T>,
    i: usize,
    rows: impl Iterator<Item = usize>,
) {
    let cols = m.columns;
    for r in rows {
        let factor = m.data[r * cols + i];
        if !ops.is_zero(factor) {
            m.combine_rows_with(ops, r, i, (ops.neg)(factor));
        }
    }
}

fn eliminate<T: Element>(ops: &Operators<T>, m: &mut Matrix<T>, reduced: bool) -> Result<()> {
    let operation = if reduced { "reduced_echelon" } else { "echelon" };
    for i in 0..m.rows.min(m.columns) {
        if seat_pivot(ops, m, i) == Pivot::Missing {
            trace!("{operation}: column {i} has no pivot, skipping");
            continue;
        }
        normalize_pivot(ops, m, i, operation)?;
        if reduced {
            clear_column(ops, m, i, 0..i);
        }
        clear_column(ops, m, i, (i + 1)..m.rows);
    }
    Ok(())
}

/// Reduce `m` in place. A failed truncating reduction leaves `m` untouched.
fn eliminate_in_place<T: Element>(
    ops: &Operators<T>,
    m: &mut Matrix<T>,
    reduced: bool,
) -> Result<()> {
    match ops.division {
        Division::Field => eliminate(ops, m, reduced),
        Division::Truncating => {
            let mut work = m.clone();
            eliminate(ops, &mut work, reduced)?;
            *m = work;
            Ok(())
        }
    }
}

fn require_square<T: Element>(operation: &'static str, a: &Matrix<T>) -> Result<()> {
    if !a.is_square() {
        return Err(MatrixError::Domain {
            operation,
            reason: "matrix must be square",
        });
    }
    Ok(())
}

// ======================================================================
// Echelon forms
// ======================================================================

/// Row echelon form: leading ones on the pivots, zeros below them.
///
/// For integer element types every pivot must divide its row; otherwise
/// the result is [`MatrixError::Domain`].
///
/// ```
/// # use lamina_core::{Matrix, linalg};
/// let a = Matrix::from_array([[2.0, 4.0], [1.0, 3.0]]).unwrap();
/// let e = linalg::echelon(&a, None).unwrap();
/// assert_eq!(e.as_slice(), &[1.0, 2.0, 0.0, 1.0]);
///
/// let odd = Matrix::from_array([[2, 3], [1, 1]]).unwrap();
/// assert!(linalg::echelon(&odd, None).is_err());
/// ```
pub fn echelon<T: Element>(a: &Matrix<T>, out: Option<Matrix<T>>) -> Result<Matrix<T>> {
    let ops = provider::resolve::<T>()?;
    let mut m = a.copy_into(out);
    eliminate(ops, &mut m, false)?;
    Ok(m)
}

/// Reduced row echelon form: echelon form with zeros above every pivot too.
pub fn reduced_echelon<T: Element>(a: &Matrix<T>, out: Option<Matrix<T>>) -> Result<Matrix<T>> {
    let ops = provider::resolve::<T>()?;
    let mut m = a.copy_into(out);
    eliminate(ops, &mut m, true)?;
    Ok(m)
}

// ======================================================================
// Determinant
// ======================================================================

/// Forward elimination with unit pivots, multiplying the pivots together.
fn field_determinant<T: Element>(ops: &Operators<T>, m: &mut Matrix<T>) -> T {
    let mut det = ops.one;
    for i in 0..m.rows {
        match seat_pivot(ops, m, i) {
            Pivot::Missing => return ops.zero,
            Pivot::Swapped => det = (ops.neg)(det),
            Pivot::InPlace => {}
        }
        let pivot = scale_by_reciprocal(ops, m, i);
        det = (ops.mul)(det, pivot);
        clear_column(ops, m, i, (i + 1)..m.rows);
    }
    det
}

/// Fraction-free (Bareiss) elimination. Row `i` below pivot `k` becomes
/// `(pivot * row_i - m[i][k] * row_k) / previous_pivot`, a division that
/// is exact over the integers. The last diagonal entry is the determinant
/// up to the sign of the row swaps.
fn bareiss_determinant<T: Element>(ops: &Operators<T>, m: &mut Matrix<T>) -> T {
    let n = m.rows;
    let mut previous = ops.one;
    let mut negate = false;
    for k in 0..n {
        match seat_pivot(ops, m, k) {
            Pivot::Missing => return ops.zero,
            Pivot::Swapped => negate = !negate,
            Pivot::InPlace => {}
        }
        let pivot = m.data[k * n + k];
        for i in (k + 1)..n {
            let factor = m.data[i * n + k];
            m.scale_row_with(ops, i, pivot);
            if !ops.is_zero(factor) {
                m.combine_rows_with(ops, i, k, (ops.neg)(factor));
            }
            if k > 0 {
                m.divide_row_with(ops, i, previous);
            }
        }
        previous = pivot;
    }
    let det = m.data[n * n - 1];
    if negate { (ops.neg)(det) } else { det }
}

/// Determinant of a scratch matrix, consuming its contents.
fn determinant_destructive<T: Element>(ops: &Operators<T>, m: &mut Matrix<T>) -> T {
    match ops.division {
        Division::Field => field_determinant(ops, m),
        Division::Truncating => bareiss_determinant(ops, m),
    }
}

/// Determinant of a square matrix by Gaussian elimination, `O(n^3)`.
/// Exact for integer element types, barring overflow.
///
/// ```
/// # use lamina_core::{Matrix, linalg};
/// let a = Matrix::from_array([[1.0, 2.0], [3.0, 4.0]]).unwrap();
/// assert_eq!(linalg::determinant(&a).unwrap(), -2.0);
///
/// let b = Matrix::from_array([[2, 1], [1, 1]]).unwrap();
/// assert_eq!(linalg::determinant(&b).unwrap(), 1);
/// ```
pub fn determinant<T: Element>(a: &Matrix<T>) -> Result<T> {
    require_square("determinant", a)?;
    let ops = provider::resolve::<T>()?;
    let mut m = a.clone();
    Ok(determinant_destructive(ops, &mut m))
}

// ======================================================================
// Cofactors / adjoint / inverse
// ======================================================================

/// Fill `dest` so that `dest[i, j] = (-1)^(i+j) det(minor(a, i, j))`, or
/// its transpose when `transposed` is set.
fn cofactors_into<T: Element>(
    ops: &Operators<T>,
    a: &Matrix<T>,
    dest: &mut Matrix<T>,
    transposed: bool,
) -> Result<()> {
    let n = a.rows;
    if n == 1 {
        dest.data[0] = ops.one;
        return Ok(());
    }
    let mut scratch: Option<Matrix<T>> = None;
    for i in 0..n {
        for j in 0..n {
            let mut minor = a.minor(i, j, scratch.take())?;
            let det = determinant_destructive(ops, &mut minor);
            let value = if (i + j) % 2 == 0 { det } else { (ops.neg)(det) };
            let idx = if transposed { j * n + i } else { i * n + j };
            dest.data[idx] = value;
            scratch = Some(minor);
        }
    }
    Ok(())
}

/// The cofactor matrix `C[i, j] = (-1)^(i+j) det(minor(a, i, j))`.
///
/// `n^2` minors with an `O(n^3)` determinant each: `O(n^5)`. Intended for
/// small matrices. The cofactor of a 1x1 matrix is `[[1]]`.
pub fn cofactors<T: Element>(a: &Matrix<T>, out: Option<Matrix<T>>) -> Result<Matrix<T>> {
    require_square("cofactors", a)?;
    let ops = provider::resolve::<T>()?;
    let mut c = Matrix::prepare_output(out, a.rows, a.columns, ops.zero);
    cofactors_into(ops, a, &mut c, false)?;
    Ok(c)
}

/// The adjoint (adjugate): the transpose of the cofactor matrix, so that
/// `adjoint(a) * a == det(a) * I`. Same `O(n^5)` cost as [`cofactors`].
///
/// ```
/// # use lamina_core::{Matrix, linalg};
/// let a = Matrix::from_array([[1, 2], [3, 4]]).unwrap();
/// let adj = linalg::adjoint(&a, None).unwrap();
/// assert_eq!(adj.as_slice(), &[4, -2, -3, 1]);
/// ```
pub fn adjoint<T: Element>(a: &Matrix<T>, out: Option<Matrix<T>>) -> Result<Matrix<T>> {
    require_square("adjoint", a)?;
    let ops = provider::resolve::<T>()?;
    let mut c = Matrix::prepare_output(out, a.rows, a.columns, ops.zero);
    cofactors_into(ops, a, &mut c, true)?;
    Ok(c)
}

/// `adjoint(a) / det(a)`.
///
/// Returns [`MatrixError::Singular`] when `|det(a)| <= tolerance`. For
/// integer element types the inverse must itself be integral (`det` is a
/// unit, or divides every adjoint entry); otherwise the result is
/// [`MatrixError::Domain`].
pub fn inverse<T: Element>(a: &Matrix<T>, tolerance: T, out: Option<Matrix<T>>) -> Result<Matrix<T>> {
    require_square("inverse", a)?;
    let ops = provider::resolve::<T>()?;
    let det = determinant(a)?;
    if ops.within(det, ops.zero, tolerance) {
        return Err(MatrixError::Singular);
    }
    let mut inv = adjoint(a, out)?;
    if ops.division == Division::Truncating
        && inv.data.iter().any(|&x| ops.divide_exact(x, det).is_none())
    {
        return Err(MatrixError::Domain {
            operation: "inverse",
            reason: "inverse has non-integral entries",
        });
    }
    for x in &mut inv.data {
        *x = (ops.div)(*x, det);
    }
    Ok(inv)
}

// ======================================================================
// Aliased (in-place) forms
// ======================================================================

impl<T: Element> Matrix<T> {
    /// Reduce `self` to row echelon form. On error `self` is unchanged.
    pub fn echelon_in_place(&mut self) -> Result<()> {
        let ops = provider::resolve::<T>()?;
        eliminate_in_place(ops, self, false)
    }

    /// Reduce `self` to reduced row echelon form. On error `self` is
    /// unchanged.
    pub fn reduced_echelon_in_place(&mut self) -> Result<()> {
        let ops = provider::resolve::<T>()?;
        eliminate_in_place(ops, self, true)
    }
}
