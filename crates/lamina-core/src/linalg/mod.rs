//! Linear algebra over [`Matrix`].
//!
//! Every routine resolves the element binding through
//! [`provider::resolve`](crate::provider::resolve), so the same code runs
//! for floats, signed integers and registered custom types.
//!
//! | Group | Operations | Complexity |
//! |-------|-----------|------------|
//! | Element-wise | [`add`], [`subtract`], [`negate`], [`scale`], [`divide`] | O(n^2) |
//! | Products | [`multiply`], [`multiply_vector`], [`power`] | O(n^3), O(n^3 log k) |
//! | Elimination | [`echelon`], [`reduced_echelon`], [`determinant`] | O(n^3) |
//! | Cofactors | [`cofactors`], [`adjoint`], [`inverse`] | O(n^5) |
//! | Transform | [`rotate4x4`] | O(1) |
//!
//! Decompositions: [`LuDecomposition`]
//!
//! Functions producing a matrix take `out: Option<Matrix<T>>`. When its
//! buffer length equals the result length the storage is reused and
//! reshaped; otherwise a new matrix is allocated.

mod arith;
mod lu;
mod reduce;
mod transform;

pub use arith::{add, divide, multiply, multiply_vector, negate, power, scale, subtract};
pub use lu::LuDecomposition;
pub use reduce::{adjoint, cofactors, determinant, echelon, inverse, reduced_echelon};
pub use transform::rotate4x4;

use crate::dtype::Element;
use crate::error::Result;
use crate::matrix::Matrix;
use crate::vector::Vector;

/// Solve `Ax = b` for square `A` via LU decomposition with partial pivoting.
///
/// ```
/// # use lamina_core::{Matrix, Vector, linalg};
/// let a = Matrix::from_vec(3, 3, vec![2.0_f64, 1.0, 0.0, 1.0, 4.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
/// let x = linalg::solve(&a, &Vector::new3(5.0, 6.0, 2.0)).unwrap();
/// assert!((x.x().unwrap() - 2.0).abs() < 1e-10);
/// assert!((x.y().unwrap() - 1.0).abs() < 1e-10);
/// ```
pub fn solve<T: Element>(a: &Matrix<T>, b: &Vector<T>) -> Result<Vector<T>> {
    LuDecomposition::decompose(a)?.solve(b)
}

// ======================================================================
// Method forms
// ======================================================================

impl<T: Element> Matrix<T> {
    /// `self · rhs` into a fresh matrix.
    pub fn matmul(&self, rhs: &Matrix<T>) -> Result<Matrix<T>> {
        multiply(self, rhs, None)
    }

    /// `self · v`.
    pub fn matvec(&self, v: &Vector<T>) -> Result<Vector<T>> {
        multiply_vector(self, v)
    }

    /// `self^exponent`; `self^0` is the identity.
    pub fn pow(&self, exponent: u32) -> Result<Matrix<T>> {
        power(self, exponent, None)
    }

    pub fn det(&self) -> Result<T> {
        determinant(self)
    }

    /// Row echelon form.
    pub fn echelon(&self) -> Result<Matrix<T>> {
        echelon(self, None)
    }

    /// Reduced row echelon form.
    pub fn rref(&self) -> Result<Matrix<T>> {
        reduced_echelon(self, None)
    }

    pub fn cofactor_matrix(&self) -> Result<Matrix<T>> {
        cofactors(self, None)
    }

    pub fn adjoint(&self) -> Result<Matrix<T>> {
        adjoint(self, None)
    }

    /// `adjoint / det`, failing with
    /// [`MatrixError::Singular`](crate::MatrixError::Singular) when
    /// `|det| <= tolerance`.
    pub fn inverse(&self, tolerance: T) -> Result<Matrix<T>> {
        inverse(self, tolerance, None)
    }

    pub fn lu(&self) -> Result<LuDecomposition<T>> {
        LuDecomposition::decompose(self)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_method_forms_agree() {
        let a = Matrix::from_array([[2.0_f64, 1.0], [1.0, 4.0]]).unwrap();
        assert_eq!(a.matmul(&a).unwrap(), multiply(&a, &a, None).unwrap());
        assert_eq!(a.pow(3).unwrap(), power(&a, 3, None).unwrap());
        assert_eq!(a.det().unwrap(), 7.0);
        assert_eq!(a.rref().unwrap(), Matrix::identity(2, 2).unwrap());
        assert_eq!(a.adjoint().unwrap().to_rows(), vec![vec![4.0, -1.0], vec![-1.0, 2.0]]);
        assert!((a.lu().unwrap().det() - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_solve() {
        let a = Matrix::from_array([[2.0_f64, 1.0, 0.0], [1.0, 4.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        let x = solve(&a, &Vector::new3(5.0, 6.0, 2.0)).unwrap();
        let back = a.matvec(&x).unwrap();
        for (got, want) in back.as_slice().iter().zip([5.0, 6.0, 2.0]) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_solve_singular() {
        let a = Matrix::from_array([[1.0, 2.0, 0.0], [2.0, 4.0, 0.0], [0.0, 0.0, 1.0]]).unwrap();
        let err = solve(&a, &Vector::new3(1.0, 1.0, 1.0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Singular);
    }
}
