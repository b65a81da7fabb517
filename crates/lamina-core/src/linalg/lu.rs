//! LU decomposition with partial pivoting.
//!
//! Decomposes a square matrix `A` into `PA = LU` where:
//! - `P` is a permutation matrix (stored as a pivot vector)
//! - `L` is lower triangular with unit diagonal
//! - `U` is upper triangular
//!
//! Unlike the echelon routines, pivoting here picks the entry of largest
//! magnitude (Doolittle with partial pivoting), which keeps the factors
//! well conditioned for floating-point element types.
//!
//! A pivot within `1000 * epsilon` of zero (see
//! [`Operators::epsilon`](crate::provider::Operators)) is treated as
//! singular, so rank-deficient float input is rejected rather than
//! factored through rounding noise. Integer element types are refused:
//! the multipliers of `L` are fractions.

use core::cmp::Ordering;

use crate::dtype::Element;
use crate::error::{MatrixError, Result};
use crate::matrix::Matrix;
use crate::provider::{self, Division, Operators};
use crate::vector::Vector;

/// Result of an LU decomposition with partial pivoting.
///
/// `L` and `U` are packed into a single buffer (the unit diagonal of `L` is
/// implicit), and the permutation is stored as a pivot index vector.
#[derive(Debug, Clone)]
pub struct LuDecomposition<T: Element> {
    /// Packed LU matrix: lower triangle holds L (without diagonal),
    /// upper triangle (including diagonal) holds U.
    lu: Vec<T>,
    /// `pivots[i]` is the original row now at position `i`.
    pivots: Vec<usize>,
    n: usize,
    /// Sign of the permutation, for the determinant.
    sign: T,
    ops: &'static Operators<T>,
}

impl<T: Element> LuDecomposition<T> {
    /// Factor a square matrix.
    ///
    /// Returns [`MatrixError::Domain`] for a non-square input or an
    /// element type with truncating division, and [`MatrixError::Singular`]
    /// when no pivot candidate exceeds `1000 * epsilon` in magnitude.
    ///
    /// ```
    /// # use lamina_core::{Matrix, linalg::LuDecomposition};
    /// let a = Matrix::from_vec(2, 2, vec![2.0_f64, 1.0, 1.0, 4.0]).unwrap();
    /// let lu = LuDecomposition::decompose(&a).unwrap();
    /// assert!((lu.det() - 7.0).abs() < 1e-10);
    /// ```
    pub fn decompose(a: &Matrix<T>) -> Result<Self> {
        let ops = provider::resolve::<T>()?;
        let tolerance = (ops.mul)(ops.epsilon, (ops.from_i32)(1000));
        Self::decompose_with_tolerance(a, tolerance)
    }

    /// [`decompose`](Self::decompose) with an explicit singularity
    /// threshold: a pivot with `|pivot| <= tolerance` fails with
    /// [`MatrixError::Singular`].
    pub fn decompose_with_tolerance(a: &Matrix<T>, tolerance: T) -> Result<Self> {
        if !a.is_square() {
            return Err(MatrixError::Domain {
                operation: "lu",
                reason: "matrix must be square",
            });
        }
        let ops = provider::resolve::<T>()?;
        if ops.division == Division::Truncating {
            return Err(MatrixError::Domain {
                operation: "lu",
                reason: "element type has no exact division",
            });
        }
        let n = a.rows();

        let mut lu: Vec<T> = a.as_slice().to_vec();
        let mut pivots: Vec<usize> = (0..n).collect();
        let mut sign = ops.one;

        for k in 0..n {
            // Find pivot: row with largest |lu[i, k]| for i >= k
            let mut max_val = (ops.abs)(lu[k * n + k]);
            let mut max_row = k;
            for i in (k + 1)..n {
                let val = (ops.abs)(lu[i * n + k]);
                if (ops.partial_cmp)(val, max_val) == Some(Ordering::Greater) {
                    max_val = val;
                    max_row = i;
                }
            }

            if max_row != k {
                for j in 0..n {
                    lu.swap(k * n + j, max_row * n + j);
                }
                pivots.swap(k, max_row);
                sign = (ops.neg)(sign);
            }

            let pivot = lu[k * n + k];
            if ops.within(pivot, ops.zero, tolerance) {
                return Err(MatrixError::Singular);
            }

            // Eliminate below the pivot
            for i in (k + 1)..n {
                let factor = (ops.div)(lu[i * n + k], pivot);
                lu[i * n + k] = factor;
                let neg_factor = (ops.neg)(factor);
                for j in (k + 1)..n {
                    lu[i * n + j] = (ops.mul_add)(neg_factor, lu[k * n + j], lu[i * n + j]);
                }
            }
        }

        Ok(Self {
            lu,
            pivots,
            n,
            sign,
            ops,
        })
    }

    fn square(&self, data: Vec<T>) -> Matrix<T> {
        Matrix {
            data,
            rows: self.n,
            columns: self.n,
        }
    }

    /// The lower triangular factor `L` (unit diagonal).
    pub fn l(&self) -> Matrix<T> {
        let n = self.n;
        let mut data = vec![self.ops.zero; n * n];
        for i in 0..n {
            data[i * n + i] = self.ops.one;
            data[i * n..i * n + i].copy_from_slice(&self.lu[i * n..i * n + i]);
        }
        self.square(data)
    }

    /// The upper triangular factor `U`.
    pub fn u(&self) -> Matrix<T> {
        let n = self.n;
        let mut data = vec![self.ops.zero; n * n];
        for i in 0..n {
            data[i * n + i..(i + 1) * n].copy_from_slice(&self.lu[i * n + i..(i + 1) * n]);
        }
        self.square(data)
    }

    /// The permutation matrix `P`.
    pub fn p(&self) -> Matrix<T> {
        let n = self.n;
        let mut data = vec![self.ops.zero; n * n];
        for (i, &pi) in self.pivots.iter().enumerate() {
            data[i * n + pi] = self.ops.one;
        }
        self.square(data)
    }

    /// The permutation pivot vector.
    pub fn pivots(&self) -> &[usize] {
        &self.pivots
    }

    /// `det(A) = sign * product(diag(U))`
    pub fn det(&self) -> T {
        let n = self.n;
        (0..n).fold(self.sign, |d, i| (self.ops.mul)(d, self.lu[i * n + i]))
    }

    /// Solve `Ax = b` using the precomputed factorization.
    pub fn solve(&self, b: &Vector<T>) -> Result<Vector<T>> {
        let n = self.n;
        if b.dimensions() != n {
            return Err(MatrixError::shapes("lu solve", (n, n), (b.dimensions(), 1)));
        }
        let ops = self.ops;
        let b_data = b.as_slice();

        // Apply permutation: Pb
        let mut x: Vec<T> = self.pivots.iter().map(|&pi| b_data[pi]).collect();

        // Forward substitution: Ly = Pb
        #[allow(clippy::needless_range_loop)]
        for i in 1..n {
            for j in 0..i {
                x[i] = (ops.mul_add)((ops.neg)(self.lu[i * n + j]), x[j], x[i]);
            }
        }

        // Back substitution: Ux = y
        #[allow(clippy::needless_range_loop)]
        for i in (0..n).rev() {
            for j in (i + 1)..n {
                x[i] = (ops.mul_add)((ops.neg)(self.lu[i * n + j]), x[j], x[i]);
            }
            x[i] = (ops.div)(x[i], self.lu[i * n + i]);
        }

        Vector::from_vec(x)
    }

    /// Solve `AX = I` column by column.
    pub fn inverse(&self) -> Result<Matrix<T>> {
        let n = self.n;
        let mut inv = vec![self.ops.zero; n * n];
        for col in 0..n {
            let mut e = vec![self.ops.zero; n];
            e[col] = self.ops.one;
            let x = self.solve(&Vector::from_vec(e)?)?;
            for (row, &v) in x.as_slice().iter().enumerate() {
                inv[row * n + col] = v;
            }
        }
        Ok(self.square(inv))
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::linalg::arith::multiply;

    fn mat(data: &[f64], n: usize) -> Matrix<f64> {
        Matrix::from_vec(n, n, data.to_vec()).unwrap()
    }

    fn approx_eq(a: &[f64], b: &[f64], tol: f64) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(&x, &y)| (x - y).abs() < tol)
    }

    fn assert_pa_eq_lu(a: &Matrix<f64>, tol: f64) {
        let lu = LuDecomposition::decompose(a).unwrap();
        let pa = multiply(&lu.p(), a, None).unwrap();
        let prod = multiply(&lu.l(), &lu.u(), None).unwrap();
        assert!(approx_eq(pa.as_slice(), prod.as_slice(), tol));
    }

    #[test]
    fn test_lu_reconstructs() {
        assert_pa_eq_lu(&mat(&[2.0, 1.0, 1.0, 4.0], 2), 1e-12);
        assert_pa_eq_lu(&mat(&[2.0, 1.0, 1.0, 4.0, 3.0, 3.0, 8.0, 7.0, 9.0], 3), 1e-12);
        assert_pa_eq_lu(
            &mat(
                &[
                    1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 2.0, 6.0, 4.0, 8.0, 3.0, 1.0, 1.0, 2.0,
                ],
                4,
            ),
            1e-10,
        );
    }

    #[test]
    fn test_factors_are_triangular() {
        let a = mat(&[2.0, 1.0, 1.0, 4.0, 3.0, 3.0, 8.0, 7.0, 9.0], 3);
        let lu = LuDecomposition::decompose(&a).unwrap();
        let (l, u) = (lu.l(), lu.u());
        for r in 0..3 {
            assert_eq!(l.get(r, r).unwrap(), 1.0);
            for c in (r + 1)..3 {
                assert_eq!(l.get(r, c).unwrap(), 0.0);
                assert_eq!(u.get(c, r).unwrap(), 0.0);
            }
        }
        // Largest first-column entry (8) is pivoted to the top.
        assert_eq!(lu.pivots()[0], 2);
    }

    #[test]
    fn test_det_matches_elimination() {
        let a = mat(&[6.0, 1.0, 1.0, 4.0, -2.0, 5.0, 2.0, 8.0, 7.0], 3);
        let lu = LuDecomposition::decompose(&a).unwrap();
        assert!((lu.det() - (-306.0)).abs() < 1e-10);
        let eye = Matrix::<f64>::identity(5, 5).unwrap();
        assert!((LuDecomposition::decompose(&eye).unwrap().det() - 1.0).abs() < 1e-14);
    }

    #[test]
    fn test_singular_matrix() {
        let a = mat(&[1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 3.0, 6.0, 9.0], 3);
        let err = LuDecomposition::decompose(&a).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Singular);
    }

    #[test]
    fn test_rounding_noise_pivot_is_singular() {
        // Elimination leaves a last pivot of order 1e-16 here; the exact
        // determinant is zero.
        let a = mat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0], 3);
        let err = LuDecomposition::decompose(&a).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Singular);
        assert!(crate::linalg::determinant(&a).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_explicit_tolerance() {
        let a = mat(&[1e-6, 0.0, 0.0, 1.0], 2);
        assert!(LuDecomposition::decompose(&a).is_ok());
        let err = LuDecomposition::decompose_with_tolerance(&a, 1e-3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Singular);
        let exact = LuDecomposition::decompose_with_tolerance(&a, 0.0).unwrap();
        assert!((exact.det() - 1e-6).abs() < 1e-18);
    }

    #[test]
    fn test_integer_elements_refused() {
        let a = Matrix::from_array([[4_i64, 3], [6, 3]]).unwrap();
        let err = LuDecomposition::decompose(&a).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Domain);
    }

    #[test]
    fn test_finite_field_solve() {
        use crate::testing::{Gf7, gf7_matrix};

        // 3x + 5y = 1, 2x + 6y = 0 over Z/7  =>  x = 6, y = 5
        let a = gf7_matrix([[3, 5], [2, 6]]);
        let lu = LuDecomposition::decompose(&a).unwrap();
        assert_eq!(lu.det(), Gf7(1));
        let x = lu.solve(&Vector::from_vec(vec![Gf7(1), Gf7(0)]).unwrap()).unwrap();
        assert_eq!(x.as_slice(), &[Gf7(6), Gf7(5)]);
    }

    #[test]
    fn test_solve_3x3() {
        // >>> np.linalg.solve([[1,2,3],[4,5,6],[7,8,10]], [1,2,3])
        // array([-0.33333333,  0.66666667,  0.        ])
        let a = mat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0], 3);
        let b = Vector::new3(1.0, 2.0, 3.0);
        let x = LuDecomposition::decompose(&a).unwrap().solve(&b).unwrap();
        assert!(approx_eq(x.as_slice(), &[-1.0 / 3.0, 2.0 / 3.0, 0.0], 1e-12));
    }

    #[test]
    fn test_solve_dimension_mismatch() {
        let a = mat(&[1.0, 0.0, 0.0, 1.0], 2);
        let b = Vector::new3(1.0, 2.0, 3.0);
        let lu = LuDecomposition::decompose(&a).unwrap();
        assert_eq!(lu.solve(&b).unwrap_err().kind(), ErrorKind::Domain);
    }

    #[test]
    fn test_inverse_3x3() {
        let a = mat(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 10.0], 3);
        let inv = LuDecomposition::decompose(&a).unwrap().inverse().unwrap();
        let eye = multiply(&a, &inv, None).unwrap();
        let identity = Matrix::<f64>::identity(3, 3).unwrap();
        assert!(approx_eq(eye.as_slice(), identity.as_slice(), 1e-10));
    }

    #[test]
    fn test_not_square() {
        let a = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(
            LuDecomposition::decompose(&a).unwrap_err().kind(),
            ErrorKind::Domain
        );
    }
}
