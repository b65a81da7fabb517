//! Structural algorithms: transpose, minor, concatenation, equality.

use log::trace;

use crate::dtype::Element;
use crate::error::{MatrixError, Result};
use crate::provider;

use super::Matrix;

impl<T: Element> Matrix<T> {
    /// Transpose into `out` (reused when its length matches).
    ///
    /// ```
    /// # use lamina_core::Matrix;
    /// let m = Matrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// let t = m.transpose(None);
    /// assert_eq!(t.shape(), (3, 2));
    /// assert_eq!(t.as_slice(), &[1, 4, 2, 5, 3, 6]);
    /// ```
    pub fn transpose(&self, out: Option<Matrix<T>>) -> Matrix<T> {
        let (rows, cols) = (self.rows, self.columns);
        let mut t = Matrix::prepare_output(out, cols, rows, self.data[0]);
        for r in 0..rows {
            for c in 0..cols {
                t.data[c * rows + r] = self.data[r * cols + c];
            }
        }
        t
    }

    /// Transpose `self`. Square matrices are swapped in place; other shapes
    /// transpose from a clone into the existing buffer.
    pub fn transpose_in_place(&mut self) {
        let n = self.rows;
        if self.is_square() {
            for r in 0..n {
                for c in (r + 1)..n {
                    self.data.swap(r * n + c, c * n + r);
                }
            }
            return;
        }
        trace!("transpose_in_place: cloning {}x{} operand", self.rows, self.columns);
        let source = self.clone();
        let out = self.take_storage();
        *self = source.transpose(Some(out));
    }

    /// The submatrix with `row` and `column` removed, relative order kept.
    ///
    /// Returns [`MatrixError::Domain`] if the matrix has fewer than two rows
    /// or columns, and [`MatrixError::IndexOutOfRange`] for a bad index.
    ///
    /// ```
    /// # use lamina_core::Matrix;
    /// let m = Matrix::from_array([[1, 2, 3], [4, 5, 6], [7, 8, 9]]).unwrap();
    /// let minor = m.minor(1, 1, None).unwrap();
    /// assert_eq!(minor.to_rows(), vec![vec![1, 3], vec![7, 9]]);
    /// ```
    pub fn minor(&self, row: usize, column: usize, out: Option<Matrix<T>>) -> Result<Matrix<T>> {
        if self.rows < 2 || self.columns < 2 {
            return Err(MatrixError::Domain {
                operation: "minor",
                reason: "matrix must have at least two rows and two columns",
            });
        }
        if row >= self.rows || column >= self.columns {
            return Err(MatrixError::index(row, column, self.rows, self.columns));
        }
        let (rows, cols) = (self.rows - 1, self.columns - 1);
        let mut m = Matrix::prepare_output(out, rows, cols, self.data[0]);
        let mut k = 0;
        for r in (0..self.rows).filter(|&r| r != row) {
            let src = &self.data[r * self.columns..(r + 1) * self.columns];
            for (c, &v) in src.iter().enumerate() {
                if c != column {
                    m.data[k] = v;
                    k += 1;
                }
            }
        }
        Ok(m)
    }

    /// Place `other` to the right of `self`. Row counts must match.
    pub fn concat_columns(&self, other: &Matrix<T>, out: Option<Matrix<T>>) -> Result<Matrix<T>> {
        if self.rows != other.rows {
            return Err(MatrixError::shapes(
                "concat_columns",
                self.shape(),
                other.shape(),
            ));
        }
        let cols = self.columns + other.columns;
        let mut m = Matrix::prepare_output(out, self.rows, cols, self.data[0]);
        for r in 0..self.rows {
            let dst = &mut m.data[r * cols..(r + 1) * cols];
            let (left, right) = dst.split_at_mut(self.columns);
            left.copy_from_slice(&self.data[r * self.columns..(r + 1) * self.columns]);
            right.copy_from_slice(&other.data[r * other.columns..(r + 1) * other.columns]);
        }
        Ok(m)
    }

    /// Place `other` below `self`. Column counts must match.
    pub fn concat_rows(&self, other: &Matrix<T>, out: Option<Matrix<T>>) -> Result<Matrix<T>> {
        if self.columns != other.columns {
            return Err(MatrixError::shapes(
                "concat_rows",
                self.shape(),
                other.shape(),
            ));
        }
        let rows = self.rows + other.rows;
        let mut m = Matrix::prepare_output(out, rows, self.columns, self.data[0]);
        let (top, bottom) = m.data.split_at_mut(self.data.len());
        top.copy_from_slice(&self.data);
        bottom.copy_from_slice(&other.data);
        Ok(m)
    }

    /// Exact equality through the element binding. Different shapes are
    /// unequal, not an error.
    pub fn equals(&self, other: &Matrix<T>) -> Result<bool> {
        let ops = provider::resolve::<T>()?;
        Ok(self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| (ops.eq)(a, b)))
    }

    /// Element-wise `|a - b| <= tolerance`. Different shapes are unequal.
    ///
    /// ```
    /// # use lamina_core::Matrix;
    /// let a = Matrix::from_vec(1, 2, vec![1.0, 2.0]).unwrap();
    /// let b = Matrix::from_vec(1, 2, vec![1.0 + 1e-12, 2.0]).unwrap();
    /// assert!(a.equals_within(&b, 1e-9).unwrap());
    /// assert!(!a.equals(&b).unwrap());
    /// ```
    pub fn equals_within(&self, other: &Matrix<T>, tolerance: T) -> Result<bool> {
        let ops = provider::resolve::<T>()?;
        Ok(self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| ops.within(a, b, tolerance)))
    }
}
