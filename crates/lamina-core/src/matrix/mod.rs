//! Dense row-major matrix with a flat, owned buffer.
//!
//! [`Matrix`] stores `rows * columns` elements contiguously, row by row
//! (`index = row * columns + column`). Shape and buffer always change
//! together; a matrix is never empty.
//!
//! Algorithms that produce a matrix take an `out: Option<Matrix<T>>`. When
//! the supplied buffer already has the required length it is reshaped and
//! reused, otherwise a fresh matrix is allocated. Methods ending in
//! `_in_place` / `_assign` use `self` as both operand and destination and
//! clone the operand first whenever the result cannot be computed in place.

mod create;
mod display;
mod ops;
mod rowops;
mod structure;

use core::ops::{ControlFlow, Index, IndexMut};

use log::trace;

use crate::dtype::Element;
use crate::error::{MatrixError, Result};

/// A dense matrix with runtime shape.
///
/// Cloning performs a deep copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T: Element> {
    pub(crate) data: Vec<T>,
    pub(crate) rows: usize,
    pub(crate) columns: usize,
}

impl<T: Element> Matrix<T> {
    // ------------------------------------------------------------------
    // Construction from raw parts
    // ------------------------------------------------------------------

    /// Create a matrix that owns `data` (no copy).
    ///
    /// Returns [`MatrixError::InvalidArgument`] if either dimension is zero,
    /// `rows * columns` overflows, or `data.len() != rows * columns`.
    ///
    /// ```
    /// # use lamina_core::Matrix;
    /// let m = Matrix::from_vec(2, 3, vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// assert_eq!(m.shape(), (2, 3));
    /// assert_eq!(m.get(1, 0).unwrap(), 4);
    /// ```
    pub fn from_vec(rows: usize, columns: usize, data: Vec<T>) -> Result<Self> {
        let len = check_shape(rows, columns)?;
        if data.len() != len {
            return Err(MatrixError::InvalidArgument {
                reason: "buffer length does not equal rows * columns",
            });
        }
        Ok(Self {
            data,
            rows,
            columns,
        })
    }

    /// Build a matrix from a row-major two-dimensional representation.
    ///
    /// Every row must have the same, non-zero length.
    pub fn from_rows<R: AsRef<[T]>>(rows: &[R]) -> Result<Self> {
        let columns = rows.first().map_or(0, |r| r.as_ref().len());
        let len = check_shape(rows.len(), columns)?;
        let mut data = Vec::with_capacity(len);
        for row in rows {
            let row = row.as_ref();
            if row.len() != columns {
                return Err(MatrixError::InvalidArgument {
                    reason: "rows must all have the same length",
                });
            }
            data.extend_from_slice(row);
        }
        Self::from_vec(rows.len(), columns, data)
    }

    /// Build a matrix from a fixed-size array of rows.
    pub fn from_array<const R: usize, const C: usize>(array: [[T; C]; R]) -> Result<Self> {
        check_shape(R, C)?;
        let data = array.iter().flatten().copied().collect();
        Self::from_vec(R, C, data)
    }

    /// Copy out the row-major two-dimensional representation.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.data.chunks(self.columns).map(<[T]>::to_vec).collect()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// `(rows, columns)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// A constructed matrix is never empty, so this is `false`. It exists
    /// alongside [`len`](Self::len) for clippy's `len_without_is_empty`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    /// Flat row-major view of all elements.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable flat row-major view, for bulk loops.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consume the matrix and return the underlying buffer.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Borrow one row as a slice.
    pub fn row(&self, row: usize) -> Result<&[T]> {
        if row >= self.rows {
            return Err(MatrixError::index(row, 0, self.rows, self.columns));
        }
        let start = row * self.columns;
        Ok(&self.data[start..start + self.columns])
    }

    // ------------------------------------------------------------------
    // Element access
    // ------------------------------------------------------------------

    fn flat_index(&self, row: usize, column: usize) -> Result<usize> {
        if row >= self.rows || column >= self.columns {
            return Err(MatrixError::index(row, column, self.rows, self.columns));
        }
        Ok(row * self.columns + column)
    }

    /// Bounds-checked read. `row == rows` or `column == columns` fails.
    pub fn get(&self, row: usize, column: usize) -> Result<T> {
        let flat = self.flat_index(row, column)?;
        Ok(self.data[flat])
    }

    pub fn get_mut(&mut self, row: usize, column: usize) -> Result<&mut T> {
        let flat = self.flat_index(row, column)?;
        Ok(&mut self.data[flat])
    }

    pub fn set(&mut self, row: usize, column: usize, value: T) -> Result<()> {
        let flat = self.flat_index(row, column)?;
        self.data[flat] = value;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Bulk fill / visitors
    // ------------------------------------------------------------------

    /// Overwrite every cell with `f(row, column)`, in row-major order.
    pub fn fill<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize) -> T,
    {
        let columns = self.columns;
        for (i, x) in self.data.iter_mut().enumerate() {
            *x = f(i / columns, i % columns);
        }
    }

    /// Visit every element in row-major order, stopping at the first
    /// `Break`. Returns the break value, if any.
    ///
    /// ```
    /// # use core::ops::ControlFlow;
    /// # use lamina_core::Matrix;
    /// let m = Matrix::from_vec(2, 2, vec![1, -2, 3, -4]).unwrap();
    /// let first_negative = m.visit(|r, c, &v| {
    ///     if v < 0 { ControlFlow::Break((r, c)) } else { ControlFlow::Continue(()) }
    /// });
    /// assert_eq!(first_negative, Some((0, 1)));
    /// ```
    pub fn visit<B, F>(&self, mut f: F) -> Option<B>
    where
        F: FnMut(usize, usize, &T) -> ControlFlow<B>,
    {
        let columns = self.columns;
        for (i, x) in self.data.iter().enumerate() {
            if let ControlFlow::Break(b) = f(i / columns, i % columns, x) {
                return Some(b);
            }
        }
        None
    }

    /// Mutating counterpart of [`visit`](Self::visit).
    pub fn visit_mut<B, F>(&mut self, mut f: F) -> Option<B>
    where
        F: FnMut(usize, usize, &mut T) -> ControlFlow<B>,
    {
        let columns = self.columns;
        for (i, x) in self.data.iter_mut().enumerate() {
            if let ControlFlow::Break(b) = f(i / columns, i % columns, x) {
                return Some(b);
            }
        }
        None
    }

    /// Apply `f` to every element without early exit.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(usize, usize, &T),
    {
        self.visit::<(), _>(|r, c, x| {
            f(r, c, x);
            ControlFlow::Continue(())
        });
    }

    /// Apply `f` to every element in place without early exit.
    pub fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(usize, usize, &mut T),
    {
        self.visit_mut::<(), _>(|r, c, x| {
            f(r, c, x);
            ControlFlow::Continue(())
        });
    }

    /// Iterate over all elements in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    // ------------------------------------------------------------------
    // Output-buffer plumbing
    // ------------------------------------------------------------------

    /// Reuse `out` if its buffer length is exactly `rows * columns`,
    /// otherwise allocate a matrix filled with `init`.
    ///
    /// A reused buffer keeps its old contents; callers overwrite every cell.
    pub(crate) fn prepare_output(
        out: Option<Matrix<T>>,
        rows: usize,
        columns: usize,
        init: T,
    ) -> Matrix<T> {
        match out {
            Some(mut m) if m.data.len() == rows * columns => {
                trace!(
                    "reusing {}x{} output buffer as {rows}x{columns}",
                    m.rows, m.columns
                );
                m.rows = rows;
                m.columns = columns;
                m
            }
            _ => Matrix {
                data: vec![init; rows * columns],
                rows,
                columns,
            },
        }
    }

    /// Copy `self` into `out` (reused per [`prepare_output`](Self::prepare_output)).
    pub(crate) fn copy_into(&self, out: Option<Matrix<T>>) -> Matrix<T> {
        match out {
            Some(mut m) if m.data.len() == self.data.len() => {
                m.rows = self.rows;
                m.columns = self.columns;
                m.data.copy_from_slice(&self.data);
                m
            }
            _ => self.clone(),
        }
    }

    /// Move the storage out, leaving `self` with an empty buffer that the
    /// caller must replace before returning.
    pub(crate) fn take_storage(&mut self) -> Matrix<T> {
        core::mem::replace(
            self,
            Matrix {
                data: Vec::new(),
                rows: self.rows,
                columns: self.columns,
            },
        )
    }
}

impl<T: Element> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if the index is out of bounds; use [`Matrix::get`] to get an
    /// error instead.
    fn index(&self, (row, column): (usize, usize)) -> &T {
        assert!(
            row < self.rows && column < self.columns,
            "index ({row}, {column}) out of range for {}x{} matrix",
            self.rows,
            self.columns
        );
        &self.data[row * self.columns + column]
    }
}

impl<T: Element> IndexMut<(usize, usize)> for Matrix<T> {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut T {
        assert!(
            row < self.rows && column < self.columns,
            "index ({row}, {column}) out of range for {}x{} matrix",
            self.rows,
            self.columns
        );
        &mut self.data[row * self.columns + column]
    }
}

impl<T: Element> TryFrom<Vec<Vec<T>>> for Matrix<T> {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<T>>) -> Result<Self> {
        Self::from_rows(&rows)
    }
}

impl<T: Element> From<&Matrix<T>> for Vec<Vec<T>> {
    fn from(m: &Matrix<T>) -> Self {
        m.to_rows()
    }
}

// ======================================================================
// Utility functions
// ======================================================================

/// Validate a shape and return its element count.
pub(crate) fn check_shape(rows: usize, columns: usize) -> Result<usize> {
    if rows < 1 || columns < 1 {
        return Err(MatrixError::InvalidArgument {
            reason: "matrix dimensions must be at least 1x1",
        });
    }
    rows.checked_mul(columns).ok_or(MatrixError::InvalidArgument {
        reason: "matrix dimensions overflow usize",
    })
}
