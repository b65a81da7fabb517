//! Elementary row operations.
//!
//! These are the only primitives the elimination algorithms use to mutate
//! a matrix. None of them allocate. The public methods validate row
//! indices and resolve the operator binding; the `_with` variants take an
//! already-resolved binding and trust their indices, for use inside
//! elimination loops.

use crate::dtype::Element;
use crate::error::{MatrixError, Result};
use crate::provider::{self, Operators};

use super::Matrix;

impl<T: Element> Matrix<T> {
    fn check_row(&self, row: usize) -> Result<()> {
        if row >= self.rows {
            return Err(MatrixError::index(row, 0, self.rows, self.columns));
        }
        Ok(())
    }

    /// Multiply every entry of `row` by `scalar`.
    ///
    /// ```
    /// # use lamina_core::Matrix;
    /// let mut m = Matrix::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
    /// m.scale_row(1, 10).unwrap();
    /// assert_eq!(m.as_slice(), &[1, 2, 30, 40]);
    /// ```
    pub fn scale_row(&mut self, row: usize, scalar: T) -> Result<()> {
        self.check_row(row)?;
        let ops = provider::resolve::<T>()?;
        self.scale_row_with(ops, row, scalar);
        Ok(())
    }

    /// `target[:] += source[:] * scalar`.
    pub fn combine_rows(&mut self, target: usize, source: usize, scalar: T) -> Result<()> {
        self.check_row(target)?;
        self.check_row(source)?;
        let ops = provider::resolve::<T>()?;
        self.combine_rows_with(ops, target, source, scalar);
        Ok(())
    }

    /// Exchange two full rows. Swapping a row with itself is a no-op.
    pub fn swap_rows(&mut self, r1: usize, r2: usize) -> Result<()> {
        self.check_row(r1)?;
        self.check_row(r2)?;
        self.swap_rows_unchecked(r1, r2);
        Ok(())
    }

    pub(crate) fn scale_row_with(&mut self, ops: &Operators<T>, row: usize, scalar: T) {
        let start = row * self.columns;
        for x in &mut self.data[start..start + self.columns] {
            *x = (ops.mul)(*x, scalar);
        }
    }

    /// Divide every entry of `row` by `divisor`. Callers guarantee the
    /// divisions are exact for truncating element types.
    pub(crate) fn divide_row_with(&mut self, ops: &Operators<T>, row: usize, divisor: T) {
        let start = row * self.columns;
        for x in &mut self.data[start..start + self.columns] {
            *x = (ops.div)(*x, divisor);
        }
    }

    pub(crate) fn combine_rows_with(
        &mut self,
        ops: &Operators<T>,
        target: usize,
        source: usize,
        scalar: T,
    ) {
        if target == source {
            // x + x * s, read before write.
            let start = target * self.columns;
            for x in &mut self.data[start..start + self.columns] {
                *x = (ops.mul_add)(*x, scalar, *x);
            }
            return;
        }
        let columns = self.columns;
        let (dst, src) = if target < source {
            let (head, tail) = self.data.split_at_mut(source * columns);
            (
                &mut head[target * columns..(target + 1) * columns],
                &tail[..columns],
            )
        } else {
            let (head, tail) = self.data.split_at_mut(target * columns);
            (
                &mut tail[..columns],
                &head[source * columns..(source + 1) * columns],
            )
        };
        for (d, &s) in dst.iter_mut().zip(src) {
            *d = (ops.mul_add)(s, scalar, *d);
        }
    }

    pub(crate) fn swap_rows_unchecked(&mut self, r1: usize, r2: usize) {
        if r1 == r2 {
            return;
        }
        let (lo, hi) = (r1.min(r2), r1.max(r2));
        let columns = self.columns;
        let (head, tail) = self.data.split_at_mut(hi * columns);
        head[lo * columns..(lo + 1) * columns].swap_with_slice(&mut tail[..columns]);
    }
}
