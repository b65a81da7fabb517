//! Matrix factories: zeros, identity, uniform value, generator function.

use crate::dtype::Element;
use crate::error::Result;
use crate::provider;

use super::{Matrix, check_shape};

impl<T: Element> Matrix<T> {
    /// Create a matrix filled with the element type's zero.
    ///
    /// ```
    /// # use lamina_core::Matrix;
    /// let m = Matrix::<f64>::zeros(2, 3).unwrap();
    /// assert_eq!(m.shape(), (2, 3));
    /// assert!(m.iter().all(|&x| x == 0.0));
    /// ```
    pub fn zeros(rows: usize, columns: usize) -> Result<Self> {
        let len = check_shape(rows, columns)?;
        let ops = provider::resolve::<T>()?;
        Ok(Self {
            data: vec![ops.zero; len],
            rows,
            columns,
        })
    }

    /// Ones on the main diagonal, zeros elsewhere. Need not be square.
    ///
    /// ```
    /// # use lamina_core::Matrix;
    /// let eye = Matrix::<i32>::identity(2, 3).unwrap();
    /// assert_eq!(eye.as_slice(), &[1, 0, 0, 0, 1, 0]);
    /// ```
    pub fn identity(rows: usize, columns: usize) -> Result<Self> {
        let mut m = Self::zeros(rows, columns)?;
        let one = provider::resolve::<T>()?.one;
        for i in 0..rows.min(columns) {
            m.data[i * columns + i] = one;
        }
        Ok(m)
    }

    /// Create a matrix with every element set to `value`.
    pub fn full(rows: usize, columns: usize, value: T) -> Result<Self> {
        let len = check_shape(rows, columns)?;
        Ok(Self {
            data: vec![value; len],
            rows,
            columns,
        })
    }

    /// Create a matrix whose cell `(r, c)` is `f(r, c)`, generated in
    /// row-major order.
    pub fn from_fn<F>(rows: usize, columns: usize, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> T,
    {
        let len = check_shape(rows, columns)?;
        let data = (0..len)
            .map(|i| f(i / columns, i % columns))
            .collect();
        Ok(Self {
            data,
            rows,
            columns,
        })
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_zeros() {
        let m = Matrix::<f64>::zeros(3, 4).unwrap();
        assert_eq!(m.shape(), (3, 4));
        assert!(m.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_zeros_invalid_shape() {
        let err = Matrix::<f64>::zeros(0, 4).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_factories_reject_overflowing_shape() {
        let err = Matrix::<f64>::zeros(usize::MAX, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(Matrix::<i32>::identity(2, usize::MAX).is_err());
        assert!(Matrix::full(usize::MAX, usize::MAX, 1_u8).is_err());
        assert!(Matrix::from_fn(usize::MAX, 3, |_, _| 0_i64).is_err());
    }

    #[test]
    fn test_zeros_unbound_type() {
        let err = Matrix::<u16>::zeros(2, 2).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_identity() {
        let m = Matrix::<f64>::identity(3, 3).unwrap();
        assert_eq!(m.get(0, 0).unwrap(), 1.0);
        assert_eq!(m.get(1, 1).unwrap(), 1.0);
        assert_eq!(m.get(2, 2).unwrap(), 1.0);
        assert_eq!(m.get(0, 1).unwrap(), 0.0);
        assert_eq!(m.get(1, 0).unwrap(), 0.0);
    }

    #[test]
    fn test_identity_rectangular() {
        let m = Matrix::<i64>::identity(3, 2).unwrap();
        assert_eq!(m.as_slice(), &[1, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_full() {
        let m = Matrix::full(2, 3, 7_i32).unwrap();
        assert!(m.iter().all(|&x| x == 7));
        // `full` needs no arithmetic, so unbound types work too.
        let m = Matrix::full(1, 2, 3_u8).unwrap();
        assert_eq!(m.as_slice(), &[3, 3]);
    }

    #[test]
    fn test_from_fn() {
        let m = Matrix::from_fn(2, 3, |r, c| (r * 3 + c) as i32).unwrap();
        assert_eq!(m.as_slice(), &[0, 1, 2, 3, 4, 5]);
        assert!(Matrix::from_fn(2, 0, |_, _| 0).is_err());
    }
}
