//! Operator overloads for [`Matrix`].
//!
//! Shape errors are part of the algebra here, so every operator yields a
//! `Result`:
//! - `&Matrix op &Matrix` for `+`, `-`, `*` (product)
//! - `Matrix op &Matrix` reusing the left operand's buffer
//! - `-&Matrix`
//! - `&Matrix * &Vector`
//! - `&Matrix * T` and `&Matrix / T` for the built-in element types

use core::ops::{Add, Div, Mul, Neg, Sub};

use crate::dtype::Element;
use crate::error::Result;
use crate::linalg;
use crate::vector::Vector;

use super::Matrix;

// ======================================================================
// Matrix op Matrix
// ======================================================================

macro_rules! impl_matrix_binop {
    ($trait:ident, $method:ident, $func:path, $assign:ident) => {
        impl<T: Element> $trait<&Matrix<T>> for &Matrix<T> {
            type Output = Result<Matrix<T>>;

            fn $method(self, rhs: &Matrix<T>) -> Result<Matrix<T>> {
                $func(self, rhs, None)
            }
        }

        impl<T: Element> $trait<&Matrix<T>> for Matrix<T> {
            type Output = Result<Matrix<T>>;

            fn $method(mut self, rhs: &Matrix<T>) -> Result<Matrix<T>> {
                self.$assign(rhs)?;
                Ok(self)
            }
        }
    };
}

impl_matrix_binop!(Add, add, linalg::add, add_in_place);
impl_matrix_binop!(Sub, sub, linalg::subtract, sub_in_place);
impl_matrix_binop!(Mul, mul, linalg::multiply, multiply_assign);

impl<T: Element> Neg for &Matrix<T> {
    type Output = Result<Matrix<T>>;

    fn neg(self) -> Result<Matrix<T>> {
        linalg::negate(self, None)
    }
}

impl<T: Element> Neg for Matrix<T> {
    type Output = Result<Matrix<T>>;

    fn neg(mut self) -> Result<Matrix<T>> {
        self.negate_in_place()?;
        Ok(self)
    }
}

impl<T: Element> Mul<&Vector<T>> for &Matrix<T> {
    type Output = Result<Vector<T>>;

    fn mul(self, rhs: &Vector<T>) -> Result<Vector<T>> {
        linalg::multiply_vector(self, rhs)
    }
}

// ======================================================================
// Matrix op scalar
// ======================================================================

// A blanket `impl<T> Mul<T> for &Matrix<T>` would overlap with
// `Mul<&Matrix<T>>`, so scalars are listed per type.
macro_rules! impl_scalar_ops {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Mul<$ty> for &Matrix<$ty> {
                type Output = Result<Matrix<$ty>>;

                fn mul(self, rhs: $ty) -> Result<Matrix<$ty>> {
                    linalg::scale(self, rhs, None)
                }
            }

            impl Div<$ty> for &Matrix<$ty> {
                type Output = Result<Matrix<$ty>>;

                fn div(self, rhs: $ty) -> Result<Matrix<$ty>> {
                    linalg::divide(self, rhs, None)
                }
            }
        )*
    };
}

impl_scalar_ops!(f32, f64, i8, i16, i32, i64, i128, isize);

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn a() -> Matrix<i64> {
        Matrix::from_array([[1, 2], [3, 4]]).unwrap()
    }

    #[test]
    fn test_add_sub_refs() {
        let sum = (&a() + &a()).unwrap();
        assert_eq!(sum.as_slice(), &[2, 4, 6, 8]);
        let diff = (&sum - &a()).unwrap();
        assert_eq!(diff, a());
    }

    #[test]
    fn test_owned_lhs_reuses_buffer() {
        let lhs = a();
        let ptr = lhs.as_slice().as_ptr();
        let sum = (lhs + &a()).unwrap();
        assert_eq!(sum.as_slice().as_ptr(), ptr);
        assert_eq!(sum.as_slice(), &[2, 4, 6, 8]);
    }

    #[test]
    fn test_product_and_negation() {
        let p = (&a() * &a()).unwrap();
        assert_eq!(p.to_rows(), vec![vec![7, 10], vec![15, 22]]);
        assert_eq!((a() * &a()).unwrap(), p);
        assert_eq!((-&a()).unwrap().as_slice(), &[-1, -2, -3, -4]);
        assert_eq!((-a()).unwrap(), (-&a()).unwrap());
    }

    #[test]
    fn test_matrix_vector() {
        let m = Matrix::from_array([[1.0, 0.0, 2.0], [0.0, 3.0, 0.0]]).unwrap();
        let v = (&m * &Vector::new3(1.0, 2.0, 3.0)).unwrap();
        assert_eq!(v.as_slice(), &[7.0, 6.0]);
    }

    #[test]
    fn test_scalar_ops() {
        let m = Matrix::from_array([[2.0_f32, 4.0], [6.0, 8.0]]).unwrap();
        assert_eq!((&m * 0.5).unwrap().as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!((&m / 2.0).unwrap().as_slice(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!((&a() * 3).unwrap().as_slice(), &[3, 6, 9, 12]);
    }

    #[test]
    fn test_shape_mismatch_is_domain() {
        let wide = Matrix::from_vec(1, 3, vec![1, 2, 3]).unwrap();
        assert_eq!((&a() + &wide).unwrap_err().kind(), ErrorKind::Domain);
        assert_eq!((&a() * &wide.transpose(None)).unwrap_err().kind(), ErrorKind::Domain);
        assert_eq!((a() - &wide).unwrap_err().kind(), ErrorKind::Domain);
    }
}
