//! Fixed-length vector used as a matrix-vector operand and rotation axis.

use core::fmt;
use core::ops::Index;

use crate::dtype::Element;
use crate::error::{MatrixError, Result};

/// A vector whose dimension is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T: Element> {
    components: Vec<T>,
}

impl<T: Element> Vector<T> {
    /// Take ownership of `components`.
    ///
    /// Returns [`MatrixError::InvalidArgument`] for an empty buffer.
    pub fn from_vec(components: Vec<T>) -> Result<Self> {
        if components.is_empty() {
            return Err(MatrixError::InvalidArgument {
                reason: "vector must have at least one component",
            });
        }
        Ok(Self { components })
    }

    /// Shorthand for a 3-D vector.
    pub fn new3(x: T, y: T, z: T) -> Self {
        Self {
            components: vec![x, y, z],
        }
    }

    #[inline]
    pub fn dimensions(&self) -> usize {
        self.components.len()
    }

    /// Bounds-checked component access.
    pub fn get(&self, index: usize) -> Result<T> {
        self.components
            .get(index)
            .copied()
            .ok_or_else(|| MatrixError::IndexOutOfRange {
                index: vec![index],
                shape: vec![self.components.len()],
            })
    }

    /// Bounds-checked component update.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.components.len();
        let slot = self
            .components
            .get_mut(index)
            .ok_or_else(|| MatrixError::IndexOutOfRange {
                index: vec![index],
                shape: vec![len],
            })?;
        *slot = value;
        Ok(())
    }

    pub fn x(&self) -> Result<T> {
        self.get(0)
    }

    pub fn y(&self) -> Result<T> {
        self.get(1)
    }

    pub fn z(&self) -> Result<T> {
        self.get(2)
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.components
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.components
    }
}

impl<T: Element> Index<usize> for Vector<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.components[index]
    }
}

impl<T: Element> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_from_vec_rejects_empty() {
        let err = Vector::<f64>::from_vec(vec![]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_accessors() {
        let mut v = Vector::new3(1, 2, 3);
        assert_eq!(v.dimensions(), 3);
        assert_eq!(v.x().unwrap(), 1);
        assert_eq!(v.z().unwrap(), 3);
        assert_eq!(v[1], 2);
        v.set(1, 20).unwrap();
        assert_eq!(v.y().unwrap(), 20);
    }

    #[test]
    fn test_out_of_range() {
        let v = Vector::from_vec(vec![1.0, 2.0]).unwrap();
        assert_eq!(v.z().unwrap_err().kind(), ErrorKind::IndexOutOfRange);
        let mut v = v;
        assert!(v.set(2, 0.0).is_err());
    }

    #[test]
    fn test_display() {
        let v = Vector::new3(1, -2, 3);
        assert_eq!(v.to_string(), "(1, -2, 3)");
    }
}
