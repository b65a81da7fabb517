//! Angle measured in radians, with trig through the operator provider.

use crate::dtype::Element;
use crate::error::Result;
use crate::provider;

/// An angle in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Angle<T: Element> {
    radians: T,
}

impl<T: Element> Angle<T> {
    pub fn from_radians(radians: T) -> Self {
        Self { radians }
    }

    /// The underlying scalar value.
    #[inline]
    pub fn radians(&self) -> T {
        self.radians
    }

    /// Returns [`MatrixError::Configuration`](crate::MatrixError::Configuration)
    /// if `T` has no sine binding.
    pub fn sine(&self) -> Result<T> {
        provider::resolve::<T>()?.sine(self.radians)
    }

    pub fn cosine(&self) -> Result<T> {
        provider::resolve::<T>()?.cosine(self.radians)
    }

    /// Exact comparison against the element's zero.
    pub fn is_zero(&self) -> Result<bool> {
        Ok(provider::resolve::<T>()?.is_zero(self.radians))
    }
}
