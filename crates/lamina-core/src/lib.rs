//! `lamina-core`: dense matrix algebra over runtime-bound element types.
//!
//! Provides a row-major [`Matrix`], elementary row operations, Gaussian
//! elimination (echelon forms, determinants), cofactor algebra (adjoint,
//! inverse), LU decomposition and axis-angle rotation.
//!
//! # Design
//!
//! - Arithmetic is not fixed by trait bounds. Each element type is bound
//!   to an [`Operators`] table resolved once per process and cached; see
//!   [`provider`]. Floats and signed integers are built in, other types
//!   are added with [`provider::register`].
//! - Algorithms that produce a matrix accept an optional output buffer
//!   and reuse its storage when the length matches.
//! - Every precondition is checked before any buffer is written.

pub mod angle;
pub mod dtype;
pub mod error;
pub mod linalg;
pub mod matrix;
pub mod provider;
pub mod vector;

#[cfg(test)]
mod testing;

// Re-export key types at crate root for convenience.
pub use angle::Angle;
pub use dtype::Element;
pub use error::{ErrorKind, MatrixError, Result};
pub use matrix::Matrix;
pub use provider::{Division, Operators};
pub use vector::Vector;

/// Items intended for glob-import: `use lamina_core::prelude::*;`
pub mod prelude {
    pub use crate::angle::Angle;
    pub use crate::dtype::Element;
    pub use crate::error::{ErrorKind, MatrixError, Result};
    pub use crate::linalg::LuDecomposition;
    pub use crate::matrix::Matrix;
    pub use crate::vector::Vector;
}
