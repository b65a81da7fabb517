//! # Lamina
//!
//! Generic dense-matrix algebra. One `use lamina::prelude::*;` gives you
//! matrices, vectors, angles and the linear-algebra routines that operate
//! on them.
//!
//! ## Feature Flags
//!
//! | Feature | Enables |
//! |---------|---------|
//! | `core` *(default)* | Matrices, elimination, cofactors, LU, rotation |
//!
//! ```
//! use lamina::prelude::*;
//!
//! let a = Matrix::from_array([[4.0_f64, 3.0], [6.0, 3.0]]).unwrap();
//! assert!((a.det().unwrap() + 6.0).abs() < 1e-12);
//! ```

#[cfg(feature = "core")]
pub use lamina_core as core;

/// Glob-import convenience: `use lamina::prelude::*;`
pub mod prelude {
    #[cfg(feature = "core")]
    pub use lamina_core::prelude::*;
}

#[cfg(all(test, feature = "core"))]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_core_feature_exposes_engine() {
        let a = Matrix::from_array([[2_i64, 1], [1, 1]]).unwrap();
        assert_eq!(a.det().unwrap(), 1);
        assert!(crate::core::provider::is_bound::<i64>());
    }
}
