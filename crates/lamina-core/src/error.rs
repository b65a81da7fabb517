use thiserror::Error;

/// Coarse classification of a [`MatrixError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed constructor or factory arguments.
    InvalidArgument,
    /// A row, column or component index outside `[0, bound)`.
    IndexOutOfRange,
    /// Operands whose shapes are incompatible with the operation.
    Domain,
    /// No arithmetic binding exists for the element type.
    Configuration,
    /// The matrix has no inverse / factorization.
    Singular,
}

/// All errors returned by `lamina-core`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// Non-positive dimensions, mismatched buffer length, ragged rows.
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: &'static str },

    /// A flat or (row, column) index is out of bounds.
    #[error("index {index:?} out of range for shape {shape:?}")]
    IndexOutOfRange {
        index: Vec<usize>,
        shape: Vec<usize>,
    },

    /// Operand shapes do not line up for a binary operation.
    #[error("{operation}: incompatible shapes {left:?} and {right:?}")]
    ShapeMismatch {
        operation: &'static str,
        left: Vec<usize>,
        right: Vec<usize>,
    },

    /// The operation is undefined for the operand (non-square, too small).
    #[error("{operation}: {reason}")]
    Domain {
        operation: &'static str,
        reason: &'static str,
    },

    /// The operator provider could not bind the element type.
    #[error("no arithmetic binding for `{type_name}`: {reason}")]
    Configuration {
        type_name: &'static str,
        reason: &'static str,
    },

    /// Matrix is singular and cannot be inverted / decomposed.
    #[error("singular matrix")]
    Singular,
}

impl MatrixError {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::ShapeMismatch { .. } | Self::Domain { .. } => ErrorKind::Domain,
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Singular => ErrorKind::Singular,
        }
    }

    pub(crate) fn index(row: usize, column: usize, rows: usize, columns: usize) -> Self {
        Self::IndexOutOfRange {
            index: vec![row, column],
            shape: vec![rows, columns],
        }
    }

    pub(crate) fn shapes(
        operation: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    ) -> Self {
        Self::ShapeMismatch {
            operation,
            left: vec![left.0, left.1],
            right: vec![right.0, right.1],
        }
    }
}

/// Convenience alias used throughout `lamina-core`.
pub type Result<T> = std::result::Result<T, MatrixError>;
