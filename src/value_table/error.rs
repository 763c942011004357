use thiserror::Error;

/// Errors raised while persisting or combining value tables.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Value function I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Value function stream has data beyond {expected} values")]
    TrailingData { expected: usize },

    #[error("Table shape mismatch: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },

    #[error("Cannot average an empty set of value tables")]
    Empty,
}
