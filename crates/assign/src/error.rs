//! Error types for the kdmatch-assign crate.

/// Error type for all fallible operations in the kdmatch-assign crate.
///
/// An unassignable row is not an error: it shows up as `None` in the
/// [`Assignment`](crate::Assignment).
#[derive(Debug, Clone, thiserror::Error)]
pub enum AssignError {
    /// Returned when input rows have different lengths.
    #[error("row {row} has {got} columns, expected {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of the offending row.
        got: usize,
    },

    /// Returned when a cell is negative or non-finite.
    #[error("cost at ({row}, {col}) must be finite and non-negative, got {value}")]
    InvalidCost {
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
        /// The invalid cost.
        value: f64,
    },

    /// Returned when the infeasibility sentinel is non-finite or non-positive.
    #[error("infeasible sentinel must be finite and positive, got {value}")]
    InvalidSentinel {
        /// The invalid sentinel.
        value: f64,
    },
}
