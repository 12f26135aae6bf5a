//! Error types for the kdmatch-resolve crate.

use kdmatch_assign::AssignError;

/// Error type for all fallible operations in the kdmatch-resolve crate.
///
/// Every variant aborts the whole resolution call; no partial output is
/// returned.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    /// Returned when the final number of slots per anchor is zero.
    #[error("final k must be >= 1, got {k}")]
    InvalidFinalK {
        /// The invalid k value.
        k: usize,
    },

    /// Returned when the worker pool size is zero.
    #[error("threads must be >= 1, got {threads}")]
    InvalidThreads {
        /// The invalid thread count.
        threads: usize,
    },

    /// Returned when the worker pool cannot be created.
    #[error("failed to build worker pool: {reason}")]
    ThreadPool {
        /// Description of the pool failure.
        reason: String,
    },

    /// Returned when a community solve fails.
    #[error("assignment failed: {0}")]
    Assign(#[from] AssignError),

    /// Returned when the communities did not give back one list per
    /// conflicted input. Indicates a bug, never bad input.
    #[error("resolved {got} conflicted matches, expected {expected}")]
    CardinalityMismatch {
        /// Number of conflicted lists that entered partitioning.
        expected: usize,
        /// Number of lists produced by the community solves.
        got: usize,
    },
}
