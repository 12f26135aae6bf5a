//! Error types for the kdmatch-knn crate.

/// Error type for all fallible operations in the kdmatch-knn crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KnnError {
    /// Returned when a point carries an empty coordinate vector.
    #[error("point '{id}' has no coordinates")]
    ZeroDimension {
        /// Identifier of the offending point.
        id: String,
    },

    /// Returned when a point's coordinate count disagrees with the index.
    #[error("point '{id}' has {got} coordinates, expected {expected}")]
    DimensionMismatch {
        /// Identifier of the offending point.
        id: String,
        /// Dimension fixed by the first point seen.
        expected: usize,
        /// Dimension of the offending point.
        got: usize,
    },

    /// Returned when a coordinate is NaN or infinite.
    #[error("point '{id}' has a non-finite coordinate at position {axis}")]
    NonFiniteCoordinate {
        /// Identifier of the offending point.
        id: String,
        /// Zero-based coordinate position.
        axis: usize,
    },

    /// Returned when a neighbour query asks for zero neighbours.
    #[error("k must be >= 1, got {k}")]
    InvalidK {
        /// The invalid k value.
        k: usize,
    },
}
