//! Immutable points in a shared feature space.

use crate::error::KnnError;

/// A labelled point: identifier, coordinates and a domain payload.
///
/// Geometry lives in `coords`; anything the matching engine does not need to
/// look at (strata, case/control status, source row text) goes in the
/// payload `P`. Points are never mutated after construction.
///
/// # Example
///
/// ```
/// use kdmatch_knn::Point;
///
/// let p = Point::new("s1", vec![0.5, -1.0]);
/// assert_eq!(p.id(), "s1");
/// assert_eq!(p.dim(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Point<P = ()> {
    id: String,
    coords: Vec<f64>,
    payload: P,
}

impl Point<()> {
    /// Creates a point without a payload.
    pub fn new(id: impl Into<String>, coords: Vec<f64>) -> Self {
        Self::with_payload(id, coords, ())
    }
}

impl<P> Point<P> {
    /// Creates a point carrying `payload`.
    pub fn with_payload(id: impl Into<String>, coords: Vec<f64>, payload: P) -> Self {
        Self {
            id: id.into(),
            coords,
            payload,
        }
    }

    /// Returns the identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the coordinate vector.
    pub fn coords(&self) -> &[f64] {
        &self.coords
    }

    /// Returns the number of coordinates.
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    /// Returns the payload.
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Checks that this point has exactly `dim` finite coordinates.
    pub(crate) fn check(&self, dim: usize) -> Result<(), KnnError> {
        if self.coords.len() != dim {
            return Err(KnnError::DimensionMismatch {
                id: self.id.clone(),
                expected: dim,
                got: self.coords.len(),
            });
        }
        if let Some(axis) = self.coords.iter().position(|c| !c.is_finite()) {
            return Err(KnnError::NonFiniteCoordinate {
                id: self.id.clone(),
                axis,
            });
        }
        Ok(())
    }
}
