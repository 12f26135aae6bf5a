//! Dense cost matrix with a finite infeasibility sentinel.

use crate::error::AssignError;

/// Row-major cost matrix for a minimum-cost assignment.
///
/// Cells at or above [`infeasible`](Self::infeasible) mark pairs that must
/// never be matched. The sentinel is a large *finite* value: the solver
/// subtracts and compares reduced costs, which stays well defined only
/// without infinities.
#[derive(Debug, Clone)]
pub struct CostMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
    infeasible: f64,
}

impl CostMatrix {
    /// Creates a `rows × cols` matrix with every cell infeasible.
    pub fn infeasible_filled(rows: usize, cols: usize, infeasible: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![infeasible; rows * cols],
            infeasible,
        }
    }

    /// Creates a matrix from nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`AssignError::RaggedRows`] if rows differ in length, plus
    /// anything [`validate`](Self::validate) rejects.
    pub fn from_rows(rows: Vec<Vec<f64>>, infeasible: f64) -> Result<Self, AssignError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != n_cols {
                return Err(AssignError::RaggedRows {
                    row,
                    expected: n_cols,
                    got: values.len(),
                });
            }
            data.extend(values);
        }
        let matrix = Self {
            rows: n_rows,
            cols: n_cols,
            data,
            infeasible,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Smallest sentinel that makes one infeasible cell cost more than any
    /// complete assignment of feasible cells.
    ///
    /// With `rows` rows and feasible costs at most `max_cost`, every feasible
    /// assignment totals at most `rows × max_cost`, so
    /// `(max_cost + 1) × (rows + 1)` makes the solver maximise the number of
    /// feasible pairs first and minimise their cost second.
    pub fn sentinel_for(max_cost: f64, rows: usize) -> f64 {
        (max_cost.max(0.0) + 1.0) * (rows as f64 + 1.0)
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The infeasibility sentinel.
    pub fn infeasible(&self) -> f64 {
        self.infeasible
    }

    /// Cost of cell `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of bounds.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        assert!(row < self.rows && col < self.cols, "cell out of bounds");
        self.data[row * self.cols + col]
    }

    /// Sets cell `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if the cell is out of bounds.
    pub fn set(&mut self, row: usize, col: usize, cost: f64) {
        assert!(row < self.rows && col < self.cols, "cell out of bounds");
        self.data[row * self.cols + col] = cost;
    }

    /// Returns `true` if the pair may be matched.
    #[inline]
    pub fn is_feasible(&self, row: usize, col: usize) -> bool {
        self.get(row, col) < self.infeasible
    }

    /// Checks the sentinel and every cell.
    ///
    /// # Errors
    ///
    /// Returns [`AssignError::InvalidSentinel`] for a non-finite or
    /// non-positive sentinel and [`AssignError::InvalidCost`] for the first
    /// negative or non-finite cell.
    pub fn validate(&self) -> Result<(), AssignError> {
        if !self.infeasible.is_finite() || self.infeasible <= 0.0 {
            return Err(AssignError::InvalidSentinel {
                value: self.infeasible,
            });
        }
        if let Some(pos) = self.data.iter().position(|v| !v.is_finite() || *v < 0.0) {
            return Err(AssignError::InvalidCost {
                row: pos / self.cols,
                col: pos % self.cols,
                value: self.data[pos],
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infeasible_filled_marks_every_cell() {
        let m = CostMatrix::infeasible_filled(2, 3, 100.0);
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        for r in 0..2 {
            for c in 0..3 {
                assert!(!m.is_feasible(r, c));
            }
        }
    }

    #[test]
    fn set_and_get() {
        let mut m = CostMatrix::infeasible_filled(2, 2, 100.0);
        m.set(1, 0, 2.5);
        assert_eq!(m.get(1, 0), 2.5);
        assert!(m.is_feasible(1, 0));
        assert!(!m.is_feasible(0, 1));
    }

    #[test]
    fn from_rows_is_row_major() {
        let m = CostMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]], 10.0).unwrap();
        assert_eq!(m.get(0, 1), 2.0);
        assert_eq!(m.get(1, 0), 3.0);
    }

    #[test]
    fn from_rows_rejects_ragged() {
        let err = CostMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]], 10.0).unwrap_err();
        assert!(matches!(
            err,
            AssignError::RaggedRows {
                row: 1,
                expected: 2,
                got: 1
            }
        ));
    }

    #[test]
    fn validate_rejects_nan_cell() {
        let err = CostMatrix::from_rows(vec![vec![1.0, f64::NAN]], 10.0).unwrap_err();
        assert!(matches!(err, AssignError::InvalidCost { row: 0, col: 1, .. }));
    }

    #[test]
    fn validate_rejects_negative_cell() {
        let err = CostMatrix::from_rows(vec![vec![0.0], vec![-1.0]], 10.0).unwrap_err();
        assert!(matches!(err, AssignError::InvalidCost { row: 1, col: 0, .. }));
    }

    #[test]
    fn validate_rejects_infinite_sentinel() {
        let err = CostMatrix::from_rows(vec![vec![1.0]], f64::INFINITY).unwrap_err();
        assert!(matches!(err, AssignError::InvalidSentinel { .. }));
    }

    #[test]
    fn empty_matrix_is_valid() {
        let m = CostMatrix::from_rows(Vec::new(), 1.0).unwrap();
        assert_eq!(m.rows(), 0);
        assert_eq!(m.cols(), 0);
    }

    #[test]
    fn sentinel_exceeds_any_feasible_total() {
        let s = CostMatrix::sentinel_for(3.0, 4);
        assert!(s > 4.0 * 3.0);
        assert!(s.is_finite());
        assert_eq!(CostMatrix::sentinel_for(0.0, 0), 1.0);
    }
}
