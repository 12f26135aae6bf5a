//! Hungarian algorithm (shortest augmenting path with potentials).

use crate::error::AssignError;
use crate::matrix::CostMatrix;

/// Result of an assignment solve: one optional column per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    row_to_col: Vec<Option<usize>>,
    total_cost: f64,
}

impl Assignment {
    /// Column assigned to `row`, or `None` if the row stays unmatched.
    pub fn get(&self, row: usize) -> Option<usize> {
        self.row_to_col.get(row).copied().flatten()
    }

    /// Per-row assignments.
    pub fn as_slice(&self) -> &[Option<usize>] {
        &self.row_to_col
    }

    /// Number of rows that received a column.
    pub fn n_assigned(&self) -> usize {
        self.row_to_col.iter().filter(|c| c.is_some()).count()
    }

    /// Sum of the costs of all assigned (feasible) cells.
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }
}

/// Solves the minimum-cost assignment for `matrix`.
///
/// Every row gets at most one column and no column is used twice. The total
/// cost over all rows is minimised (optimal, not row-by-row greedy). A row ends
/// up unassigned when there are more rows than columns or when the only cell
/// left for it is infeasible; neither case is an error.
///
/// With a sentinel from [`CostMatrix::sentinel_for`], the solution has the
/// largest possible number of feasible pairs and, among those, the smallest
/// total distance.
///
/// # Errors
///
/// Returns whatever [`CostMatrix::validate`] rejects.
///
/// # Example
///
/// ```
/// use kdmatch_assign::{CostMatrix, solve};
///
/// let m = CostMatrix::from_rows(vec![vec![4.0, 1.0], vec![2.0, 8.0]], 100.0).unwrap();
/// let a = solve(&m).unwrap();
/// assert_eq!(a.as_slice(), &[Some(1), Some(0)]);
/// assert_eq!(a.total_cost(), 3.0);
/// ```
pub fn solve(matrix: &CostMatrix) -> Result<Assignment, AssignError> {
    matrix.validate()?;
    let (rows, cols) = (matrix.rows(), matrix.cols());

    let raw = if rows == 0 || cols == 0 {
        vec![None; rows]
    } else if rows <= cols {
        augment(rows, cols, |r, c| matrix.get(r, c))
    } else {
        // Solve on the transpose so every column is matched, then invert.
        let col_to_row = augment(cols, rows, |c, r| matrix.get(r, c));
        let mut row_to_col = vec![None; rows];
        for (col, row) in col_to_row.into_iter().enumerate() {
            if let Some(row) = row {
                row_to_col[row] = Some(col);
            }
        }
        row_to_col
    };

    let mut total_cost = 0.0;
    let row_to_col = raw
        .into_iter()
        .enumerate()
        .map(|(row, col)| {
            col.filter(|&c| matrix.is_feasible(row, c)).inspect(|&c| {
                total_cost += matrix.get(row, c);
            })
        })
        .collect();

    Ok(Assignment {
        row_to_col,
        total_cost,
    })
}

/// Core O(n²m) solver for `n <= m`: returns the column matched to each row.
///
/// Index 0 of `u`, `v`, `p` and `way` is a virtual row/column; real rows and
/// columns are 1-based internally.
fn augment(n: usize, m: usize, cost: impl Fn(usize, usize) -> f64) -> Vec<Option<usize>> {
    debug_assert!(n <= m);

    let mut u = vec![0.0_f64; n + 1];
    let mut v = vec![0.0_f64; m + 1];
    // p[j]: row matched to column j (0 = free).
    let mut p = vec![0_usize; m + 1];
    let mut way = vec![0_usize; m + 1];
    let mut minv = vec![f64::MAX; m + 1];
    let mut used = vec![false; m + 1];

    for i in 1..=n {
        p[0] = i;
        let mut j0 = 0;
        minv.fill(f64::MAX);
        used.fill(false);

        loop {
            used[j0] = true;
            let i0 = p[j0];
            let mut delta = f64::MAX;
            let mut j1 = 0;
            for j in 1..=m {
                if used[j] {
                    continue;
                }
                let reduced = cost(i0 - 1, j - 1) - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            for j in 0..=m {
                if used[j] {
                    u[p[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if p[j0] == 0 {
                break;
            }
        }

        // Flip the alternating path back to the virtual column.
        loop {
            let j1 = way[j0];
            p[j0] = p[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut row_to_col = vec![None; n];
    for j in 1..=m {
        if p[j] != 0 {
            row_to_col[p[j] - 1] = Some(j - 1);
        }
    }
    row_to_col
}
