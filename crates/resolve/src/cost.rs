//! Cost matrix for one community.

use std::collections::HashMap;

use kdmatch_assign::CostMatrix;
use kdmatch_knn::NeighborList;

/// A community's cost matrix plus the mapping back to raw list positions.
///
/// Row `i * k + r` is replicate `r` of list `i`; columns are the
/// community's distinct candidates in first-seen order.
#[derive(Debug)]
pub(crate) struct CommunityCosts {
    matrix: CostMatrix,
    /// Per list: `(column, raw position)` for each distinct candidate.
    slots: Vec<Vec<(usize, usize)>>,
    k: usize,
}

impl CommunityCosts {
    pub fn build<P>(lists: &[&NeighborList<P>], k: usize) -> Self {
        let mut columns: HashMap<&str, usize> = HashMap::new();
        let mut slots: Vec<Vec<(usize, usize)>> = Vec::with_capacity(lists.len());
        let mut max_cost = 0.0_f64;

        for list in lists {
            let mut own: Vec<(usize, usize)> = Vec::with_capacity(list.len());
            for (pos, neighbor) in list.neighbors().iter().enumerate() {
                let next = columns.len();
                let col = *columns.entry(neighbor.id()).or_insert(next);
                // Lists are nearest-first, so the first occurrence is the cheapest.
                if own.iter().all(|&(c, _)| c != col) {
                    own.push((col, pos));
                    max_cost = max_cost.max(neighbor.distance());
                }
            }
            slots.push(own);
        }

        let rows = lists.len() * k;
        let sentinel = CostMatrix::sentinel_for(max_cost, rows);
        let mut matrix = CostMatrix::infeasible_filled(rows, columns.len(), sentinel);
        for (i, (list, own)) in lists.iter().zip(&slots).enumerate() {
            for &(col, pos) in own {
                let distance = list.neighbors()[pos].distance();
                for r in 0..k {
                    matrix.set(i * k + r, col, distance);
                }
            }
        }

        Self { matrix, slots, k }
    }

    pub fn matrix(&self) -> &CostMatrix {
        &self.matrix
    }

    /// Rows belonging to list `i`.
    pub fn rows_of(&self, i: usize) -> std::ops::Range<usize> {
        i * self.k..(i + 1) * self.k
    }

    /// Raw position in list `i` of the candidate in column `col`.
    pub fn raw_position(&self, i: usize, col: usize) -> Option<usize> {
        self.slots[i]
            .iter()
            .find_map(|&(c, pos)| (c == col).then_some(pos))
    }
}
