//! Randomised optimality checks against exhaustive search.

use approx::assert_abs_diff_eq;
use kdmatch_assign::{CostMatrix, solve};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Best (feasible pair count, total cost) over every partial one-to-one
/// matching: more feasible pairs first, then lower cost.
fn exhaustive(m: &CostMatrix) -> (usize, f64) {
    fn go(
        m: &CostMatrix,
        row: usize,
        used: &mut [bool],
        count: usize,
        cost: f64,
        best: &mut (usize, f64),
    ) {
        if row == m.rows() {
            if count > best.0 || (count == best.0 && cost < best.1) {
                *best = (count, cost);
            }
            return;
        }
        // Leave this row unassigned.
        go(m, row + 1, used, count, cost, best);
        for col in 0..m.cols() {
            if !used[col] && m.is_feasible(row, col) {
                used[col] = true;
                go(m, row + 1, used, count + 1, cost + m.get(row, col), best);
                used[col] = false;
            }
        }
    }
    let mut best = (0, 0.0);
    let mut used = vec![false; m.cols()];
    go(m, 0, &mut used, 0, 0.0, &mut best);
    best
}

fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize, p_feasible: f64) -> CostMatrix {
    let sentinel = CostMatrix::sentinel_for(10.0, rows);
    let mut m = CostMatrix::infeasible_filled(rows, cols, sentinel);
    for r in 0..rows {
        for c in 0..cols {
            if rng.random_bool(p_feasible) {
                m.set(r, c, rng.random_range(0.0..10.0));
            }
        }
    }
    m
}

fn check(m: &CostMatrix) {
    let a = solve(m).unwrap();

    // No column is used twice and no infeasible cell is assigned.
    let mut seen = vec![false; m.cols()];
    for (row, col) in a.as_slice().iter().enumerate() {
        if let Some(col) = *col {
            assert!(!seen[col], "column {col} assigned twice");
            seen[col] = true;
            assert!(m.is_feasible(row, col));
        }
    }

    let (count, cost) = exhaustive(m);
    assert_eq!(a.n_assigned(), count);
    assert_abs_diff_eq!(a.total_cost(), cost, epsilon = 1e-9);
}

#[test]
fn dense_square() {
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..50 {
        let n = rng.random_range(1..=5);
        check(&random_matrix(&mut rng, n, n, 1.0));
    }
}

#[test]
fn sparse_rectangular() {
    let mut rng = StdRng::seed_from_u64(12);
    for _ in 0..200 {
        let rows = rng.random_range(1..=5);
        let cols = rng.random_range(1..=5);
        check(&random_matrix(&mut rng, rows, cols, 0.4));
    }
}

#[test]
fn replicated_rows() {
    // Each claimant appears twice, as when an anchor asks for two slots.
    let mut rng = StdRng::seed_from_u64(13);
    for _ in 0..100 {
        let claimants = rng.random_range(1..=3);
        let cols = rng.random_range(1..=5);
        let base = random_matrix(&mut rng, claimants, cols, 0.6);
        let sentinel = CostMatrix::sentinel_for(10.0, claimants * 2);
        let mut m = CostMatrix::infeasible_filled(claimants * 2, cols, sentinel);
        for r in 0..claimants {
            for c in 0..cols {
                if base.is_feasible(r, c) {
                    m.set(2 * r, c, base.get(r, c));
                    m.set(2 * r + 1, c, base.get(r, c));
                }
            }
        }
        check(&m);
    }
}
