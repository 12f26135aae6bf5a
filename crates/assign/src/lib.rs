//! Minimum-cost bipartite assignment.
//!
//! Given a [`CostMatrix`] whose rows are claimants and columns are resources,
//! [`solve`] finds the one-to-one matching with the smallest total cost. Pairs
//! that must never be matched carry a finite *infeasible* sentinel; rows left
//! with nothing but infeasible cells come back unassigned.
//!
//! # Quick start
//!
//! ```
//! use kdmatch_assign::{CostMatrix, solve};
//!
//! // Two rows want the single cheap column; only one can have it.
//! let sentinel = CostMatrix::sentinel_for(1.0, 2);
//! let mut m = CostMatrix::infeasible_filled(2, 1, sentinel);
//! m.set(0, 0, 0.0);
//! m.set(1, 0, 1.0);
//!
//! let a = solve(&m).unwrap();
//! assert_eq!(a.get(0), Some(0));
//! assert_eq!(a.get(1), None);
//! ```
//!
//! Rectangular matrices are fine in either orientation. The solver is the
//! shortest-augmenting-path form of the Hungarian algorithm, O(n²m) for
//! `n <= m`.

pub mod error;
pub mod hungarian;
pub mod matrix;

pub use error::AssignError;
pub use hungarian::{Assignment, solve};
pub use matrix::CostMatrix;
