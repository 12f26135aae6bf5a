//! Exact k-nearest-neighbour search for case–control matching.
//!
//! Candidates ("controls") are loaded once into a [`KdTree`]; each anchor
//! ("case") is then queried for its `k` nearest candidates by Euclidean
//! distance. Results come back as [`NeighborList`]s, the unit that the
//! de-duplication stage in `kdmatch-resolve` works on.
//!
//! # Quick start
//!
//! ```
//! use kdmatch_knn::{KdTree, Point, query_neighbors};
//!
//! let candidates = vec![
//!     Point::new("c1", vec![0.0, 0.0]),
//!     Point::new("c2", vec![1.0, 0.0]),
//!     Point::new("c3", vec![5.0, 5.0]),
//! ];
//! let index = KdTree::build(candidates).unwrap();
//!
//! let lists = query_neighbors(&index, vec![Point::new("a", vec![0.0, 0.0])], 2).unwrap();
//! let ids: Vec<_> = lists[0].candidate_ids().collect();
//! assert_eq!(ids, vec!["c1", "c2"]);
//! ```
//!
//! # Architecture
//!
//! ```text
//! query_neighbors()
//!   └─ KdTree::nearest()       (tree.rs)
//!        ├─ sq_euclidean()     (distance.rs)
//!        └─ ResultHeap::offer() (heap.rs)
//! ```
//!
//! Ties on distance are broken by candidate insertion order, so a query
//! returns exactly what a stable sort of all candidates by distance would.

pub mod distance;
pub mod error;
pub mod heap;
pub mod neighbors;
pub mod point;
pub mod tree;

pub use distance::{euclidean, sq_euclidean};
pub use error::KnnError;
pub use heap::ResultHeap;
pub use neighbors::{Neighbor, NeighborList, query_neighbors};
pub use point::Point;
pub use tree::KdTree;
