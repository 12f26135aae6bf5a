//! Conflict resolution for nearest-neighbour matches.
//!
//! Raw neighbour lists from `kdmatch-knn` are oversampled: each anchor asks
//! for more candidates than it finally keeps, and the same candidate can be
//! nearest to several anchors. This crate grants every candidate to at most
//! one anchor while keeping the total matched distance minimal.
//!
//! Lists that share no candidate with any other list pass straight through.
//! The rest are grouped into communities (connected components of the
//! shared-candidate graph), and each community is solved as one assignment
//! problem on a bounded worker pool.
//!
//! # Quick start
//!
//! ```
//! use kdmatch_knn::{KdTree, Point, query_neighbors};
//! use kdmatch_resolve::{ResolveConfig, resolve_duplicates};
//!
//! let index = KdTree::build(vec![Point::new("c1", vec![0.0, 0.0])]).unwrap();
//! let anchors = vec![Point::new("a", vec![0.0, 0.0]), Point::new("b", vec![0.0, 1.0])];
//! let raw = query_neighbors(&index, anchors, 1).unwrap();
//!
//! let resolved = resolve_duplicates(raw, &ResolveConfig::new(1).with_threads(2)).unwrap();
//! assert_eq!(resolved[0].candidate_ids().collect::<Vec<_>>(), vec!["c1"]);
//! assert!(resolved[1].is_empty());
//! assert!(resolved[1].resolved_changed());
//! ```
//!
//! # Architecture
//!
//! ```text
//! resolve_duplicates_with_stats()
//!   ├─ partition_matches()        (partition.rs)
//!   ├─ detect_communities()       (community.rs, union_find.rs)
//!   └─ per community, in parallel:
//!        resolve_community()      (resolve.rs)
//!          ├─ CommunityCosts      (cost.rs)
//!          └─ kdmatch_assign::solve()
//! ```

pub mod community;
pub mod config;
mod cost;
pub mod error;
pub mod partition;
pub mod resolve;
mod union_find;

pub use community::detect_communities;
pub use config::ResolveConfig;
pub use error::ResolveError;
pub use partition::{Partition, partition_matches};
pub use resolve::{
    ResolveStats, resolve_community, resolve_duplicates, resolve_duplicates_with_stats,
};
