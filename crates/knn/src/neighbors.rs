//! Neighbour lists: an anchor and its selected candidates.

use std::sync::Arc;

use tracing::debug;

use crate::error::KnnError;
use crate::point::Point;
use crate::tree::KdTree;

/// A selected candidate and its Euclidean distance to the anchor.
#[derive(Debug)]
pub struct Neighbor<P> {
    point: Arc<Point<P>>,
    distance: f64,
}

impl<P> Neighbor<P> {
    /// Creates a neighbour entry.
    pub fn new(point: Arc<Point<P>>, distance: f64) -> Self {
        Self { point, distance }
    }

    /// The candidate point.
    pub fn point(&self) -> &Arc<Point<P>> {
        &self.point
    }

    /// The candidate identifier.
    pub fn id(&self) -> &str {
        self.point.id()
    }

    /// Euclidean distance to the anchor.
    pub fn distance(&self) -> f64 {
        self.distance
    }
}

impl<P> Clone for Neighbor<P> {
    fn clone(&self) -> Self {
        Self {
            point: Arc::clone(&self.point),
            distance: self.distance,
        }
    }
}

/// One anchor with its candidates, nearest first.
///
/// Raw lists come straight from [`query_neighbors`] and have
/// `resolved_changed == false`. De-duplication produces new lists whose
/// entries are a subset of the raw ones and sets the flag when any position
/// holds a different candidate than the raw list did.
#[derive(Debug)]
pub struct NeighborList<P> {
    anchor: Arc<Point<P>>,
    neighbors: Vec<Neighbor<P>>,
    resolved_changed: bool,
}

impl<P> NeighborList<P> {
    /// Creates an unresolved list.
    pub fn new(anchor: Arc<Point<P>>, neighbors: Vec<Neighbor<P>>) -> Self {
        Self {
            anchor,
            neighbors,
            resolved_changed: false,
        }
    }

    /// Sets the resolution flag.
    pub fn with_resolved_changed(mut self, changed: bool) -> Self {
        self.resolved_changed = changed;
        self
    }

    /// The anchor point.
    pub fn anchor(&self) -> &Arc<Point<P>> {
        &self.anchor
    }

    /// Selected candidates, nearest first.
    pub fn neighbors(&self) -> &[Neighbor<P>] {
        &self.neighbors
    }

    /// Number of selected candidates.
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns `true` if no candidate is selected.
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Whether any slot differs from the raw selection.
    pub fn resolved_changed(&self) -> bool {
        self.resolved_changed
    }

    /// Candidate identifiers in slot order.
    pub fn candidate_ids(&self) -> impl Iterator<Item = &str> {
        self.neighbors.iter().map(Neighbor::id)
    }

    /// Returns `true` if `id` is one of the selected candidates.
    pub fn contains(&self, id: &str) -> bool {
        self.candidate_ids().any(|c| c == id)
    }

    /// Returns a copy keeping only the first `k` slots. The flag is kept.
    pub fn truncated(&self, k: usize) -> Self {
        Self {
            anchor: Arc::clone(&self.anchor),
            neighbors: self.neighbors.iter().take(k).cloned().collect(),
            resolved_changed: self.resolved_changed,
        }
    }
}

impl<P> Clone for NeighborList<P> {
    fn clone(&self) -> Self {
        Self {
            anchor: Arc::clone(&self.anchor),
            neighbors: self.neighbors.clone(),
            resolved_changed: self.resolved_changed,
        }
    }
}

/// Queries the `k` nearest candidates for every anchor.
///
/// Returns one raw [`NeighborList`] per anchor, in anchor input order.
///
/// # Errors
///
/// Returns [`KnnError::InvalidK`] if `k == 0`, or the first dimension error
/// raised by an anchor that does not fit the index.
#[tracing::instrument(skip_all, fields(k = k, n_candidates = index.len()))]
pub fn query_neighbors<P>(
    index: &KdTree<P>,
    anchors: impl IntoIterator<Item = Point<P>>,
    k: usize,
) -> Result<Vec<NeighborList<P>>, KnnError> {
    if k == 0 {
        return Err(KnnError::InvalidK { k });
    }
    let lists = anchors
        .into_iter()
        .map(|anchor| {
            let neighbors = index.nearest(&anchor, k)?;
            Ok(NeighborList::new(Arc::new(anchor), neighbors))
        })
        .collect::<Result<Vec<_>, KnnError>>()?;
    debug!(n_anchors = lists.len(), "raw neighbour lists built");
    Ok(lists)
}
