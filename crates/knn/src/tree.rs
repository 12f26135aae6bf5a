//! Build-once k-d tree for exact nearest-neighbour queries.

use std::sync::Arc;

use crate::distance::sq_euclidean;
use crate::error::KnnError;
use crate::heap::ResultHeap;
use crate::neighbors::Neighbor;
use crate::point::Point;

/// Maximum number of points in a leaf bucket before it is split.
const LEAF_SIZE: usize = 8;

/// Internal node stored in a flat array.
#[derive(Debug, Clone)]
enum Node {
    /// Interior node: split axis, split value, left and right child indices.
    ///
    /// Points in `left` have `coord[axis] <= value`, points in `right` have
    /// `coord[axis] >= value`.
    Split {
        axis: usize,
        value: f64,
        left: usize,
        right: usize,
    },
    /// Leaf bucket: range `[start..end)` into `order`.
    Leaf { start: usize, end: usize },
}

/// Exact k-nearest-neighbour index over an immutable point set.
///
/// The tree splits at the median of axis `depth mod D` and stops at small
/// leaf buckets, so it is balanced regardless of input order. Points are kept
/// in insertion order; queries rank candidates by `(squared distance,
/// insertion index)`, which makes results identical to a stable brute-force
/// sort even when several candidates are equidistant.
///
/// # Example
///
/// ```
/// use kdmatch_knn::{KdTree, Point};
///
/// let tree = KdTree::build(vec![
///     Point::new("c1", vec![0.0, 0.0]),
///     Point::new("c2", vec![1.0, 0.0]),
///     Point::new("c3", vec![5.0, 5.0]),
/// ])
/// .unwrap();
///
/// let hits = tree.nearest(&Point::new("a", vec![0.0, 0.0]), 2).unwrap();
/// let ids: Vec<_> = hits.iter().map(|n| n.id()).collect();
/// assert_eq!(ids, vec!["c1", "c2"]);
/// ```
#[derive(Debug)]
pub struct KdTree<P> {
    dim: usize,
    points: Vec<Arc<Point<P>>>,
    order: Vec<usize>,
    nodes: Vec<Node>,
}

impl<P> KdTree<P> {
    /// Builds the index from `points`.
    ///
    /// The first point fixes the dimension D.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::ZeroDimension`] if the first point has no
    /// coordinates, [`KnnError::DimensionMismatch`] if any later point has a
    /// different length, and [`KnnError::NonFiniteCoordinate`] for NaN or
    /// infinite coordinates.
    pub fn build(points: impl IntoIterator<Item = Point<P>>) -> Result<Self, KnnError> {
        Self::build_shared(points.into_iter().map(Arc::new))
    }

    /// Builds the index from already shared points.
    ///
    /// # Errors
    ///
    /// Same as [`KdTree::build`].
    pub fn build_shared(
        points: impl IntoIterator<Item = Arc<Point<P>>>,
    ) -> Result<Self, KnnError> {
        let points: Vec<Arc<Point<P>>> = points.into_iter().collect();

        let dim = match points.first() {
            None => {
                return Ok(Self {
                    dim: 0,
                    points,
                    order: Vec::new(),
                    nodes: Vec::new(),
                });
            }
            Some(first) if first.dim() == 0 => {
                return Err(KnnError::ZeroDimension {
                    id: first.id().to_string(),
                });
            }
            Some(first) => first.dim(),
        };
        for p in &points {
            p.check(dim)?;
        }

        let mut order: Vec<usize> = (0..points.len()).collect();
        let mut nodes = Vec::new();
        build_recursive(&points, dim, &mut order, 0, 0, &mut nodes);

        Ok(Self {
            dim,
            points,
            order,
            nodes,
        })
    }

    /// Number of indexed points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` when the index holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Dimension of the indexed points (0 for an empty index).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Indexed points in insertion order.
    pub fn points(&self) -> &[Arc<Point<P>>] {
        &self.points
    }

    /// Returns up to `k` nearest points to `target`, nearest first.
    ///
    /// Fewer than `k` results come back only when the index holds fewer than
    /// `k` points. An empty index yields an empty result for any target.
    ///
    /// # Errors
    ///
    /// Returns [`KnnError::InvalidK`] for `k == 0`, and
    /// [`KnnError::DimensionMismatch`] / [`KnnError::NonFiniteCoordinate`] if
    /// `target` does not fit the index. Both are checked before any traversal.
    pub fn nearest<Q>(&self, target: &Point<Q>, k: usize) -> Result<Vec<Neighbor<P>>, KnnError> {
        if k == 0 {
            return Err(KnnError::InvalidK { k });
        }
        if self.nodes.is_empty() {
            return Ok(Vec::new());
        }
        target.check(self.dim)?;

        let mut heap = ResultHeap::new(k.min(self.points.len()));
        self.search(0, target.coords(), &mut heap);

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|((d2, _), idx)| Neighbor::new(Arc::clone(&self.points[idx]), d2.sqrt()))
            .collect())
    }

    fn search(&self, node_idx: usize, query: &[f64], heap: &mut ResultHeap<(f64, usize), usize>) {
        match self.nodes[node_idx] {
            Node::Leaf { start, end } => {
                for &idx in &self.order[start..end] {
                    let d2 = sq_euclidean(query, self.points[idx].coords());
                    heap.offer((d2, idx), idx);
                }
            }
            Node::Split {
                axis,
                value,
                left,
                right,
            } => {
                let diff = query[axis] - value;
                let (near, far) = if diff < 0.0 {
                    (left, right)
                } else {
                    (right, left)
                };
                self.search(near, query, heap);

                // An equidistant point behind the plane may still win on
                // insertion index, so only strictly farther planes are pruned.
                let visit_far = match heap.peek_worst() {
                    Some(&(worst, _)) if heap.is_full() => diff * diff <= worst,
                    _ => true,
                };
                if visit_far {
                    self.search(far, query, heap);
                }
            }
        }
    }
}

fn build_recursive<P>(
    points: &[Arc<Point<P>>],
    dim: usize,
    order: &mut [usize],
    offset: usize,
    depth: usize,
    nodes: &mut Vec<Node>,
) -> usize {
    let count = order.len();
    let node_idx = nodes.len();

    if count <= LEAF_SIZE {
        order.sort_unstable();
        nodes.push(Node::Leaf {
            start: offset,
            end: offset + count,
        });
        return node_idx;
    }

    let axis = depth % dim;
    let mid = count / 2;
    order.select_nth_unstable_by(mid, |&a, &b| {
        points[a].coords()[axis]
            .total_cmp(&points[b].coords()[axis])
            .then(a.cmp(&b))
    });
    let value = points[order[mid]].coords()[axis];

    nodes.push(Node::Leaf { start: 0, end: 0 });
    let (lower, upper) = order.split_at_mut(mid);
    let left = build_recursive(points, dim, lower, offset, depth + 1, nodes);
    let right = build_recursive(points, dim, upper, offset + mid, depth + 1, nodes);

    nodes[node_idx] = Node::Split {
        axis,
        value,
        left,
        right,
    };
    node_idx
}
