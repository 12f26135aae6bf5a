//! Connected components of the shared-candidate conflict graph.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use kdmatch_knn::NeighborList;

use crate::union_find::UnionFind;

/// Groups lists into communities of transitively shared candidates.
///
/// Two lists land in the same community iff a chain of lists, each sharing
/// at least one candidate ID with the next, connects them. The result is a
/// partition of `0..lists.len()`: communities are ordered by their first
/// member and members keep input order. A list sharing nothing forms a
/// singleton.
///
/// Runs in near-linear time in the total number of list entries: every
/// list is unioned with the first list that claimed each of its candidates.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use kdmatch_knn::{Neighbor, NeighborList, Point};
/// use kdmatch_resolve::detect_communities;
///
/// let list = |anchor: &str, ids: &[&str]| {
///     NeighborList::new(
///         Arc::new(Point::new(anchor, vec![0.0])),
///         ids.iter()
///             .map(|id| Neighbor::new(Arc::new(Point::new(*id, vec![0.0])), 0.0))
///             .collect(),
///     )
/// };
/// let lists = vec![list("a", &["x"]), list("b", &["y"]), list("c", &["x", "y"])];
/// assert_eq!(detect_communities(&lists), vec![vec![0, 1, 2]]);
/// ```
pub fn detect_communities<P>(lists: &[NeighborList<P>]) -> Vec<Vec<usize>> {
    let mut uf = UnionFind::new(lists.len());
    let mut owner: HashMap<&str, usize> = HashMap::new();

    for (i, list) in lists.iter().enumerate() {
        for id in list.candidate_ids() {
            match owner.entry(id) {
                Entry::Occupied(e) => {
                    uf.union_keep_min(*e.get(), i);
                }
                Entry::Vacant(e) => {
                    e.insert(i);
                }
            }
        }
    }

    // Roots are the smallest member, so they appear in first-member order.
    let mut slot: Vec<Option<usize>> = vec![None; lists.len()];
    let mut communities: Vec<Vec<usize>> = Vec::new();
    for i in 0..lists.len() {
        let root = uf.find(i);
        let c = match slot[root] {
            Some(c) => c,
            None => {
                communities.push(Vec::new());
                slot[root] = Some(communities.len() - 1);
                communities.len() - 1
            }
        };
        communities[c].push(i);
    }
    communities
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use kdmatch_knn::{Neighbor, Point};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn list(anchor: &str, ids: &[String]) -> NeighborList<()> {
        NeighborList::new(
            Arc::new(Point::new(anchor, vec![0.0])),
            ids.iter()
                .map(|id| Neighbor::new(Arc::new(Point::new(id.clone(), vec![0.0])), 0.0))
                .collect(),
        )
    }

    fn lists(groups: &[&[&str]]) -> Vec<NeighborList<()>> {
        groups.iter()
            .enumerate()
            .map(|(i, ids)| {
                let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
                list(&format!("a{i}"), &ids)
            })
            .collect()
    }

    #[test]
    fn empty_input() {
        assert!(detect_communities::<()>(&[]).is_empty());
    }

    #[test]
    fn isolated_lists_are_singletons() {
        let l = lists(&[&["x"], &["y"], &["z"]]);
        assert_eq!(detect_communities(&l), vec![vec![0], vec![1], vec![2]]);
    }

    #[test]
    fn transitive_chain_merges() {
        // 0-1 share "x", 2-3 share "z", 1-3 share "y": all one community.
        let l = lists(&[&["x"], &["x", "y"], &["z"], &["z", "y"]]);
        assert_eq!(detect_communities(&l), vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn communities_ordered_by_first_member() {
        let l = lists(&[&["p"], &["q"], &["p"], &["r"], &["q"]]);
        assert_eq!(
            detect_communities(&l),
            vec![vec![0, 2], vec![1, 4], vec![3]]
        );
    }

    /// Reference: breadth-first search over the explicit pairwise graph.
    fn brute_force(ids: &[Vec<String>]) -> Vec<Vec<usize>> {
        let n = ids.len();
        let shares = |a: usize, b: usize| ids[a].iter().any(|x| ids[b].contains(x));
        let mut seen = vec![false; n];
        let mut out = Vec::new();
        for start in 0..n {
            if seen[start] {
                continue;
            }
            seen[start] = true;
            let mut comp = vec![start];
            let mut frontier = vec![start];
            while let Some(v) = frontier.pop() {
                for w in 0..n {
                    if !seen[w] && shares(v, w) {
                        seen[w] = true;
                        comp.push(w);
                        frontier.push(w);
                    }
                }
            }
            comp.sort_unstable();
            out.push(comp);
        }
        out
    }

    #[test]
    fn matches_pairwise_search() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..100 {
            let n = rng.random_range(1..30);
            let pool = rng.random_range(1..40);
            let ids: Vec<Vec<String>> = (0..n)
                .map(|_| {
                    (0..rng.random_range(0..4))
                        .map(|_| format!("c{}", rng.random_range(0..pool)))
                        .collect()
                })
                .collect();
            let l: Vec<_> = ids
                .iter()
                .enumerate()
                .map(|(i, ids)| list(&format!("a{i}"), ids))
                .collect();
            assert_eq!(detect_communities(&l), brute_force(&ids));
        }
    }
}
