//! Split raw neighbour lists into uniquely resolved and conflicted sets.

use std::collections::HashMap;

use kdmatch_knn::NeighborList;

/// Raw lists split by whether they share a candidate with another list.
#[derive(Debug)]
pub struct Partition<P> {
    /// Lists whose candidates appear nowhere else, in input order.
    pub unique: Vec<NeighborList<P>>,
    /// Lists holding at least one contested candidate, in input order.
    pub conflicted: Vec<NeighborList<P>>,
    /// Number of distinct contested candidate IDs.
    pub n_contested: usize,
}

/// Partitions raw lists by candidate contention.
///
/// A candidate ID is contested when it occurs more than once across all
/// lists (two occurrences in one list count too). A list is conflicted iff
/// it holds a contested ID. Both halves keep input order.
pub fn partition_matches<P>(matches: Vec<NeighborList<P>>) -> Partition<P> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for list in &matches {
        for id in list.candidate_ids() {
            *counts.entry(id).or_default() += 1;
        }
    }
    let n_contested = counts.values().filter(|&&c| c > 1).count();

    let flags: Vec<bool> = matches
        .iter()
        .map(|list| list.candidate_ids().any(|id| counts.get(id).is_some_and(|&c| c > 1)))
        .collect();
    drop(counts);

    let mut unique = Vec::new();
    let mut conflicted = Vec::new();
    for (list, is_conflicted) in matches.into_iter().zip(flags) {
        if is_conflicted {
            conflicted.push(list);
        } else {
            unique.push(list);
        }
    }

    Partition {
        unique,
        conflicted,
        n_contested,
    }
}
