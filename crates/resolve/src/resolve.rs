//! De-duplication of raw neighbour lists through per-community assignment.

use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, debug_span, info};

use kdmatch_assign::{AssignError, solve};
use kdmatch_knn::{Neighbor, NeighborList};

use crate::community::detect_communities;
use crate::config::ResolveConfig;
use crate::cost::CommunityCosts;
use crate::error::ResolveError;
use crate::partition::partition_matches;

/// Summary of one resolution call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// Distinct candidate IDs claimed by more than one raw slot.
    pub n_contested: usize,
    /// Lists passed through without solving.
    pub n_unique: usize,
    /// Lists that went through a community solve.
    pub n_conflicted: usize,
    /// Number of communities solved.
    pub n_communities: usize,
    /// Member count of the largest community.
    pub largest_community: usize,
    /// Output lists whose selection differs from the raw one.
    pub n_changed: usize,
}

/// Resolves one community with a single assignment solve.
///
/// Each list occupies `k` replicated rows, so an anchor can receive up to
/// `k` distinct candidates, all drawn from its own raw list. The solve
/// maximises the number of granted slots first and minimises total distance
/// second. Granted candidates come back in raw order (nearest first).
///
/// The `resolved_changed` flag is set when any of the first `k` positions
/// holds a different candidate (or none) compared with the raw list.
pub fn resolve_community<P>(
    lists: &[&NeighborList<P>],
    k: usize,
) -> Result<Vec<NeighborList<P>>, AssignError> {
    let costs = CommunityCosts::build(lists, k);
    let assignment = solve(costs.matrix())?;

    let resolved = lists
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            let mut positions: Vec<usize> = costs
                .rows_of(i)
                .filter_map(|row| assignment.get(row))
                .filter_map(|col| costs.raw_position(i, col))
                .collect();
            positions.sort_unstable();

            let neighbors: Vec<Neighbor<P>> = positions
                .iter()
                .map(|&pos| raw.neighbors()[pos].clone())
                .collect();
            let changed = (0..k).any(|pos| {
                neighbors.get(pos).map(Neighbor::id) != raw.neighbors().get(pos).map(Neighbor::id)
            });
            NeighborList::new(Arc::clone(raw.anchor()), neighbors).with_resolved_changed(changed)
        })
        .collect();
    Ok(resolved)
}

/// Resolves duplicate candidates across raw neighbour lists.
///
/// See [`resolve_duplicates_with_stats`]; this variant drops the statistics.
pub fn resolve_duplicates<P: Send + Sync>(
    matches: Vec<NeighborList<P>>,
    config: &ResolveConfig,
) -> Result<Vec<NeighborList<P>>, ResolveError> {
    resolve_duplicates_with_stats(matches, config).map(|(lists, _)| lists)
}

/// Resolves duplicate candidates across raw neighbour lists.
///
/// Lists sharing no candidate with any other list pass through, truncated
/// to `final_k` with the flag cleared. The remaining lists are grouped into
/// communities, and every community is solved independently on a pool of
/// `config.threads()` workers.
///
/// Returns one list per input list: unique lists first in input order, then
/// community results in community order.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the worker pool cannot
/// be built, any community solve fails (the first failure aborts the call),
/// or the number of resolved lists differs from the number of conflicted
/// lists.
#[tracing::instrument(skip_all, fields(n_matches = matches.len(), final_k = config.final_k()))]
pub fn resolve_duplicates_with_stats<P: Send + Sync>(
    matches: Vec<NeighborList<P>>,
    config: &ResolveConfig,
) -> Result<(Vec<NeighborList<P>>, ResolveStats), ResolveError> {
    config.validate()?;
    let k = config.final_k();

    let partition = partition_matches(matches);
    let expected = partition.conflicted.len();
    debug!(
        n_unique = partition.unique.len(),
        n_conflicted = expected,
        n_contested = partition.n_contested,
        "partitioned raw matches"
    );

    let communities = detect_communities(&partition.conflicted);
    let mut stats = ResolveStats {
        n_contested: partition.n_contested,
        n_unique: partition.unique.len(),
        n_conflicted: expected,
        n_communities: communities.len(),
        largest_community: communities.iter().map(Vec::len).max().unwrap_or(0),
        n_changed: 0,
    };

    let resolved: Vec<NeighborList<P>> = if communities.is_empty() {
        Vec::new()
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads())
            .build()
            .map_err(|e| ResolveError::ThreadPool {
                reason: e.to_string(),
            })?;

        // Workers do not inherit the caller's span.
        let parent = tracing::Span::current();
        let conflicted = &partition.conflicted;
        let per_community = pool.install(|| {
            communities
                .par_iter()
                .enumerate()
                .map(|(c, members)| {
                    let _span =
                        debug_span!(parent: &parent, "community", id = c, size = members.len())
                            .entered();
                    let lists: Vec<&NeighborList<P>> =
                        members.iter().map(|&i| &conflicted[i]).collect();
                    resolve_community(&lists, k)
                })
                .collect::<Result<Vec<_>, AssignError>>()
        })?;
        per_community.into_iter().flatten().collect()
    };

    if resolved.len() != expected {
        return Err(ResolveError::CardinalityMismatch {
            expected,
            got: resolved.len(),
        });
    }

    let mut out: Vec<NeighborList<P>> = partition
        .unique
        .iter()
        .map(|list| list.truncated(k).with_resolved_changed(false))
        .collect();
    out.extend(resolved);

    stats.n_changed = out.iter().filter(|l| l.resolved_changed()).count();
    info!(
        n_unique = stats.n_unique,
        n_conflicted = stats.n_conflicted,
        n_communities = stats.n_communities,
        largest_community = stats.largest_community,
        n_changed = stats.n_changed,
        "resolved duplicate matches"
    );
    Ok((out, stats))
}
