//! Steps shared by the `match` and `select` subcommands.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use kdmatch_io::{
    PointTable, ReaderConfig, TableLayout, WriterConfig, check_headers, read_header, read_points,
    write_match_table, write_status,
};
use kdmatch_knn::{KdTree, NeighborList, Point, query_neighbors};

/// Reads both tables after checking that their headers agree.
pub fn load_inputs(
    anchors: &Path,
    candidates: &Path,
    config: &ReaderConfig,
) -> Result<(PointTable, PointTable)> {
    let anchor_header = read_header(anchors)
        .with_context(|| format!("failed to read header: {}", anchors.display()))?;
    let candidate_header = read_header(candidates)
        .with_context(|| format!("failed to read header: {}", candidates.display()))?;
    check_headers(&anchor_header, &candidate_header)?;

    let anchors = read_points(anchors, config)
        .with_context(|| format!("failed to read anchors: {}", anchors.display()))?;
    let candidates = read_points(candidates, config)
        .with_context(|| format!("failed to read candidates: {}", candidates.display()))?;
    info!(
        n_anchors = anchors.points.len(),
        n_candidates = candidates.points.len(),
        dim = anchors.layout.coord_columns().len(),
        "inputs loaded"
    );
    Ok((anchors, candidates))
}

/// Selects the `k` nearest candidates of the same stratum for every anchor.
///
/// One index is built per stratum. Anchors whose stratum has no candidates
/// get an empty list. Output follows anchor input order.
pub fn select_by_stratum(
    anchors: Vec<Point<String>>,
    candidates: Vec<Point<String>>,
    k: usize,
) -> Result<Vec<NeighborList<String>>> {
    let mut pools: BTreeMap<String, Vec<Point<String>>> = BTreeMap::new();
    for c in candidates {
        pools.entry(c.payload().clone()).or_default().push(c);
    }
    let n_anchors = anchors.len();
    let mut queries: BTreeMap<String, Vec<(usize, Point<String>)>> = BTreeMap::new();
    for (i, a) in anchors.into_iter().enumerate() {
        queries.entry(a.payload().clone()).or_default().push((i, a));
    }

    let mut slots: Vec<Option<NeighborList<String>>> = (0..n_anchors).map(|_| None).collect();
    for (stratum, members) in queries {
        let (positions, points): (Vec<usize>, Vec<Point<String>>) = members.into_iter().unzip();
        let lists = match pools.remove(&stratum) {
            Some(pool) => {
                let index = KdTree::build(pool)
                    .with_context(|| format!("failed to index stratum {stratum:?}"))?;
                query_neighbors(&index, points, k)
                    .with_context(|| format!("failed to query stratum {stratum:?}"))?
            }
            None => {
                warn!(stratum = %stratum, n_anchors = points.len(), "no candidates in stratum");
                points
                    .into_iter()
                    .map(|p| NeighborList::new(Arc::new(p), Vec::new()))
                    .collect()
            }
        };
        for (pos, list) in positions.into_iter().zip(lists) {
            slots[pos] = Some(list);
        }
    }
    Ok(slots.into_iter().flatten().collect())
}

/// Writes `<prefix>.match.<label>.txt[.gz]` and `<prefix>.status.<label>.txt`.
pub fn write_selection(
    output_dir: &Path,
    prefix: &str,
    label: &str,
    lists: &[NeighborList<String>],
    layout: &TableLayout,
    writer: &WriterConfig,
) -> Result<()> {
    let table = output_dir.join(format!("{prefix}.match.{label}.txt"));
    let written = write_match_table(&table, lists, layout, writer)
        .with_context(|| format!("failed to write match table: {}", table.display()))?;
    let status = output_dir.join(format!("{prefix}.status.{label}.txt"));
    write_status(&status, lists)
        .with_context(|| format!("failed to write status report: {}", status.display()))?;
    info!(
        table = %written.display(),
        status = %status.display(),
        slots = writer.slots(),
        "selection written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, x: f64, stratum: &str) -> Point<String> {
        Point::with_payload(id, vec![x], stratum.to_string())
    }

    fn ids(list: &NeighborList<String>) -> Vec<&str> {
        list.candidate_ids().collect()
    }

    #[test]
    fn strata_never_mix() {
        let anchors = vec![point("a1", 0.0, "M"), point("a2", 0.0, "F"), point("a3", 9.0, "M")];
        let candidates = vec![
            point("m1", 0.1, "M"),
            point("f1", 5.0, "F"),
            point("m2", 8.0, "M"),
            point("f2", 0.0, "X"),
        ];
        let lists = select_by_stratum(anchors, candidates, 1).unwrap();

        let anchor_ids: Vec<&str> = lists.iter().map(|l| l.anchor().id()).collect();
        assert_eq!(anchor_ids, vec!["a1", "a2", "a3"]);
        assert_eq!(ids(&lists[0]), vec!["m1"]);
        assert_eq!(ids(&lists[1]), vec!["f1"]);
        assert_eq!(ids(&lists[2]), vec!["m2"]);
    }

    #[test]
    fn stratum_without_candidates_is_empty() {
        let anchors = vec![point("a1", 0.0, "F"), point("a2", 0.0, "M")];
        let candidates = vec![point("m1", 0.0, "M")];
        let lists = select_by_stratum(anchors, candidates, 2).unwrap();
        assert!(lists[0].is_empty());
        assert_eq!(ids(&lists[1]), vec!["m1"]);
    }

    #[test]
    fn ungrouped_points_share_one_index() {
        let anchors = vec![point("a1", 0.0, ""), point("a2", 10.0, "")];
        let candidates = vec![point("c1", 9.0, ""), point("c2", 1.0, "")];
        let lists = select_by_stratum(anchors, candidates, 2).unwrap();
        assert_eq!(ids(&lists[0]), vec!["c2", "c1"]);
        assert_eq!(ids(&lists[1]), vec!["c1", "c2"]);
    }
}
