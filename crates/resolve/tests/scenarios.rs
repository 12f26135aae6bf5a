//! End-to-end behaviour of query plus resolution.

use std::collections::{HashMap, HashSet};

use approx::assert_abs_diff_eq;
use kdmatch_knn::{KdTree, Point, query_neighbors};
use kdmatch_resolve::{ResolveConfig, resolve_duplicates, resolve_duplicates_with_stats};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn ids<P>(list: &kdmatch_knn::NeighborList<P>) -> Vec<String> {
    list.candidate_ids().map(str::to_string).collect()
}

#[test]
fn scenario_no_conflict() {
    let index = KdTree::build(vec![
        Point::new("C1", vec![0.0, 0.0]),
        Point::new("C2", vec![1.0, 0.0]),
        Point::new("C3", vec![5.0, 5.0]),
    ])
    .unwrap();
    let raw = query_neighbors(&index, vec![Point::new("A", vec![0.0, 0.0])], 2).unwrap();
    assert_eq!(ids(&raw[0]), vec!["C1", "C2"]);
    assert_abs_diff_eq!(raw[0].neighbors()[0].distance(), 0.0);
    assert_abs_diff_eq!(raw[0].neighbors()[1].distance(), 1.0);

    let out = resolve_duplicates(raw, &ResolveConfig::new(2).with_threads(1)).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(ids(&out[0]), vec!["C1", "C2"]);
    assert!(!out[0].resolved_changed());
}

#[test]
fn scenario_single_contested_candidate() {
    let index = KdTree::build(vec![Point::new("C1", vec![0.0, 0.0])]).unwrap();
    let anchors = vec![
        Point::new("A", vec![0.0, 0.0]),
        Point::new("B", vec![0.0, 1.0]),
    ];
    let raw = query_neighbors(&index, anchors, 1).unwrap();

    let (out, stats) =
        resolve_duplicates_with_stats(raw, &ResolveConfig::new(1).with_threads(2)).unwrap();
    assert_eq!(stats.n_communities, 1);
    assert_eq!(stats.largest_community, 2);

    assert_eq!(out[0].anchor().id(), "A");
    assert_eq!(ids(&out[0]), vec!["C1"]);
    assert!(!out[0].resolved_changed());

    assert_eq!(out[1].anchor().id(), "B");
    assert!(out[1].is_empty());
    assert!(out[1].resolved_changed());
}

fn random_points(rng: &mut StdRng, prefix: &str, n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let coords = vec![rng.random_range(0.0..10.0), rng.random_range(0.0..10.0)];
            Point::new(format!("{prefix}{i}"), coords)
        })
        .collect()
}

#[test]
fn random_resolution_invariants() {
    let mut rng = StdRng::seed_from_u64(31);
    for round in 0..20 {
        let n_anchors = rng.random_range(5..60);
        let n_candidates = rng.random_range(5..120);
        let initial_k = rng.random_range(2..6);
        let final_k = rng.random_range(1..=initial_k);

        let anchors = random_points(&mut rng, "a", n_anchors);
        let index = KdTree::build(random_points(&mut rng, "c", n_candidates)).unwrap();
        let raw = query_neighbors(&index, anchors, initial_k).unwrap();
        let raw_sets: HashMap<String, HashSet<String>> = raw
            .iter()
            .map(|l| (l.anchor().id().to_string(), ids(l).into_iter().collect()))
            .collect();

        let config = ResolveConfig::new(final_k).with_threads(1 + round % 4);
        let out = resolve_duplicates(raw, &config).unwrap();

        // Conservation: every anchor exactly once.
        assert_eq!(out.len(), n_anchors);
        let anchor_ids: HashSet<&str> = out.iter().map(|l| l.anchor().id()).collect();
        assert_eq!(anchor_ids.len(), n_anchors);

        let mut granted = HashSet::new();
        for list in &out {
            assert!(list.len() <= final_k);
            let allowed = &raw_sets[list.anchor().id()];
            for id in list.candidate_ids() {
                // Never outside the anchor's raw list, never granted twice.
                assert!(allowed.contains(id), "{id} not in raw list");
                assert!(granted.insert(id.to_string()), "{id} granted twice");
            }
            let d: Vec<f64> = list.neighbors().iter().map(|n| n.distance()).collect();
            assert!(d.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}

#[test]
fn result_is_independent_of_thread_count() {
    let mut rng = StdRng::seed_from_u64(32);
    let anchors = random_points(&mut rng, "a", 80);
    let index = KdTree::build(random_points(&mut rng, "c", 100)).unwrap();
    let raw = query_neighbors(&index, anchors, 4).unwrap();

    let single = resolve_duplicates(raw.clone(), &ResolveConfig::new(2).with_threads(1)).unwrap();
    let many = resolve_duplicates(raw, &ResolveConfig::new(2).with_threads(8)).unwrap();

    let flatten = |lists: &[kdmatch_knn::NeighborList<()>]| -> Vec<(String, Vec<String>, bool)> {
        lists
            .iter()
            .map(|l| (l.anchor().id().to_string(), ids(l), l.resolved_changed()))
            .collect()
    };
    assert_eq!(flatten(&single), flatten(&many));
}
