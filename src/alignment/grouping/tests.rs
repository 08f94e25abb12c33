use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{enforce_coverage, group_components, is_partition, sort_groups, CoverageGap};
use crate::config::CoveragePolicy;
use crate::types::{AlignmentEdge, Group};

const PROPERTY_SEED: u64 = 42;
const PROPERTY_CASES: usize = 500;

fn edges(pairs: &[(usize, usize)]) -> Vec<AlignmentEdge> {
    pairs.iter().copied().map(AlignmentEdge::from).collect()
}

fn g(source: &[usize], target: &[usize]) -> Group {
    Group::new(source.to_vec(), target.to_vec())
}

fn random_case(rng: &mut StdRng) -> (usize, usize, Vec<AlignmentEdge>) {
    let n = rng.gen_range(0..8);
    let m = rng.gen_range(0..8);
    let edge_count = rng.gen_range(0..12);
    // Indices up to 9 so some edges fall out of range.
    let edges = (0..edge_count)
        .map(|_| AlignmentEdge::new(rng.gen_range(0..10), rng.gen_range(0..10)))
        .collect();
    (n, m, edges)
}

#[test]
fn one_to_one_edges_give_one_group_each() {
    // Hola mundo / Hello world
    let groups = group_components(2, 2, &edges(&[(0, 0), (1, 1)]));
    assert_eq!(groups, vec![g(&[0], &[0]), g(&[1], &[1])]);
}

#[test]
fn lenient_coverage_appends_target_singletons_after_aligned_groups() {
    // No me gusta / I do not like
    let raw = group_components(3, 4, &edges(&[(0, 2), (1, 3), (2, 3)]));
    assert_eq!(raw, vec![g(&[0], &[2]), g(&[1, 2], &[3])]);

    let covered = enforce_coverage(raw, 3, 4, CoveragePolicy::Lenient).expect("lenient");
    assert_eq!(
        covered,
        vec![g(&[0], &[2]), g(&[1, 2], &[3]), g(&[], &[0]), g(&[], &[1])]
    );
}

#[test]
fn transitive_edges_merge_into_one_component() {
    let groups = group_components(3, 3, &edges(&[(0, 1), (2, 1), (2, 2)]));
    assert_eq!(groups, vec![g(&[0, 2], &[1, 2])]);
}

#[test]
fn out_of_range_and_duplicate_edges_are_ignored() {
    let groups = group_components(2, 2, &edges(&[(0, 0), (0, 0), (5, 1), (1, 7), (1, 1)]));
    assert_eq!(groups, vec![g(&[0], &[0]), g(&[1], &[1])]);
}

#[test]
fn unaligned_tokens_produce_no_groups() {
    assert!(group_components(3, 2, &[]).is_empty());
    assert!(group_components(0, 0, &edges(&[(0, 0)])).is_empty());
}

#[test]
fn crossing_edges_are_ordered_by_first_source_index() {
    let groups = group_components(3, 3, &edges(&[(2, 0), (0, 2), (1, 1)]));
    assert_eq!(groups, vec![g(&[0], &[2]), g(&[1], &[1]), g(&[2], &[0])]);
}

#[test]
fn edge_order_does_not_change_output() {
    let forward = edges(&[(0, 3), (1, 0), (2, 0), (3, 1), (3, 2), (4, 4)]);
    let mut reversed = forward.clone();
    reversed.reverse();
    assert_eq!(
        group_components(5, 5, &forward),
        group_components(5, 5, &reversed)
    );
}

#[test]
fn strict_coverage_reports_every_gap() {
    let raw = group_components(3, 4, &edges(&[(0, 2), (1, 3)]));
    let gap = enforce_coverage(raw, 3, 4, CoveragePolicy::Strict).expect_err("strict gap");
    assert_eq!(
        gap,
        CoverageGap {
            source: vec![2],
            target: vec![0, 1],
        }
    );
}

#[test]
fn strict_coverage_passes_complete_alignments_through() {
    let raw = group_components(2, 2, &edges(&[(0, 1), (1, 0)]));
    let covered = enforce_coverage(raw.clone(), 2, 2, CoveragePolicy::Strict).expect("covered");
    assert_eq!(covered, raw);
}

#[test]
fn lenient_coverage_without_edges_is_all_singletons() {
    let covered = enforce_coverage(Vec::new(), 2, 1, CoveragePolicy::Lenient).expect("lenient");
    assert_eq!(covered, vec![g(&[0], &[]), g(&[1], &[]), g(&[], &[0])]);
}

#[test]
fn source_singletons_interleave_by_source_index() {
    let raw = group_components(3, 2, &edges(&[(0, 0), (2, 1)]));
    let covered = enforce_coverage(raw, 3, 2, CoveragePolicy::Lenient).expect("lenient");
    assert_eq!(covered, vec![g(&[0], &[0]), g(&[1], &[]), g(&[2], &[1])]);
}

#[test]
fn sort_groups_is_total_on_equal_keys() {
    let mut groups = vec![g(&[0, 3], &[1]), g(&[0, 2], &[1])];
    sort_groups(&mut groups);
    assert_eq!(groups, vec![g(&[0, 2], &[1]), g(&[0, 3], &[1])]);
}

#[test]
fn is_partition_detects_overlap_and_gaps() {
    assert!(is_partition(&[g(&[0], &[0])], 1, 1));
    assert!(!is_partition(&[g(&[0], &[0]), g(&[0], &[])], 1, 1));
    assert!(!is_partition(&[g(&[0], &[])], 1, 1));
    assert!(!is_partition(&[g(&[0], &[1])], 1, 1));
    assert!(!is_partition(&[g(&[], &[])], 0, 0));
}

#[test]
fn random_edges_stay_in_bounds() {
    let mut rng = StdRng::seed_from_u64(PROPERTY_SEED);
    for _ in 0..PROPERTY_CASES {
        let (n, m, edges) = random_case(&mut rng);
        for group in group_components(n, m, &edges) {
            assert!(!group.source.is_empty() && !group.target.is_empty());
            assert!(group.source.iter().all(|&i| i < n), "n={n} edges={edges:?}");
            assert!(group.target.iter().all(|&j| j < m), "m={m} edges={edges:?}");
            assert!(group.source.windows(2).all(|w| w[0] < w[1]));
            assert!(group.target.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

#[test]
fn random_edges_partition_under_lenient_policy() {
    let mut rng = StdRng::seed_from_u64(PROPERTY_SEED + 1);
    for _ in 0..PROPERTY_CASES {
        let (n, m, edges) = random_case(&mut rng);
        let raw = group_components(n, m, &edges);
        let covered = enforce_coverage(raw, n, m, CoveragePolicy::Lenient).expect("lenient");
        assert!(
            is_partition(&covered, n, m),
            "n={n} m={m} edges={edges:?} groups={covered:?}"
        );
    }
}

#[test]
fn random_edges_are_deterministic_under_permutation() {
    use rand::seq::SliceRandom;

    let mut rng = StdRng::seed_from_u64(PROPERTY_SEED + 2);
    for _ in 0..PROPERTY_CASES {
        let (n, m, edges) = random_case(&mut rng);
        let mut shuffled = edges.clone();
        shuffled.shuffle(&mut rng);
        let first = enforce_coverage(group_components(n, m, &edges), n, m, CoveragePolicy::Lenient);
        let second =
            enforce_coverage(group_components(n, m, &shuffled), n, m, CoveragePolicy::Lenient);
        assert_eq!(first, second);
    }
}
