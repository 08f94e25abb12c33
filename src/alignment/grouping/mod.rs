use crate::types::{AlignmentEdge, Group};

pub mod coverage;
#[cfg(test)]
mod tests;

pub use coverage::{enforce_coverage, CoverageGap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Source,
    Target,
}

/// Undirected bipartite adjacency, one neighbor list per token position.
struct BipartiteGraph {
    source_adj: Vec<Vec<usize>>,
    target_adj: Vec<Vec<usize>>,
}

impl BipartiteGraph {
    fn build(source_len: usize, target_len: usize, edges: &[AlignmentEdge]) -> Self {
        let mut valid: Vec<AlignmentEdge> = edges
            .iter()
            .copied()
            .filter(|e| e.source < source_len && e.target < target_len)
            .collect();
        let dropped = edges.len() - valid.len();
        if dropped > 0 {
            tracing::debug!(
                dropped,
                source_len,
                target_len,
                "grouping: discarded out-of-range alignment edges"
            );
        }
        valid.sort_unstable();
        valid.dedup();

        let mut source_adj = vec![Vec::new(); source_len];
        let mut target_adj = vec![Vec::new(); target_len];
        for edge in valid {
            source_adj[edge.source].push(edge.target);
            target_adj[edge.target].push(edge.source);
        }
        Self {
            source_adj,
            target_adj,
        }
    }

    fn neighbors(&self, side: Side, index: usize) -> (&[usize], Side) {
        match side {
            Side::Source => (&self.source_adj[index], Side::Target),
            Side::Target => (&self.target_adj[index], Side::Source),
        }
    }
}

/// Connected components of the alignment graph, one group per component.
///
/// Tokens without a valid edge are not part of any component; coverage is
/// handled by [`enforce_coverage`]. Every returned group has both sides
/// non-empty, and the list is in canonical order (see [`sort_groups`]).
pub fn group_components(
    source_len: usize,
    target_len: usize,
    edges: &[AlignmentEdge],
) -> Vec<Group> {
    let graph = BipartiteGraph::build(source_len, target_len, edges);
    let mut source_seen = vec![false; source_len];
    let mut target_seen = vec![false; target_len];
    let mut groups = Vec::new();
    let mut stack: Vec<(Side, usize)> = Vec::new();

    // Every edge touches a source token, so starting from sources reaches
    // every component.
    for start in 0..source_len {
        if source_seen[start] || graph.source_adj[start].is_empty() {
            continue;
        }
        let mut source = Vec::new();
        let mut target = Vec::new();
        source_seen[start] = true;
        stack.push((Side::Source, start));

        while let Some((side, index)) = stack.pop() {
            match side {
                Side::Source => source.push(index),
                Side::Target => target.push(index),
            }
            let (neighbors, other) = graph.neighbors(side, index);
            for &next in neighbors {
                let seen = match other {
                    Side::Source => &mut source_seen[next],
                    Side::Target => &mut target_seen[next],
                };
                if !*seen {
                    *seen = true;
                    stack.push((other, next));
                }
            }
        }

        source.sort_unstable();
        target.sort_unstable();
        groups.push(Group::new(source, target));
    }

    sort_groups(&mut groups);
    groups
}

/// Canonical group order: ascending by `(first source, first target)` with
/// empty sides last, then by the full index lists.
pub fn sort_groups(groups: &mut [Group]) {
    groups.sort_by(|a, b| {
        a.order_key()
            .cmp(&b.order_key())
            .then_with(|| a.source.cmp(&b.source))
            .then_with(|| a.target.cmp(&b.target))
    });
}

/// True when every index of both sides appears in exactly one group and no
/// group is empty or out of range.
pub fn is_partition(groups: &[Group], source_len: usize, target_len: usize) -> bool {
    let mut source_hits = vec![0usize; source_len];
    let mut target_hits = vec![0usize; target_len];
    for group in groups {
        if group.source.is_empty() && group.target.is_empty() {
            return false;
        }
        for &i in &group.source {
            match source_hits.get_mut(i) {
                Some(hits) => *hits += 1,
                None => return false,
            }
        }
        for &j in &group.target {
            match target_hits.get_mut(j) {
                Some(hits) => *hits += 1,
                None => return false,
            }
        }
    }
    source_hits.iter().all(|&h| h == 1) && target_hits.iter().all(|&h| h == 1)
}
