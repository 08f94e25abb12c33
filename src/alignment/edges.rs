use std::collections::BTreeMap;

use crate::types::AlignmentEdge;

/// Parse one line of `i-j` alignment tokens.
///
/// Tokens without a `-` or with non-integer halves are skipped; the rest of
/// the line is still used.
pub fn parse_edge_line(line: &str) -> Vec<AlignmentEdge> {
    line.split_whitespace()
        .filter_map(|part| {
            let (a, b) = part.split_once('-')?;
            let source = a.parse::<usize>().ok()?;
            let target = b.parse::<usize>().ok()?;
            Some(AlignmentEdge::new(source, target))
        })
        .collect()
}

/// Pick the edge list for `preferred` if the aligner produced one, otherwise
/// the first method in name order. No methods means no edges.
pub fn select_method_edges(
    mut by_method: BTreeMap<String, Vec<AlignmentEdge>>,
    preferred: &str,
) -> (Option<String>, Vec<AlignmentEdge>) {
    if let Some(edges) = by_method.remove(preferred) {
        return (Some(preferred.to_string()), edges);
    }
    match by_method.pop_first() {
        Some((method, edges)) => (Some(method), edges),
        None => (None, Vec::new()),
    }
}
