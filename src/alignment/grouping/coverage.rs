use crate::config::CoveragePolicy;
use crate::types::Group;

use super::{is_partition, sort_groups};

/// Token positions that no group covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoverageGap {
    pub source: Vec<usize>,
    pub target: Vec<usize>,
}

impl CoverageGap {
    fn find(groups: &[Group], source_len: usize, target_len: usize) -> Self {
        let mut source_used = vec![false; source_len];
        let mut target_used = vec![false; target_len];
        for group in groups {
            for &i in &group.source {
                if let Some(used) = source_used.get_mut(i) {
                    *used = true;
                }
            }
            for &j in &group.target {
                if let Some(used) = target_used.get_mut(j) {
                    *used = true;
                }
            }
        }
        Self {
            source: uncovered(&source_used),
            target: uncovered(&target_used),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty() && self.target.is_empty()
    }
}

fn uncovered(used: &[bool]) -> Vec<usize> {
    used.iter()
        .enumerate()
        .filter_map(|(i, &u)| (!u).then_some(i))
        .collect()
}

/// Apply `policy` to grouper output.
///
/// `Strict` returns the groups unchanged when fully covered and the gap
/// otherwise. `Lenient` never fails: each uncovered token gets a one-sided
/// group and the combined list is re-sorted.
pub fn enforce_coverage(
    mut groups: Vec<Group>,
    source_len: usize,
    target_len: usize,
    policy: CoveragePolicy,
) -> Result<Vec<Group>, CoverageGap> {
    let gap = CoverageGap::find(&groups, source_len, target_len);
    if gap.is_empty() {
        return Ok(groups);
    }
    match policy {
        CoveragePolicy::Strict => Err(gap),
        CoveragePolicy::Lenient => {
            groups.extend(gap.source.into_iter().map(Group::source_singleton));
            groups.extend(gap.target.into_iter().map(Group::target_singleton));
            sort_groups(&mut groups);
            debug_assert!(
                is_partition(&groups, source_len, target_len),
                "lenient coverage must partition both sides"
            );
            Ok(groups)
        }
    }
}
