use serde::Serialize;

/// Why a primary line did not become a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    Malformed,
    TooLong,
    Profanity,
    ExcludedCharacter,
    Duplicate,
    IncompleteCoverage,
}

impl RejectReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::TooLong => "too_long",
            Self::Profanity => "profanity",
            Self::ExcludedCharacter => "excluded_character",
            Self::Duplicate => "duplicate",
            Self::IncompleteCoverage => "incomplete_coverage",
        }
    }
}

/// Per-run counters, serialized as the final summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub lines_read: usize,
    pub kept: usize,
    pub skipped_malformed: usize,
    pub skipped_too_long: usize,
    pub skipped_profanity: usize,
    pub skipped_excluded_character: usize,
    pub skipped_duplicate: usize,
    pub skipped_incomplete_coverage: usize,
    /// Lines whose external aligner call failed and were treated as unaligned.
    pub aligner_failures: usize,
    /// Lines processed after the alignment stream ran out.
    pub alignment_exhausted: usize,
    /// Lines processed after the metadata stream ran out.
    pub metadata_exhausted: usize,
}

impl RunSummary {
    pub fn record_rejection(&mut self, reason: RejectReason) {
        let counter = match reason {
            RejectReason::Malformed => &mut self.skipped_malformed,
            RejectReason::TooLong => &mut self.skipped_too_long,
            RejectReason::Profanity => &mut self.skipped_profanity,
            RejectReason::ExcludedCharacter => &mut self.skipped_excluded_character,
            RejectReason::Duplicate => &mut self.skipped_duplicate,
            RejectReason::IncompleteCoverage => &mut self.skipped_incomplete_coverage,
        };
        *counter += 1;
    }

    pub fn rejected(&self) -> usize {
        self.skipped_malformed
            + self.skipped_too_long
            + self.skipped_profanity
            + self.skipped_excluded_character
            + self.skipped_duplicate
            + self.skipped_incomplete_coverage
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_rejection_bumps_the_named_counter() {
        let mut summary = RunSummary::default();
        summary.record_rejection(RejectReason::Duplicate);
        summary.record_rejection(RejectReason::Duplicate);
        summary.record_rejection(RejectReason::IncompleteCoverage);
        assert_eq!(summary.skipped_duplicate, 2);
        assert_eq!(summary.skipped_incomplete_coverage, 1);
        assert_eq!(summary.rejected(), 3);
    }

    #[test]
    fn summary_serializes_snake_case_counters() {
        let summary = RunSummary {
            lines_read: 3,
            kept: 2,
            skipped_malformed: 1,
            ..RunSummary::default()
        };
        let value = serde_json::to_value(&summary).expect("serialize summary");
        assert_eq!(value["lines_read"], 3);
        assert_eq!(value["kept"], 2);
        assert_eq!(value["skipped_malformed"], 1);
        assert_eq!(value["skipped_profanity"], 0);
        assert_eq!(
            serde_json::to_value(RejectReason::ExcludedCharacter).expect("serialize reason"),
            "excluded_character"
        );
    }
}
