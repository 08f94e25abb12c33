use std::collections::HashSet;

use crate::alignment::edges::select_method_edges;
use crate::alignment::grouping::enforce_coverage;
use crate::alignment::report::RejectReason;
use crate::config::CoveragePolicy;
use crate::pipeline::traits::{
    Grouper, ProfanityClassifier, ProfanityWordlist, RecordStage, WordAligner,
};
use crate::types::{AlignmentEdge, Group, ParsedPair};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Continue,
    Reject(RejectReason),
}

/// A parsed line travelling through the stages.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub line_no: usize,
    pub pair: ParsedPair,
    /// Edges taken from the alignment stream for this line. `None` when no
    /// stream is configured or it is exhausted.
    pub stream_edges: Option<Vec<AlignmentEdge>>,
    /// Set by the grouping stage.
    pub groups: Option<Vec<Group>>,
    pub aligner_failed: bool,
}

impl Candidate {
    pub fn new(line_no: usize, pair: ParsedPair, stream_edges: Option<Vec<AlignmentEdge>>) -> Self {
        Self {
            line_no,
            pair,
            stream_edges,
            groups: None,
            aligner_failed: false,
        }
    }
}

pub struct LengthStage {
    max_chars: usize,
}

impl LengthStage {
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl RecordStage for LengthStage {
    fn name(&self) -> &'static str {
        "length"
    }

    fn apply(&mut self, candidate: &mut Candidate) -> StageOutcome {
        let pair = &candidate.pair;
        if pair.source_text.chars().count() > self.max_chars
            || pair.target_text.chars().count() > self.max_chars
        {
            return StageOutcome::Reject(RejectReason::TooLong);
        }
        StageOutcome::Continue
    }
}

/// Wordlist test first, then the classifier threshold. A collaborator error
/// counts as profane.
pub struct ProfanityStage {
    wordlist: Option<Box<dyn ProfanityWordlist>>,
    classifier: Option<Box<dyn ProfanityClassifier>>,
    threshold: f32,
}

impl ProfanityStage {
    pub fn new(
        wordlist: Option<Box<dyn ProfanityWordlist>>,
        classifier: Option<Box<dyn ProfanityClassifier>>,
        threshold: f32,
    ) -> Self {
        Self {
            wordlist,
            classifier,
            threshold,
        }
    }

    fn wordlist_hit(&self, text: &str, line_no: usize) -> bool {
        let Some(wordlist) = &self.wordlist else {
            return false;
        };
        wordlist.contains_profanity(text).unwrap_or_else(|err| {
            tracing::warn!(line_no, error = %err, "profanity wordlist failed; treating as profane");
            true
        })
    }

    fn probability(&self, text: &str, line_no: usize) -> f32 {
        let Some(classifier) = &self.classifier else {
            return 0.0;
        };
        match classifier.probability(text) {
            Ok(p) if p.is_nan() => 1.0,
            Ok(p) => p.clamp(0.0, 1.0),
            Err(err) => {
                tracing::warn!(line_no, error = %err, "profanity classifier failed; treating as profane");
                1.0
            }
        }
    }
}

impl RecordStage for ProfanityStage {
    fn name(&self) -> &'static str {
        "profanity"
    }

    fn apply(&mut self, candidate: &mut Candidate) -> StageOutcome {
        let line_no = candidate.line_no;
        let pair = &candidate.pair;
        if self.wordlist_hit(&pair.source_text, line_no)
            || self.wordlist_hit(&pair.target_text, line_no)
        {
            return StageOutcome::Reject(RejectReason::Profanity);
        }
        if self.classifier.is_some() {
            let p = self
                .probability(&pair.source_text, line_no)
                .max(self.probability(&pair.target_text, line_no));
            if p >= self.threshold {
                return StageOutcome::Reject(RejectReason::Profanity);
            }
        }
        StageOutcome::Continue
    }
}

pub struct ForbiddenCharStage {
    forbidden: char,
}

impl ForbiddenCharStage {
    pub fn new(forbidden: char) -> Self {
        Self { forbidden }
    }
}

impl RecordStage for ForbiddenCharStage {
    fn name(&self) -> &'static str {
        "forbidden_char"
    }

    fn apply(&mut self, candidate: &mut Candidate) -> StageOutcome {
        if candidate.pair.source_text.contains(self.forbidden) {
            return StageOutcome::Reject(RejectReason::ExcludedCharacter);
        }
        StageOutcome::Continue
    }
}

/// Keeps the first occurrence of each space-joined source sentence.
///
/// The key is remembered as soon as a line passes this stage, so a line
/// rejected later still shadows its duplicates.
#[derive(Default)]
pub struct DuplicateStage {
    seen: HashSet<String>,
}

impl DuplicateStage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStage for DuplicateStage {
    fn name(&self) -> &'static str {
        "duplicate"
    }

    fn apply(&mut self, candidate: &mut Candidate) -> StageOutcome {
        let key = candidate.pair.source_tokens.join(" ");
        if self.seen.insert(key) {
            StageOutcome::Continue
        } else {
            StageOutcome::Reject(RejectReason::Duplicate)
        }
    }
}

/// Resolves edges (stream or aligner), groups them and applies the coverage
/// policy. Always the last stage.
pub struct GroupingStage {
    grouper: Box<dyn Grouper>,
    word_aligner: Option<Box<dyn WordAligner>>,
    preferred_method: String,
    policy: CoveragePolicy,
}

impl GroupingStage {
    pub fn new(
        grouper: Box<dyn Grouper>,
        word_aligner: Option<Box<dyn WordAligner>>,
        preferred_method: String,
        policy: CoveragePolicy,
    ) -> Self {
        Self {
            grouper,
            word_aligner,
            preferred_method,
            policy,
        }
    }

    pub(crate) fn uses_word_aligner(&self) -> bool {
        self.word_aligner.is_some()
    }

    fn resolve_edges(&self, candidate: &mut Candidate) -> Vec<AlignmentEdge> {
        let Some(aligner) = &self.word_aligner else {
            return candidate.stream_edges.take().unwrap_or_default();
        };
        let pair = &candidate.pair;
        match aligner.align(&pair.source_tokens, &pair.target_tokens) {
            Ok(by_method) => {
                let (method, edges) = select_method_edges(by_method, &self.preferred_method);
                if method.as_deref() != Some(self.preferred_method.as_str()) {
                    tracing::debug!(
                        line_no = candidate.line_no,
                        preferred = self.preferred_method.as_str(),
                        used = method.as_deref().unwrap_or("none"),
                        "grouping: preferred alignment method unavailable"
                    );
                }
                edges
            }
            Err(err) => {
                tracing::warn!(
                    line_no = candidate.line_no,
                    error = %err,
                    "word aligner failed; treating line as unaligned"
                );
                candidate.aligner_failed = true;
                Vec::new()
            }
        }
    }
}

impl RecordStage for GroupingStage {
    fn name(&self) -> &'static str {
        "grouping"
    }

    fn apply(&mut self, candidate: &mut Candidate) -> StageOutcome {
        let edges = self.resolve_edges(candidate);
        let source_len = candidate.pair.source_tokens.len();
        let target_len = candidate.pair.target_tokens.len();
        let groups = self.grouper.group(source_len, target_len, &edges);
        match enforce_coverage(groups, source_len, target_len, self.policy) {
            Ok(groups) => {
                candidate.groups = Some(groups);
                StageOutcome::Continue
            }
            Err(gap) => {
                tracing::debug!(
                    line_no = candidate.line_no,
                    uncovered_source = gap.source.len(),
                    uncovered_target = gap.target.len(),
                    "grouping: incomplete coverage under strict policy"
                );
                StageOutcome::Reject(RejectReason::IncompleteCoverage)
            }
        }
    }
}
