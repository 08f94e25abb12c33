use std::collections::BTreeMap;

use crate::error::GroupingError;
use crate::pipeline::stages::{Candidate, StageOutcome};
use crate::types::{AlignmentEdge, Group};

pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Turns alignment edges into connected-component groups, before coverage
/// is enforced.
pub trait Grouper: Send + Sync {
    fn group(&self, source_len: usize, target_len: usize, edges: &[AlignmentEdge]) -> Vec<Group>;
}

/// External word aligner. Returns one edge list per alignment method name.
pub trait WordAligner: Send + Sync {
    fn align(
        &self,
        source_tokens: &[String],
        target_tokens: &[String],
    ) -> Result<BTreeMap<String, Vec<AlignmentEdge>>, GroupingError>;
}

/// Lexical profanity test.
pub trait ProfanityWordlist: Send + Sync {
    fn contains_profanity(&self, text: &str) -> Result<bool, GroupingError>;
}

/// Probabilistic profanity classifier returning a score in `[0, 1]`.
pub trait ProfanityClassifier: Send + Sync {
    fn probability(&self, text: &str) -> Result<f32, GroupingError>;
}

/// One step of the record filter pipeline.
///
/// Stages only inspect and annotate the candidate; auxiliary streams have
/// already been advanced for the line by the time any stage runs.
pub trait RecordStage: Send {
    fn name(&self) -> &'static str;

    fn apply(&mut self, candidate: &mut Candidate) -> StageOutcome;
}
