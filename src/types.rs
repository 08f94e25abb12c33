use serde::{Deserialize, Serialize};

/// A `(source, target)` correspondence between two token positions.
///
/// Edges come from untrusted aligner output; out-of-range or repeated edges
/// are legal values and are filtered later by the grouper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlignmentEdge {
    pub source: usize,
    pub target: usize,
}

impl AlignmentEdge {
    pub fn new(source: usize, target: usize) -> Self {
        Self { source, target }
    }
}

impl From<(usize, usize)> for AlignmentEdge {
    fn from((source, target): (usize, usize)) -> Self {
        Self { source, target }
    }
}

/// A cluster of mutually aligned tokens.
///
/// Both index lists are sorted and distinct. A group produced by the grouper
/// has both sides non-empty; singleton groups added for coverage have exactly
/// one side non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    #[serde(rename = "es")]
    pub source: Vec<usize>,
    #[serde(rename = "en")]
    pub target: Vec<usize>,
}

impl Group {
    pub fn new(source: Vec<usize>, target: Vec<usize>) -> Self {
        Self { source, target }
    }

    pub fn source_singleton(index: usize) -> Self {
        Self::new(vec![index], Vec::new())
    }

    pub fn target_singleton(index: usize) -> Self {
        Self::new(Vec::new(), vec![index])
    }

    /// Ordering key: first index of each side, with an empty side sorting last.
    pub fn order_key(&self) -> (usize, usize) {
        (
            self.source.first().copied().unwrap_or(usize::MAX),
            self.target.first().copied().unwrap_or(usize::MAX),
        )
    }
}

/// External identifiers attached to an accepted record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordIds {
    pub source_id: Option<i64>,
    pub target_id: Option<i64>,
}

impl RecordIds {
    pub fn new(source_id: i64, target_id: i64) -> Self {
        Self {
            source_id: Some(source_id),
            target_id: Some(target_id),
        }
    }

    /// Fill each missing id from `fallback`, field by field.
    pub fn or(self, fallback: RecordIds) -> Self {
        Self {
            source_id: self.source_id.or(fallback.source_id),
            target_id: self.target_id.or(fallback.target_id),
        }
    }
}

/// One accepted sentence pair, ready to be written once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentencePairRecord {
    #[serde(rename = "es")]
    source_tokens: Vec<String>,
    #[serde(rename = "en")]
    target_tokens: Vec<String>,
    groups: Vec<Group>,
    #[serde(rename = "sp_id", default, skip_serializing_if = "Option::is_none")]
    source_id: Option<i64>,
    #[serde(rename = "en_id", default, skip_serializing_if = "Option::is_none")]
    target_id: Option<i64>,
}

impl SentencePairRecord {
    pub fn new(
        source_tokens: Vec<String>,
        target_tokens: Vec<String>,
        groups: Vec<Group>,
        ids: RecordIds,
    ) -> Self {
        Self {
            source_tokens,
            target_tokens,
            groups,
            source_id: ids.source_id,
            target_id: ids.target_id,
        }
    }

    pub fn source_tokens(&self) -> &[String] {
        &self.source_tokens
    }

    pub fn target_tokens(&self) -> &[String] {
        &self.target_tokens
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn ids(&self) -> RecordIds {
        RecordIds {
            source_id: self.source_id,
            target_id: self.target_id,
        }
    }
}

/// A primary input line split into its two sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPair {
    /// Raw source text, trimmed but not tokenized.
    pub source_text: String,
    pub target_text: String,
    pub source_tokens: Vec<String>,
    pub target_tokens: Vec<String>,
    /// Ids carried inline by the line itself (TSV input only).
    pub inline_ids: Option<RecordIds>,
}
