use std::path::PathBuf;

use crate::error::GroupingError;

/// How tokens left without an alignment edge are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoveragePolicy {
    /// Reject the whole record when any token is uncovered.
    #[default]
    Strict,
    /// Give every uncovered token its own one-sided group.
    Lenient,
}

impl CoveragePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

/// Layout of the primary data stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// `source tokens ||| target tokens`
    #[default]
    Pairs,
    /// `sourceId \t sourceText \t targetId \t targetText`
    Tsv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One compact JSON record per line.
    #[default]
    JsonLines,
    /// A single `{"items": [...]}` document.
    JsonDocument,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub data_path: PathBuf,
    pub input_format: InputFormat,
    /// Positional edge-list file. Required unless a word aligner is supplied.
    pub alignment_path: Option<PathBuf>,
    pub metadata_path: Option<PathBuf>,
    pub use_metadata: bool,
    pub output_path: PathBuf,
    pub output_format: OutputFormat,
    pub max_lines: Option<usize>,
    /// Per-side limit on raw text length, in characters.
    pub max_chars: usize,
    pub profanity_enabled: bool,
    pub profanity_threshold: f32,
    pub profanity_wordlist_path: Option<PathBuf>,
    pub allow_duplicate_source: bool,
    pub coverage_policy: CoveragePolicy,
    /// Records whose source side contains this character are dropped.
    pub forbidden_char: Option<char>,
    pub preferred_method: String,
}

impl PipelineConfig {
    pub const DEFAULT_MAX_CHARS: usize = 80;
    pub const DEFAULT_PROFANITY_THRESHOLD: f32 = 0.06;
    pub const DEFAULT_FORBIDDEN_CHAR: char = '—';
    pub const DEFAULT_METHOD: &'static str = "mwmf";

    pub fn validate(&self) -> Result<(), GroupingError> {
        if self.max_chars == 0 {
            return Err(GroupingError::invalid_config("max_chars must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.profanity_threshold) {
            return Err(GroupingError::invalid_config(format!(
                "profanity_threshold must be between 0 and 1, got {}",
                self.profanity_threshold
            )));
        }
        if self.preferred_method.trim().is_empty() {
            return Err(GroupingError::invalid_config(
                "preferred_method must not be empty",
            ));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("sp_en.txt"),
            input_format: InputFormat::Pairs,
            alignment_path: Some(PathBuf::from("output-aligned.txt")),
            metadata_path: Some(PathBuf::from("sp_en_meta.jsonl")),
            use_metadata: true,
            output_path: PathBuf::from("trimmed_sentence_groups.jsonl"),
            output_format: OutputFormat::JsonLines,
            max_lines: None,
            max_chars: Self::DEFAULT_MAX_CHARS,
            profanity_enabled: true,
            profanity_threshold: Self::DEFAULT_PROFANITY_THRESHOLD,
            profanity_wordlist_path: None,
            allow_duplicate_source: false,
            coverage_policy: CoveragePolicy::Strict,
            forbidden_char: Some(Self::DEFAULT_FORBIDDEN_CHAR),
            preferred_method: Self::DEFAULT_METHOD.to_string(),
        }
    }
}
