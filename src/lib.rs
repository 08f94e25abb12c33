pub mod alignment;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prepare;
pub mod types;

pub use alignment::grouping::{enforce_coverage, group_components, is_partition, CoverageGap};
pub use alignment::report::{RejectReason, RunSummary};
pub use config::{CoveragePolicy, InputFormat, OutputFormat, PipelineConfig};
pub use error::GroupingError;
pub use output::RecordWriter;
pub use pipeline::builder::PipelineBuilder;
pub use pipeline::runtime::{GroupingPipeline, LineOutcome, PipelineInputs, RunOutput, Verdict};
pub use pipeline::traits::{
    Grouper, ProfanityClassifier, ProfanityWordlist, RecordStage, Tokenizer, WordAligner,
};
pub use types::{AlignmentEdge, Group, RecordIds, SentencePairRecord};
