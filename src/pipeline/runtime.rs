use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use crate::alignment::report::{RejectReason, RunSummary};
use crate::alignment::tokenization::{parse_pair_line, parse_tsv_line};
use crate::config::{InputFormat, PipelineConfig};
use crate::error::GroupingError;
use crate::output::RecordWriter;
use crate::pipeline::stages::{Candidate, StageOutcome};
use crate::pipeline::streams::{EdgeStream, LineReader, LineSource, MetadataStream};
use crate::pipeline::traits::{RecordStage, Tokenizer};
use crate::types::{AlignmentEdge, ParsedPair, RecordIds, SentencePairRecord};

/// The primary stream plus the positional side streams that must move with it.
pub struct PipelineInputs {
    pub primary: LineSource,
    pub alignment: Option<LineSource>,
    pub metadata: Option<LineSource>,
}

/// Which side streams yielded an entry for a primary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuxConsumption {
    pub alignment: bool,
    pub metadata: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
}

/// Per-line trace handed to run observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOutcome {
    /// 1-based physical line number in the primary stream.
    pub line_no: usize,
    pub consumed: AuxConsumption,
    pub verdict: Verdict,
}

#[derive(Debug)]
pub struct RunOutput<W> {
    pub summary: RunSummary,
    pub sink: W,
}

struct AuxStreams {
    alignment: Option<EdgeStream>,
    metadata: Option<MetadataStream>,
}

struct AuxEntries {
    edges: Option<Vec<AlignmentEdge>>,
    ids: Option<RecordIds>,
    consumed: AuxConsumption,
}

impl AuxStreams {
    /// Advance every configured side stream by exactly one entry. Called once
    /// per primary line, before the line is even parsed, so rejected and
    /// malformed lines consume their entries like accepted ones.
    fn advance(&mut self, summary: &mut RunSummary) -> Result<AuxEntries, GroupingError> {
        let mut consumed = AuxConsumption::default();
        let edges = match self.alignment.as_mut() {
            Some(stream) => {
                let entry = stream.advance()?;
                consumed.alignment = entry.is_some();
                if entry.is_none() {
                    summary.alignment_exhausted += 1;
                }
                entry
            }
            None => None,
        };
        let ids = match self.metadata.as_mut() {
            Some(stream) => {
                let entry = stream.advance()?;
                consumed.metadata = entry.is_some();
                if entry.is_none() {
                    summary.metadata_exhausted += 1;
                }
                entry
            }
            None => None,
        };
        Ok(AuxEntries {
            edges,
            ids,
            consumed,
        })
    }
}

pub struct GroupingPipeline {
    config: PipelineConfig,
    tokenizer: Box<dyn Tokenizer>,
    stages: Vec<Box<dyn RecordStage>>,
    uses_word_aligner: bool,
}

pub(crate) struct GroupingPipelineParts {
    pub config: PipelineConfig,
    pub tokenizer: Box<dyn Tokenizer>,
    pub stages: Vec<Box<dyn RecordStage>>,
    pub uses_word_aligner: bool,
}

impl GroupingPipeline {
    pub(crate) fn from_parts(parts: GroupingPipelineParts) -> Self {
        Self {
            config: parts.config,
            tokenizer: parts.tokenizer,
            stages: parts.stages,
            uses_word_aligner: parts.uses_word_aligner,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Stage names in execution order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Open the configured files, run, and write the configured output.
    ///
    /// On any error the partially written output file is removed.
    pub fn run_files(&mut self) -> Result<RunSummary, GroupingError> {
        self.run_files_with_observer(|_| {})
    }

    pub fn run_files_with_observer<F>(&mut self, observer: F) -> Result<RunSummary, GroupingError>
    where
        F: FnMut(&LineOutcome),
    {
        let inputs = self.open_inputs()?;
        let output_path = self.config.output_path.clone();
        let writer = RecordWriter::create(&output_path, self.config.output_format)?;
        match self.run_with_observer(inputs, writer, observer) {
            Ok(out) => Ok(out.summary),
            Err(err) => {
                let _ = std::fs::remove_file(&output_path);
                Err(err)
            }
        }
    }

    fn open_inputs(&self) -> Result<PipelineInputs, GroupingError> {
        let primary = open_required(&self.config.data_path, "data file")?;

        let alignment = if self.uses_word_aligner {
            None
        } else {
            let path = self.config.alignment_path.as_deref().ok_or_else(|| {
                GroupingError::invalid_config(
                    "an alignment file is required when no word aligner is configured",
                )
            })?;
            Some(open_required(path, "alignment file")?)
        };

        let metadata = match self.config.metadata_path.as_deref() {
            Some(path) if self.config.use_metadata => {
                if path.exists() {
                    Some(open_reader(path, "open metadata file")?)
                } else {
                    tracing::warn!(
                        path = %path.display(),
                        "metadata file not found; output omits ids"
                    );
                    None
                }
            }
            _ => None,
        };

        Ok(PipelineInputs {
            primary,
            alignment,
            metadata,
        })
    }

    pub fn run<W: Write>(
        &mut self,
        inputs: PipelineInputs,
        writer: RecordWriter<W>,
    ) -> Result<RunOutput<W>, GroupingError> {
        self.run_with_observer(inputs, writer, |_| {})
    }

    pub fn run_with_observer<W, F>(
        &mut self,
        inputs: PipelineInputs,
        mut writer: RecordWriter<W>,
        mut observer: F,
    ) -> Result<RunOutput<W>, GroupingError>
    where
        W: Write,
        F: FnMut(&LineOutcome),
    {
        let mut primary = LineReader::new(inputs.primary);
        let mut aux = AuxStreams {
            alignment: inputs.alignment.map(EdgeStream::new),
            metadata: inputs.metadata.map(MetadataStream::new),
        };
        let mut summary = RunSummary::default();

        loop {
            if self
                .config
                .max_lines
                .is_some_and(|max| summary.lines_read >= max)
            {
                break;
            }
            let Some(line) = primary.next_line("read primary input")? else {
                break;
            };
            summary.lines_read += 1;
            let line_no = summary.lines_read;
            let entries = aux.advance(&mut summary)?;
            let consumed = entries.consumed;

            let verdict = match self.evaluate(line_no, &line, entries, &mut summary) {
                Ok(record) => {
                    writer.write_record(record)?;
                    summary.kept += 1;
                    Verdict::Accepted
                }
                Err(reason) => {
                    tracing::debug!(line_no, reason = reason.as_str(), "line rejected");
                    summary.record_rejection(reason);
                    Verdict::Rejected(reason)
                }
            };
            observer(&LineOutcome {
                line_no,
                consumed,
                verdict,
            });
        }

        if summary.lines_read == 0 {
            return Err(GroupingError::EmptyInput);
        }
        let sink = writer.finish()?;
        tracing::info!(
            lines_read = summary.lines_read,
            kept = summary.kept,
            rejected = summary.rejected(),
            aligner_failures = summary.aligner_failures,
            "grouping run complete"
        );
        Ok(RunOutput { summary, sink })
    }

    fn parse(&self, line: &str) -> Option<ParsedPair> {
        let tokenize = |text: &str| self.tokenizer.tokenize(text);
        match self.config.input_format {
            InputFormat::Pairs => parse_pair_line(line, tokenize),
            InputFormat::Tsv => parse_tsv_line(line, tokenize),
        }
    }

    fn evaluate(
        &mut self,
        line_no: usize,
        line: &str,
        entries: AuxEntries,
        summary: &mut RunSummary,
    ) -> Result<SentencePairRecord, RejectReason> {
        let pair = self.parse(line).ok_or(RejectReason::Malformed)?;
        let inline_ids = pair.inline_ids;
        let mut candidate = Candidate::new(line_no, pair, entries.edges);

        let mut outcome = StageOutcome::Continue;
        for stage in &mut self.stages {
            outcome = stage.apply(&mut candidate);
            if outcome != StageOutcome::Continue {
                break;
            }
        }
        if candidate.aligner_failed {
            summary.aligner_failures += 1;
        }
        if let StageOutcome::Reject(reason) = outcome {
            return Err(reason);
        }

        let groups = candidate
            .groups
            .take()
            .ok_or(RejectReason::IncompleteCoverage)?;
        // Ids carried by the row itself win; the sidecar only fills gaps.
        let ids = inline_ids
            .unwrap_or_default()
            .or(entries.ids.unwrap_or_default());
        Ok(SentencePairRecord::new(
            candidate.pair.source_tokens,
            candidate.pair.target_tokens,
            groups,
            ids,
        ))
    }
}

fn open_required(path: &Path, what: &'static str) -> Result<LineSource, GroupingError> {
    if !path.exists() {
        return Err(GroupingError::missing_input(what, path));
    }
    open_reader(path, "open input file")
}

fn open_reader(path: &Path, context: &'static str) -> Result<LineSource, GroupingError> {
    let file = File::open(path).map_err(|e| GroupingError::io(context, e))?;
    Ok(Box::new(BufReader::new(file)))
}
