use std::path::Path;

use bitext_groups::prepare::PrepareSummary;
use bitext_groups::{PipelineConfig, RunSummary};
use serde::Serialize;

#[derive(Serialize)]
struct BuildSummaryLine<'a> {
    #[serde(flatten)]
    counters: &'a RunSummary,
    output: String,
    format: &'a str,
    coverage: &'a str,
}

pub fn print_build_summary(
    summary: &RunSummary,
    config: &PipelineConfig,
    output: &Path,
    format: &str,
) -> Result<(), String> {
    let line = BuildSummaryLine {
        counters: summary,
        output: output.display().to_string(),
        format,
        coverage: config.coverage_policy.as_str(),
    };
    let json = serde_json::to_string(&line)
        .map_err(|err| format!("Failed to serialize run summary: {err}"))?;
    println!("{json}");

    println!("Read {} lines", summary.lines_read);
    println!("Wrote {} records to {}", summary.kept, output.display());
    if summary.skipped_malformed > 0 {
        println!("Skipped {} malformed lines", summary.skipped_malformed);
    }
    if summary.skipped_duplicate > 0 {
        println!("Skipped {} duplicate source sentences", summary.skipped_duplicate);
    }
    if summary.skipped_incomplete_coverage > 0 {
        println!(
            "Dropped {} records with unaligned tokens",
            summary.skipped_incomplete_coverage
        );
    }
    if summary.skipped_excluded_character > 0 {
        if let Some(c) = config.forbidden_char {
            println!(
                "Dropped {} records whose source contains '{c}'",
                summary.skipped_excluded_character
            );
        }
    }
    if summary.skipped_too_long > 0 {
        println!(
            "Dropped {} records due to length > {}",
            summary.skipped_too_long, config.max_chars
        );
    }
    if summary.skipped_profanity > 0 {
        println!(
            "Dropped {} records due to profanity (threshold={:.2})",
            summary.skipped_profanity, config.profanity_threshold
        );
    }
    if summary.aligner_failures > 0 {
        println!("Aligner failed on {} lines", summary.aligner_failures);
    }
    if summary.alignment_exhausted > 0 {
        println!(
            "Alignment file ran out; {} lines had no edges",
            summary.alignment_exhausted
        );
    }
    if summary.metadata_exhausted > 0 {
        println!(
            "Meta file ran out; {} lines had no ids",
            summary.metadata_exhausted
        );
    }
    Ok(())
}

pub fn print_prepare_summary(summary: &PrepareSummary, output: &Path, meta: Option<&Path>) {
    println!("Wrote {} pairs to {}", summary.written, output.display());
    if let Some(meta) = meta {
        println!("Wrote meta mapping to {}", meta.display());
    }
    if summary.skipped > 0 {
        println!("Skipped {} unusable rows", summary.skipped);
    }
}
