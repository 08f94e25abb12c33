use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use bitext_groups::prepare::convert_tsv;
use bitext_groups::{
    CoveragePolicy, InputFormat, OutputFormat, PipelineBuilder, PipelineConfig, Verdict,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

#[path = "bitext_groups/summary_formatter.rs"]
mod summary_formatter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputChoice {
    /// `source ||| target` lines
    Pairs,
    /// `sourceId<TAB>sourceText<TAB>targetId<TAB>targetText` rows
    Tsv,
}

impl InputChoice {
    fn input_format(self) -> InputFormat {
        match self {
            Self::Pairs => InputFormat::Pairs,
            Self::Tsv => InputFormat::Tsv,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputChoice {
    Jsonl,
    /// Single `{"items": [...]}` document
    Json,
}

impl OutputChoice {
    fn output_format(self) -> OutputFormat {
        match self {
            Self::Jsonl => OutputFormat::JsonLines,
            Self::Json => OutputFormat::JsonDocument,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Jsonl => "jsonl",
            Self::Json => "json",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CoverageChoice {
    /// Drop records with unaligned tokens
    Strict,
    /// Add one-sided singleton groups for unaligned tokens
    Lenient,
}

impl CoverageChoice {
    fn policy(self) -> CoveragePolicy {
        match self {
            Self::Strict => CoveragePolicy::Strict,
            Self::Lenient => CoveragePolicy::Lenient,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "bitext_groups")]
#[command(about = "Build bilingual token-group datasets from word alignments")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Group aligned sentence pairs into the learn-language dataset.
    Build(BuildArgs),
    /// Convert a four-column TSV into aligner input plus an id sidecar.
    Prepare(PrepareArgs),
}

#[derive(Debug, Args)]
struct BuildArgs {
    #[arg(long, env = "BITEXT_GROUPS_DATA", default_value = "sp_en.txt")]
    data: PathBuf,
    #[arg(long, env = "BITEXT_GROUPS_INPUT_FORMAT", value_enum, default_value_t = InputChoice::Pairs)]
    input_format: InputChoice,
    #[arg(long, env = "BITEXT_GROUPS_ALIGNED", default_value = "output-aligned.txt")]
    aligned: PathBuf,
    #[arg(long, env = "BITEXT_GROUPS_META", default_value = "sp_en_meta.jsonl")]
    meta: PathBuf,
    /// Do not read the id sidecar; records omit sp_id/en_id.
    #[arg(long, default_value_t = false)]
    no_meta: bool,
    #[arg(long, env = "BITEXT_GROUPS_OUT", default_value = "trimmed_sentence_groups.jsonl")]
    output: PathBuf,
    #[arg(long, env = "BITEXT_GROUPS_OUTPUT_FORMAT", value_enum, default_value_t = OutputChoice::Jsonl)]
    output_format: OutputChoice,
    /// Process at most this many primary lines.
    #[arg(long, env = "BITEXT_GROUPS_LIMIT")]
    limit: Option<usize>,
    /// Skip pairs where either side exceeds this many characters.
    #[arg(long, env = "BITEXT_GROUPS_MAX_CHARS", default_value_t = PipelineConfig::DEFAULT_MAX_CHARS)]
    max_chars: usize,
    #[arg(long, default_value_t = false)]
    allow_profanity: bool,
    /// Drop pairs whose classifier score is >= this threshold (0..1).
    /// Only applies when a `ProfanityClassifier` is injected through the
    /// library; the CLI itself filters with `--profanity-wordlist`.
    #[arg(long, env = "BITEXT_GROUPS_PROFANITY_THRESHOLD", default_value_t = PipelineConfig::DEFAULT_PROFANITY_THRESHOLD)]
    profanity_threshold: f32,
    /// One word per line; `#` starts a comment.
    #[arg(long, env = "BITEXT_GROUPS_PROFANITY_WORDLIST")]
    profanity_wordlist: Option<PathBuf>,
    #[arg(long, default_value_t = false)]
    allow_duplicate_source: bool,
    #[arg(long, env = "BITEXT_GROUPS_COVERAGE", value_enum, default_value_t = CoverageChoice::Strict)]
    coverage: CoverageChoice,
    #[arg(long, default_value_t = PipelineConfig::DEFAULT_FORBIDDEN_CHAR)]
    forbidden_char: char,
    /// Keep pairs whose source side contains the forbidden character.
    #[arg(long, default_value_t = false)]
    allow_forbidden_char: bool,
    /// Preferred method name when the aligner reports several.
    #[arg(long, env = "BITEXT_GROUPS_METHOD", default_value = PipelineConfig::DEFAULT_METHOD)]
    method: String,
}

#[derive(Debug, Args)]
struct PrepareArgs {
    #[arg(long, env = "BITEXT_GROUPS_TSV", default_value = "sentence_pairs_sp_eng.tsv")]
    input: PathBuf,
    #[arg(long, default_value = "sp_en.txt")]
    output: PathBuf,
    #[arg(long, default_value = "sp_en_meta.jsonl")]
    meta: PathBuf,
    #[arg(long, default_value_t = false)]
    no_meta: bool,
    /// Read at most this many TSV lines.
    #[arg(long)]
    limit: Option<usize>,
}

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("bitext_groups=info")),
        )
        .try_init();

    if let Err(err) = run(Cli::parse()) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Build(args) => run_build(args),
        Command::Prepare(args) => run_prepare(args),
    }
}

fn run_build(args: BuildArgs) -> Result<(), String> {
    let output_format = args.output_format;
    let meta_path = args.meta.clone();
    let use_metadata = !args.no_meta;
    let config = PipelineConfig {
        data_path: args.data,
        input_format: args.input_format.input_format(),
        alignment_path: Some(args.aligned),
        metadata_path: Some(args.meta),
        use_metadata,
        output_path: args.output,
        output_format: output_format.output_format(),
        max_lines: args.limit,
        max_chars: args.max_chars,
        profanity_enabled: !args.allow_profanity,
        profanity_threshold: args.profanity_threshold,
        profanity_wordlist_path: args.profanity_wordlist,
        allow_duplicate_source: args.allow_duplicate_source,
        coverage_policy: args.coverage.policy(),
        forbidden_char: (!args.allow_forbidden_char).then_some(args.forbidden_char),
        preferred_method: args.method,
    };
    let output_path = config.output_path.clone();

    let mut pipeline = PipelineBuilder::new(config)
        .build()
        .map_err(|err| format!("Failed to build pipeline: {err}"))?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {spinner} {pos} lines {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    let mut kept = 0usize;
    let summary = pipeline
        .run_files_with_observer(|outcome| {
            if outcome.verdict == Verdict::Accepted {
                kept += 1;
            }
            progress.inc(1);
            if outcome.line_no % 1000 == 0 {
                progress.set_message(format!("({kept} kept)"));
            }
        })
        .map_err(|err| format!("Grouping run failed: {err}"))?;
    progress.finish_and_clear();

    summary_formatter::print_build_summary(&summary, pipeline.config(), &output_path, output_format.as_str())?;
    if use_metadata && !meta_path.exists() {
        println!(
            "Note: meta file not found ({}); output omitted sp_id/en_id",
            meta_path.display()
        );
    }
    Ok(())
}

fn run_prepare(args: PrepareArgs) -> Result<(), String> {
    require_path_exists(&args.input, "Input TSV not found.")?;
    let input = File::open(&args.input)
        .map_err(|err| format!("Failed to open '{}': {err}", args.input.display()))?;
    let mut pairs_out = create_output(&args.output)?;
    let mut meta_out = if args.no_meta {
        None
    } else {
        Some(create_output(&args.meta)?)
    };

    let summary = convert_tsv(
        BufReader::new(input),
        &mut pairs_out,
        meta_out.as_mut(),
        args.limit,
    )
    .map_err(|err| format!("TSV conversion failed: {err}"))?;

    summary_formatter::print_prepare_summary(
        &summary,
        &args.output,
        (!args.no_meta).then_some(args.meta.as_path()),
    );
    Ok(())
}

fn create_output(path: &Path) -> Result<BufWriter<File>, String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| {
            format!(
                "Failed to create output directory '{}': {err}",
                parent.display()
            )
        })?;
    }
    let file = File::create(path)
        .map_err(|err| format!("Failed to create '{}': {err}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn require_path_exists(path: &Path, message: &str) -> Result<(), String> {
    if path.exists() {
        Ok(())
    } else {
        Err(format!("{message} Path: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn profanity_threshold_help_names_the_classifier_requirement() {
        let cli = Cli::command();
        let build = cli.find_subcommand("build").expect("build subcommand");
        let help = build
            .get_arguments()
            .find(|arg| arg.get_id() == "profanity_threshold")
            .and_then(|arg| arg.get_help())
            .map(|help| help.to_string())
            .expect("threshold help");
        assert!(help.contains("ProfanityClassifier"), "{help}");
    }

    #[test]
    fn build_args_map_onto_pipeline_config_enums() {
        let cli = Cli::try_parse_from([
            "bitext_groups",
            "build",
            "--input-format",
            "tsv",
            "--coverage",
            "lenient",
        ])
        .expect("parse");
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.input_format.input_format(), InputFormat::Tsv);
        assert_eq!(args.coverage.policy(), CoveragePolicy::Lenient);
    }
}
