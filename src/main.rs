use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::info;

use handsign_dtw::{Matcher, MatcherConfig, RecognizeOptions, Sequence, SequenceOrder, SlopeDtw};

#[derive(Parser)]
#[command(name = "handsign")]
#[command(about = "Gesture recognition by slope-constrained DTW against labeled reference motions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel recognition (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Matcher tuning parameters.
#[derive(Args, Debug, Clone)]
struct MatcherArgs {
    /// Number of coordinates per point
    #[arg(long)]
    dim: usize,

    /// Maximum length-normalized cost accepted as a match (exclusive)
    #[arg(long, default_value_t = 3.0)]
    dtw_threshold: f64,

    /// Maximum end-pose distance for which full DTW is attempted
    #[arg(long, default_value_t = 5.0)]
    first_threshold: f64,

    /// Maximum consecutive same-axis warping steps
    #[arg(long, default_value_t = 2)]
    max_slope: usize,

    /// Minimum capture length (recorded, not enforced)
    #[arg(long, default_value_t = 10.0)]
    minimum_length: f64,

    /// Align in capture order instead of anchoring at the final samples
    #[arg(long, default_value_t = false)]
    forward: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a query against labeled reference sequences
    Recognize {
        /// JSON document with `references` and `query`
        #[arg(long)]
        input: PathBuf,

        /// Scan references on the rayon thread pool
        #[arg(long, default_value_t = false)]
        parallel: bool,

        #[command(flatten)]
        matcher: MatcherArgs,
    },

    /// Print the raw slope-constrained DTW cost between two sequences
    Align {
        /// JSON document with sequences `a` and `b`
        #[arg(long)]
        input: PathBuf,

        /// Maximum consecutive same-axis warping steps
        #[arg(long, default_value_t = 2)]
        max_slope: usize,

        /// Align in capture order instead of anchoring at the final samples
        #[arg(long, default_value_t = false)]
        forward: bool,
    },
}

// --- JSON input documents ---

#[derive(Deserialize)]
struct ReferenceInput {
    label: String,
    points: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct RecognizeInput {
    references: Vec<ReferenceInput>,
    query: Vec<Vec<f64>>,
}

#[derive(Deserialize)]
struct AlignInput {
    a: Vec<Vec<f64>>,
    b: Vec<Vec<f64>>,
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct RecognizeOutput {
    label: String,
    matched: bool,
    distance: Option<f64>,
    n_references: usize,
    aligned: usize,
    early_rejected: usize,
    skipped: Vec<SkippedOutput>,
}

#[derive(Serialize)]
struct SkippedOutput {
    index: usize,
    label: String,
    reason: String,
}

#[derive(Serialize)]
struct AlignOutput {
    a_len: usize,
    b_len: usize,
    max_slope: usize,
    cost: Option<f64>,
}

fn order(forward: bool) -> SequenceOrder {
    if forward {
        SequenceOrder::Forward
    } else {
        SequenceOrder::Reversed
    }
}

fn build_config(args: &MatcherArgs) -> Result<MatcherConfig> {
    let config = MatcherConfig::new(
        args.dim,
        args.dtw_threshold,
        args.first_threshold,
        args.max_slope,
        args.minimum_length,
    )
    .context("invalid matcher configuration")?;
    Ok(config.with_order(order(args.forward)))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

/// Register references one by one so a bad reference fails at load time
/// and names its label.
fn build_matcher(config: MatcherConfig, references: Vec<ReferenceInput>) -> Result<Matcher> {
    let mut matcher = Matcher::new(config);
    for ReferenceInput { label, points } in references {
        let sequence = Sequence::from_rows(points)
            .with_context(|| format!("invalid reference sequence {label:?}"))?;
        matcher
            .add(sequence, label.as_str())
            .with_context(|| format!("invalid reference sequence {label:?}"))?;
    }
    Ok(matcher)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Recognize {
            input,
            parallel,
            matcher,
        } => {
            let config = build_config(&matcher)?;
            let document: RecognizeInput = read_json(&input)?;

            let matcher = build_matcher(config, document.references)?;
            info!(
                n_references = matcher.len(),
                labels = matcher.store().labels().len(),
                "references loaded"
            );

            let query = Sequence::from_rows(document.query).context("invalid query sequence")?;

            let options = RecognizeOptions::new().with_parallel(parallel);
            let report = matcher
                .recognize_with(&query, &options)
                .context("recognition failed")?;

            let output = RecognizeOutput {
                label: report.result.label().to_string(),
                matched: report.result.is_match(),
                distance: report.result.distance().map(|d| d.value()),
                n_references: report.candidates_considered,
                aligned: report.aligned,
                early_rejected: report.early_rejected,
                skipped: report
                    .skipped
                    .iter()
                    .map(|s| SkippedOutput {
                        index: s.index,
                        label: s.label.clone(),
                        reason: s.reason.to_string(),
                    })
                    .collect(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Align {
            input,
            max_slope,
            forward,
        } => {
            let document: AlignInput = read_json(&input)?;
            let a = Sequence::from_rows(document.a).context("invalid sequence a")?;
            let b = Sequence::from_rows(document.b).context("invalid sequence b")?;

            let dtw = SlopeDtw::new(max_slope).with_order(order(forward));
            let cost = dtw.align(&a, &b).context("alignment failed")?;
            info!(cost = cost.value(), "alignment complete");

            // JSON has no infinity; an unreachable alignment is reported as null.
            let output = AlignOutput {
                a_len: a.len(),
                b_len: b.len(),
                max_slope,
                cost: (!cost.is_infinite()).then(|| cost.value()),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
