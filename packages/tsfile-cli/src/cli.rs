use clap::{Args, Parser, Subcommand};
use tsfile::DEFAULT_PARALLEL_THRESHOLD;

#[derive(Parser)]
#[command(
    name = "tsfile",
    version,
    about = "Validate and inspect .ts time-series dataset files",
    long_about = "Validate, summarize, convert and resample time-series datasets stored in the\n\
                  .ts text format (header directives, @data, one colon-separated row per case)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Parse rows in parallel once a file has at least this many rows
    #[arg(
        long,
        global = true,
        env = "TSFILE_PARALLEL_THRESHOLD",
        default_value_t = DEFAULT_PARALLEL_THRESHOLD
    )]
    pub parallel_threshold: usize,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check that one or more .ts files parse and satisfy their header
    Validate(ValidateArgs),
    /// Summarize a .ts file
    Info(InfoArgs),
    /// Convert a .ts file to JSON
    Convert(ConvertArgs),
    /// Write a reproducible train/test resample of an archive problem
    Resample(ResampleArgs),
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Input .ts file
    #[arg(long, required_unless_present = "glob", conflicts_with = "glob")]
    pub file: Option<String>,

    /// Glob pattern selecting several .ts files (e.g. "data/**/*.ts")
    #[arg(long)]
    pub glob: Option<String>,

    /// Keep validating after the first invalid file
    #[arg(long, default_value_t = false)]
    pub continue_on_error: bool,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Input .ts file
    #[arg(long)]
    pub file: String,

    /// Output as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args)]
pub struct ConvertArgs {
    /// Input .ts file
    #[arg(long)]
    pub file: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Compact JSON output (no indentation)
    #[arg(long, default_value_t = false)]
    pub compact: bool,
}

#[derive(Args)]
pub struct ResampleArgs {
    /// Archive root holding <PROBLEM>/<PROBLEM>_TRAIN.ts and _TEST.ts
    #[arg(long, env = "TSFILE_DATA_ROOT")]
    pub root: String,

    /// Problem name (directory and file prefix)
    #[arg(long)]
    pub problem: String,

    /// Resample id; 0 keeps the published split
    #[arg(long, default_value_t = 0)]
    pub resample_id: u64,

    /// Keep per-class train/test counts (class-labelled problems only)
    #[arg(long, default_value_t = false)]
    pub stratify: bool,

    /// Directory to write the resampled splits into
    #[arg(long)]
    pub output_dir: String,

    /// Suppress progress messages on stderr
    #[arg(long, default_value_t = false)]
    pub quiet: bool,
}
