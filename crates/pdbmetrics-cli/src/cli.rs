use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Deserialize;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu, William A. Goddard III, Victor Wai Tak Kam",
    version,
    about = "pdbmetrics - Secondary-structure coverage, backbone distances and bounding-box volume for PDB structures.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used to analyze structures in parallel.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute per-model metrics for local files and/or PDB identifiers.
    Analyze(AnalyzeArgs),
    /// Download structures into the local cache without analyzing them.
    Fetch(FetchArgs),
}

/// Structures to analyze. At least one identifier or path is required.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = true)]
pub struct InputArgs {
    /// PDB identifiers to download and analyze (e.g., --id 1MBN 256B).
    #[arg(long = "id", value_name = "PDB_ID", num_args = 1..)]
    pub ids: Vec<String>,

    /// Local PDB files to analyze.
    #[arg(short, long = "input", value_name = "PATH", num_args = 1..)]
    pub inputs: Vec<PathBuf>,
}

/// Options shared by every command that reads the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory where downloaded structures are cached.
    #[arg(long, value_name = "PATH")]
    pub cache_dir: Option<PathBuf>,

    /// Download structures again even if a cached copy exists.
    #[arg(long)]
    pub refresh: bool,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S analysis.precision=3
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `analyze` subcommand.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Report format.
    #[arg(short, long, value_enum, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Write the report to a file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Number of decimal digits in reported values.
    #[arg(short, long, value_name = "DIGITS")]
    pub precision: Option<u32>,

    /// Treat malformed HELIX/SHEET records as fatal instead of skipping them.
    #[arg(long)]
    pub strict_spans: bool,
}

/// Arguments for the `fetch` subcommand.
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// PDB identifiers to download.
    #[arg(long = "id", value_name = "PDB_ID", num_args = 1.., required = true)]
    pub ids: Vec<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// One line per metric, tab separated.
    #[default]
    Text,
    /// One row per model with a header line.
    Tsv,
}
