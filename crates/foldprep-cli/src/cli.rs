use clap::{Parser, ValueEnum};
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
    author = "Tony Kan",
    version,
    about = "foldprep - Generate AlphaFold 3 input documents from FASTA files, MMseqs2 MSAs and optional ligand tables.",
    help_template = HELP_TEMPLATE,
)]
pub struct Cli {
    // --- Required Inputs ---
    /// Input folder containing FASTA files and optional ligand TSV tables.
    #[arg(short, long = "input-path", alias = "input_path", value_name = "DIR")]
    pub input_path: PathBuf,

    /// Output folder for the generated documents, MSAs and the process log.
    #[arg(short, long = "output-path", alias = "output_path", value_name = "DIR")]
    pub output_path: PathBuf,

    /// Number of CPU threads passed to MMseqs2.
    #[arg(long, value_name = "NUM")]
    pub cpu: usize,

    /// Path to the MMseqs2 binary.
    #[arg(long = "mmseqs-bin", alias = "mmseqs_bin", value_name = "PATH")]
    pub mmseqs_bin: PathBuf,

    /// Path to the indexed MMseqs2 reference database.
    #[arg(long = "mmseqs-db", alias = "mmseqs_DB", value_name = "PATH")]
    pub mmseqs_db: PathBuf,

    // --- Logging ---
    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all console log output except for errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    // --- Optional Overrides ---
    /// Path to an optional configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// What to do when the output folder already exists. Asks interactively by default.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub overwrite: Option<OverwriteArg>,

    /// How SMILES strings are escaped before being embedded in the documents.
    #[arg(long, value_enum, value_name = "KIND")]
    pub escaper: Option<EscaperArg>,

    /// Path to the jq binary, used with `--escaper jq`.
    #[arg(long, value_name = "PATH")]
    pub jq_bin: Option<PathBuf>,

    /// Maximum number of hits kept per query during the MMseqs2 search.
    #[arg(long, value_name = "INT")]
    pub max_seqs: Option<usize>,

    /// File name of the ligand table used when a FASTA file has no table of its own.
    #[arg(long, value_name = "NAME")]
    pub default_ligand_table: Option<String>,

    /// Search each protein with its whole FASTA file as query instead of a single-record file.
    #[arg(long)]
    pub whole_file_queries: bool,
}

#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum OverwriteArg {
    /// Ask on the terminal; refuse when not interactive.
    Ask,
    /// Abort if the output folder exists.
    Fail,
    /// Delete the existing output folder and recreate it.
    Overwrite,
    /// Write to a new timestamped folder next to the existing one.
    Redirect,
}

#[derive(ValueEnum, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum EscaperArg {
    /// Escape in-process.
    Json,
    /// Escape with `jq -R .`.
    Jq,
}
