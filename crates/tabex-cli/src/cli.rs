//! CLI argument definitions for tabex.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tabex_model::DEFAULT_HEADER_SCAN_ROWS;

#[derive(Parser)]
#[command(
    name = "tabex",
    version,
    about = "Extract records from spreadsheet tables into JSON",
    long_about = "Extract records from spreadsheet tables into JSON.\n\n\
                  A TOML batch file names the tables to read, the fields to pull\n\
                  from each, and the metadata to attach. Header rows are located\n\
                  by matching field names when they are not given explicitly."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Show cell values in sample output instead of redacting them.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a batch file and write the extracted records as JSON.
    Extract(ExtractArgs),

    /// List the sheets of a workbook with their sizes.
    Sheets(SheetsArgs),

    /// Print the first rows of a sheet to locate its header row.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct ExtractArgs {
    /// Batch configuration file (TOML).
    #[arg(long = "config", short = 'c', value_name = "FILE")]
    pub config: PathBuf,

    /// Workbook to read (overrides `workbook` in the batch file).
    #[arg(long = "workbook", value_name = "FILE")]
    pub workbook: Option<PathBuf>,

    /// JSON output file (overrides `output` in the batch file).
    #[arg(long = "output", short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Extract and report without writing the output file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Print this many sample records after the summary.
    #[arg(long = "sample", value_name = "N", default_value_t = 0)]
    pub sample: usize,
}

#[derive(Parser)]
pub struct SheetsArgs {
    /// Workbook to list.
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Workbook containing the sheet.
    #[arg(value_name = "WORKBOOK")]
    pub workbook: PathBuf,

    /// Sheet name (matched ignoring case and extra whitespace).
    #[arg(value_name = "SHEET")]
    pub sheet: String,

    /// Number of leading rows to print.
    #[arg(long = "rows", value_name = "N", default_value_t = DEFAULT_HEADER_SCAN_ROWS)]
    pub rows: usize,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
