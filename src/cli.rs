//! CLI argument parsing for sad

use crate::analysis::AnalysisKind;
use crate::config::ReportFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Structural edits to the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GridOp {
    /// Append a zero-filled row
    AddRow,
    /// Remove the last row
    RemoveRow,
    /// Append a zero-filled column
    AddColumn,
    /// Remove the last column
    RemoveColumn,
}

#[derive(Parser, Debug)]
#[command(name = "sad")]
#[command(version)]
#[command(
    about = "Statistical analysis of small hand-entered datasets",
    long_about = None
)]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug tracing output to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Rows and columns are numbered from 1, as in the `Row N` / `Col N` labels
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a new zero-filled table file
    Init {
        file: PathBuf,
        /// Number of rows (default from config, 10)
        #[arg(long)]
        rows: Option<usize>,
        /// Number of columns (default from config, 10)
        #[arg(long)]
        columns: Option<usize>,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Print the table
    Show { file: PathBuf },

    /// Set one cell (blank or NaN clears it)
    Set {
        file: PathBuf,
        row: usize,
        col: usize,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Print the text of one cell
    Get {
        file: PathBuf,
        row: usize,
        col: usize,
    },

    /// Add or remove the last row or column
    Grid {
        file: PathBuf,
        #[arg(value_enum)]
        op: GridOp,
    },

    /// Paste tab-separated text into the table
    Paste {
        file: PathBuf,
        /// Row of the top-left target cell
        #[arg(long, default_value_t = 1)]
        row: usize,
        /// Column of the top-left target cell
        #[arg(long, default_value_t = 1)]
        col: usize,
        /// Read the block from a file instead of stdin
        #[arg(short, long, value_name = "PATH")]
        input: Option<PathBuf>,
        /// Extend the table when the block does not fit
        #[arg(long)]
        grow: bool,
    },

    /// Run the normality check and list the offered analyses
    Check { file: PathBuf },

    /// Run an analysis and save the report
    Analyze {
        file: PathBuf,
        /// Analysis to run (default: first offered option)
        #[arg(short, long, value_enum)]
        analysis: Option<AnalysisKind>,
        /// Report path (default: <file>_report.<format>)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Report format (default from config, html)
        #[arg(long, value_enum)]
        format: Option<ReportFormat>,
    },
}

/// Convert a 1-based position from the command line to an index
pub fn to_index(position: usize, what: &str) -> anyhow::Result<usize> {
    if position == 0 {
        anyhow::bail!("{} numbers start at 1", what);
    }
    Ok(position - 1)
}
