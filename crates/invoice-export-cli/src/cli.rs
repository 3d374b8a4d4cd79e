//! Command-line arguments.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "invx",
    version,
    about = "Export extracted invoice items and enriched products as CSV/TSV"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save the export as a file in a directory
    Export {
        #[command(flatten)]
        source: SourceArgs,

        /// Directory the file is written into
        #[arg(long, env = "INVX_OUT_DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Override the dialect's file name
        #[arg(long)]
        file_name: Option<String>,
    },

    /// Copy the export to the system clipboard
    Copy {
        #[command(flatten)]
        source: SourceArgs,

        /// Seconds to wait for the clipboard command
        #[arg(long, default_value_t = 5)]
        clipboard_timeout_secs: u64,
    },

    /// Write the export to stdout
    Print {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// List the built-in dialects
    Dialects,
}

/// Where records come from and how they are exported.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Built-in dialect name
    #[arg(short, long, env = "INVX_DIALECT", default_value = "invoice-csv")]
    pub dialect: String,

    /// YAML file describing a custom dialect; takes precedence over --dialect
    #[arg(long)]
    pub dialect_file: Option<PathBuf>,

    /// JSON file with the records; omit or pass `-` to read piped stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}
