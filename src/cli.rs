//! CLI struct definitions for the recordkit command-line interface.
//!
//! All clap-derived types live here. Dispatch logic lives in `lib.rs`.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "recordkit",
    version = env!("CARGO_PKG_VERSION"),
    about = "Scan, validate, and index architecture decision records."
)]
pub(crate) struct Cli {
    /// Project root. Defaults to RECORDKIT_ROOT, then an upward search for
    /// recordkit.toml or CLAUDE.md.
    #[clap(long, global = true)]
    pub root: Option<PathBuf>,
    /// Output format.
    #[clap(long, global = true, value_enum, default_value = "text")]
    pub format: OutputFormat,
    /// Print trace lines to stderr.
    #[clap(long, short = 'v', global = true)]
    pub verbose: bool,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Validate the structure of every record.
    #[clap(name = "validate-all")]
    ValidateAll,
    /// Check that every local link in the index points at an existing file.
    #[clap(name = "check-references")]
    CheckReferences,
    /// Check that the index mentions every record.
    #[clap(name = "verify-index")]
    VerifyIndex,
    /// Regenerate the index from the records on disk.
    #[clap(name = "update-index")]
    UpdateIndex,
    /// List every record found.
    List,
}
