//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pathway overrepresentation analysis
#[derive(Parser, Debug)]
#[command(name = "pathwise", version, about)]
pub struct Cli {
    /// Configuration file (overrides PATHWISE_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the selectable pathway databases
    Databases,

    /// Score a pathway catalog against a foreground/background selection
    Run(RunArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Database id from `pathwise databases`, a catalog file, or a URL
    #[arg(short, long)]
    pub catalog: Option<String>,

    /// File with the measured features, one identifier per line
    #[arg(short, long)]
    pub background: PathBuf,

    /// File with the selected features, one identifier per line
    #[arg(short, long)]
    pub foreground: PathBuf,

    /// Drop background features that appear in no pathway
    #[arg(long)]
    pub annotated_background: Option<bool>,

    /// Only show pathways whose name contains this text
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// First ranked result to show
    #[arg(long, default_value = "0")]
    pub offset: usize,

    /// Results per page (default from config)
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Write every ranked result to this file as TSV
    #[arg(short, long)]
    pub export: Option<PathBuf>,

    /// Write the detail file of this pathway
    #[arg(short, long)]
    pub detail: Option<String>,
}
