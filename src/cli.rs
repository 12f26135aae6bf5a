use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// kdmatch nearest-neighbour case-control matcher.
#[derive(Parser)]
#[command(
    name = "kdmatch",
    version,
    about = "Nearest-neighbour case-control matching with optimal de-duplication"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Select oversampled neighbours, then resolve shared controls.
    Match(MatchArgs),
    /// Select nearest neighbours only, allowing shared controls.
    Select(SelectArgs),
}

/// Input and output locations shared by every subcommand.
#[derive(clap::Args)]
pub struct InputArgs {
    /// Tab-delimited anchor (case) table.
    #[arg(long)]
    pub anchors: PathBuf,

    /// Tab-delimited candidate (control) table.
    #[arg(long)]
    pub candidates: PathBuf,

    /// Directory for output files (created if missing).
    #[arg(short, long)]
    pub output_dir: PathBuf,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override output file prefix from config.
    #[arg(long)]
    pub prefix: Option<String>,

    /// Gzip the match tables.
    #[arg(long)]
    pub gzip: bool,
}

/// Arguments for the `match` subcommand.
#[derive(clap::Args)]
pub struct MatchArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Override number of neighbours selected before resolution.
    #[arg(long)]
    pub initial_k: Option<usize>,

    /// Override number of controls kept per case after resolution.
    #[arg(long)]
    pub final_k: Option<usize>,

    /// Override worker thread count for resolution.
    #[arg(short, long)]
    pub threads: Option<usize>,
}

/// Arguments for the `select` subcommand.
#[derive(clap::Args)]
pub struct SelectArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Override number of neighbours selected per case.
    #[arg(short)]
    pub k: Option<usize>,
}
