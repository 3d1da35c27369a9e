//! Blockflow CLI - run, check and explore dataflow diagrams.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "blockflow")]
#[command(author, version, about = "Blockflow dataflow diagram runner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a diagram, recompute it and print every port value
    Run(commands::run::RunArgs),

    /// Validate a diagram without running it
    Check(commands::check::CheckArgs),

    /// List available block kinds and their ports
    Blocks(commands::blocks::BlocksArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `run --json` output stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Check(args) => commands::check::run(args),
        Commands::Blocks(args) => commands::blocks::run(args),
    }
}
