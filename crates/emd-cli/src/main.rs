//! EMD command-line tool: decompose JSON or simulated signals

mod commands;

use clap::{Parser, Subcommand};
use commands::{DecomposeArgs, GenerateArgs};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "emd", version, about = "Empirical mode decomposition of 1-D signals")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Decompose a signal into IMFs and a residual trend
    Decompose(DecomposeArgs),
    /// Write a simulated signal as a JSON array
    Generate(GenerateArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Decompose(args) => commands::decompose(args),
        Command::Generate(args) => commands::generate(args),
    }
}
