//! Rotaplan CLI - Command-line interface
//!
//! Commands:
//! - generate: Search for a fair schedule and print or export it
//! - teams: Show the teams and pairings a plan produces

mod generate;
mod teams;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rotaplan")]
#[command(about = "Fair round and game station scheduler")]
#[command(version)]
struct Cli {
    /// Random seed for reproducible schedules
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log search details at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search for the fairest schedule of a plan
    Generate(generate::GenerateArgs),
    /// Print the team overview of a plan
    Teams(teams::TeamsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Generate(args) => generate::run(args, cli.seed),
        Commands::Teams(args) => teams::run(args),
    }
}
