//! Tilematch CLI - Command-line interface
//!
//! Commands:
//! - play: Watch the bot play one game of gems in the terminal
//! - simulate: Run many seeded games in parallel and report scores

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod bot;
mod gems;
mod play;
mod render;
mod simulate;

#[derive(Parser)]
#[command(name = "tilematch")]
#[command(about = "Match-3 tile engine demo")]
struct Cli {
    /// RNG seed for reproducible boards
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log game events (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the bot play one game
    Play(play::PlayArgs),
    /// Run many games in parallel
    Simulate(simulate::SimulateArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Play(args) => play::run(args, cli.seed),
        Commands::Simulate(args) => simulate::run(args, cli.seed),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
