//! Infexion CLI - Command-line interface
//!
//! Commands:
//! - play: Play a single game between two agents
//! - match: Play a series of games with alternating colors

mod agent_args;
mod match_cmd;
mod play_cmd;
mod render;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "infexion")]
#[command(about = "Infexion game engine: minimax and MCTS agents")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Base random seed
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single game
    Play(play_cmd::PlayArgs),
    /// Play a match between two agents
    Match(match_cmd::MatchArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output stays clean; RUST_LOG overrides the level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play_cmd::run(args, cli.seed),
        Commands::Match(args) => match_cmd::run(args, cli.seed),
    }
}
