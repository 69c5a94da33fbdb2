//! Dungeon agents CLI - train and play tabular Q-learning and UCT agents
//!
//! This CLI provides:
//! - Resumable Q-learning training with persona reward shaping
//! - Episode play for trained policies and the tree-search agent

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "dungeon-agents")]
#[command(version, about = "Learning and planning agents for grid dungeons", long_about = None)]
struct Cli {
    /// Default log level when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a Q-learning policy for one persona on one dungeon
    Train(dungeon_agents::cli::commands::train::TrainArgs),

    /// Play episodes with a trained policy or the UCT agent
    Play(dungeon_agents::cli::commands::play::PlayArgs),
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Commands::Train(args) => dungeon_agents::cli::commands::train::execute(args),
        Commands::Play(args) => dungeon_agents::cli::commands::play::execute(args),
    }
}
