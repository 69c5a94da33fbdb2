//! Play command - Run a trained Q-learning policy or the UCT agent on a dungeon

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::warn;

use crate::{
    adapters::MsgPackRepository,
    cli::{
        config::{load_dungeon, load_mcts_config, map_name},
        output::{print_episode, print_kv, print_metrics, print_section, print_subsection},
    },
    dungeon::GridDungeon,
    mcts::UctAgent,
    pipeline::{DEFAULT_MAX_ACTIONS, MetricsObserver, Observer, play_episode},
    ports::{Controller, PolicyRepository},
    q_learning::QLearningAgent,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AgentKind {
    /// Greedy play of a trained Q-table
    QLearning,
    /// Monte Carlo Tree Search with UCB1 selection
    Uct,
}

#[derive(Parser, Debug)]
#[command(about = "Play episodes with an agent")]
pub struct PlayArgs {
    /// Agent to play with
    #[arg(value_enum)]
    pub agent: AgentKind,

    /// ASCII dungeon layout to play on
    #[arg(long, short = 'm')]
    pub map: PathBuf,

    /// Trained policy file (Q-learning only)
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// JSON search configuration (UCT only)
    #[arg(long)]
    pub mcts_config: Option<PathBuf>,

    /// Override the search iteration budget (UCT only)
    #[arg(long)]
    pub iterations: Option<u32>,

    /// Number of independent runs
    #[arg(long, short = 'n', default_value_t = 1)]
    pub runs: usize,

    /// Action cap per run
    #[arg(long, default_value_t = DEFAULT_MAX_ACTIONS)]
    pub max_actions: usize,

    /// Random seed for reproducibility (run i uses seed + i)
    #[arg(long)]
    pub seed: Option<u64>,
}

fn build_controller(args: &PlayArgs, map: &str) -> Result<Box<dyn Controller<GridDungeon>>> {
    match args.agent {
        AgentKind::QLearning => {
            let mut agent = QLearningAgent::pretrained(format!("QLearning_{map}"));
            match &args.policy {
                Some(path) => {
                    let repo = MsgPackRepository::new();
                    if !repo.exists(path) {
                        warn!(path = %path.display(), "policy not found; playing with an empty table");
                    } else {
                        agent
                            .load_policy(&repo, path)
                            .with_context(|| format!("Failed to load policy {}", path.display()))?;
                    }
                }
                None => warn!("no --policy given; playing with an empty table"),
            }
            agent.set_epsilon(0.0);
            Ok(Box::new(agent))
        }
        AgentKind::Uct => {
            let mut config = load_mcts_config(args.mcts_config.as_deref())?;
            if let Some(iterations) = args.iterations {
                config.iterations = iterations;
                config
                    .validate()
                    .with_context(|| format!("Invalid value {iterations} for --iterations"))?;
            }
            Ok(Box::new(UctAgent::new(config)))
        }
    }
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let dungeon = load_dungeon(&args.map)?;
    let map = map_name(&args.map);
    let mut controller = build_controller(&args, &map)?;

    print_section(&format!("Playing {map} with {}", controller.name()));
    print_kv("Runs", &args.runs.to_string());
    print_kv("Max actions", &args.max_actions.to_string());

    print_subsection("Episodes");
    let mut metrics = MetricsObserver::new();
    for run in 0..args.runs {
        if let Some(seed) = args.seed {
            controller.set_rng_seed(seed.wrapping_add(run as u64));
        }
        let mut state = dungeon.clone();
        let mut observers: [&mut dyn Observer; 1] = [&mut metrics];
        let summary = play_episode(
            controller.as_mut(),
            &mut state,
            args.max_actions,
            run,
            &mut observers,
        )?;
        print_episode(run, &summary);
    }

    print_subsection("Summary");
    print_metrics(&metrics.summary());

    Ok(())
}
