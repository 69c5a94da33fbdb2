//! Train command - Train a persona-shaped Q-learning policy on one dungeon

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::MsgPackRepository,
    cli::{
        config::{load_dungeon, map_name, parse_persona},
        output::{format_number, format_percent, print_kv, print_section, print_subsection},
    },
    pipeline::{ProgressObserver, TrainingConfig, TrainingPipeline},
    q_learning::QLearningAgent,
};

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning policy")]
pub struct TrainArgs {
    /// ASCII dungeon layout to train on
    #[arg(long, short = 'm')]
    pub map: PathBuf,

    /// Reward persona (baseline, runner, survivalist, monster-killer, treasure-collector)
    #[arg(long, short = 'p', default_value = "baseline")]
    pub persona: String,

    /// JSON training configuration; flags below override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Directory for the final policy and the checkpoint
    /// (default: trained_agents, or the paths from --config)
    #[arg(long, short = 'O')]
    pub output_dir: Option<PathBuf>,

    /// Number of training episodes
    #[arg(long, short = 'e')]
    pub episodes: Option<usize>,

    /// Step cap per episode
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Episodes between checkpoints
    #[arg(long)]
    pub checkpoint_interval: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl TrainArgs {
    fn training_config(&self, map: &str) -> Result<TrainingConfig> {
        let persona = parse_persona(&self.persona)?;
        let default_dir = PathBuf::from("trained_agents");

        let mut config = match &self.config {
            Some(path) => TrainingConfig::load(path)
                .with_context(|| format!("Failed to load training config {}", path.display()))?,
            None => TrainingConfig::for_map(persona, map, &default_dir),
        };

        if self.config.is_none() || self.output_dir.is_some() {
            let dir = self.output_dir.as_ref().unwrap_or(&default_dir);
            let paths = TrainingConfig::for_map(persona, map, dir);
            config.checkpoint_path = paths.checkpoint_path;
            config.policy_path = paths.policy_path;
        }

        if let Some(episodes) = self.episodes {
            config.total_episodes = episodes;
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        if let Some(interval) = self.checkpoint_interval {
            config.checkpoint_interval = interval;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate()?;
        Ok(config)
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let dungeon = load_dungeon(&args.map)?;
    let map = map_name(&args.map);
    let persona = parse_persona(&args.persona)?;
    let config = args.training_config(&map)?;

    for path in [&config.policy_path, &config.checkpoint_path] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
    }

    print_section(&format!("Training {persona} on {map}"));
    print_kv("Episodes", &format_number(config.total_episodes));
    print_kv("Max steps", &config.max_steps.to_string());
    print_kv("Checkpoint every", &format_number(config.checkpoint_interval));
    print_kv("Policy", &config.policy_path.display().to_string());
    if let Some(seed) = config.seed {
        print_kv("Seed", &seed.to_string());
    }

    let mut pipeline = TrainingPipeline::new(config.clone());
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }

    let mut agent = QLearningAgent::new(persona);
    let repo = MsgPackRepository::new();
    let result = pipeline
        .run(&mut agent, &dungeon, &repo)
        .with_context(|| format!("Training {persona} on {map} failed"))?;

    print_subsection("Results");
    if result.start_episode > 0 {
        print_kv("Resumed at", &format_number(result.start_episode));
    }
    print_kv("Episodes run", &format_number(result.episodes_run));
    print_kv(
        "Exits",
        &format!("{} ({})", result.exits, format_percent(result.exit_rate)),
    );
    print_kv("Deaths", &result.deaths.to_string());
    print_kv("Timeouts", &result.timeouts.to_string());
    print_kv("States learned", &format_number(result.states_learned));
    print_kv("Final epsilon", &format!("{:.3}", result.final_epsilon));
    print_kv("Saved to", &result.policy_path.display().to_string());

    if let Some(path) = &args.summary {
        result
            .save(path)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
        print_kv("Summary", &path.display().to_string());
    }

    Ok(())
}
