//! Resumable training loop for the Q-learning agent

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Error, Result,
    pipeline::episode::{EpisodeOutcome, EpisodeSummary},
    ports::{Controller, GameState, Observer, PolicyRepository},
    q_learning::QLearningAgent,
    reward::{EventCounters, Persona, TransitionEvents},
};

/// Exploration schedule over training episodes.
///
/// ε stays at 1.0 through `warmup_episodes`, then decays linearly by `decay`
/// over the remaining episodes, never dropping below `floor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpsilonSchedule {
    pub warmup_episodes: usize,
    pub decay: f64,
    pub floor: f64,
}

impl Default for EpsilonSchedule {
    fn default() -> Self {
        Self {
            warmup_episodes: 2_500,
            decay: 0.9,
            floor: 0.1,
        }
    }
}

impl EpsilonSchedule {
    /// ε for a zero-based `episode` out of `total_episodes`.
    ///
    /// Depends only on the episode index, so a resumed run continues the
    /// same curve.
    pub fn epsilon(&self, episode: usize, total_episodes: usize) -> f64 {
        if episode <= self.warmup_episodes || total_episodes <= self.warmup_episodes {
            return 1.0;
        }
        let progress =
            (episode - self.warmup_episodes) as f64 / (total_episodes - self.warmup_episodes) as f64;
        (1.0 - progress * self.decay).max(self.floor)
    }
}

/// Training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub total_episodes: usize,

    /// Step cap per episode
    pub max_steps: usize,

    /// Exploration schedule
    pub epsilon: EpsilonSchedule,

    /// Checkpoint after every episode index divisible by this (except 0)
    pub checkpoint_interval: usize,

    /// Where the resumable checkpoint lives while training runs
    pub checkpoint_path: PathBuf,

    /// Where the final policy is written
    pub policy_path: PathBuf,

    /// Random seed
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self::for_map(Persona::default(), "map0", "trained_agents")
    }
}

impl TrainingConfig {
    /// Default configuration with the conventional file names for one
    /// persona on one map: `{PERSONA}_{map}.msgpack` for the policy and
    /// `ckpt_{PERSONA}_{map}.msgpack` for the checkpoint.
    pub fn for_map(persona: Persona, map: &str, output_dir: impl AsRef<Path>) -> Self {
        let output_dir = output_dir.as_ref();
        Self {
            total_episodes: 150_000,
            max_steps: 200,
            epsilon: EpsilonSchedule::default(),
            checkpoint_interval: 15_000,
            checkpoint_path: output_dir.join(format!("ckpt_{persona}_{map}.msgpack")),
            policy_path: output_dir.join(format!("{persona}_{map}.msgpack")),
            seed: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.checkpoint_interval == 0 {
            return Err(Error::InvalidConfiguration {
                message: "checkpoint_interval must be at least 1".to_string(),
            });
        }
        if self.max_steps == 0 {
            return Err(Error::InvalidConfiguration {
                message: "max_steps must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.epsilon.floor) {
            return Err(Error::InvalidConfiguration {
                message: format!("epsilon floor {} is outside [0, 1]", self.epsilon.floor),
            });
        }
        Ok(())
    }

    /// Load a configuration from a JSON file. Missing fields take defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open training config {path:?}"),
            source,
        })?;
        let config = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    /// Episode training started from (non-zero when resumed)
    pub start_episode: usize,

    /// Episodes actually run by this invocation
    pub episodes_run: usize,

    /// Configured total
    pub total_episodes: usize,

    pub exits: usize,
    pub deaths: usize,
    pub timeouts: usize,

    /// Fraction of the episodes run that reached the exit
    pub exit_rate: f64,

    /// Distinct abstract states in the final table
    pub states_learned: usize,

    /// ε used for the last episode run
    pub final_epsilon: f64,

    /// Where the final policy was written
    pub policy_path: PathBuf,
}

impl TrainingResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

#[derive(Default)]
struct OutcomeTally {
    exits: usize,
    deaths: usize,
    timeouts: usize,
}

impl OutcomeTally {
    fn record(&mut self, outcome: EpisodeOutcome) {
        match outcome {
            EpisodeOutcome::Exit => self.exits += 1,
            EpisodeOutcome::Died => self.deaths += 1,
            EpisodeOutcome::Timeout => self.timeouts += 1,
        }
    }
}

/// Training pipeline for one Q-learning agent on one dungeon
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    /// Create a new training pipeline
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Train `agent` on fresh copies of `initial_state`.
    ///
    /// Resumes from the configured checkpoint when one exists, writes a new
    /// checkpoint every `checkpoint_interval` episodes, and on completion
    /// saves the final policy and removes the checkpoint.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, an existing checkpoint cannot
    /// be restored, or persisting a checkpoint or the final policy fails.
    pub fn run<S, R>(
        &mut self,
        agent: &mut QLearningAgent,
        initial_state: &S,
        repo: &R,
    ) -> Result<TrainingResult>
    where
        S: GameState,
        R: PolicyRepository + ?Sized,
    {
        self.config.validate()?;
        if let Some(seed) = self.config.seed {
            <QLearningAgent as Controller<S>>::set_rng_seed(agent, seed);
        }

        let total = self.config.total_episodes;
        let checkpoint_path = self.config.checkpoint_path.clone();

        let start_episode = if repo.exists(&checkpoint_path) {
            let next = agent.load_checkpoint(repo, &checkpoint_path)?;
            info!(
                path = %checkpoint_path.display(),
                next_episode = next,
                states = agent.q_table().len(),
                "resuming from checkpoint"
            );
            next
        } else {
            0
        };

        for observer in &mut self.observers {
            observer.on_training_start(start_episode, total)?;
        }

        let mut tally = OutcomeTally::default();
        let mut final_epsilon = agent.epsilon();

        for episode in start_episode..total {
            final_epsilon = self.config.epsilon.epsilon(episode, total);
            agent.set_epsilon(final_epsilon);

            let summary = self.train_episode(agent, initial_state, episode)?;
            tally.record(summary.outcome);

            if episode > 0 && episode % self.config.checkpoint_interval == 0 {
                agent.save_checkpoint(repo, &checkpoint_path, episode + 1)?;
                info!(
                    episode,
                    total,
                    states = agent.q_table().len(),
                    "checkpoint saved"
                );
                for observer in &mut self.observers {
                    observer.on_checkpoint(episode + 1)?;
                }
            }
        }

        agent.save_policy(repo, &self.config.policy_path)?;
        info!(
            path = %self.config.policy_path.display(),
            states = agent.q_table().len(),
            "final policy saved"
        );
        if repo.exists(&checkpoint_path) {
            repo.remove(&checkpoint_path)?;
            debug!(path = %checkpoint_path.display(), "checkpoint removed");
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        let episodes_run = total.saturating_sub(start_episode);
        let exit_rate = if episodes_run > 0 {
            tally.exits as f64 / episodes_run as f64
        } else {
            0.0
        };

        Ok(TrainingResult {
            start_episode,
            episodes_run,
            total_episodes: total,
            exits: tally.exits,
            deaths: tally.deaths,
            timeouts: tally.timeouts,
            exit_rate,
            states_learned: agent.q_table().len(),
            final_epsilon,
            policy_path: self.config.policy_path.clone(),
        })
    }

    fn train_episode<S: GameState>(
        &mut self,
        agent: &mut QLearningAgent,
        initial_state: &S,
        episode: usize,
    ) -> Result<EpisodeSummary> {
        for observer in &mut self.observers {
            observer.on_episode_start(episode)?;
        }

        let mut state = initial_state.clone();
        let mut steps = 0;

        while !state.is_halted() && steps < self.config.max_steps {
            let key = agent.state_key(&state);
            let action = agent.select_action(&key);

            let before = EventCounters::capture(&state);
            state.apply_action(action);
            let events = TransitionEvents::between(before, &state);
            let reward = agent.reward(&events);

            let next_key = agent.state_key(&state);
            agent.update(key, action, reward, &next_key);

            for observer in &mut self.observers {
                observer.on_step(episode, steps, action, reward)?;
            }
            steps += 1;
        }

        let summary = EpisodeSummary::from_state(steps, &state);
        for observer in &mut self.observers {
            observer.on_episode_end(episode, &summary)?;
        }
        Ok(summary)
    }
}
