//! Training and play pipelines
//!
//! This module provides:
//! - The resumable Q-learning training loop with checkpoints
//! - Single-episode play for any controller
//! - Observers for progress reporting and outcome metrics

pub mod episode;
pub mod observers;
pub mod training;

pub use episode::{DEFAULT_MAX_ACTIONS, EpisodeOutcome, EpisodeSummary, play_episode};
// Re-export observer implementations (adapters)
pub use observers::{MetricsObserver, MetricsSummary, ProgressObserver};
pub use training::{EpsilonSchedule, TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::Observer;
