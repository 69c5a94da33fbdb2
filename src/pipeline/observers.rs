//! Observer implementations for training and play
//!
//! Observers allow composable data collection without coupling the driver
//! loops to specific output formats.

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Result,
    pipeline::episode::{EpisodeOutcome, EpisodeSummary},
    ports::Observer,
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    exits: usize,
    deaths: usize,
    timeouts: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            exits: 0,
            deaths: 0,
            timeouts: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} died:{} timeout:{}", self.exits, self.deaths, self.timeouts)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, start_episode: usize, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (exit:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        pb.set_position(start_episode as u64);
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, episode: usize, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            EpisodeOutcome::Exit => self.exits += 1,
            EpisodeOutcome::Died => self.deaths += 1,
            EpisodeOutcome::Timeout => self.timeouts += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_checkpoint(&mut self, next_episode: usize) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.println(format!("checkpoint saved, resumes at episode {next_episode}"));
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks episode outcomes and per-episode statistics
#[derive(Debug, Default)]
pub struct MetricsObserver {
    exits: usize,
    deaths: usize,
    timeouts: usize,
    episodes: usize,
    total_actions: usize,
    total_hitpoints: i64,
    total_monsters: usize,
    total_treasures: usize,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// Fraction of episodes that reached the exit
    pub fn exit_rate(&self) -> f64 {
        self.rate(self.exits)
    }

    /// Fraction of episodes in which the hero died
    pub fn death_rate(&self) -> f64 {
        self.rate(self.deaths)
    }

    fn rate(&self, count: usize) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            count as f64 / self.episodes as f64
        }
    }

    fn average(&self, total: f64) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            total / self.episodes as f64
        }
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes,
            exits: self.exits,
            deaths: self.deaths,
            timeouts: self.timeouts,
            exit_rate: self.exit_rate(),
            death_rate: self.death_rate(),
            avg_actions: self.average(self.total_actions as f64),
            avg_hitpoints: self.average(self.total_hitpoints as f64),
            avg_monsters_killed: self.average(self.total_monsters as f64),
            avg_treasures_collected: self.average(self.total_treasures as f64),
        }
    }
}

/// Summary of episode metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub exits: usize,
    pub deaths: usize,
    pub timeouts: usize,
    pub exit_rate: f64,
    pub death_rate: f64,
    pub avg_actions: f64,
    pub avg_hitpoints: f64,
    pub avg_monsters_killed: f64,
    pub avg_treasures_collected: f64,
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, _episode: usize, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            EpisodeOutcome::Exit => self.exits += 1,
            EpisodeOutcome::Died => self.deaths += 1,
            EpisodeOutcome::Timeout => self.timeouts += 1,
        }
        self.episodes += 1;
        self.total_actions += summary.actions;
        self.total_hitpoints += i64::from(summary.hitpoints);
        self.total_monsters += summary.monsters_killed;
        self.total_treasures += summary.treasures_collected;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(outcome: EpisodeOutcome, actions: usize, hitpoints: i32) -> EpisodeSummary {
        EpisodeSummary {
            actions,
            outcome,
            hitpoints,
            monsters_killed: 1,
            treasures_collected: 2,
        }
    }

    #[test]
    fn test_metrics_observer() {
        let mut observer = MetricsObserver::new();

        observer.on_episode_end(0, &summary(EpisodeOutcome::Exit, 10, 30)).unwrap();
        observer.on_episode_end(1, &summary(EpisodeOutcome::Died, 4, -2)).unwrap();
        observer.on_episode_end(2, &summary(EpisodeOutcome::Timeout, 300, 40)).unwrap();
        observer.on_episode_end(3, &summary(EpisodeOutcome::Exit, 6, 20)).unwrap();

        let metrics = observer.summary();
        assert_eq!(metrics.episodes, 4);
        assert_eq!(metrics.exits, 2);
        assert_eq!(metrics.deaths, 1);
        assert_eq!(metrics.timeouts, 1);
        assert_eq!(metrics.exit_rate, 0.5);
        assert_eq!(metrics.avg_actions, 80.0);
        assert_eq!(metrics.avg_hitpoints, 22.0);
        assert_eq!(metrics.avg_treasures_collected, 2.0);
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = MetricsObserver::new().summary();
        assert_eq!(metrics.episodes, 0);
        assert_eq!(metrics.exit_rate, 0.0);
        assert_eq!(metrics.avg_actions, 0.0);
    }

    #[test]
    fn test_progress_observer_without_start_is_noop() {
        let mut observer = ProgressObserver::new();
        observer
            .on_episode_end(0, &summary(EpisodeOutcome::Exit, 1, 40))
            .unwrap();
        observer.on_training_end().unwrap();
    }
}
