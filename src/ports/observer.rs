//! Observer port - abstraction for training observation and data collection
//!
//! This port defines the interface for observing training and play events,
//! allowing progress reporting and metrics without coupling the driver loops
//! to a specific output.

use crate::{Result, pipeline::EpisodeSummary, types::Action};

/// Observer trait for monitoring training and play
///
/// # Event Sequence
///
/// The observer methods are called in the following order:
/// 1. `on_training_start(start_episode, total_episodes)` - Once at the beginning
/// 2. For each episode:
///    - `on_episode_start(episode)`
///    - `on_step(...)` - For each action taken in the episode
///    - `on_episode_end(episode, summary)`
///    - `on_checkpoint(next_episode)` - When a checkpoint has been written
/// 3. `on_training_end()` - Once at the end
///
/// Single debug runs only emit the per-episode events.
///
/// # Examples
///
/// ```no_run
/// use dungeon_agents::{pipeline::EpisodeSummary, ports::Observer};
///
/// struct ExitCounter {
///     exits: usize,
/// }
///
/// impl Observer for ExitCounter {
///     fn on_episode_end(
///         &mut self,
///         _episode: usize,
///         summary: &EpisodeSummary,
///     ) -> dungeon_agents::Result<()> {
///         if summary.outcome.is_success() {
///             self.exits += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer {
    /// Called when training starts.
    ///
    /// `start_episode` is non-zero when training resumes from a checkpoint.
    fn on_training_start(&mut self, _start_episode: usize, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called when an episode starts.
    fn on_episode_start(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each action has been applied.
    ///
    /// `reward` is the shaped reward fed to a learning agent, or zero when
    /// nothing is learning.
    fn on_step(&mut self, _episode: usize, _step: usize, _action: Action, _reward: f64) -> Result<()> {
        Ok(())
    }

    /// Called when an episode ends.
    fn on_episode_end(&mut self, _episode: usize, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Called after a checkpoint has been persisted.
    fn on_checkpoint(&mut self, _next_episode: usize) -> Result<()> {
        Ok(())
    }

    /// Called when training completes.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
