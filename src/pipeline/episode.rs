//! Single-episode play

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Controller, GameState, Observer},
};

/// Default cap on actions for a play run.
pub const DEFAULT_MAX_ACTIONS: usize = 300;

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeOutcome {
    /// The hero reached the exit alive.
    Exit,
    /// The hero died.
    Died,
    /// The action budget ran out first.
    Timeout,
}

impl EpisodeOutcome {
    /// Classify a state at the end of an episode.
    pub fn of<S: GameState>(state: &S) -> Self {
        if !state.hero_alive() {
            EpisodeOutcome::Died
        } else if state.is_halted() {
            EpisodeOutcome::Exit
        } else {
            EpisodeOutcome::Timeout
        }
    }

    pub fn is_success(self) -> bool {
        self == EpisodeOutcome::Exit
    }
}

impl fmt::Display for EpisodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            EpisodeOutcome::Exit => "exit",
            EpisodeOutcome::Died => "died",
            EpisodeOutcome::Timeout => "timeout",
        };
        f.write_str(text)
    }
}

/// Final statistics of one episode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub actions: usize,
    pub outcome: EpisodeOutcome,
    pub hitpoints: i32,
    pub monsters_killed: usize,
    pub treasures_collected: usize,
}

impl EpisodeSummary {
    pub fn from_state<S: GameState>(actions: usize, state: &S) -> Self {
        Self {
            actions,
            outcome: EpisodeOutcome::of(state),
            hitpoints: state.hero_hitpoints(),
            monsters_killed: state.monsters_killed(),
            treasures_collected: state.treasures_collected(),
        }
    }
}

/// Drive `controller` on `state` until the game halts or `max_actions`
/// actions have been applied.
///
/// The state is advanced in place. Observers see the episode start, every
/// step (with zero reward) and the episode end.
///
/// # Examples
///
/// ```
/// use dungeon_agents::{
///     dungeon::GridDungeon,
///     mcts::{MctsConfig, UctAgent},
///     pipeline::{EpisodeOutcome, play_episode},
/// };
///
/// let mut dungeon = GridDungeon::from_ascii("#####\n#E.X#\n#####")?;
/// let mut agent = UctAgent::new(MctsConfig::for_testing()).with_seed(1);
/// let summary = play_episode(&mut agent, &mut dungeon, 300, 0, &mut [])?;
/// assert_eq!(summary.outcome, EpisodeOutcome::Exit);
/// assert_eq!(summary.actions, 2);
/// # Ok::<(), dungeon_agents::Error>(())
/// ```
pub fn play_episode<S, C>(
    controller: &mut C,
    state: &mut S,
    max_actions: usize,
    episode: usize,
    observers: &mut [&mut dyn Observer],
) -> Result<EpisodeSummary>
where
    S: GameState,
    C: Controller<S> + ?Sized,
{
    for observer in observers.iter_mut() {
        observer.on_episode_start(episode)?;
    }

    let mut actions = 0;
    while !state.is_halted() && actions < max_actions {
        let action = controller.next_action(state);
        state.apply_action(action);

        for observer in observers.iter_mut() {
            observer.on_step(episode, actions, action, 0.0)?;
        }
        actions += 1;
    }

    let summary = EpisodeSummary::from_state(actions, state);
    for observer in observers.iter_mut() {
        observer.on_episode_end(episode, &summary)?;
    }
    Ok(summary)
}
