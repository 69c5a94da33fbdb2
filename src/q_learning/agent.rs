//! Persona-conditioned Q-learning agent
//!
//! The agent owns its Q-table for its whole lifetime. Exploration is driven
//! entirely from outside through [`QLearningAgent::set_epsilon`]; the agent
//! has no schedule of its own.

use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tracing::{debug, warn};

use crate::{
    Error, Result,
    encoding::encode_state,
    identifiers::StateKey,
    ports::{Controller, GameState, PolicyRepository},
    q_learning::{
        q_table::QTable,
        serialization::{Checkpoint, SavedPolicy},
    },
    reward::{Persona, TransitionEvents},
    types::Action,
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control) with persona reward shaping
///
/// # Examples
///
/// ```
/// use dungeon_agents::{
///     dungeon::GridDungeon,
///     ports::Controller,
///     q_learning::QLearningAgent,
///     reward::Persona,
/// };
///
/// let dungeon = GridDungeon::from_ascii("#E.X#")?;
/// let mut agent = QLearningAgent::new(Persona::Runner).with_seed(7);
/// let action = agent.next_action(&dungeon);
/// assert!(action.index() < 4);
/// assert_eq!(agent.q_table().len(), 1);
/// # Ok::<(), dungeon_agents::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    persona: Persona,
    label: String,
    epsilon: f64,
    rng: StdRng,
}

impl QLearningAgent {
    /// Create a fresh agent that will learn with the given persona's rewards.
    pub fn new(persona: Persona) -> Self {
        Self {
            q_table: QTable::new(),
            persona,
            label: format!("QLearning_{persona}"),
            epsilon: 0.0,
            rng: build_rng(None),
        }
    }

    /// Create an agent meant to play a pretrained policy.
    ///
    /// The table starts empty until [`load_policy`](Self::load_policy)
    /// succeeds. The persona defaults to [`Persona::Baseline`].
    pub fn pretrained(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::new(Persona::Baseline)
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = build_rng(Some(seed));
        self
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Set the exploration rate used by subsequent decisions.
    pub fn set_epsilon(&mut self, epsilon: f64) {
        self.epsilon = epsilon;
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    /// Abstract state key of a game snapshot.
    pub fn state_key<S: GameState>(&self, state: &S) -> StateKey {
        encode_state(state)
    }

    /// ε-greedy action selection with uniform tie-breaking
    ///
    /// Unseen states get a zero entry and a uniformly random action. Among
    /// several actions sharing the maximal value, each is equally likely.
    pub fn select_action(&mut self, state: &StateKey) -> Action {
        if self.rng.random::<f64>() < self.epsilon {
            return Action::random(&mut self.rng);
        }

        if !self.q_table.contains(state) {
            self.q_table.entry(state.clone());
            return Action::random(&mut self.rng);
        }

        self.q_table
            .best_actions(state)
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Action::Up)
    }

    /// Shaped reward for one transition under this agent's persona.
    pub fn reward(&self, events: &TransitionEvents) -> f64 {
        self.persona.reward(events)
    }

    /// Apply one Q-learning update and return the new value.
    pub fn update(
        &mut self,
        state: StateKey,
        action: Action,
        reward: f64,
        next_state: &StateKey,
    ) -> f64 {
        self.q_table
            .q_learning_update(state, action, reward, next_state)
    }

    /// Persist the whole Q-table as one unit.
    pub fn save_policy<R: PolicyRepository + ?Sized>(&self, repo: &R, path: &Path) -> Result<()> {
        let policy = SavedPolicy::new(self.label.clone(), self.persona, self.q_table.clone());
        repo.save_policy(&policy, path)?;
        debug!(path = %path.display(), states = self.q_table.len(), "policy saved");
        Ok(())
    }

    /// Replace the Q-table with a persisted policy.
    ///
    /// On failure the current table is kept untouched.
    pub fn load_policy<R: PolicyRepository + ?Sized>(&mut self, repo: &R, path: &Path) -> Result<()> {
        let policy = repo
            .load_policy(path)
            .and_then(|policy| policy.validate().map(|()| policy))
            .inspect_err(|err| {
                warn!(path = %path.display(), error = %err, "failed to load policy; keeping current table");
            })?;
        self.q_table = policy.q_table;
        debug!(path = %path.display(), states = self.q_table.len(), "policy loaded");
        Ok(())
    }

    /// Persist the Q-table together with the next episode to train.
    pub fn save_checkpoint<R: PolicyRepository + ?Sized>(
        &self,
        repo: &R,
        path: &Path,
        next_episode: usize,
    ) -> Result<()> {
        let checkpoint = Checkpoint::new(self.persona, next_episode, self.q_table.clone());
        repo.save_checkpoint(&checkpoint, path)
    }

    /// Restore a checkpoint and return the episode at which training resumes.
    ///
    /// On failure the current table is kept untouched.
    ///
    /// # Errors
    ///
    /// Besides storage errors, a checkpoint written for a different persona
    /// is rejected with [`Error::InvalidConfiguration`].
    pub fn load_checkpoint<R: PolicyRepository + ?Sized>(
        &mut self,
        repo: &R,
        path: &Path,
    ) -> Result<usize> {
        let checkpoint = repo
            .load_checkpoint(path)
            .and_then(|checkpoint| checkpoint.validate().map(|()| checkpoint))
            .and_then(|checkpoint| {
                if checkpoint.persona == self.persona {
                    Ok(checkpoint)
                } else {
                    Err(Error::InvalidConfiguration {
                        message: format!(
                            "checkpoint was trained as {} but agent persona is {}",
                            checkpoint.persona, self.persona
                        ),
                    })
                }
            })
            .inspect_err(|err| {
                warn!(path = %path.display(), error = %err, "failed to load checkpoint; keeping current table");
            })?;
        self.q_table = checkpoint.q_table;
        debug!(
            path = %path.display(),
            next_episode = checkpoint.next_episode,
            states = self.q_table.len(),
            "checkpoint loaded"
        );
        Ok(checkpoint.next_episode)
    }
}

impl<S: GameState> Controller<S> for QLearningAgent {
    fn next_action(&mut self, state: &S) -> Action {
        let key = self.state_key(state);
        self.select_action(&key)
    }

    fn name(&self) -> &str {
        &self.label
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = build_rng(Some(seed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryRepository;

    fn key(s: &str) -> StateKey {
        StateKey::new(s)
    }

    #[test]
    fn test_labels() {
        assert_eq!(QLearningAgent::new(Persona::MonsterKiller).label(), "QLearning_MONSTER_KILLER");
        let pretrained = QLearningAgent::pretrained("RUNNER_map3");
        assert_eq!(pretrained.label(), "RUNNER_map3");
        assert_eq!(pretrained.persona(), Persona::Baseline);
        assert_eq!(pretrained.epsilon(), 0.0);
    }

    #[test]
    fn test_unseen_state_creates_single_zero_entry() {
        let mut agent = QLearningAgent::new(Persona::Baseline).with_seed(3);
        for i in 0..20 {
            let state = key(&format!("state-{i}"));
            let action = agent.select_action(&state);
            assert!(action.index() < Action::COUNT);
            assert_eq!(agent.q_table().len(), i + 1);
            assert_eq!(agent.q_table().get(&state), Some(&[0.0; 4]));
        }
    }

    #[test]
    fn test_ties_are_broken_uniformly() {
        let mut agent = QLearningAgent::new(Persona::Baseline).with_seed(11);
        let state = key("tied");
        agent.q_table.set(state.clone(), Action::Up, 2.0);
        agent.q_table.set(state.clone(), Action::Right, 2.0);
        agent.q_table.set(state.clone(), Action::Down, 1.0);

        let trials = 4000;
        let mut up = 0;
        for _ in 0..trials {
            match agent.select_action(&state) {
                Action::Up => up += 1,
                Action::Right => {}
                other => panic!("non-maximal action {other} selected"),
            }
        }
        let frequency = up as f64 / trials as f64;
        assert!((frequency - 0.5).abs() < 0.05, "frequency {frequency}");
    }

    #[test]
    fn test_full_exploration_reaches_every_action() {
        let mut agent = QLearningAgent::new(Persona::Baseline).with_seed(5);
        agent.set_epsilon(1.0);
        let state = key("s");
        agent.q_table.set(state.clone(), Action::Left, 10.0);

        let mut seen = [false; 4];
        for _ in 0..200 {
            seen[agent.select_action(&state).index()] = true;
        }
        assert_eq!(seen, [true; 4]);
    }

    #[test]
    fn test_greedy_picks_unique_maximum() {
        let mut agent = QLearningAgent::new(Persona::Baseline).with_seed(1);
        let state = key("s");
        agent.q_table.set(state.clone(), Action::Down, 0.3);
        for _ in 0..50 {
            assert_eq!(agent.select_action(&state), Action::Down);
        }
    }

    #[test]
    fn test_update_matches_bellman_step() {
        let mut agent = QLearningAgent::new(Persona::Runner);
        let value = agent.update(key("s"), Action::Up, 1.0, &key("t"));
        assert_eq!(value, 0.5);
    }

    #[test]
    fn test_failed_load_keeps_table() {
        let repo = InMemoryRepository::new();
        let mut agent = QLearningAgent::new(Persona::Baseline);
        agent.update(key("s"), Action::Left, 1.0, &key("t"));

        assert!(agent.load_policy(&repo, Path::new("missing")).is_err());
        assert!(agent.load_checkpoint(&repo, Path::new("missing")).is_err());
        assert_eq!(agent.q_table().value(&key("s"), Action::Left), 0.5);
    }

    #[test]
    fn test_checkpoint_persona_mismatch_rejected() {
        let repo = InMemoryRepository::new();
        let path = Path::new("ckpt");
        let runner = QLearningAgent::new(Persona::Runner);
        runner.save_checkpoint(&repo, path, 10).unwrap();

        let mut survivalist = QLearningAgent::new(Persona::Survivalist);
        assert!(matches!(
            survivalist.load_checkpoint(&repo, path),
            Err(Error::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_policy_roundtrip_into_pretrained_agent() {
        let repo = InMemoryRepository::new();
        let path = Path::new("TREASURE_COLLECTOR_map0");

        let mut trained = QLearningAgent::new(Persona::TreasureCollector);
        trained.update(key("a"), Action::Right, 1.0, &key("b"));
        trained.update(key("b"), Action::Down, -0.5, &key("a"));
        trained.save_policy(&repo, path).unwrap();

        let mut player = QLearningAgent::pretrained("TREASURE_COLLECTOR_map0");
        player.load_policy(&repo, path).unwrap();
        assert_eq!(player.q_table(), trained.q_table());
        assert_eq!(player.select_action(&key("a")), Action::Right);
    }
}
