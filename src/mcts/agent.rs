//! UCT controller
//!
//! Builds a fresh search tree from a snapshot of the live game on every
//! decision, so nothing carries over between moves.

use rand::{SeedableRng, rngs::StdRng};
use tracing::{debug, warn};

use crate::{
    mcts::{config::MctsConfig, search::search},
    ports::{Controller, GameState},
    types::Action,
};

/// Label reported by the search agent.
pub const UCT_LABEL: &str = "UCTController";

/// Online planning agent using Monte Carlo Tree Search with UCB1 selection.
///
/// # Examples
///
/// ```
/// use dungeon_agents::{dungeon::GridDungeon, mcts::{MctsConfig, UctAgent}, ports::Controller};
///
/// let dungeon = GridDungeon::from_ascii("#####\n#E.X#\n#####")?;
/// let mut agent = UctAgent::new(MctsConfig::for_testing()).with_seed(7);
/// let action = agent.next_action(&dungeon);
/// assert_eq!(action.to_string(), "RIGHT");
/// # Ok::<(), dungeon_agents::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct UctAgent {
    config: MctsConfig,
    rng: StdRng,
}

impl UctAgent {
    pub fn new(config: MctsConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }
}

impl Default for UctAgent {
    fn default() -> Self {
        Self::new(MctsConfig::default())
    }
}

impl<S: GameState> Controller<S> for UctAgent {
    fn next_action(&mut self, state: &S) -> Action {
        match search(state, &self.config, &mut self.rng) {
            Ok(result) => {
                debug!(
                    action = %result.action,
                    value = result.value,
                    nodes = result.nodes,
                    iterations = result.iterations,
                    "uct decision"
                );
                result.action
            }
            Err(err) => {
                warn!(error = %err, "uct search failed, falling back to UP");
                Action::Up
            }
        }
    }

    fn name(&self) -> &str {
        UCT_LABEL
    }

    fn set_rng_seed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::GridDungeon;

    #[test]
    fn test_name() {
        let agent = UctAgent::default();
        assert_eq!(Controller::<GridDungeon>::name(&agent), "UCTController");
    }

    #[test]
    fn test_does_not_mutate_live_state() {
        let dungeon = GridDungeon::from_ascii("#####\n#Emr#\n#..X#\n#####").unwrap();
        let before = dungeon.clone();
        let mut agent = UctAgent::new(MctsConfig::for_testing()).with_seed(3);

        let _ = agent.next_action(&dungeon);
        assert_eq!(dungeon, before);
    }

    #[test]
    fn test_seeded_agents_agree() {
        let dungeon = GridDungeon::from_ascii("#######\n#E.m..#\n#.#.#.#\n#r...X#\n#######").unwrap();
        let mut a = UctAgent::new(MctsConfig::for_testing());
        let mut b = UctAgent::new(MctsConfig::for_testing());
        Controller::<GridDungeon>::set_rng_seed(&mut a, 99);
        Controller::<GridDungeon>::set_rng_seed(&mut b, 99);

        for _ in 0..5 {
            assert_eq!(a.next_action(&dungeon), b.next_action(&dungeon));
        }
    }
}
