//! UCT search implementation.
//!
//! Every pass of the search loop:
//! 1. Selection: descend through fully expanded nodes by UCB1
//! 2. Expansion: add the first untried legal action as a new child
//! 3. Simulation: random playout from the new node
//! 4. Backpropagation: add the playout value along the path to the root

use rand::Rng;
use tracing::trace;

use crate::{
    Result,
    error::Error,
    mcts::{config::MctsConfig, node::NodeId, rollout, tree::SearchTree},
    ports::GameState,
    types::Action,
};

/// Result of a UCT search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Root action with the best average reward
    pub action: Action,

    /// Number of select/expand/simulate/backprop passes performed
    pub iterations: u32,

    /// Nodes allocated in the tree, root included
    pub nodes: usize,

    /// Average reward of the chosen child, 0.0 if the root had no children
    pub value: f64,
}

/// Search state for a single decision.
pub struct UctSearch<'a, S: GameState> {
    tree: SearchTree<S>,
    config: &'a MctsConfig,
}

impl<'a, S: GameState> UctSearch<'a, S> {
    /// Create a search rooted at a snapshot of `state`.
    pub fn new(state: &S, config: &'a MctsConfig) -> Self {
        Self {
            tree: SearchTree::new(state.clone()),
            config,
        }
    }

    /// Run the search for `iterations + 1` passes.
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> Result<SearchResult> {
        let mut iterations = 0;
        while iterations <= self.config.iterations {
            let leaf = self.tree_policy()?;
            let reward = rollout::simulate(&self.tree.get(leaf).state, self.config, rng);
            self.tree.backpropagate(leaf, reward);
            trace!(iteration = iterations, leaf = leaf.0, reward, "uct pass");
            iterations += 1;
        }

        let (action, value) = match self.tree.best_action() {
            Some(action) => {
                let value = self
                    .tree
                    .get(self.tree.root())
                    .children
                    .iter()
                    .map(|&child| self.tree.get(child))
                    .find(|node| node.action == Some(action))
                    .map_or(0.0, |node| node.mean_reward());
                (action, value)
            }
            None => (Action::Up, 0.0),
        };

        Ok(SearchResult {
            action,
            iterations,
            nodes: self.tree.len(),
            value,
        })
    }

    /// Borrow the tree built so far.
    pub fn tree(&self) -> &SearchTree<S> {
        &self.tree
    }

    /// Walk from the root to the node the next playout starts from.
    ///
    /// Expands at most one node. A fully expanded node without children
    /// (every action illegal) is returned as the leaf.
    fn tree_policy(&mut self) -> Result<NodeId> {
        let mut current = self.tree.root();

        while !self.tree.get(current).state.is_terminal() {
            if !self.tree.is_fully_expanded(current) {
                let action = self
                    .tree
                    .untried_action(current)
                    .ok_or(Error::UnexpandableNode {
                        node: current.index(),
                    })?;
                return Ok(self.tree.expand(current, action));
            }

            match self.tree.select_child(current, self.config.exploration) {
                Some(child) => current = child,
                None => break,
            }
        }

        Ok(current)
    }
}

/// Run a full UCT search from `state` and return the chosen action.
pub fn search<S: GameState, R: Rng + ?Sized>(
    state: &S,
    config: &MctsConfig,
    rng: &mut R,
) -> Result<SearchResult> {
    UctSearch::new(state, config).run(rng)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::dungeon::GridDungeon;

    #[test]
    fn test_runs_budget_plus_one_passes() {
        let dungeon = GridDungeon::from_ascii("#######\n#E...X#\n#######").unwrap();
        let config = MctsConfig::for_testing().with_iterations(20);
        let mut rng = StdRng::seed_from_u64(42);

        let result = search(&dungeon, &config, &mut rng).unwrap();
        assert_eq!(result.iterations, 21);
    }

    #[test]
    fn test_root_visits_match_passes() {
        let dungeon = GridDungeon::from_ascii("#####\n#...#\n#.E.#\n#..X#\n#####").unwrap();
        let config = MctsConfig::for_testing();
        let mut rng = StdRng::seed_from_u64(5);

        let mut search = UctSearch::new(&dungeon, &config);
        for _ in 0..=config.iterations {
            let leaf = search.tree_policy().unwrap();
            let reward = rollout::simulate(&search.tree.get(leaf).state, &config, &mut rng);
            search.tree.backpropagate(leaf, reward);
        }

        let tree = search.tree();
        let root = tree.get(tree.root());
        assert_eq!(root.visits, config.iterations + 1);
        let child_visits: u32 = root.children.iter().map(|&c| tree.get(c).visits).sum();
        assert_eq!(child_visits, root.visits);
    }

    #[test]
    fn test_single_legal_action_is_chosen() {
        let dungeon = GridDungeon::from_ascii("E.\n##").unwrap();
        let config = MctsConfig::for_testing();
        let mut rng = StdRng::seed_from_u64(9);

        let result = search(&dungeon, &config, &mut rng).unwrap();
        assert_eq!(result.action, Action::Right);
    }

    #[test]
    fn test_boxed_in_hero_defaults_to_up() {
        let dungeon = GridDungeon::from_ascii("###\n#E#\n###").unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        let result = search(&dungeon, &MctsConfig::for_testing(), &mut rng).unwrap();
        assert_eq!(result.action, Action::Up);
        assert_eq!(result.nodes, 1);
    }

    #[test]
    fn test_adjacent_exit_is_preferred() {
        let dungeon = GridDungeon::from_ascii("#####\n#.E.#\n#.#X#\n#####").unwrap();
        // Exit is diagonal; only RIGHT then DOWN reaches it in two moves.
        let dungeon = {
            let mut d = dungeon;
            d.apply_action(Action::Right);
            d
        };
        let mut rng = StdRng::seed_from_u64(11);

        let result = search(&dungeon, &MctsConfig::default(), &mut rng).unwrap();
        assert_eq!(result.action, Action::Down);
        assert_eq!(result.value, 100.0);
    }

    #[test]
    fn test_terminal_root_does_not_expand() {
        let mut dungeon = GridDungeon::from_ascii("EX").unwrap();
        dungeon.apply_action(Action::Right);
        let mut rng = StdRng::seed_from_u64(1);

        let result = search(&dungeon, &MctsConfig::for_testing(), &mut rng).unwrap();
        assert_eq!(result.nodes, 1);
        assert_eq!(result.action, Action::Up);
    }
}
