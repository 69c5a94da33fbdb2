//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

use crate::{Result, error::Error};

/// Weights of the heuristic used to score a rollout's final state.
///
/// The absolute terminal values and the shaping terms were tuned by hand and
/// are not on a common scale; treat them as knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RolloutWeights {
    /// Value of a state in which the hero died.
    pub death: f64,

    /// Value of a state in which the game halted with the hero alive.
    pub success: f64,

    /// Hit points treated as "full health" when normalising.
    pub hitpoint_scale: f64,

    /// Weight of the normalised remaining hit points.
    pub hitpoints: f64,

    /// Weight per collected treasure.
    pub treasure: f64,

    /// Weight per killed monster.
    pub monster: f64,

    /// Constant added to every non-terminal evaluation.
    pub exploration_bonus: f64,
}

impl Default for RolloutWeights {
    fn default() -> Self {
        Self {
            death: -10.0,
            success: 100.0,
            hitpoint_scale: 30.0,
            hitpoints: 5.0,
            treasure: 3.0,
            monster: 2.0,
            exploration_bonus: 0.5,
        }
    }
}

/// Configuration for the UCT search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// Iteration budget. The search loops while the iteration counter is
    /// `<= iterations`, i.e. `iterations + 1` select/expand/simulate/backprop
    /// passes per decision.
    pub iterations: u32,

    /// Exploration constant C of the UCB1 formula.
    pub exploration: f64,

    /// Maximum number of random steps per rollout.
    pub rollout_depth: u32,

    /// Random draws per rollout step before falling back to action 0.
    pub rollout_attempts: u32,

    /// Rollout evaluation weights.
    pub weights: RolloutWeights,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            exploration: 1.4,
            rollout_depth: 15,
            rollout_attempts: 10,
            weights: RolloutWeights::default(),
        }
    }
}

impl MctsConfig {
    /// Create a fast config for testing.
    pub fn for_testing() -> Self {
        Self {
            iterations: 30,
            rollout_depth: 5,
            ..Self::default()
        }
    }

    /// Builder pattern: set the iteration budget.
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    /// Builder pattern: set the rollout depth.
    pub fn with_rollout_depth(mut self, depth: u32) -> Self {
        self.rollout_depth = depth;
        self
    }

    /// Builder pattern: set the rollout evaluation weights.
    pub fn with_weights(mut self, weights: RolloutWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Check that the search terminates and UCB1 scores are well defined.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if `iterations` is `u32::MAX`
    /// (the pass counter would overflow) or `exploration` is not a positive
    /// number.
    pub fn validate(&self) -> Result<()> {
        if self.iterations == u32::MAX {
            return Err(Error::InvalidConfiguration {
                message: format!("iterations must be below {}", u32::MAX),
            });
        }
        if !self.exploration.is_finite() || self.exploration <= 0.0 {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "exploration constant {} must be a positive number",
                    self.exploration
                ),
            });
        }
        Ok(())
    }
}
