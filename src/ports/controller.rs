//! Controller port - the decision contract shared by every agent
//!
//! A controller looks at a game state and answers with one of the four
//! movement actions. The driver owns the live state, applies the answer and,
//! for learning agents, feeds the observed transition back separately.

use crate::{ports::GameState, types::Action};

/// Controller trait - unified decision interface for all agents
///
/// Implementations must always produce a valid [`Action`]. Agents that can
/// fail internally (for example during a tree search) are expected to absorb
/// the failure and answer with a safe default instead of stalling the driver
/// loop.
///
/// # Examples
///
/// ```no_run
/// use dungeon_agents::ports::{Controller, GameState};
///
/// fn run<S: GameState, C: Controller<S>>(controller: &mut C, state: &mut S, max_actions: usize) {
///     for _ in 0..max_actions {
///         if state.is_halted() {
///             break;
///         }
///         let action = controller.next_action(state);
///         state.apply_action(action);
///     }
/// }
/// ```
pub trait Controller<S: GameState> {
    /// Choose the next action for the given state.
    fn next_action(&mut self, state: &S) -> Action;

    /// Get the controller's label.
    ///
    /// Used for identification in logs and reports.
    fn name(&self) -> &str;

    /// Seed the controller's internal random number generator.
    ///
    /// Drivers call this when supplied with a deterministic seed so that
    /// runs are reproducible. Deterministic controllers can ignore it.
    ///
    /// # Default Implementation
    ///
    /// Does nothing.
    fn set_rng_seed(&mut self, _seed: u64) {}
}
