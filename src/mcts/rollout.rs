//! Random playouts and the heuristic that scores where they end.

use rand::Rng;

use crate::{
    mcts::config::{MctsConfig, RolloutWeights},
    ports::GameState,
    types::Action,
};

/// Draw up to `attempts` uniformly random actions and return the first legal
/// one. Falls back to [`Action::Up`] (index 0), even if it is illegal.
pub fn random_legal_action<S: GameState, R: Rng + ?Sized>(
    state: &S,
    attempts: u32,
    rng: &mut R,
) -> Action {
    (0..attempts)
        .map(|_| Action::random(rng))
        .find(|&action| state.is_legal(action))
        .unwrap_or(Action::Up)
}

/// Score a state reached at the end of a rollout.
///
/// Death and a halted game are fixed values; anything else is shaped by the
/// remaining hit points and the number of resolved treasures and monsters.
pub fn evaluate<S: GameState>(state: &S, weights: &RolloutWeights) -> f64 {
    if !state.hero_alive() {
        return weights.death;
    }
    if state.is_halted() {
        return weights.success;
    }

    let health = f64::from(state.hero_hitpoints()) / weights.hitpoint_scale * weights.hitpoints;
    health
        + state.treasures_collected() as f64 * weights.treasure
        + state.monsters_killed() as f64 * weights.monster
        + weights.exploration_bonus
}

/// Play random legal moves on a private copy of `state` until it is terminal
/// or the depth limit is hit, then evaluate the result.
pub fn simulate<S: GameState, R: Rng + ?Sized>(
    state: &S,
    config: &MctsConfig,
    rng: &mut R,
) -> f64 {
    let mut playout = state.clone();
    let mut steps = 0;

    while !playout.is_terminal() && steps < config.rollout_depth {
        let action = random_legal_action(&playout, config.rollout_attempts, rng);
        playout.apply_action(action);
        steps += 1;
    }

    evaluate(&playout, &config.weights)
}
