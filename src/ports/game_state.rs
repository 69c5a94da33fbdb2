//! Game state port - the dungeon simulation as seen by the agents
//!
//! The agents never implement game rules themselves. Everything they know
//! about the dungeon comes through this trait: legality checks, the effect
//! of an action, terminal detection and the tile queries used for state
//! abstraction and rollout evaluation.

use crate::types::{Action, Position};

/// Snapshot of a turn-based dungeon game.
///
/// # Snapshots
///
/// `Clone` is the snapshot capability: a clone must be a fully independent
/// deep copy, so that applying actions to the clone never affects the
/// original. The search agent relies on this to keep one snapshot per tree
/// node while the live game state keeps moving.
///
/// # Examples
///
/// ```no_run
/// use dungeon_agents::{ports::GameState, types::Action};
///
/// fn advance<S: GameState>(state: &S, action: Action) -> S {
///     let mut next = state.clone();
///     next.apply_action(action);
///     next
/// }
/// ```
pub trait GameState: Clone {
    /// Grid width in tiles.
    fn width(&self) -> usize;

    /// Grid height in tiles.
    fn height(&self) -> usize;

    /// Whether the game has stopped (exit reached or hero dead).
    fn is_halted(&self) -> bool;

    /// Whether the controlled hero is still alive.
    fn hero_alive(&self) -> bool;

    /// Current hit points of the controlled hero.
    fn hero_hitpoints(&self) -> i32;

    /// Current position of the controlled hero.
    fn hero_position(&self) -> Position;

    /// Position the hero would move to when taking `action`.
    fn next_position(&self, action: Action) -> Position {
        self.hero_position().step(action)
    }

    /// Whether the hero may move onto `position`.
    fn is_valid_move(&self, position: Position) -> bool;

    /// Advance the game by one turn, mutating this snapshot in place.
    fn apply_action(&mut self, action: Action);

    /// Whether the tile blocks movement.
    fn is_impassable(&self, position: Position) -> bool;

    /// Whether the hero stands on the tile.
    fn is_hero(&self, position: Position) -> bool {
        self.hero_position() == position
    }

    /// Whether a live monster occupies the tile.
    fn is_monster(&self, position: Position) -> bool;

    /// Whether uncollected treasure lies on the tile.
    fn is_treasure(&self, position: Position) -> bool;

    /// Whether an unused potion lies on the tile.
    fn is_potion(&self, position: Position) -> bool;

    /// Whether the tile is the dungeon exit.
    fn is_exit(&self, position: Position) -> bool;

    /// Whether the tile is the dungeon entrance.
    fn is_entrance(&self, position: Position) -> bool;

    /// Number of monsters resolved (killed) so far.
    fn monsters_killed(&self) -> usize;

    /// Number of treasures resolved (collected) so far.
    fn treasures_collected(&self) -> usize;

    /// Whether the game is over from the agent's point of view.
    fn is_terminal(&self) -> bool {
        self.is_halted() || !self.hero_alive()
    }

    /// Whether `action` leads to a legal tile from the current position.
    fn is_legal(&self, action: Action) -> bool {
        self.is_valid_move(self.next_position(action))
    }
}
