//! State abstraction for tabular learning
//!
//! A game snapshot is reduced to a string key built from a row-major scan of
//! the grid plus a coarse hit-point bucket. The abstraction is lossy: it keeps
//! tile contents, the hero's position and the bucketed health, and drops
//! everything else (history, exact hit points).

use crate::{
    identifiers::StateKey,
    ports::GameState,
    types::Position,
};

const IMPASSABLE: char = '#';
const HERO: char = '@';
const MONSTER: char = 'm';
const TREASURE: char = 'r';
const POTION: char = 'p';
const EXIT: char = 'X';
const ENTRANCE: char = 'E';
const FLOOR: char = '.';

/// Map hit points to one of four health buckets.
///
/// | HP | Bucket |
/// |----|--------|
/// | ≤ 5 (including dead) | 0 |
/// | 6–14 | 1 |
/// | 15–30 | 2 |
/// | ≥ 31 | 3 |
pub fn health_bucket(hitpoints: i32) -> u8 {
    match hitpoints {
        i32::MIN..=5 => 0,
        6..=14 => 1,
        15..=30 => 2,
        _ => 3,
    }
}

/// Classify a single tile. The first matching predicate wins; exit is
/// checked before entrance so an overlapping tile reads as the exit.
fn tile_symbol<S: GameState>(state: &S, position: Position) -> char {
    if state.is_impassable(position) {
        IMPASSABLE
    } else if state.is_hero(position) {
        HERO
    } else if state.is_monster(position) {
        MONSTER
    } else if state.is_treasure(position) {
        TREASURE
    } else if state.is_potion(position) {
        POTION
    } else if state.is_exit(position) {
        EXIT
    } else if state.is_entrance(position) {
        ENTRANCE
    } else {
        FLOOR
    }
}

/// Encode a game snapshot into its canonical state key.
pub fn encode_state<S: GameState>(state: &S) -> StateKey {
    let (width, height) = (state.width(), state.height());
    let mut key = String::with_capacity(width * height + 5);

    for y in 0..height {
        for x in 0..width {
            key.push(tile_symbol(state, Position::new(x as i32, y as i32)));
        }
    }

    key.push_str("HP:");
    key.push_str(&health_bucket(state.hero_hitpoints()).to_string());
    StateKey::new(key)
}
