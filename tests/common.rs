//! Common fixtures for the dungeon agents test suite.
//!
//! Layouts are small enough that random exploration reaches the exit quickly,
//! which keeps training-based tests fast.

#![allow(dead_code)]

use std::{fs, path::PathBuf};

use dungeon_agents::{dungeon::GridDungeon, ports::GameState, types::Action};

/// Straight corridor: the only way forward is RIGHT.
pub const CORRIDOR: &str = "\
######
#E..X#
######";

/// Open room with a monster next to the entrance and treasure on the way out.
pub const ROOM: &str = "\
#######
#Em..r#
#.#.#.#
#...p.#
#####X#
#######";

/// Monster blocks the short route; the detour through the lower row is safe.
pub const AMBUSH: &str = "\
#####
#Em.#
#..X#
#####";

/// Parse a fixture layout.
pub fn dungeon(layout: &str) -> GridDungeon {
    GridDungeon::from_ascii(layout).unwrap()
}

/// Write a fixture layout to `dir/name` and return the path.
pub fn write_layout(dir: &std::path::Path, name: &str, layout: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, layout).unwrap();
    path
}

/// Apply a fixed sequence of actions to a copy of `state`.
pub fn replay(state: &GridDungeon, actions: &[Action]) -> GridDungeon {
    let mut next = state.clone();
    for &action in actions {
        next.apply_action(action);
    }
    next
}
