//! Newtype wrappers and small value types shared by the agents.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One of the four movement directions available to the hero.
///
/// The discriminant is the wire/table index: `Up = 0`, `Right = 1`,
/// `Down = 2`, `Left = 3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Up,
    Right,
    Down,
    Left,
}

impl Action {
    /// Number of discrete actions.
    pub const COUNT: usize = 4;

    /// All actions in index order.
    pub const ALL: [Action; Action::COUNT] = [Action::Up, Action::Right, Action::Down, Action::Left];

    /// Create an action from its index.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAction`] if the index is >= 4.
    pub fn from_index(index: usize) -> Result<Self, crate::Error> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(crate::Error::InvalidAction { index })
    }

    /// Get the table index of this action.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Draw an action uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::COUNT)]
    }

    /// Grid offset `(dx, dy)` for this direction, with `y` growing downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (0, -1),
            Action::Right => (1, 0),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
        }
    }
}

impl From<Action> for usize {
    fn from(action: Action) -> Self {
        action.index()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "UP",
            Action::Right => "RIGHT",
            Action::Down => "DOWN",
            Action::Left => "LEFT",
        };
        f.write_str(name)
    }
}

/// A tile coordinate on the dungeon grid.
///
/// Coordinates are signed so that a candidate move off the edge of the map can
/// still be represented and rejected by the legality check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring position in the given direction.
    pub fn step(self, action: Action) -> Self {
        let (dx, dy) = action.delta();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
