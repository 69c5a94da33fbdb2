//! Reference grid dungeon
//!
//! A small deterministic implementation of [`GameState`] used to drive the
//! agents end-to-end from the command line and in tests. The rules are kept
//! minimal: walls block movement, stepping onto a monster kills it at a fixed
//! hit-point cost, potions heal, treasure is collected, and the game halts
//! when the hero reaches the exit or dies. A move towards a blocked tile
//! leaves the hero in place but still consumes the turn.
//!
//! Layouts are plain ASCII, one row per line:
//!
//! | Char | Tile |
//! |------|------|
//! | `#` | wall |
//! | `.` | floor |
//! | `E` | entrance (hero start) |
//! | `X` | exit |
//! | `m` | monster |
//! | `r` | treasure |
//! | `p` | potion |

use crate::{
    Error, Result,
    ports::GameState,
    types::{Action, Position},
};

/// Hit points the hero starts with.
pub const HERO_MAX_HITPOINTS: i32 = 40;
/// Hit points lost when fighting a monster.
pub const MONSTER_DAMAGE: i32 = 8;
/// Hit points restored by a potion.
pub const POTION_HEAL: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Wall,
    Floor,
    Entrance,
    Exit,
    Monster,
    Treasure,
    Potion,
}

impl Tile {
    fn parse(character: char, row: usize, column: usize) -> Result<Self> {
        match character {
            '#' => Ok(Tile::Wall),
            '.' => Ok(Tile::Floor),
            'E' => Ok(Tile::Entrance),
            'X' => Ok(Tile::Exit),
            'm' => Ok(Tile::Monster),
            'r' => Ok(Tile::Treasure),
            'p' => Ok(Tile::Potion),
            _ => Err(Error::InvalidTile {
                character,
                row,
                column,
            }),
        }
    }
}

/// A rectangular dungeon with a single hero.
#[derive(Debug, Clone, PartialEq)]
pub struct GridDungeon {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    hero: Position,
    hitpoints: i32,
    dead_monsters: Vec<bool>,
    collected_treasures: Vec<bool>,
    exited: bool,
}

impl GridDungeon {
    /// Parse a dungeon from its ASCII layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTile`] for unknown characters and
    /// [`Error::InvalidLayout`] for ragged rows, an empty layout, or a
    /// missing or duplicated entrance.
    pub fn from_ascii(layout: &str) -> Result<Self> {
        let rows: Vec<&str> = layout
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect();

        let width = rows.first().map(|row| row.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(Error::InvalidLayout {
                message: "layout has no tiles".to_string(),
            });
        }

        let mut tiles = Vec::with_capacity(width * rows.len());
        let mut entrance = None;

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(Error::InvalidLayout {
                    message: format!("row {y} has a different width than row 0 ({width})"),
                });
            }
            for (x, character) in row.chars().enumerate() {
                let tile = Tile::parse(character, y, x)?;
                if tile == Tile::Entrance {
                    if entrance.is_some() {
                        return Err(Error::InvalidLayout {
                            message: "more than one entrance".to_string(),
                        });
                    }
                    entrance = Some(Position::new(x as i32, y as i32));
                }
                tiles.push(tile);
            }
        }

        let hero = entrance.ok_or_else(|| Error::InvalidLayout {
            message: "no entrance ('E') found".to_string(),
        })?;

        let cells = tiles.len();
        Ok(Self {
            width,
            height: rows.len(),
            tiles,
            hero,
            hitpoints: HERO_MAX_HITPOINTS,
            dead_monsters: vec![false; cells],
            collected_treasures: vec![false; cells],
            exited: false,
        })
    }

    /// Override the hero's hit points.
    pub fn with_hero_hitpoints(mut self, hitpoints: i32) -> Self {
        self.hitpoints = hitpoints;
        self
    }

    /// Tile at a position, or `None` when off the map.
    pub fn tile(&self, position: Position) -> Option<Tile> {
        self.index(position).map(|index| self.tiles[index])
    }

    fn index(&self, position: Position) -> Option<usize> {
        if position.x < 0 || position.y < 0 {
            return None;
        }
        let (x, y) = (position.x as usize, position.y as usize);
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    fn tile_is(&self, position: Position, tile: Tile) -> bool {
        self.tile(position) == Some(tile)
    }
}

impl GameState for GridDungeon {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn is_halted(&self) -> bool {
        self.exited || self.hitpoints <= 0
    }

    fn hero_alive(&self) -> bool {
        self.hitpoints > 0
    }

    fn hero_hitpoints(&self) -> i32 {
        self.hitpoints
    }

    fn hero_position(&self) -> Position {
        self.hero
    }

    fn is_valid_move(&self, position: Position) -> bool {
        matches!(self.tile(position), Some(tile) if tile != Tile::Wall)
    }

    fn apply_action(&mut self, action: Action) {
        if self.is_halted() {
            return;
        }

        let target = self.next_position(action);
        let Some(index) = self.index(target) else {
            return;
        };

        match self.tiles[index] {
            Tile::Wall => return,
            Tile::Monster => {
                self.hitpoints -= MONSTER_DAMAGE;
                self.dead_monsters[index] = true;
                self.tiles[index] = Tile::Floor;
            }
            Tile::Treasure => {
                self.collected_treasures[index] = true;
                self.tiles[index] = Tile::Floor;
            }
            Tile::Potion => {
                self.hitpoints = (self.hitpoints + POTION_HEAL).min(HERO_MAX_HITPOINTS);
                self.tiles[index] = Tile::Floor;
            }
            Tile::Exit => self.exited = true,
            Tile::Floor | Tile::Entrance => {}
        }

        self.hero = target;
    }

    fn is_impassable(&self, position: Position) -> bool {
        !self.is_valid_move(position)
    }

    fn is_monster(&self, position: Position) -> bool {
        self.tile_is(position, Tile::Monster)
    }

    fn is_treasure(&self, position: Position) -> bool {
        self.tile_is(position, Tile::Treasure)
    }

    fn is_potion(&self, position: Position) -> bool {
        self.tile_is(position, Tile::Potion)
    }

    fn is_exit(&self, position: Position) -> bool {
        self.tile_is(position, Tile::Exit)
    }

    fn is_entrance(&self, position: Position) -> bool {
        self.tile_is(position, Tile::Entrance)
    }

    fn monsters_killed(&self) -> usize {
        self.dead_monsters.iter().filter(|dead| **dead).count()
    }

    fn treasures_collected(&self) -> usize {
        self.collected_treasures.iter().filter(|taken| **taken).count()
    }
}
