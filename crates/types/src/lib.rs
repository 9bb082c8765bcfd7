//! Shared types module - plain data and constants
//!
//! This crate defines the vocabulary used by every other crate in the
//! workspace: tile values, move directions, board-size limits, and the
//! spawn/win constants of the 2048 rules. It has no external dependencies, so
//! it is usable from the engine, the terminal client, and the JSON server alike.
//!
//! # Board
//!
//! A board is a square `N x N` grid of [`Tile`] values in row-major order.
//! `0` marks an empty cell; every other value is a power of two `>= 2`.
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_BOARD_SIZE` | 2 | Smallest playable board |
//! | `DEFAULT_BOARD_SIZE` | 4 | Classic 4x4 game |
//! | `MAX_BOARD_SIZE` | 16 | Largest board the engine accepts |
//! | `MAX_PLAYER_BOARD_SIZE` | 10 | Largest size offered to players |
//! | `WIN_TILE` | 2048 | Reaching this tile wins the game |
//!
//! # Spawning
//!
//! After every move that changes the board a new tile appears in a uniformly
//! random empty cell: `2` nine times out of ten, `4` otherwise.
//!
//! # Examples
//!
//! ```
//! use tui_2048_types::{Direction, WIN_TILE};
//!
//! let dir: Direction = "up".parse().unwrap();
//! assert_eq!(dir, Direction::Up);
//! assert_eq!(dir.as_str(), "up");
//! assert!("sideways".parse::<Direction>().is_err());
//! assert_eq!(WIN_TILE, 2048);
//! ```

use std::fmt;
use std::str::FromStr;

/// Value stored in one board cell (0 = empty).
pub type Tile = u32;

/// Empty cell marker.
pub const EMPTY: Tile = 0;

/// Board size limits
pub const MIN_BOARD_SIZE: usize = 2;
pub const DEFAULT_BOARD_SIZE: usize = 4;
pub const MAX_BOARD_SIZE: usize = 16;

/// Sizes offered to players (matches the web size picker).
pub const MIN_PLAYER_BOARD_SIZE: usize = 3;
pub const MAX_PLAYER_BOARD_SIZE: usize = 10;

/// Largest tile a `u32` cell can hold; two of these never merge.
pub const MAX_TILE: Tile = 1 << 31;

/// Tile that ends the game with a win.
pub const WIN_TILE: Tile = 2048;

/// Spawned tile values and odds (out of `SPAWN_ODDS_DENOMINATOR`).
pub const SPAWN_LOW_TILE: Tile = 2;
pub const SPAWN_HIGH_TILE: Tile = 4;
pub const SPAWN_HIGH_ODDS: u32 = 1;
pub const SPAWN_ODDS_DENOMINATOR: u32 = 10;

/// Number of tiles placed on a freshly initialized board.
pub const INITIAL_TILES: usize = 2;

/// One of the four player moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All directions, in the order the engine tries them.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Convert to the lowercase wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Parse direction from string (case-insensitive, surrounding whitespace ignored)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            _ => Err(ParseDirectionError {
                input: s.to_string(),
            }),
        }
    }
}

/// Returned when a string names none of the four directions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDirectionError {
    input: String,
}

impl fmt::Display for ParseDirectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown direction {:?} (expected left, right, up or down)",
            self.input
        )
    }
}

impl std::error::Error for ParseDirectionError {}

/// Check whether `value` may appear on a board (0 or a power of two >= 2).
pub fn is_valid_tile(value: Tile) -> bool {
    value == EMPTY || (value >= 2 && value.is_power_of_two())
}

/// Exponent of a tile (`log2`), 0 for empty cells.
pub fn tile_rank(value: Tile) -> u32 {
    if value == EMPTY {
        0
    } else {
        value.trailing_zeros()
    }
}
