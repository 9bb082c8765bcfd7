//! Core game logic module - pure, deterministic, and testable
//!
//! This crate is the 2048 board engine. It has **no dependencies** on UI,
//! networking, or I/O, making it:
//!
//! - **Stateless**: every rule takes a [`Board`] and returns a new one
//! - **Deterministic**: randomness is an explicit `rand::Rng` argument, so a
//!   seeded generator replays a game exactly
//! - **Thread-safe**: boards are plain values; concurrent callers share nothing
//!
//! # Module Structure
//!
//! - [`board`]: square tile grid with rotation
//! - [`slide`]: the single-row slide-and-merge reducer
//! - [`rules`]: moves in all four directions, win and loss detection
//! - [`rng`]: random tile spawning (2 at 90%, 4 at 10%)
//! - [`game_state`]: one player's board, score and terminal flags
//! - [`error`]: engine errors
//!
//! # Game Rules
//!
//! - **Slide**: all tiles move as far as possible toward the chosen edge
//! - **Merge**: two equal neighbors combine into their sum, once per tile per move
//! - **Score**: each merge adds the merged tile's value
//! - **Spawn**: a move that changed the board adds one tile to a random empty cell
//! - **Win**: a 2048 tile is on the board (takes precedence over loss)
//! - **Loss**: no empty cell and no equal adjacent pair in any row or column
//!
//! # Example
//!
//! ```
//! use rand::{rngs::StdRng, SeedableRng};
//! use tui_2048_core::{apply_move_with_rng, Board};
//! use tui_2048_types::Direction;
//!
//! let board = Board::from_rows(vec![
//!     vec![2, 2, 0, 0],
//!     vec![0, 0, 0, 0],
//!     vec![0, 0, 0, 0],
//!     vec![0, 0, 0, 0],
//! ])
//! .unwrap();
//!
//! let mut rng = StdRng::seed_from_u64(7);
//! let result = apply_move_with_rng(&board, Direction::Left, &mut rng);
//!
//! assert!(result.moved);
//! assert_eq!(result.score_delta, 4);
//! assert_eq!(result.board.get(0, 0), Some(4));
//! assert_eq!(result.board.count_empty(), 14);
//! ```

pub mod board;
pub mod error;
pub mod game_state;
pub mod rng;
pub mod rules;
pub mod slide;

pub use tui_2048_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use error::EngineError;
pub use game_state::GameState;
pub use rng::{random_tile_value, spawn_random_tile};
pub use rules::{
    apply_move, apply_move_str, apply_move_with_rng, has_possible_moves, initialize_board,
    initialize_board_with_rng, is_won, slide, MoveResult,
};
pub use slide::{can_merge, slide_left};
