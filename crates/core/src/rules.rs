//! Rules module - moves, win and loss
//!
//! A move in any direction is expressed as "rotate into left orientation,
//! slide every row left, rotate back":
//!
//! | Direction | Rotate in (clockwise) | Rotate back |
//! |-----------|-----------------------|-------------|
//! | left      | 0                     | 0           |
//! | up        | 3                     | 1           |
//! | right     | 2                     | 2           |
//! | down      | 1                     | 3           |
//!
//! A clockwise quarter turn carries the top edge to the right edge, so "up"
//! needs three of them (one counter-clockwise turn) to face left.
//!
//! After the slide, a board that changed receives one random tile, then the
//! win and game-over flags are evaluated on the final board. Win takes
//! precedence: a board holding [`WIN_TILE`] never reports game over.

use rand::Rng;

use crate::board::Board;
use crate::error::EngineError;
use crate::rng::spawn_random_tile;
use crate::slide::{can_merge, slide_left};
use crate::types::{
    Direction, EMPTY, INITIAL_TILES, MAX_BOARD_SIZE, MIN_BOARD_SIZE, WIN_TILE,
};

/// Outcome of one move attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveResult {
    /// Board after sliding, merging and (if moved) spawning.
    pub board: Board,
    /// Sum of all tiles produced by merges in this move.
    pub score_delta: u64,
    /// Whether sliding changed any cell.
    pub moved: bool,
    pub won: bool,
    pub game_over: bool,
}

/// Quarter turns that bring `direction` into left orientation.
fn rotations(direction: Direction) -> i32 {
    match direction {
        Direction::Left => 0,
        Direction::Up => 3,
        Direction::Right => 2,
        Direction::Down => 1,
    }
}

/// Slide and merge the whole board toward `direction`, without spawning.
pub fn slide(board: &Board, direction: Direction) -> (Board, u64) {
    let turns = rotations(direction);
    let working = board.rotated(turns);

    let mut score = 0u64;
    let mut rows = Vec::with_capacity(working.size());
    for row in working.iter_rows() {
        let (reduced, delta) = slide_left(row);
        score += delta;
        rows.push(reduced);
    }
    let reduced = Board::from_reduced_rows(working.size(), rows);

    (reduced.rotated(4 - turns), score)
}

/// Apply one move using the supplied randomness for the spawned tile.
pub fn apply_move_with_rng<R: Rng + ?Sized>(
    board: &Board,
    direction: Direction,
    rng: &mut R,
) -> MoveResult {
    let (slid, score_delta) = slide(board, direction);
    let moved = slid != *board;
    let board = if moved {
        spawn_random_tile(&slid, rng)
    } else {
        slid
    };

    let won = is_won(&board);
    let game_over = !won && !has_possible_moves(&board);

    MoveResult {
        board,
        score_delta,
        moved,
        won,
        game_over,
    }
}

/// Apply one move using the thread-local generator.
pub fn apply_move(board: &Board, direction: Direction) -> MoveResult {
    apply_move_with_rng(board, direction, &mut rand::thread_rng())
}

/// Parse `direction` and apply the move; unknown directions are rejected.
pub fn apply_move_str(board: &Board, direction: &str) -> Result<MoveResult, EngineError> {
    let direction: Direction = direction.parse()?;
    Ok(apply_move(board, direction))
}

/// Whether any move is still possible: an empty cell, or two horizontally or
/// vertically adjacent tiles that [`can_merge`].
pub fn has_possible_moves(board: &Board) -> bool {
    if board.cells().contains(&EMPTY) {
        return true;
    }

    let n = board.size();
    let cells = board.cells();
    for row in 0..n {
        for col in 0..n {
            let value = cells[row * n + col];
            if col + 1 < n && can_merge(value, cells[row * n + col + 1]) {
                return true;
            }
            if row + 1 < n && can_merge(value, cells[(row + 1) * n + col]) {
                return true;
            }
        }
    }
    false
}

/// Whether the winning tile is on the board.
pub fn is_won(board: &Board) -> bool {
    board.contains(WIN_TILE)
}

/// New `size x size` board holding two random tiles.
pub fn initialize_board_with_rng<R: Rng + ?Sized>(
    size: usize,
    rng: &mut R,
) -> Result<Board, EngineError> {
    if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&size) {
        return Err(EngineError::InvalidSize {
            size,
            min: MIN_BOARD_SIZE,
            max: MAX_BOARD_SIZE,
        });
    }

    let mut board = Board::empty(size)?;
    for _ in 0..INITIAL_TILES {
        board = spawn_random_tile(&board, rng);
    }
    Ok(board)
}

/// New board using the thread-local generator.
pub fn initialize_board(size: usize) -> Result<Board, EngineError> {
    initialize_board_with_rng(size, &mut rand::thread_rng())
}
