//! Game state module - one player's running game
//!
//! The board engine in [`crate::rules`] is stateless. `GameState` is the
//! mutable record a client or server keeps per player: the current board,
//! the cumulative score and the terminal flags of the last move.

use rand::Rng;

use crate::board::Board;
use crate::error::EngineError;
use crate::rules::{
    apply_move_with_rng, has_possible_moves, initialize_board_with_rng, is_won, MoveResult,
};
use crate::types::Direction;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    score: u64,
    won: bool,
    game_over: bool,
}

impl GameState {
    /// Start a new game on a `size x size` board with two random tiles.
    pub fn new<R: Rng + ?Sized>(size: usize, rng: &mut R) -> Result<Self, EngineError> {
        let board = initialize_board_with_rng(size, rng)?;
        Ok(Self::from_board(board))
    }

    /// Adopt an existing board with zero score.
    pub fn from_board(board: Board) -> Self {
        let won = is_won(&board);
        let game_over = !won && !has_possible_moves(&board);
        Self {
            board,
            score: 0,
            won,
            game_over,
        }
    }

    /// Apply one move, accumulating score and updating the terminal flags.
    ///
    /// Moves are still evaluated after a win; callers decide whether to keep
    /// accepting input once [`GameState::is_terminal`] is true.
    pub fn apply_move<R: Rng + ?Sized>(
        &mut self,
        direction: Direction,
        rng: &mut R,
    ) -> MoveResult {
        let result = apply_move_with_rng(&self.board, direction, rng);
        self.board = result.board.clone();
        self.score += result.score_delta;
        self.won = result.won;
        self.game_over = result.game_over;
        result
    }

    /// Throw the current game away and start over, possibly at a new size.
    pub fn restart<R: Rng + ?Sized>(
        &mut self,
        size: usize,
        rng: &mut R,
    ) -> Result<(), EngineError> {
        *self = Self::new(size, rng)?;
        Ok(())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn size(&self) -> usize {
        self.board.size()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Won or out of moves
    pub fn is_terminal(&self) -> bool {
        self.won || self.game_over
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_new_game() {
        let mut rng = StdRng::seed_from_u64(12345);
        let state = GameState::new(4, &mut rng).unwrap();
        assert_eq!(state.size(), 4);
        assert_eq!(state.score(), 0);
        assert_eq!(state.board().count_empty(), 14);
        assert!(!state.is_terminal());
    }

    #[test]
    fn test_score_accumulates() {
        let mut rng = StdRng::seed_from_u64(1);
        let board = Board::from_rows(vec![
            vec![2, 2, 4, 4],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ])
        .unwrap();
        let mut state = GameState::from_board(board);

        let first = state.apply_move(Direction::Left, &mut rng);
        assert_eq!(first.score_delta, 12);
        assert_eq!(state.score(), 12);
        assert_eq!(state.board().row(0)[..2], [4, 8]);

        let second = state.apply_move(Direction::Left, &mut rng);
        assert_eq!(state.score(), 12 + second.score_delta);
    }

    #[test]
    fn test_from_board_detects_terminal_states() {
        let lost = Board::from_rows(vec![vec![2, 4], vec![4, 2]]).unwrap();
        assert!(GameState::from_board(lost).game_over());

        let won = Board::from_rows(vec![vec![2048, 4], vec![4, 2]]).unwrap();
        let state = GameState::from_board(won);
        assert!(state.won());
        assert!(!state.game_over());
    }

    #[test]
    fn test_restart_resets_score_and_size() {
        let mut rng = StdRng::seed_from_u64(5);
        let board = Board::from_rows(vec![vec![2, 2], vec![0, 0]]).unwrap();
        let mut state = GameState::from_board(board);
        state.apply_move(Direction::Left, &mut rng);
        assert_eq!(state.score(), 4);

        state.restart(6, &mut rng).unwrap();
        assert_eq!(state.score(), 0);
        assert_eq!(state.size(), 6);
        assert_eq!(state.board().count_empty(), 34);
    }

    #[test]
    fn test_restart_invalid_size_keeps_game() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut state = GameState::new(4, &mut rng).unwrap();
        let before = state.clone();
        assert!(state.restart(0, &mut rng).is_err());
        assert_eq!(state, before);
    }
}
