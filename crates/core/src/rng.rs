//! RNG module - random tile spawning
//!
//! Randomness is passed in explicitly as any [`rand::Rng`], so callers choose
//! the source: the thread-local generator in production, a seeded
//! [`rand::rngs::StdRng`] in tests and replays.

use rand::Rng;

use crate::board::Board;
use crate::types::{
    Tile, SPAWN_HIGH_ODDS, SPAWN_HIGH_TILE, SPAWN_LOW_TILE, SPAWN_ODDS_DENOMINATOR,
};

/// Draw the value of a new tile: 2 with probability 0.9, 4 with probability 0.1.
pub fn random_tile_value<R: Rng + ?Sized>(rng: &mut R) -> Tile {
    if rng.gen_range(0..SPAWN_ODDS_DENOMINATOR) < SPAWN_HIGH_ODDS {
        SPAWN_HIGH_TILE
    } else {
        SPAWN_LOW_TILE
    }
}

/// Place one random tile into a uniformly chosen empty cell.
///
/// Returns an unchanged copy when the board has no empty cell.
pub fn spawn_random_tile<R: Rng + ?Sized>(board: &Board, rng: &mut R) -> Board {
    let empty = board.empty_cells();
    if empty.is_empty() {
        return board.clone();
    }
    let (row, col) = empty[rng.gen_range(0..empty.len())];
    board.with_tile(row, col, random_tile_value(rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_rng_deterministic() {
        let board = Board::empty(4).unwrap();
        let mut rng1 = StdRng::seed_from_u64(12345);
        let mut rng2 = StdRng::seed_from_u64(12345);

        // Same seed should produce same sequence
        for _ in 0..100 {
            assert_eq!(
                spawn_random_tile(&board, &mut rng1),
                spawn_random_tile(&board, &mut rng2)
            );
        }
    }

    #[test]
    fn test_spawn_fills_exactly_one_empty_cell() {
        let mut rng = StdRng::seed_from_u64(7);
        let board = Board::from_rows(vec![vec![2, 0], vec![0, 4]]).unwrap();
        let next = spawn_random_tile(&board, &mut rng);

        assert_eq!(next.count_empty(), 1);
        assert_eq!(next.get(0, 0), Some(2));
        assert_eq!(next.get(1, 1), Some(4));
        // Source board untouched
        assert_eq!(board.count_empty(), 2);
    }

    #[test]
    fn test_spawn_on_full_board_is_noop() {
        let mut rng = StdRng::seed_from_u64(1);
        let board = Board::from_rows(vec![vec![2, 4], vec![8, 16]]).unwrap();
        assert_eq!(spawn_random_tile(&board, &mut rng), board);
    }

    #[test]
    fn test_repeated_spawns_fill_board() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut board = Board::empty(4).unwrap();
        for _ in 0..16 {
            board = spawn_random_tile(&board, &mut rng);
        }
        assert_eq!(board.count_empty(), 0);
        assert!(board
            .cells()
            .iter()
            .all(|&v| v == SPAWN_LOW_TILE || v == SPAWN_HIGH_TILE));
    }

    #[test]
    fn test_spawn_value_distribution() {
        let mut rng = StdRng::seed_from_u64(2048);
        let trials = 100_000;
        let fours = (0..trials)
            .filter(|_| random_tile_value(&mut rng) == SPAWN_HIGH_TILE)
            .count();
        let ratio = fours as f64 / trials as f64;
        assert!((0.09..0.11).contains(&ratio), "4-tile ratio was {}", ratio);
    }
}
