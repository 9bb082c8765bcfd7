use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tui_2048::core::{apply_move_with_rng, has_possible_moves, Board, EngineError};
use tui_2048::types::{Direction, MAX_TILE};

fn random_board(rng: &mut StdRng, size: usize) -> Board {
    let rows = (0..size)
        .map(|_| {
            (0..size)
                .map(|_| match rng.gen_range(0..12u32) {
                    0 => 0,
                    k => 1 << k,
                })
                .collect()
        })
        .collect();
    Board::from_rows(rows).unwrap()
}

#[test]
fn four_quarter_turns_are_identity() {
    let mut rng = StdRng::seed_from_u64(4);
    for size in 1..=8 {
        let board = random_board(&mut rng, size);
        let mut turned = board.clone();
        for _ in 0..4 {
            turned = turned.rotated(1);
        }
        assert_eq!(turned, board, "size {size}");
    }
}

#[test]
fn quarter_turn_is_clockwise() {
    let board = Board::from_rows(vec![
        vec![2, 4, 8],
        vec![16, 32, 64],
        vec![128, 256, 512],
    ])
    .unwrap();
    assert_eq!(
        board.rotated(1).rows(),
        vec![
            vec![128, 16, 2],
            vec![256, 32, 4],
            vec![512, 64, 8],
        ]
    );
    assert_eq!(board.rotated(1).rotated(-1), board);
}

#[test]
fn rows_round_trip_through_wire_shape() {
    let rows = vec![vec![0, 2], vec![4, 0]];
    let board = Board::from_rows(rows.clone()).unwrap();
    assert_eq!(board.rows(), rows);
    assert_eq!(board.size(), 2);
}

#[test]
fn malformed_boards_are_rejected() {
    assert_eq!(Board::from_rows(vec![]), Err(EngineError::EmptyBoard));
    assert!(matches!(
        Board::from_rows(vec![vec![2, 2, 2], vec![2, 2, 2]]),
        Err(EngineError::NotSquare { .. })
    ));
    assert!(matches!(
        Board::from_rows(vec![vec![6]]),
        Err(EngineError::InvalidTile { value: 6, .. })
    ));
    assert!(matches!(
        Board::from_rows(vec![vec![1]]),
        Err(EngineError::InvalidTile { value: 1, .. })
    ));
}

#[test]
fn largest_tiles_never_overflow_on_merge() {
    let board = Board::from_rows(vec![vec![MAX_TILE, MAX_TILE], vec![0, 0]]).unwrap();
    let mut rng = StdRng::seed_from_u64(31);

    let result = apply_move_with_rng(&board, Direction::Left, &mut rng);
    assert!(!result.moved);
    assert_eq!(result.board, board);
    assert_eq!(result.score_delta, 0);

    // Falling down is a real move; the pair is kept intact.
    let result = apply_move_with_rng(&board, Direction::Down, &mut rng);
    assert!(result.moved);
    assert_eq!(result.board.get(1, 0), Some(MAX_TILE));
    assert_eq!(result.board.get(1, 1), Some(MAX_TILE));
    assert_eq!(result.score_delta, 0);
}

#[test]
fn full_board_of_largest_tiles_is_lost() {
    let board = Board::from_rows(vec![vec![MAX_TILE; 2]; 2]).unwrap();
    assert!(!has_possible_moves(&board));

    let mut rng = StdRng::seed_from_u64(1);
    let result = apply_move_with_rng(&board, Direction::Up, &mut rng);
    assert!(!result.moved);
    assert!(result.game_over);
}
