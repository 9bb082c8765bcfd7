use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tui_2048::core::{apply_move_with_rng, has_possible_moves, slide_left, Board, GameState};
use tui_2048::types::Direction;

fn sample_board() -> Board {
    Board::from_rows(vec![
        vec![2, 2, 4, 8],
        vec![0, 4, 4, 0],
        vec![16, 0, 16, 2],
        vec![2, 2, 2, 2],
    ])
    .unwrap()
}

fn bench_slide_left(c: &mut Criterion) {
    let row: [u32; 8] = [2, 2, 0, 4, 4, 8, 0, 8];
    c.bench_function("slide_left_8", |b| b.iter(|| slide_left(black_box(&row))));
}

fn bench_apply_move(c: &mut Criterion) {
    let board = sample_board();
    let mut rng = StdRng::seed_from_u64(12345);

    c.bench_function("apply_move_all_directions", |b| {
        b.iter(|| {
            for direction in Direction::ALL {
                black_box(apply_move_with_rng(black_box(&board), direction, &mut rng));
            }
        })
    });
}

fn bench_has_possible_moves(c: &mut Criterion) {
    // Worst case: full board with no pair, every neighbor is inspected.
    let board = Board::from_rows(vec![
        vec![2, 4, 2, 4],
        vec![4, 2, 4, 2],
        vec![2, 4, 2, 4],
        vec![4, 2, 4, 2],
    ])
    .unwrap();
    c.bench_function("has_possible_moves_locked", |b| {
        b.iter(|| has_possible_moves(black_box(&board)))
    });
}

fn bench_full_game(c: &mut Criterion) {
    c.bench_function("play_until_terminal", |b| {
        b.iter(|| {
            let mut rng = StdRng::seed_from_u64(7);
            let mut game = GameState::new(4, &mut rng).unwrap();
            let mut steps = 0;
            while !game.is_terminal() && steps < 5_000 {
                let direction = Direction::ALL[steps % 4];
                game.apply_move(direction, &mut rng);
                steps += 1;
            }
            black_box(game.score())
        })
    });
}

criterion_group!(
    benches,
    bench_slide_left,
    bench_apply_move,
    bench_has_possible_moves,
    bench_full_game
);
criterion_main!(benches);
