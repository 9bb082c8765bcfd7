//! Row reducer - slide and merge one line toward its left end
//!
//! Every direction is reduced to this single primitive by rotating the board
//! first (see [`crate::rules`]), so merge behavior cannot drift between
//! directions.

use crate::types::{Tile, EMPTY, MAX_TILE};

/// Whether two neighboring tiles combine. Pairs of [`MAX_TILE`] stay put since
/// their sum does not fit in a cell.
pub fn can_merge(a: Tile, b: Tile) -> bool {
    a != EMPTY && a == b && a < MAX_TILE
}

/// Slide all tiles in `row` to the left and merge equal neighbors once.
///
/// Returns the new row (same length, right-padded with empties) and the score
/// gained, which is the sum of every merged tile. A tile produced by a merge
/// never merges again within the same call.
pub fn slide_left(row: &[Tile]) -> (Vec<Tile>, u64) {
    let mut merged = Vec::with_capacity(row.len());
    let mut score = 0u64;

    let mut tiles = row.iter().copied().filter(|&v| v != EMPTY).peekable();
    while let Some(value) = tiles.next() {
        if tiles.peek().is_some_and(|&next| can_merge(value, next)) {
            tiles.next();
            let sum = value * 2;
            merged.push(sum);
            score += u64::from(sum);
        } else {
            merged.push(value);
        }
    }

    merged.resize(row.len(), EMPTY);
    (merged, score)
}
