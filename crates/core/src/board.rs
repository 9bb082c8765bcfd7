//! Board module - the square tile grid
//!
//! The board is an `N x N` grid of tile values stored in a flat, row-major
//! vector (`row * size + col`). Boards are value objects: every engine
//! operation returns a fresh board and never mutates its input.
//!
//! Coordinates: `(row, col)` where row 0 is the top edge and col 0 the left edge.

use crate::error::EngineError;
use crate::types::{is_valid_tile, Tile, EMPTY};

/// Square grid of tiles (0 = empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    /// Flat array of cells, row-major order (row * size + col)
    cells: Vec<Tile>,
}

impl Board {
    /// Create an empty `size x size` board.
    pub fn empty(size: usize) -> Result<Self, EngineError> {
        if size == 0 {
            return Err(EngineError::EmptyBoard);
        }
        Ok(Self {
            size,
            cells: vec![EMPTY; size * size],
        })
    }

    /// Build a board from rows, failing fast on shape or tile violations.
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Result<Self, EngineError> {
        let size = rows.len();
        if size == 0 {
            return Err(EngineError::EmptyBoard);
        }

        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != size {
                return Err(EngineError::NotSquare {
                    row,
                    len: values.len(),
                    size,
                });
            }
            for (col, &value) in values.iter().enumerate() {
                if !is_valid_tile(value) {
                    return Err(EngineError::InvalidTile { row, col, value });
                }
            }
            cells.extend(values);
        }

        Ok(Self { size, cells })
    }

    #[inline(always)]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(row * self.size + col)
    }

    /// Side length of the board
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get tile at (row, col), `None` if out of bounds
    pub fn get(&self, row: usize, col: usize) -> Option<Tile> {
        self.index(row, col).map(|idx| self.cells[idx])
    }

    /// Return a copy of this board with one cell replaced.
    ///
    /// Out-of-bounds coordinates yield an unchanged copy.
    pub fn with_tile(&self, row: usize, col: usize, value: Tile) -> Self {
        let mut next = self.clone();
        if let Some(idx) = next.index(row, col) {
            next.cells[idx] = value;
        }
        next
    }

    /// Borrow one row as a slice
    pub fn row(&self, row: usize) -> &[Tile] {
        let start = row * self.size;
        &self.cells[start..start + self.size]
    }

    /// Iterate over rows as slices, top to bottom
    pub fn iter_rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.cells.chunks(self.size)
    }

    /// Copy out as a 2-D vector (the wire representation)
    pub fn rows(&self) -> Vec<Vec<Tile>> {
        self.iter_rows().map(|r| r.to_vec()).collect()
    }

    /// Flat row-major cells
    pub fn cells(&self) -> &[Tile] {
        &self.cells
    }

    /// Coordinates of every empty cell, in row-major order
    pub fn empty_cells(&self) -> Vec<(usize, usize)> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &v)| v == EMPTY)
            .map(|(i, _)| (i / self.size, i % self.size))
            .collect()
    }

    pub fn count_empty(&self) -> usize {
        self.cells.iter().filter(|&&v| v == EMPTY).count()
    }

    pub fn contains(&self, tile: Tile) -> bool {
        self.cells.contains(&tile)
    }

    /// Rotate 90 degrees clockwise `times` times.
    ///
    /// `times` may be negative and is normalized into `0..4` first. Each quarter
    /// turn moves cell `(i, j)` to `(j, size - 1 - i)`.
    pub fn rotated(&self, times: i32) -> Self {
        let mut rotated = self.clone();
        for _ in 0..times.rem_euclid(4) {
            rotated = rotated.rotate_cw();
        }
        rotated
    }

    fn rotate_cw(&self) -> Self {
        let n = self.size;
        let mut cells = vec![EMPTY; n * n];
        for i in 0..n {
            for j in 0..n {
                cells[j * n + (n - 1 - i)] = self.cells[i * n + j];
            }
        }
        Self { size: n, cells }
    }

    /// Assemble a board from already-validated rows of equal length.
    pub(crate) fn from_reduced_rows(
        size: usize,
        rows: impl IntoIterator<Item = Vec<Tile>>,
    ) -> Self {
        let mut cells = Vec::with_capacity(size * size);
        for row in rows {
            debug_assert_eq!(row.len(), size);
            cells.extend(row);
        }
        Self { size, cells }
    }
}
