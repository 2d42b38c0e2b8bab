//! Constrained random shapes for new groups
//!
//! Every column of a pattern hangs from the top row: the top row is always
//! full, the second row is a mix of filled and empty cells, and deeper
//! cells only exist below a filled cell. This keeps the shape connected
//! and guarantees it is never a complete rectangle when it spawns.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Occupancy pattern for a spawned group, indexed by (col, row)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapePattern {
    pub cols: usize,
    pub rows: usize,
    /// Row-major occupancy
    cells: Vec<bool>,
}

impl ShapePattern {
    /// Empty pattern
    pub fn empty(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![false; cols * rows],
        }
    }

    #[inline]
    pub fn get(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows && self.cells[row * self.cols + col]
    }

    #[inline]
    pub fn set(&mut self, col: usize, row: usize, filled: bool) {
        self.cells[row * self.cols + col] = filled;
    }

    /// Generate a hanging shape. `cols` is raised to 2 so the second row
    /// can be mixed; `rows` is raised to 2 so the shape always has one.
    pub fn generate(cols: usize, rows: usize, rng: &mut impl Rng) -> Self {
        let cols = cols.max(2);
        let rows = rows.max(2);
        let mut pattern = Self::empty(cols, rows);

        for col in 0..cols {
            pattern.set(col, 0, true);
        }

        // Reject all-filled or all-empty second rows
        loop {
            let mut filled = 0;
            for col in 0..cols {
                let bit = rng.random_bool(0.5);
                pattern.set(col, 1, bit);
                filled += bit as usize;
            }
            if filled != 0 && filled != cols {
                break;
            }
        }

        for row in 2..rows {
            for col in 0..cols {
                let bit = pattern.get(col, row - 1) && rng.random_bool(0.5);
                pattern.set(col, row, bit);
            }
        }

        pattern
    }

    /// Filled cells as (col, row) offsets, row-major
    pub fn filled_cells(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols)
                .filter(move |&col| self.get(col, row))
                .map(move |col| IVec2::new(col as i32, row as i32))
        })
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}
