use std::{cell::OnceCell, iter};

use revtris_engine::Grid;

/// Lazily computed surface and hole statistics of a grid snapshot.
///
/// Each value is computed on first access and cached, so asking for the same
/// statistic twice never walks the grid twice.
#[derive(Debug)]
pub struct GridAnalysis {
    grid: Grid,
    column_heights: OnceCell<[u8; Grid::WIDTH]>,
    column_occupied_cells: OnceCell<[u8; Grid::WIDTH]>,
    max_height: OnceCell<u8>,
    completed_lines: OnceCell<u8>,
    num_holes: OnceCell<u32>,
    bumpiness: OnceCell<u32>,
}

impl GridAnalysis {
    #[must_use]
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            grid: grid.clone(),
            column_heights: OnceCell::new(),
            column_occupied_cells: OnceCell::new(),
            max_height: OnceCell::new(),
            completed_lines: OnceCell::new(),
            num_holes: OnceCell::new(),
            bumpiness: OnceCell::new(),
        }
    }

    /// Per column, the distance from its topmost block to the floor.
    #[must_use]
    pub fn column_heights(&self) -> &[u8; Grid::WIDTH] {
        self.column_heights.get_or_init(|| {
            let mut column_heights = [0; Grid::WIDTH];
            for (x, h) in column_heights.iter_mut().enumerate() {
                let Some(top) = (0..Grid::HEIGHT).find(|&y| self.grid.is_cell_occupied(y, x))
                else {
                    continue;
                };
                *h = to_u8(Grid::HEIGHT - top);
            }
            column_heights
        })
    }

    #[must_use]
    pub fn column_occupied_cells(&self) -> &[u8; Grid::WIDTH] {
        self.column_occupied_cells.get_or_init(|| {
            let mut column_occupied_cells = [0; Grid::WIDTH];
            for (x, o) in column_occupied_cells.iter_mut().enumerate() {
                let count = (0..Grid::HEIGHT)
                    .filter(|&y| self.grid.is_cell_occupied(y, x))
                    .count();
                *o = to_u8(count);
            }
            column_occupied_cells
        })
    }

    /// Height of the whole stack; 0 for an empty grid.
    #[must_use]
    pub fn max_height(&self) -> u8 {
        *self
            .max_height
            .get_or_init(|| self.column_heights().iter().copied().max().unwrap_or(0))
    }

    #[must_use]
    pub fn completed_lines(&self) -> u8 {
        *self
            .completed_lines
            .get_or_init(|| to_u8(self.grid.completed_rows().len()))
    }

    /// Empty cells lying below the topmost block of their column.
    #[must_use]
    pub fn num_holes(&self) -> u32 {
        *self.num_holes.get_or_init(|| {
            iter::zip(self.column_heights(), self.column_occupied_cells())
                .map(|(h, occ)| u32::from(h - occ))
                .sum()
        })
    }

    /// Sum of height differences between neighboring columns.
    #[must_use]
    pub fn bumpiness(&self) -> u32 {
        *self.bumpiness.get_or_init(|| {
            self.column_heights()
                .windows(2)
                .map(|w| u32::from(w[0].abs_diff(w[1])))
                .sum()
        })
    }
}

fn to_u8(n: usize) -> u8 {
    // Grid dimensions are far below u8::MAX.
    u8::try_from(n).unwrap_or(u8::MAX)
}
