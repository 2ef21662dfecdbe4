use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{piece::PieceKind, placement::Placement, shape::Shape};

/// A single cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Locked block of a specific piece type.
    Filled(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn is_filled(self) -> bool {
        !self.is_empty()
    }

    #[must_use]
    pub fn kind(self) -> Option<PieceKind> {
        match self {
            Cell::Empty => None,
            Cell::Filled(kind) => Some(kind),
        }
    }
}

/// A single row of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridRow {
    cells: [Cell; Grid::WIDTH],
}

impl GridRow {
    const EMPTY: Self = Self {
        cells: [Cell::Empty; Grid::WIDTH],
    };

    #[must_use]
    pub fn cells(&self) -> &[Cell; Grid::WIDTH] {
        &self.cells
    }

    /// Returns `true` when every cell of the row is occupied.
    #[must_use]
    pub fn is_filled(&self) -> bool {
        self.cells.iter().all(|c| c.is_filled())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.is_empty())
    }
}

/// The playfield: a fixed 10×20 array of cells.
///
/// Row 0 is the top of the grid and row indices increase downward. The
/// dimensions never change, only cell contents do.
///
/// # Example
///
/// ```
/// use revtris_engine::{Grid, PieceKind};
///
/// let grid = Grid::EMPTY;
/// let shape = PieceKind::O.base_shape();
///
/// assert!(grid.can_place(&shape, 0, 0));
/// assert_eq!(grid.find_resting_row(&shape, 4), Some(18));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    rows: [GridRow; Grid::HEIGHT],
}

impl Default for Grid {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Grid {
    pub const WIDTH: usize = 10;
    pub const HEIGHT: usize = 20;

    /// Number of rows at the top of the grid that end the session once occupied.
    pub const DANGER_ROWS: usize = 3;

    pub const EMPTY: Self = Self {
        rows: [GridRow::EMPTY; Self::HEIGHT],
    };

    /// Returns an iterator over the rows, top row first.
    pub fn rows(&self) -> impl Iterator<Item = &GridRow> {
        self.rows.iter()
    }

    #[must_use]
    pub fn row(&self, row: usize) -> &GridRow {
        &self.rows[row]
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.rows[row].cells[col]
    }

    #[must_use]
    pub fn is_cell_occupied(&self, row: usize, col: usize) -> bool {
        self.cell(row, col).is_filled()
    }

    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        self.rows[row].cells[col] = cell;
    }

    /// Number of occupied cells in the grid.
    #[must_use]
    pub fn occupied_cell_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|c| c.is_filled())
            .count()
    }

    /// Checks whether `shape` fits with its top-left corner at (`col`, `row`).
    ///
    /// Every occupied shape cell must lie inside `[0, WIDTH)` horizontally and
    /// above the floor. Cells above the top edge (negative rows) are always
    /// allowed; cells inside the grid must be empty.
    #[must_use]
    #[expect(clippy::cast_possible_wrap)]
    pub fn can_place(&self, shape: &Shape, col: isize, row: isize) -> bool {
        shape.occupied_cells().all(|(dy, dx)| {
            let x = col + dx as isize;
            let y = row + dy as isize;
            let Ok(x) = usize::try_from(x) else {
                return false;
            };
            if x >= Self::WIDTH {
                return false;
            }
            match usize::try_from(y) {
                Ok(y) => y < Self::HEIGHT && self.rows[y].cells[x].is_empty(),
                Err(_) => true,
            }
        })
    }

    /// Simulates dropping `shape` straight down in column `col`.
    ///
    /// Rows are scanned from the top. The resting row is the last row that fits
    /// before the first collision, or `HEIGHT - shape.height()` when nothing
    /// blocks the fall.
    ///
    /// Returns `None` when the shape does not fit even at row 0 (or the column
    /// range is out of bounds): the column is overflowing and offers no legal
    /// resting position.
    #[must_use]
    #[expect(clippy::cast_possible_wrap)]
    pub fn find_resting_row(&self, shape: &Shape, col: usize) -> Option<usize> {
        let col = col as isize;
        let last_row = Self::HEIGHT.checked_sub(shape.height())?;
        for row in 0..=last_row {
            if !self.can_place(shape, col, row as isize) {
                return row.checked_sub(1);
            }
        }
        Some(last_row)
    }

    /// Writes `shape` into the grid at (`col`, `row`), tagging cells with `kind`.
    ///
    /// Shape cells outside the grid are skipped.
    pub fn fill_shape(&mut self, shape: &Shape, col: usize, row: usize, kind: PieceKind) {
        for (dy, dx) in shape.occupied_cells() {
            let (x, y) = (col + dx, row + dy);
            if x < Self::WIDTH && y < Self::HEIGHT {
                self.rows[y].cells[x] = Cell::Filled(kind);
            }
        }
    }

    /// Writes a placement into the grid.
    pub fn fill_placement(&mut self, placement: &Placement, kind: PieceKind) {
        self.fill_shape(&placement.shape, placement.col, placement.row, kind);
    }

    /// Returns the indices of fully occupied rows, top to bottom.
    #[must_use]
    pub fn completed_rows(&self) -> ArrayVec<usize, { Grid::HEIGHT }> {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, row)| row.is_filled())
            .map(|(y, _)| y)
            .collect()
    }

    /// Removes the given rows and inserts the same number of empty rows at the top.
    ///
    /// Rows below the removed ones keep their position; rows above them shift
    /// down. Duplicate and out-of-range indices are ignored.
    ///
    /// # Returns
    ///
    /// The number of rows removed.
    pub fn clear_rows(&mut self, rows: &[usize]) -> usize {
        let mut count = 0;
        for y in (0..Self::HEIGHT).rev() {
            if rows.contains(&y) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        self.rows[..count].fill(GridRow::EMPTY);
        count
    }

    /// Height of the stack: distance from the topmost occupied row to the floor.
    ///
    /// Returns 0 for an empty grid.
    #[must_use]
    pub fn max_height(&self) -> usize {
        self.rows
            .iter()
            .position(|row| !row.is_empty())
            .map_or(0, |y| Self::HEIGHT - y)
    }

    /// Returns `true` when any of the top `rows` rows holds a block.
    #[must_use]
    pub fn has_blocks_in_top_rows(&self, rows: usize) -> bool {
        self.rows.iter().take(rows).any(|row| !row.is_empty())
    }

    /// Computes the fallback placement for `kind`: spawn orientation, centered
    /// column, dropped straight down.
    ///
    /// Returns `None` when the centered column is overflowing.
    #[must_use]
    pub fn default_placement(&self, kind: PieceKind) -> Option<Placement> {
        let shape = kind.base_shape();
        let col = (Self::WIDTH - shape.width()) / 2;
        let row = self.find_resting_row(&shape, col)?;
        Some(Placement {
            col,
            row,
            rotation: 0,
            shape,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(grid: &mut Grid, row: usize, except: &[usize]) {
        for col in 0..Grid::WIDTH {
            if !except.contains(&col) {
                grid.set_cell(row, col, Cell::Filled(PieceKind::I));
            }
        }
    }

    #[test]
    fn test_empty_grid() {
        let grid = Grid::EMPTY;
        assert_eq!(grid.rows().count(), Grid::HEIGHT);
        assert_eq!(grid.occupied_cell_count(), 0);
        assert_eq!(grid.max_height(), 0);
        assert!(grid.completed_rows().is_empty());
        assert!(!grid.has_blocks_in_top_rows(Grid::DANGER_ROWS));
    }

    #[test]
    fn test_can_place_bounds() {
        let grid = Grid::EMPTY;
        let i = PieceKind::I.base_shape();
        assert!(grid.can_place(&i, 0, 0));
        assert!(grid.can_place(&i, 6, 19));
        assert!(!grid.can_place(&i, 7, 0), "right edge");
        assert!(!grid.can_place(&i, -1, 0), "left edge");
        assert!(!grid.can_place(&i, 0, 20), "below floor");
    }

    #[test]
    fn test_can_place_above_top_is_allowed() {
        let mut grid = Grid::EMPTY;
        fill_row(&mut grid, 0, &[]);
        let vertical_i = PieceKind::I.base_shape().rotated(1);
        // Only the bottom cell reaches row 0, which is occupied.
        assert!(!grid.can_place(&vertical_i, 0, -3));
        assert!(grid.can_place(&vertical_i, 0, -4));
    }

    #[test]
    fn test_can_place_collision() {
        let mut grid = Grid::EMPTY;
        grid.set_cell(19, 4, Cell::Filled(PieceKind::O));
        let o = PieceKind::O.base_shape();
        assert!(!grid.can_place(&o, 3, 18));
        assert!(!grid.can_place(&o, 4, 18));
        assert!(grid.can_place(&o, 5, 18));
        assert!(grid.can_place(&o, 3, 17));
    }

    #[test]
    fn test_find_resting_row_on_floor() {
        let grid = Grid::EMPTY;
        for kind in PieceKind::ALL {
            let shape = kind.base_shape();
            for col in 0..=Grid::WIDTH - shape.width() {
                assert_eq!(
                    grid.find_resting_row(&shape, col),
                    Some(Grid::HEIGHT - shape.height())
                );
            }
        }
    }

    #[test]
    fn test_find_resting_row_on_stack() {
        let mut grid = Grid::EMPTY;
        grid.set_cell(15, 2, Cell::Filled(PieceKind::T));
        let o = PieceKind::O.base_shape();
        assert_eq!(grid.find_resting_row(&o, 1), Some(13));
        assert_eq!(grid.find_resting_row(&o, 2), Some(13));
        assert_eq!(grid.find_resting_row(&o, 3), Some(18));
    }

    #[test]
    fn test_find_resting_row_overflowing_column() {
        let mut grid = Grid::EMPTY;
        grid.set_cell(1, 0, Cell::Filled(PieceKind::T));
        let vertical_i = PieceKind::I.base_shape().rotated(1);
        assert_eq!(grid.find_resting_row(&vertical_i, 0), None);
        assert_eq!(grid.find_resting_row(&vertical_i, 1), Some(16));
    }

    #[test]
    fn test_resting_row_is_always_placeable() {
        let mut grid = Grid::EMPTY;
        // A jagged stack with overhangs.
        for (row, col) in [(19, 0), (18, 0), (17, 1), (19, 3), (12, 5), (19, 9), (5, 7)] {
            grid.set_cell(row, col, Cell::Filled(PieceKind::J));
        }
        for kind in PieceKind::ALL {
            for shape in kind.base_shape().rotations() {
                for col in 0..=Grid::WIDTH - shape.width() {
                    if let Some(row) = grid.find_resting_row(&shape, col) {
                        assert!(grid.can_place(&shape, col as isize, row as isize));
                    }
                }
            }
        }
    }

    #[test]
    fn test_fill_shape_and_completed_rows() {
        let mut grid = Grid::EMPTY;
        fill_row(&mut grid, 19, &[8, 9]);
        assert!(grid.completed_rows().is_empty());

        let o = PieceKind::O.base_shape();
        grid.fill_shape(&o, 8, 18, PieceKind::O);
        assert_eq!(grid.cell(19, 9), Cell::Filled(PieceKind::O));
        assert_eq!(grid.completed_rows().as_slice(), &[19]);
        assert_eq!(grid.max_height(), 2);
    }

    #[test]
    fn test_clear_rows_shifts_and_prepends() {
        let mut grid = Grid::EMPTY;
        fill_row(&mut grid, 19, &[]);
        fill_row(&mut grid, 18, &[0]);
        fill_row(&mut grid, 17, &[]);
        grid.set_cell(16, 5, Cell::Filled(PieceKind::S));

        let before = grid.occupied_cell_count();
        let completed = grid.completed_rows();
        let cleared = grid.clear_rows(&completed);
        assert_eq!(cleared, 2);
        assert_eq!(grid.occupied_cell_count(), before - 2 * Grid::WIDTH);
        assert_eq!(grid.rows().count(), Grid::HEIGHT);

        // The partial row lands on the floor and the lone block right above it.
        assert!(grid.cell(19, 0).is_empty());
        assert_eq!(grid.cell(19, 1), Cell::Filled(PieceKind::I));
        assert_eq!(grid.cell(18, 5), Cell::Filled(PieceKind::S));
        assert!(grid.row(0).is_empty());
        assert!(grid.row(1).is_empty());
    }

    #[test]
    fn test_clear_rows_ignores_duplicates_and_out_of_range() {
        let mut grid = Grid::EMPTY;
        fill_row(&mut grid, 19, &[]);
        assert_eq!(grid.clear_rows(&[19, 19, 42]), 1);
        assert_eq!(grid, Grid::EMPTY);
    }

    #[test]
    fn test_max_height_and_top_rows() {
        let mut grid = Grid::EMPTY;
        grid.set_cell(3, 4, Cell::Filled(PieceKind::L));
        assert_eq!(grid.max_height(), 17);
        assert!(!grid.has_blocks_in_top_rows(Grid::DANGER_ROWS));
        grid.set_cell(2, 4, Cell::Filled(PieceKind::L));
        assert_eq!(grid.max_height(), 18);
        assert!(grid.has_blocks_in_top_rows(Grid::DANGER_ROWS));
    }

    #[test]
    fn test_default_placement_is_centered() {
        let grid = Grid::EMPTY;
        let placement = grid.default_placement(PieceKind::I).unwrap();
        assert_eq!(placement.col, 3);
        assert_eq!(placement.row, 19);
        assert_eq!(placement.rotation, 0);

        let placement = grid.default_placement(PieceKind::T).unwrap();
        assert_eq!(placement.col, 3);
        assert_eq!(placement.row, 18);
    }
}
