use std::fmt::Write as _;

use revtris_engine::{Grid, GridRow, PieceKind};

const EMPTY_CELL: char = '.';

/// Renders one grid row as piece letters, `.` for empty cells.
pub(crate) fn row_text(row: &GridRow) -> String {
    row.cells()
        .iter()
        .map(|cell| cell.kind().map_or(EMPTY_CELL, PieceKind::as_char))
        .collect()
}

pub(crate) fn grid_rows(grid: &Grid) -> Vec<String> {
    grid.rows().map(row_text).collect()
}

/// Renders the grid inside a frame, marking the rows that end the session.
pub(crate) fn render_board(grid: &Grid) -> String {
    let mut out = String::new();
    let border = "-".repeat(Grid::WIDTH);
    let _ = writeln!(out, "+{border}+");
    for (y, row) in grid.rows().enumerate() {
        let marker = if y < Grid::DANGER_ROWS { " <" } else { "" };
        let _ = writeln!(out, "|{}|{marker}", row_text(row));
    }
    let _ = write!(out, "+{border}+");
    out
}
