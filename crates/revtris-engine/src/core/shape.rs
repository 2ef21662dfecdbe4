/// Occupancy matrix of a piece in one orientation.
///
/// A shape is a `height × width` boolean matrix of at most 4×4 cells. Cells
/// outside the `height × width` window are always empty, so the derived
/// equality compares shapes by content.
///
/// Shapes are immutable: [`Shape::rotated`] returns a new value.
///
/// # Example
///
/// ```
/// use revtris_engine::PieceKind;
///
/// let t = PieceKind::T.base_shape();
/// assert_eq!((t.width(), t.height()), (3, 2));
///
/// let rotated = t.rotated(1);
/// assert_eq!((rotated.width(), rotated.height()), (2, 3));
/// assert_eq!(rotated.rotated(3), t);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    width: u8,
    height: u8,
    cells: [[bool; Shape::MAX_SIZE]; Shape::MAX_SIZE],
}

impl Shape {
    /// Maximum extent of a shape in either direction.
    pub const MAX_SIZE: usize = 4;

    /// Builds a shape from rows of `0`/`1` cells, top row first.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is empty, larger than 4×4, or ragged.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub const fn from_rows(rows: &[&[u8]]) -> Self {
        let height = rows.len();
        assert!(height > 0 && height <= Self::MAX_SIZE);
        let width = rows[0].len();
        assert!(width > 0 && width <= Self::MAX_SIZE);

        let mut cells = [[false; Self::MAX_SIZE]; Self::MAX_SIZE];
        let mut y = 0;
        while y < height {
            assert!(rows[y].len() == width, "ragged shape rows");
            let mut x = 0;
            while x < width {
                cells[y][x] = rows[y][x] != 0;
                x += 1;
            }
            y += 1;
        }
        Self {
            width: width as u8,
            height: height as u8,
            cells,
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width as usize
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height as usize
    }

    /// Returns whether the cell at (`row`, `col`) of this shape is occupied.
    ///
    /// Out-of-range coordinates are reported as empty.
    #[must_use]
    pub const fn is_occupied(&self, row: usize, col: usize) -> bool {
        row < self.height() && col < self.width() && self.cells[row][col]
    }

    /// Returns an iterator of occupied `(row, col)` offsets within the shape.
    pub fn occupied_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height()).flat_map(move |row| {
            (0..self.width())
                .filter(move |&col| self.cells[row][col])
                .map(move |col| (row, col))
        })
    }

    /// Rotates the shape clockwise by `quarter_turns` × 90°.
    ///
    /// The turn count is taken modulo 4. Odd counts swap width and height.
    #[must_use]
    pub fn rotated(self, quarter_turns: usize) -> Self {
        let mut shape = self;
        for _ in 0..quarter_turns % 4 {
            shape = shape.rotated_right();
        }
        shape
    }

    /// Returns all four orientations, indexed by rotation count.
    #[must_use]
    pub fn rotations(self) -> [Self; 4] {
        let r1 = self.rotated_right();
        let r2 = r1.rotated_right();
        let r3 = r2.rotated_right();
        [self, r1, r2, r3]
    }

    fn rotated_right(self) -> Self {
        // (row, col) of an h×w matrix moves to (col, h - 1 - row).
        let height = self.height();
        let mut cells = [[false; Self::MAX_SIZE]; Self::MAX_SIZE];
        for (row, col) in self.occupied_cells() {
            cells[col][height - 1 - row] = true;
        }
        Self {
            width: self.height,
            height: self.width,
            cells,
        }
    }
}
