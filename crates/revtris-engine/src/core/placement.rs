use super::{
    piece::{PieceKind, Rgb},
    shape::Shape,
};

/// A resting position chosen for a piece.
///
/// `row`/`col` address the top-left corner of `shape` in the grid, and
/// `rotation` is the number of clockwise quarter turns applied to the base
/// shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub col: usize,
    pub row: usize,
    pub rotation: u8,
    pub shape: Shape,
}

/// A piece in flight: moving down from the top of the grid toward its
/// resting row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallingPiece {
    kind: PieceKind,
    placement: Placement,
    row: usize,
}

impl FallingPiece {
    /// Creates a falling piece at the top of the grid, headed to `placement`.
    #[must_use]
    pub fn new(kind: PieceKind, placement: Placement) -> Self {
        Self {
            kind,
            placement,
            row: 0,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn color(&self) -> Rgb {
        self.kind.color()
    }

    #[must_use]
    pub fn shape(&self) -> &Shape {
        &self.placement.shape
    }

    #[must_use]
    pub fn col(&self) -> usize {
        self.placement.col
    }

    /// Current row of the piece's top edge.
    #[must_use]
    pub fn row(&self) -> usize {
        self.row
    }

    #[must_use]
    pub fn target_row(&self) -> usize {
        self.placement.row
    }

    #[must_use]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    #[must_use]
    pub fn has_landed(&self) -> bool {
        self.row >= self.placement.row
    }

    /// Moves the piece down by up to `rows`, stopping at the target row.
    #[must_use]
    pub fn stepped_down(self, rows: usize) -> Self {
        Self {
            row: usize::min(self.row.saturating_add(rows), self.placement.row),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falling_piece_steps_to_target() {
        let placement = Placement {
            col: 2,
            row: 5,
            rotation: 0,
            shape: PieceKind::T.base_shape(),
        };
        let mut piece = FallingPiece::new(PieceKind::T, placement);
        let mut rows = vec![piece.row()];
        while !piece.has_landed() {
            piece = piece.stepped_down(2);
            rows.push(piece.row());
        }
        assert_eq!(rows, [0, 2, 4, 5]);
        assert_eq!(piece.col(), 2);
        assert_eq!(piece.color(), PieceKind::T.color());
    }

    #[test]
    fn test_falling_piece_landed_at_top() {
        let placement = Placement {
            col: 0,
            row: 0,
            rotation: 1,
            shape: PieceKind::I.base_shape().rotated(1),
        };
        let piece = FallingPiece::new(PieceKind::I, placement);
        assert!(piece.has_landed());
        assert_eq!(piece.stepped_down(2).row(), 0);
    }

    #[test]
    fn test_falling_piece_huge_step_stops_at_target() {
        let placement = Placement {
            col: 4,
            row: 18,
            rotation: 0,
            shape: PieceKind::O.base_shape(),
        };
        let piece = FallingPiece::new(PieceKind::O, placement)
            .stepped_down(2)
            .stepped_down(usize::MAX);
        assert_eq!(piece.row(), 18);
        assert!(piece.has_landed());
    }
}
