use revtris_engine::Grid;

use crate::GridAnalysis;

/// Number of features fed into the linear evaluation.
pub const METRIC_COUNT: usize = 4;

/// Raw features of a grid, in weight order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridMetrics {
    pub height: u32,
    pub completed_lines: u32,
    pub holes: u32,
    pub bumpiness: u32,
}

impl GridMetrics {
    #[must_use]
    pub fn measure(grid: &Grid) -> Self {
        Self::from_analysis(&GridAnalysis::from_grid(grid))
    }

    #[must_use]
    pub fn from_analysis(analysis: &GridAnalysis) -> Self {
        Self {
            height: u32::from(analysis.max_height()),
            completed_lines: u32::from(analysis.completed_lines()),
            holes: analysis.num_holes(),
            bumpiness: analysis.bumpiness(),
        }
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn to_array(&self) -> [f32; METRIC_COUNT] {
        [
            self.height as f32,
            self.completed_lines as f32,
            self.holes as f32,
            self.bumpiness as f32,
        ]
    }
}

#[cfg(test)]
mod tests {
    use revtris_engine::{Cell, PieceKind};

    use super::*;

    #[test]
    fn test_measure() {
        let mut grid = Grid::EMPTY;
        for x in 0..Grid::WIDTH {
            grid.set_cell(19, x, Cell::Filled(PieceKind::I));
        }
        grid.set_cell(17, 0, Cell::Filled(PieceKind::O));

        let metrics = GridMetrics::measure(&grid);
        assert_eq!(
            metrics,
            GridMetrics {
                height: 3,
                completed_lines: 1,
                holes: 1,
                bumpiness: 2,
            }
        );
        assert_eq!(metrics.to_array(), [3.0, 1.0, 1.0, 2.0]);
    }
}
