use std::fmt;

use revtris_engine::{Grid, PieceKind, Placement};

use crate::{DifficultyParams, GridMetrics};

/// Scores the grid that results from a placement. Higher is better.
pub trait PlacementEvaluator: fmt::Debug {
    fn evaluate_placement(&self, grid: &Grid, kind: PieceKind, placement: &Placement) -> f32;
}

/// Deterministic linear evaluation with fixed weights.
#[derive(Debug, Clone, Copy)]
pub struct WeightedPlacementEvaluator {
    params: DifficultyParams,
}

impl WeightedPlacementEvaluator {
    #[must_use]
    pub fn new(params: DifficultyParams) -> Self {
        Self { params }
    }

    /// Scores `grid` as it stands.
    #[must_use]
    pub fn evaluate_grid(&self, grid: &Grid) -> f32 {
        self.params.score(&GridMetrics::measure(grid))
    }
}

impl PlacementEvaluator for WeightedPlacementEvaluator {
    /// Writes the piece into a copy of `grid` and scores the copy.
    ///
    /// Completed lines are counted before they would be cleared.
    #[inline]
    fn evaluate_placement(&self, grid: &Grid, kind: PieceKind, placement: &Placement) -> f32 {
        let mut grid = grid.clone();
        grid.fill_placement(placement, kind);
        self.evaluate_grid(&grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evaluation_does_not_touch_input() {
        let grid = Grid::EMPTY;
        let evaluator = WeightedPlacementEvaluator::new(DifficultyParams::HARD);
        let placement = grid.default_placement(PieceKind::T).unwrap();

        let score = evaluator.evaluate_placement(&grid, PieceKind::T, &placement);
        assert_eq!(grid, Grid::EMPTY);
        // Column heights 0 0 0 1 2 1 0 0 0 0: height 2, bumpiness 4.
        assert!((score - (-0.8 * 2.0 - 0.5 * 4.0)).abs() < 1e-5, "{score}");
    }

    #[test]
    fn test_empty_grid_scores_zero() {
        for params in [
            DifficultyParams::EASY,
            DifficultyParams::NORMAL,
            DifficultyParams::HARD,
        ] {
            let evaluator = WeightedPlacementEvaluator::new(params);
            assert!(evaluator.evaluate_grid(&Grid::EMPTY).abs() < f32::EPSILON);
        }
    }
}
