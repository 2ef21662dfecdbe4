use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use rand_pcg::Pcg32;
use revtris_engine::{Difficulty, Grid, PieceKind, Placement, PlacementPlanner};
use tracing::{debug, trace};

use crate::{DifficultyTable, PlacementEvaluator, WeightedPlacementEvaluator};

/// Exhaustive one-piece placement search.
///
/// Every rotation and every column the rotated shape fits in is dropped
/// straight down and scored. The highest jittered score wins; on equal
/// scores the first candidate in (rotation, column) order is kept.
///
/// The jitter generator is owned by the search, so a seeded search replays
/// the same decisions for the same inputs.
///
/// # Example
///
/// ```
/// use revtris_ai::PlacementSearch;
/// use revtris_engine::{Difficulty, Grid, PieceKind};
///
/// let mut search = PlacementSearch::with_seed(7);
/// let placement = search
///     .find_best_placement(&Grid::EMPTY, PieceKind::I, Difficulty::Hard)
///     .unwrap();
///
/// assert_eq!((placement.rotation, placement.col, placement.row), (0, 0, 19));
/// ```
#[derive(Debug, Clone)]
pub struct PlacementSearch {
    table: DifficultyTable,
    rng: Pcg32,
}

impl Default for PlacementSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementSearch {
    /// Creates a search with the built-in parameters and a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            table: DifficultyTable::default(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Replaces the difficulty parameters.
    #[must_use]
    pub fn with_table(self, table: DifficultyTable) -> Self {
        Self { table, ..self }
    }

    /// Finds where a piece of `kind` should rest on `grid`.
    ///
    /// Returns `None` when no rotation fits in any column. `grid` is never
    /// modified; candidates are scored on copies.
    pub fn find_best_placement(
        &mut self,
        grid: &Grid,
        kind: PieceKind,
        difficulty: Difficulty,
    ) -> Option<Placement> {
        let params = *self.table.get(difficulty);
        let evaluator = WeightedPlacementEvaluator::new(params);
        let half = params.randomness / 2.0;
        let jitter = (half > 0.0)
            .then(|| Uniform::new_inclusive(-half, half).ok())
            .flatten();

        let mut best_score = f32::NEG_INFINITY;
        let mut best_result = None;

        for (rotation, shape) in (0..).zip(kind.base_shape().rotations()) {
            for col in 0..=Grid::WIDTH - shape.width() {
                let Some(row) = grid.find_resting_row(&shape, col) else {
                    continue;
                };
                let placement = Placement {
                    col,
                    row,
                    rotation,
                    shape,
                };
                let base = evaluator.evaluate_placement(grid, kind, &placement);
                let noise = jitter.as_ref().map_or(0.0, |u| u.sample(&mut self.rng));
                let score = base + noise;
                trace!(rotation, col, row, base, score, "candidate");
                if score > best_score {
                    best_score = score;
                    best_result = Some(placement);
                }
            }
        }

        match &best_result {
            Some(p) => debug!(
                %kind,
                %difficulty,
                rotation = p.rotation,
                col = p.col,
                row = p.row,
                score = best_score,
                "best placement"
            ),
            None => debug!(%kind, %difficulty, "no legal placement"),
        }
        best_result
    }
}

impl PlacementPlanner for PlacementSearch {
    fn plan_placement(
        &mut self,
        grid: &Grid,
        kind: PieceKind,
        difficulty: Difficulty,
    ) -> Option<Placement> {
        self.find_best_placement(grid, kind, difficulty)
    }
}

#[cfg(test)]
mod tests {
    use revtris_engine::Cell;

    use super::*;
    use crate::DifficultyParams;

    #[test]
    fn test_hard_i_on_empty_grid_lies_flat_at_the_wall() {
        for seed in 0..8 {
            let mut search = PlacementSearch::with_seed(seed);
            let placement = search
                .find_best_placement(&Grid::EMPTY, PieceKind::I, Difficulty::Hard)
                .unwrap();
            assert_eq!(placement.rotation, 0);
            assert_eq!(placement.col, 0);
            assert_eq!(placement.row, 19);
            assert_eq!(placement.shape, PieceKind::I.base_shape());
        }
    }

    #[test]
    fn test_search_never_mutates_grid() {
        let mut grid = Grid::EMPTY;
        grid.set_cell(19, 3, Cell::Filled(PieceKind::S));
        let before = grid.clone();
        let mut search = PlacementSearch::with_seed(1);
        for kind in PieceKind::ALL {
            for difficulty in Difficulty::ALL {
                let placement = search.find_best_placement(&grid, kind, difficulty).unwrap();
                assert!(grid.can_place(
                    &placement.shape,
                    placement.col.try_into().unwrap(),
                    placement.row.try_into().unwrap()
                ));
            }
        }
        assert_eq!(grid, before);
    }

    #[test]
    fn test_same_seed_same_decisions() {
        let mut a = PlacementSearch::with_seed(42);
        let mut b = PlacementSearch::with_seed(42);
        let mut grid = Grid::EMPTY;
        for kind in [PieceKind::T, PieceKind::S, PieceKind::L, PieceKind::Z] {
            let pa = a.find_best_placement(&grid, kind, Difficulty::Easy);
            let pb = b.find_best_placement(&grid, kind, Difficulty::Easy);
            assert_eq!(pa, pb);
            grid.fill_placement(&pa.unwrap(), kind);
        }
    }

    #[test]
    fn test_full_columns_give_no_placement() {
        let mut grid = Grid::EMPTY;
        for y in 0..Grid::HEIGHT {
            for x in 0..Grid::WIDTH {
                grid.set_cell(y, x, Cell::Filled(PieceKind::O));
            }
        }
        let mut search = PlacementSearch::with_seed(0);
        assert_eq!(
            search.find_best_placement(&grid, PieceKind::O, Difficulty::Normal),
            None
        );
    }

    #[test]
    fn test_custom_table_changes_preference() {
        // Rewarding height makes the I piece stand upright.
        let table = DifficultyTable {
            hard: DifficultyParams {
                height_weight: 1.0,
                lines_weight: 0.0,
                holes_weight: 0.0,
                bumpiness_weight: 0.0,
                randomness: 0.0,
            },
            ..DifficultyTable::default()
        };
        let mut search = PlacementSearch::with_seed(0).with_table(table);
        let placement = search
            .find_best_placement(&Grid::EMPTY, PieceKind::I, Difficulty::Hard)
            .unwrap();
        assert_eq!(placement.rotation, 1);
        assert_eq!((placement.col, placement.row), (0, 16));
    }
}
