use std::fmt;

use crate::{Difficulty, Grid, PieceKind, Placement};

/// Decides where a piece of a given kind comes to rest.
///
/// Planners receive a read-only view of the live grid and must not assume
/// anything about the session beyond it. Returning `None` means no legal
/// placement exists; the session then discards the piece.
pub trait PlacementPlanner: fmt::Debug {
    fn plan_placement(
        &mut self,
        grid: &Grid,
        kind: PieceKind,
        difficulty: Difficulty,
    ) -> Option<Placement>;
}

impl<P> PlacementPlanner for Box<P>
where
    P: PlacementPlanner + ?Sized,
{
    fn plan_placement(
        &mut self,
        grid: &Grid,
        kind: PieceKind,
        difficulty: Difficulty,
    ) -> Option<Placement> {
        (**self).plan_placement(grid, kind, difficulty)
    }
}

/// Planner that always drops the piece unrotated in the middle of the grid.
///
/// Ignores the difficulty.
#[derive(Debug, Clone, Copy, Default)]
pub struct CenterPlanner;

impl PlacementPlanner for CenterPlanner {
    fn plan_placement(
        &mut self,
        grid: &Grid,
        kind: PieceKind,
        _difficulty: Difficulty,
    ) -> Option<Placement> {
        grid.default_placement(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_planner_matches_default_placement() {
        let grid = Grid::EMPTY;
        let mut planner: Box<dyn PlacementPlanner> = Box::new(CenterPlanner);
        for kind in PieceKind::ALL {
            let placement = planner.plan_placement(&grid, kind, Difficulty::Hard);
            assert_eq!(placement, grid.default_placement(kind));
        }
        let o = planner
            .plan_placement(&grid, PieceKind::O, Difficulty::Easy)
            .unwrap();
        assert_eq!((o.col, o.row, o.rotation), (4, 18, 0));
    }
}
