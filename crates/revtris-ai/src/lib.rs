//! Placement engine for the reverse falling-block puzzle.
//!
//! Given the live grid and a piece kind, [`PlacementSearch`] tries every
//! rotation and column, drops the piece, scores the resulting grid with the
//! difficulty's [`DifficultyParams`], and keeps the best candidate. Weights are
//! linear over four [`GridMetrics`] and the search looks one piece ahead only.

pub use self::{
    grid_analysis::*, metrics::*, placement_evaluator::*, placement_search::*, weights::*,
};

mod grid_analysis;
mod metrics;
mod placement_evaluator;
mod placement_search;
mod weights;
