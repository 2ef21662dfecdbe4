//! Grid, pieces and piece lifecycle of a reverse falling-block puzzle.
//!
//! The player picks which piece to send; a [`PlacementPlanner`] decides where
//! it lands. This crate holds everything except the planner's heuristics:
//! the grid and shapes in [`core`], and the session state machine in
//! [`engine`].

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
