//! Session logic on top of the core grid types.
//!
//! - [`GameMachine`] - deterministic piece lifecycle (`(state, event) -> effects`)
//! - [`GameSession`] - the machine driven by a [`PlacementPlanner`] and a virtual clock
//! - [`GameStats`] - score, pieces sent, lines cleared
//! - [`PieceQueue`] - bounded queue of pending requests
//! - [`Scheduler`] - cancellable timers over virtual time
//!
//! # Piece lifecycle
//!
//! 1. The player selects a piece kind; it is queued if a piece is in progress
//! 2. The planner decides a placement (or none, and the piece is discarded)
//! 3. The piece falls two rows per step and is committed to the grid
//! 4. Completed lines are highlighted, then removed
//! 5. If the stack reached the top three rows the session ends, otherwise the
//!    next queued piece starts
//!
//! # Example
//!
//! ```
//! use revtris_engine::{CenterPlanner, GameSession, PieceKind, SessionConfig};
//!
//! let mut session = GameSession::new(CenterPlanner, SessionConfig::default());
//! session.start();
//! session.request_placement(PieceKind::T);
//! session.run_until_settled();
//!
//! assert_eq!(session.stats().pieces_sent(), 1);
//! assert_eq!(session.max_height(), 2);
//! ```

pub use self::{
    config::*, difficulty::*, game_session::*, game_stats::*, machine::*, piece_queue::*,
    planner::*, timer::*,
};

mod config;
mod difficulty;
mod game_session;
mod game_stats;
mod machine;
mod piece_queue;
mod planner;
mod timer;
