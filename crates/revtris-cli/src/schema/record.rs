use chrono::{DateTime, Utc};
use revtris_engine::{Difficulty, GameStats, PieceKind};
use serde::{Deserialize, Serialize};

/// Outcome of a simulated session, written by `simulate --record`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Timestamp when the record was created (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    pub difficulty: Difficulty,
    /// Seed of the placement search jitter and of random piece requests
    pub seed: u64,
    pub planner: String,
    /// Piece requests in the order they were sent
    pub requests: Vec<PieceKind>,
    /// Requests dropped because the queue was full
    pub rejected: usize,
    /// Pieces for which no legal placement existed
    pub discarded: usize,
    pub final_stats: GameStats,
    /// Whether the stack reached the top rows
    pub cleared: bool,
    /// Final grid, one string per row from the top, `.` for empty cells
    pub board: Vec<String>,
}
