use serde::{Deserialize, Serialize};

use crate::Difficulty;

/// Score a session starts from before any piece is sent.
const BASE_SCORE: i64 = 400;
/// Score lost per piece sent.
const PIECE_COST: i64 = 10;
/// Score per cleared line.
const LINE_VALUE: i64 = 10;
/// Score lost per row of stack height.
const HEIGHT_COST: i64 = 2;

/// Session counters: score, pieces sent and lines cleared.
///
/// The player wins by topping out the stack with few pieces, so the score
/// shrinks with every piece sent and with the height of the stack, and grows
/// with every line the engine clears.
///
/// # Example
///
/// ```
/// use revtris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.record_commit(2);
///
/// assert_eq!(stats.pieces_sent(), 1);
/// assert_eq!(stats.score(), 400 - 10 - 4);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStats {
    score: u32,
    pieces_sent: u32,
    lines_cleared: u32,
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            pieces_sent: 0,
            lines_cleared: 0,
        }
    }

    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub const fn pieces_sent(&self) -> u32 {
        self.pieces_sent
    }

    #[must_use]
    pub const fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    /// Updates the counters after a piece is committed to the grid.
    ///
    /// The score is recomputed from scratch as
    /// `max(0, 400 - 10·pieces + 10·lines - 2·max_height)`.
    pub fn record_commit(&mut self, max_height: usize) {
        self.pieces_sent += 1;
        self.score = formula_score(self.pieces_sent, self.lines_cleared, max_height);
    }

    /// Updates the counters after `count` lines are removed.
    pub fn record_clear(&mut self, count: usize) {
        let gained = i64::try_from(count)
            .unwrap_or(i64::MAX)
            .saturating_mul(LINE_VALUE);
        self.lines_cleared = self
            .lines_cleared
            .saturating_add(u32::try_from(count).unwrap_or(u32::MAX));
        self.score = u32::try_from(i64::from(self.score).saturating_add(gained)).unwrap_or(u32::MAX);
    }

    /// Adds the completion bonus for `difficulty` and returns it.
    pub fn record_completion(&mut self, difficulty: Difficulty) -> u32 {
        let bonus = difficulty.completion_bonus();
        self.score = self.score.saturating_add(bonus);
        bonus
    }
}

fn formula_score(pieces_sent: u32, lines_cleared: u32, max_height: usize) -> u32 {
    let height = i64::try_from(max_height).unwrap_or(i64::MAX / HEIGHT_COST);
    let score = BASE_SCORE - i64::from(pieces_sent) * PIECE_COST
        + i64::from(lines_cleared) * LINE_VALUE
        - height * HEIGHT_COST;
    u32::try_from(score.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_stats() {
        let stats = GameStats::new();
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.pieces_sent(), 0);
        assert_eq!(stats.lines_cleared(), 0);
    }

    #[test]
    fn test_commit_recomputes_score() {
        let mut stats = GameStats::new();
        stats.record_commit(1);
        assert_eq!(stats.score(), 388);
        stats.record_commit(2);
        assert_eq!(stats.score(), 376);
    }

    #[test]
    fn test_clear_adds_line_value_on_top_of_formula() {
        let mut stats = GameStats::new();
        stats.record_commit(2);
        assert_eq!(stats.score(), 386);
        stats.record_clear(2);
        assert_eq!(stats.lines_cleared(), 2);
        assert_eq!(stats.score(), 406);

        // The next commit recomputes from the formula, lines included once.
        stats.record_commit(0);
        assert_eq!(stats.score(), 400 - 20 + 20);
    }

    #[test]
    fn test_score_is_clamped_at_zero() {
        let mut stats = GameStats::new();
        for _ in 0..40 {
            stats.record_commit(20);
        }
        assert_eq!(stats.score(), 0);
        assert_eq!(stats.pieces_sent(), 40);
    }

    #[test]
    fn test_completion_bonus() {
        let mut stats = GameStats::new();
        stats.record_commit(18);
        let before = stats.score();
        assert_eq!(stats.record_completion(Difficulty::Hard), 200);
        assert_eq!(stats.score(), before + 200);
    }
}
