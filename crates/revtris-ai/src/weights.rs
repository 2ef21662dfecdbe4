use std::iter;

use revtris_engine::Difficulty;
use serde::{Deserialize, Serialize};

use crate::{GridMetrics, METRIC_COUNT};

/// Linear weights of one difficulty level plus its jitter magnitude.
///
/// Penalties are negative and rewards positive; the evaluator adds
/// uniform noise in `[-randomness / 2, randomness / 2]` to every candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyParams {
    pub height_weight: f32,
    pub lines_weight: f32,
    pub holes_weight: f32,
    pub bumpiness_weight: f32,
    pub randomness: f32,
}

impl DifficultyParams {
    pub const EASY: Self = Self {
        height_weight: -0.3,
        lines_weight: 0.5,
        holes_weight: -0.5,
        bumpiness_weight: -0.2,
        randomness: 0.3,
    };
    pub const NORMAL: Self = Self {
        height_weight: -0.5,
        lines_weight: 1.0,
        holes_weight: -1.0,
        bumpiness_weight: -0.3,
        randomness: 0.1,
    };
    pub const HARD: Self = Self {
        height_weight: -0.8,
        lines_weight: 1.5,
        holes_weight: -2.0,
        bumpiness_weight: -0.5,
        randomness: 0.0,
    };

    #[must_use]
    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self::EASY,
            Difficulty::Normal => Self::NORMAL,
            Difficulty::Hard => Self::HARD,
        }
    }

    #[must_use]
    pub const fn weights(&self) -> [f32; METRIC_COUNT] {
        [
            self.height_weight,
            self.lines_weight,
            self.holes_weight,
            self.bumpiness_weight,
        ]
    }

    /// Weighted sum of `metrics`, without jitter.
    #[must_use]
    pub fn score(&self, metrics: &GridMetrics) -> f32 {
        iter::zip(metrics.to_array(), self.weights())
            .map(|(m, w)| m * w)
            .sum()
    }
}

/// Parameters for all three difficulty levels.
///
/// Missing levels in a config file keep their built-in values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTable {
    pub easy: DifficultyParams,
    pub normal: DifficultyParams,
    pub hard: DifficultyParams,
}

impl Default for DifficultyTable {
    fn default() -> Self {
        Self {
            easy: DifficultyParams::EASY,
            normal: DifficultyParams::NORMAL,
            hard: DifficultyParams::HARD,
        }
    }
}

impl DifficultyTable {
    #[must_use]
    pub fn get(&self, difficulty: Difficulty) -> &DifficultyParams {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Normal => &self.normal,
            Difficulty::Hard => &self.hard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_matches_constants() {
        let table = DifficultyTable::default();
        for difficulty in Difficulty::ALL {
            assert_eq!(
                *table.get(difficulty),
                DifficultyParams::for_difficulty(difficulty)
            );
        }
        assert!(table.get(Difficulty::Easy).randomness > table.get(Difficulty::Normal).randomness);
        assert!(table.get(Difficulty::Hard).randomness.abs() < f32::EPSILON);
    }

    #[test]
    fn test_score_is_linear() {
        let metrics = GridMetrics {
            height: 4,
            completed_lines: 1,
            holes: 2,
            bumpiness: 3,
        };
        let score = DifficultyParams::HARD.score(&metrics);
        // -0.8·4 + 1.5·1 - 2.0·2 - 0.5·3
        assert!((score + 7.2).abs() < 1e-5, "{score}");
    }

    #[test]
    fn test_partial_table_keeps_defaults() {
        let json = r#"{ "hard": { "height_weight": -1.0, "lines_weight": 0.0,
            "holes_weight": -3.0, "bumpiness_weight": -1.0, "randomness": 0.0 } }"#;
        let table: DifficultyTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.easy, DifficultyParams::EASY);
        assert_eq!(table.normal, DifficultyParams::NORMAL);
        assert!((table.hard.holes_weight + 3.0).abs() < f32::EPSILON);
    }
}
