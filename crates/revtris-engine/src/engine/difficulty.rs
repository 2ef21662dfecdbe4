use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Skill level of the placement engine.
///
/// The difficulty selects the evaluation weights used by the placement planner
/// and the completion bonus awarded when the stack reaches the top.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[display("easy")]
    Easy,
    #[default]
    #[display("normal")]
    Normal,
    #[display("hard")]
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unknown difficulty: {name:?} (expected easy, normal or hard)")]
pub struct ParseDifficultyError {
    name: String,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    /// Looks up a difficulty by name, falling back to [`Difficulty::Normal`]
    /// for unknown names.
    ///
    /// # Examples
    ///
    /// ```
    /// use revtris_engine::Difficulty;
    ///
    /// assert_eq!(Difficulty::from_name_or_default("hard"), Difficulty::Hard);
    /// assert_eq!(Difficulty::from_name_or_default("nightmare"), Difficulty::Normal);
    /// ```
    #[must_use]
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_else(|err: ParseDifficultyError| {
            tracing::warn!(%err, "falling back to normal difficulty");
            Difficulty::default()
        })
    }

    /// Score bonus awarded when the session ends with the stack at the top.
    #[must_use]
    pub const fn completion_bonus(self) -> u32 {
        match self {
            Difficulty::Easy => 50,
            Difficulty::Normal => 100,
            Difficulty::Hard => 200,
        }
    }
}

// Hand-written so the error keeps the rejected name and surrounding
// whitespace is tolerated.
impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDifficultyError { name: s.to_owned() })
    }
}
