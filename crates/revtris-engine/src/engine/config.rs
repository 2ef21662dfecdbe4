use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Grid;

/// Timing of the piece lifecycle.
///
/// Durations are (de)serialized as integer milliseconds. Missing fields take
/// their default values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Delay between two drop steps of the falling piece.
    #[serde(rename = "drop_step_interval_ms", with = "duration_millis")]
    pub drop_step_interval: Duration,
    /// Rows the falling piece advances per drop step.
    pub drop_rows_per_step: usize,
    /// Delay between committing a piece and looking for completed lines.
    #[serde(rename = "settle_delay_ms", with = "duration_millis")]
    pub settle_delay: Duration,
    /// How long completed lines stay highlighted before removal.
    #[serde(rename = "highlight_duration_ms", with = "duration_millis")]
    pub highlight_duration: Duration,
    /// Delay between removing lines and the terminal check.
    #[serde(rename = "post_clear_delay_ms", with = "duration_millis")]
    pub post_clear_delay: Duration,
}

impl SessionConfig {
    pub const DEFAULT: Self = Self {
        drop_step_interval: Duration::from_millis(20),
        drop_rows_per_step: 2,
        settle_delay: Duration::from_millis(50),
        highlight_duration: Duration::from_millis(300),
        post_clear_delay: Duration::from_millis(50),
    };

    /// Config with every delay set to zero, for tests and batch simulation.
    pub const INSTANT: Self = Self {
        drop_step_interval: Duration::ZERO,
        drop_rows_per_step: Grid::HEIGHT,
        settle_delay: Duration::ZERO,
        highlight_duration: Duration::ZERO,
        post_clear_delay: Duration::ZERO,
    };
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

mod duration_millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub(super) fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        u64::try_from(duration.as_millis())
            .unwrap_or(u64::MAX)
            .serialize(serializer)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
