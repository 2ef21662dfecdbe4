use std::path::Path;

use revtris_ai::DifficultyTable;
use revtris_engine::SessionConfig;
use serde::{Deserialize, Serialize};

use crate::util;

/// Contents of a `--config` file. Every section is optional.
///
/// ```json
/// {
///   "session": { "drop_step_interval_ms": 20, "highlight_duration_ms": 300 },
///   "difficulties": { "easy": { "height_weight": -0.3, ... } }
/// }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub session: SessionConfig,
    pub difficulties: DifficultyTable,
}

impl ConfigFile {
    /// Reads the config file at `path`, or returns the defaults when no path
    /// is given.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => util::read_json_file("config", path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use revtris_ai::DifficultyParams;

    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config: ConfigFile = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_partial_config() {
        let config: ConfigFile = serde_json::from_str(
            r#"{ "session": { "drop_step_interval_ms": 5, "drop_rows_per_step": 1 } }"#,
        )
        .unwrap();
        assert_eq!(config.session.drop_step_interval, Duration::from_millis(5));
        assert_eq!(config.session.drop_rows_per_step, 1);
        assert_eq!(config.session.highlight_duration, Duration::from_millis(300));
        assert_eq!(config.difficulties.normal, DifficultyParams::NORMAL);
    }
}
