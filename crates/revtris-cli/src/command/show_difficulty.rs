use std::path::PathBuf;

use revtris_engine::Difficulty;

use crate::{schema::config::ConfigFile, util};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ShowDifficultyArg {
    /// Only show this difficulty (easy, normal or hard)
    difficulty: Option<Difficulty>,
    /// Config file whose difficulty table overrides the built-in one
    #[arg(long)]
    config: Option<PathBuf>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ShowDifficultyArg) -> anyhow::Result<()> {
    let ShowDifficultyArg {
        difficulty,
        config,
        output,
    } = arg;

    let config = ConfigFile::load_or_default(config.as_deref())?;
    match difficulty {
        Some(difficulty) => util::save_json(config.difficulties.get(*difficulty), output.as_deref()),
        None => util::save_json(&config.difficulties, output.as_deref()),
    }
}
