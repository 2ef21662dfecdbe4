use clap::{ArgAction, Parser, Subcommand};

use self::{show_difficulty::ShowDifficultyArg, simulate::SimulateArg};
use crate::util;

mod show_difficulty;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Run a headless session and print the final board
    Simulate(#[clap(flatten)] SimulateArg),
    /// Print the placement weights of each difficulty as JSON
    ShowDifficulty(#[clap(flatten)] ShowDifficultyArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    util::init_tracing(args.verbose);
    match args.mode {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::ShowDifficulty(arg) => show_difficulty::run(&arg)?,
    }
    Ok(())
}
