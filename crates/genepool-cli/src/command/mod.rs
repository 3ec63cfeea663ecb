use clap::{Parser, Subcommand};

use self::{default_config::DefaultConfigArg, inspect::InspectArg, train::TrainArg};

mod default_config;
mod inspect;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve genomes against the target-matching evaluator
    Train(#[clap(flatten)] TrainArg),
    /// Print a summary of a saved genome model
    Inspect(#[clap(flatten)] InspectArg),
    /// Print the default genetic algorithm parameters as JSON
    DefaultConfig(#[clap(flatten)] DefaultConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg)?,
        Mode::Inspect(arg) => inspect::run(&arg)?,
        Mode::DefaultConfig(arg) => default_config::run(&arg)?,
    }
    Ok(())
}
