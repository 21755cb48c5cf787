use clap::{Parser, Subcommand};

use self::{bench::BenchArg, champion::ChampionArg, train::TrainArg};

mod bench;
mod champion;
mod train;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve runner policies against the built-in probe course
    Train(#[clap(flatten)] TrainArg),
    /// Score a stored champion (or a random genome) on the probe course
    Bench(#[clap(flatten)] BenchArg),
    /// Manage persisted champions
    Champion(#[clap(flatten)] ChampionArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Train(arg) => train::run(&arg),
        Mode::Bench(arg) => bench::run(&arg),
        Mode::Champion(arg) => champion::run(&arg),
    }
}
