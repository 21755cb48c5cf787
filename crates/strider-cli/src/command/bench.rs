use std::path::PathBuf;

use strider_evolution::{ChampionRecord, PolicyEvaluator as _};
use strider_policy::Genome;

use crate::course::ProbeCourse;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct BenchArg {
    /// Champion record to score; a random genome is used when omitted
    #[arg(long)]
    champion: Option<PathBuf>,
}

pub(crate) fn run(arg: &BenchArg) -> anyhow::Result<()> {
    let course = ProbeCourse::standard();

    let (label, genome) = match &arg.champion {
        Some(path) => {
            let record = ChampionRecord::open(path)?;
            eprintln!(
                "Benchmarking \"{}\" (saved fitness {:.1}, generation {})",
                record.name, record.fitness, record.generation
            );
            (record.name, record.genome)
        }
        None => {
            eprintln!("Benchmarking a freshly randomized genome");
            ("random".to_owned(), Genome::random(&mut rand::rng()))
        }
    };

    let score = course.evaluate(&genome);
    eprintln!(
        "Probe course score for \"{label}\": {score:.1} / {:.0}",
        course.max_score()
    );
    Ok(())
}
