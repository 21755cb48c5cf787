use std::path::PathBuf;

use strider_evolution::{
    ChampionStore, EngineParams, EvolutionEngine, PolicyEvaluator as _, RetentionStrategy,
};
use strider_stats::FitnessStats;

use crate::{course::ProbeCourse, util::Output};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Number of generations to evolve
    #[arg(long, default_value_t = 100)]
    generations: u32,
    #[arg(long, default_value_t = 50)]
    population_size: usize,
    #[arg(long, default_value_t = 0.1)]
    mutation_rate: f32,
    #[arg(long, default_value_t = 0.1)]
    selection_ratio: f32,
    #[arg(long, default_value_t = 5)]
    elitism: usize,
    /// Champion retention strategy: halloffame, generational or dynamic
    #[arg(long, default_value = "halloffame")]
    strategy: RetentionStrategy,
    /// Directory holding the champion store
    #[arg(long, default_value = "models")]
    store_dir: PathBuf,
    /// Seed the run from a stored champion before the first generation
    #[arg(long)]
    resume_from: Option<PathBuf>,
    /// Save the hall-of-fame genome when training ends (derived name)
    #[arg(long)]
    save: bool,
    /// Save under an explicit name instead of the derived one
    #[arg(long, conflicts_with = "save")]
    save_as: Option<String>,
    /// Write the retained fitness history as JSON when training ends
    #[arg(long)]
    history_out: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let params = EngineParams {
        population_size: arg.population_size,
        mutation_rate: arg.mutation_rate,
        selection_ratio: arg.selection_ratio,
        elitism_count: arg.elitism,
    };
    let mut engine = EvolutionEngine::new(params, arg.strategy);
    let store = ChampionStore::new(&arg.store_dir);
    let course = ProbeCourse::standard();

    if let Some(path) = &arg.resume_from {
        let message = store.load(&mut engine, path)?;
        eprintln!("{message}");
    }

    for _ in 0..arg.generations {
        let fitnesses = course.evaluate_population(engine.population());
        let stats = FitnessStats::from_scores(&fitnesses).expect("population is never empty");

        eprintln!("Generation #{}:", engine.generation());
        eprintln!("  Best:      {:.3} / {:.0}", stats.max, course.max_score());
        eprintln!("  Mean:      {:.3}", stats.mean);
        eprintln!("  Worst:     {:.3}", stats.min);
        eprintln!("  Stddev:    {:.3}", stats.std_dev);

        engine.next_generation(&fitnesses);

        eprintln!(
            "  Best ever: {:.3} (stagnation {})",
            engine.global_best_fitness(),
            engine.stagnation()
        );
        eprintln!("  Mutation:  {:.2}", engine.effective_mutation_rate());
    }

    eprintln!();
    eprintln!("Training completed after {} generations.", arg.generations);
    eprintln!("  Best fitness ever: {:.3}", engine.global_best_fitness());

    if arg.save || arg.save_as.is_some() {
        let message = store.save(&engine, arg.save_as.as_deref())?;
        eprintln!("{message}");
    }

    if let Some(path) = &arg.history_out {
        Output::save_json(&engine.history().to_vec(), Some(path.clone()))?;
        eprintln!("Fitness history written to {}", path.display());
    }

    Ok(())
}
