//! The generational transition: rank, retain, breed, adapt.
//!
//! [`EvolutionEngine`] consumes one fitness vector per generation and
//! produces the next population in nine steps:
//!
//! 1. Rank genomes by fitness, best first (stable sort; ties keep their
//!    original population order)
//! 2. Update the hall of fame on strict improvement, otherwise count one
//!    more stagnant generation
//! 3. Append best/average fitness to the bounded history
//! 4. Compute the effective mutation rate (boosted under deep stagnation
//!    with the `Dynamic` strategy)
//! 5. Seed slot 0 with the hall-of-fame genome, strategy permitting
//! 6. Copy the current generation's elite over unchanged
//! 7. Build the breeding pool from the top-ranked fraction
//! 8. Refill the remaining slots with mutated crossover children (or, under
//!    deep `Dynamic` stagnation, occasional random immigrants)
//! 9. Swap the population in and advance the generation counter
//!
//! # Design decisions
//!
//! ## Hall of fame vs. elitism
//!
//! Elitism preserves the best of *this* generation; the hall of fame
//! preserves the best genome *ever observed*. Fitness in a stochastic
//! simulation is noisy, so the current generation's champion may be worse
//! than a past one; seeding the all-time best back in guarantees the
//! population never permanently loses its strongest known policy. The same
//! genome may legitimately occupy both the hall-of-fame seed slot and an
//! elite slot; the double weight is intentional.
//!
//! ## Stagnation adaptation
//!
//! Under the `Dynamic` strategy the engine reacts to a stalled hall of fame
//! in two phases: first by boosting the mutation rate (risk larger steps),
//! then by abandoning hall-of-fame seeding and injecting random immigrants
//! (explore away from the stuck optimum entirely).

use rand::{Rng as _, seq::IndexedRandom as _};
use strider_policy::Genome;
use strider_stats::FitnessStats;

use crate::history::{HistoryRecord, HistoryTracker};

/// Generations without improvement before `Dynamic` boosts mutation.
const STAGNATION_BOOST_AFTER: u32 = 10;
/// Generations without improvement before `Dynamic` stops seeding the
/// hall-of-fame genome and starts injecting immigrants.
const STAGNATION_DEEP: u32 = 15;
/// Added to the base mutation rate when boosted.
const MUTATION_BOOST: f32 = 0.2;
/// Upper limit for the boosted mutation rate.
const MUTATION_CEILING: f32 = 0.5;
/// Chance that a refill slot receives a random immigrant instead of a
/// bred child, once stagnation runs deep.
const IMMIGRANT_PROBABILITY: f64 = 0.15;

/// Policy for carrying past champions into the next population.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub enum RetentionStrategy {
    /// Always reseed slot 0 with the best genome ever observed.
    #[default]
    HallOfFame,
    /// Keep only this generation's elite; never reach back across
    /// generations.
    Generational,
    /// Seed the hall-of-fame genome while progress is recent; under deep
    /// stagnation stop seeding, boost mutation, and admit random
    /// immigrants.
    Dynamic,
}

/// Tunable evolution parameters, adjustable between generations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineParams {
    /// Number of genomes per generation.
    pub population_size: usize,
    /// Base probability that each tensor of a bred child mutates.
    pub mutation_rate: f32,
    /// Fraction of the ranked population admitted to the breeding pool.
    pub selection_ratio: f32,
    /// Total population slots reserved for champions, counting the
    /// hall-of-fame seed.
    pub elitism_count: usize,
}

impl Default for EngineParams {
    fn default() -> Self {
        Self {
            population_size: 50,
            mutation_rate: 0.1,
            selection_ratio: 0.1,
            elitism_count: 5,
        }
    }
}

/// Best genome ever observed, tracked independently of the current
/// population.
#[derive(Debug, Clone)]
struct HallOfFame {
    best_genome: Option<Genome>,
    best_fitness: f32,
    stagnation: u32,
}

impl Default for HallOfFame {
    fn default() -> Self {
        Self {
            best_genome: None,
            best_fitness: f32::MIN,
            stagnation: 0,
        }
    }
}

/// Orchestrates generational transitions over a population of genomes.
///
/// The engine owns the population exclusively between transitions. External
/// evaluators read it through [`population`](EvolutionEngine::population),
/// score each genome, and hand the fitness vector (population order) to
/// [`next_generation`](EvolutionEngine::next_generation).
#[derive(Debug)]
pub struct EvolutionEngine {
    params: EngineParams,
    strategy: RetentionStrategy,
    population: Vec<Genome>,
    generation: u32,
    best_fitness: f32,
    avg_fitness: f32,
    hall_of_fame: HallOfFame,
    history: HistoryTracker,
}

impl EvolutionEngine {
    /// Creates an engine with a freshly randomized population.
    ///
    /// The population size is floored at 1.
    #[must_use]
    pub fn new(params: EngineParams, strategy: RetentionStrategy) -> Self {
        let params = EngineParams {
            population_size: params.population_size.max(1),
            ..params
        };
        let mut rng = rand::rng();
        let population = (0..params.population_size)
            .map(|_| Genome::random(&mut rng))
            .collect();
        Self {
            params,
            strategy,
            population,
            generation: 1,
            best_fitness: 0.0,
            avg_fitness: 0.0,
            hall_of_fame: HallOfFame::default(),
            history: HistoryTracker::new(),
        }
    }

    /// Consumes one generation's fitness vector and replaces the population.
    ///
    /// `fitnesses[i]` must be the score of `population()[i]`.
    ///
    /// # Panics
    ///
    /// Panics if the fitness vector length differs from the population
    /// length.
    pub fn next_generation(&mut self, fitnesses: &[f32]) {
        assert_eq!(
            fitnesses.len(),
            self.population.len(),
            "exactly one fitness per genome is required"
        );

        let mut rng = rand::rng();

        // Rank by fitness, best first. The sort is stable, so genomes with
        // equal scores keep their original population order.
        let mut ranked: Vec<usize> = (0..self.population.len()).collect();
        ranked.sort_by(|&a, &b| fitnesses[b].total_cmp(&fitnesses[a]));

        let top_fitness = fitnesses[ranked[0]];
        if top_fitness > self.hall_of_fame.best_fitness {
            self.hall_of_fame.best_fitness = top_fitness;
            self.hall_of_fame.best_genome = Some(self.population[ranked[0]].clone());
            self.hall_of_fame.stagnation = 0;
        } else {
            self.hall_of_fame.stagnation += 1;
        }

        let stats = FitnessStats::from_scores(fitnesses).expect("population is never empty");
        self.best_fitness = top_fitness;
        self.avg_fitness = stats.mean;
        self.history.push(HistoryRecord {
            generation: self.generation,
            best_fitness: top_fitness,
            avg_fitness: stats.mean,
        });

        let effective_rate = self.effective_mutation_rate();

        let mut next = Vec::with_capacity(self.params.population_size);

        if self.seeds_hall_of_fame()
            && let Some(best) = &self.hall_of_fame.best_genome
        {
            next.push(best.clone());
        }

        // Elite copies of this generation's top performers, in rank order.
        let elite_target = self.params.elitism_count.min(self.params.population_size);
        for &idx in &ranked {
            if next.len() >= elite_target {
                break;
            }
            next.push(self.population[idx].clone());
        }

        let pool_size = breeding_pool_size(self.population.len(), self.params.selection_ratio);
        let pool: Vec<&Genome> = ranked[..pool_size]
            .iter()
            .map(|&idx| &self.population[idx])
            .collect();

        while next.len() < self.params.population_size {
            if self.strategy == RetentionStrategy::Dynamic
                && self.hall_of_fame.stagnation > STAGNATION_DEEP
                && rng.random_bool(IMMIGRANT_PROBABILITY)
            {
                next.push(Genome::random(&mut rng));
                continue;
            }

            let p1 = pool.choose(&mut rng).copied().expect("pool is never empty");
            let p2 = pool.choose(&mut rng).copied().expect("pool is never empty");
            let mut child = Genome::crossover(p1, p2, &mut rng);
            child.mutate(effective_rate, &mut rng);
            next.push(child);
        }

        self.population = next;
        self.generation += 1;
    }

    /// Applies new parameters mid-run.
    ///
    /// Shrinking truncates the population tail, keeping the lowest-index
    /// genomes; growing appends freshly randomized ones. The population
    /// never drops below one genome.
    pub fn set_params(&mut self, params: EngineParams) {
        let params = EngineParams {
            population_size: params.population_size.max(1),
            ..params
        };
        self.params = params;
        if self.population.len() > params.population_size {
            self.population.truncate(params.population_size);
        } else if self.population.len() < params.population_size {
            let mut rng = rand::rng();
            while self.population.len() < params.population_size {
                self.population.push(Genome::random(&mut rng));
            }
        }
    }

    pub fn set_strategy(&mut self, strategy: RetentionStrategy) {
        self.strategy = strategy;
    }

    /// Installs a restored champion as the hall-of-fame genome.
    ///
    /// The hall of fame takes the recorded fitness as its new baseline,
    /// stagnation restarts, and a copy lands in population slot 0 so the
    /// champion competes going forward.
    pub fn install_champion(&mut self, genome: Genome, fitness: f32) {
        self.hall_of_fame.best_fitness = fitness;
        self.hall_of_fame.stagnation = 0;
        self.population[0] = genome.clone();
        self.hall_of_fame.best_genome = Some(genome);
    }

    /// Mutation rate applied to bred children in the next transition.
    ///
    /// Equals the base rate except under [`RetentionStrategy::Dynamic`]
    /// with sustained stagnation, where it is boosted (capped at 0.5).
    #[must_use]
    pub fn effective_mutation_rate(&self) -> f32 {
        if self.strategy == RetentionStrategy::Dynamic
            && self.hall_of_fame.stagnation > STAGNATION_BOOST_AFTER
        {
            (self.params.mutation_rate + MUTATION_BOOST).min(MUTATION_CEILING)
        } else {
            self.params.mutation_rate
        }
    }

    fn seeds_hall_of_fame(&self) -> bool {
        match self.strategy {
            RetentionStrategy::HallOfFame => true,
            RetentionStrategy::Generational => false,
            RetentionStrategy::Dynamic => self.hall_of_fame.stagnation < STAGNATION_DEEP,
        }
    }

    #[must_use]
    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    /// 1-based index of the generation currently awaiting evaluation.
    #[must_use]
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Best fitness of the most recently completed generation.
    #[must_use]
    pub fn best_fitness(&self) -> f32 {
        self.best_fitness
    }

    /// Average fitness of the most recently completed generation.
    #[must_use]
    pub fn avg_fitness(&self) -> f32 {
        self.avg_fitness
    }

    /// Best fitness ever observed (`f32::MIN` before the first generation).
    #[must_use]
    pub fn global_best_fitness(&self) -> f32 {
        self.hall_of_fame.best_fitness
    }

    #[must_use]
    pub fn global_best_genome(&self) -> Option<&Genome> {
        self.hall_of_fame.best_genome.as_ref()
    }

    /// Consecutive generations without a hall-of-fame improvement.
    #[must_use]
    pub fn stagnation(&self) -> u32 {
        self.hall_of_fame.stagnation
    }

    #[must_use]
    pub fn history(&self) -> &HistoryTracker {
        &self.history
    }

    #[must_use]
    pub fn params(&self) -> EngineParams {
        self.params
    }

    #[must_use]
    pub fn strategy(&self) -> RetentionStrategy {
        self.strategy
    }
}

/// Top-ranked slice admitted to breeding: `round(len × ratio)`, at least 1,
/// at most the whole population.
#[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn breeding_pool_size(len: usize, ratio: f32) -> usize {
    let scaled = (len as f32 * ratio).round() as usize;
    scaled.clamp(1, len)
}

#[cfg(test)]
mod tests {
    use crate::history::HISTORY_CAP;

    use super::*;

    fn small_params(population_size: usize) -> EngineParams {
        EngineParams {
            population_size,
            mutation_rate: 0.1,
            selection_ratio: 0.5,
            elitism_count: 1,
        }
    }

    #[test]
    fn test_population_size_is_preserved() {
        let mut engine = EvolutionEngine::new(small_params(8), RetentionStrategy::HallOfFame);
        for generation in 0..5 {
            let fitnesses: Vec<f32> = (0..8).map(|i| (i + generation) as f32).collect();
            engine.next_generation(&fitnesses);
            assert_eq!(engine.population().len(), 8);
        }
        assert_eq!(engine.generation(), 6);
    }

    #[test]
    #[should_panic(expected = "exactly one fitness per genome")]
    fn test_fitness_length_mismatch_panics() {
        let mut engine = EvolutionEngine::new(small_params(4), RetentionStrategy::HallOfFame);
        engine.next_generation(&[1.0, 2.0]);
    }

    #[test]
    fn test_hall_of_fame_is_monotonic_and_counts_stagnation() {
        let mut engine = EvolutionEngine::new(small_params(3), RetentionStrategy::HallOfFame);

        engine.next_generation(&[1.0, 5.0, 2.0]);
        assert_eq!(engine.global_best_fitness(), 5.0);
        assert_eq!(engine.stagnation(), 0);

        engine.next_generation(&[4.0, 3.0, 1.0]);
        assert_eq!(engine.global_best_fitness(), 5.0);
        assert_eq!(engine.stagnation(), 1);

        engine.next_generation(&[5.0, 2.0, 0.0]);
        assert_eq!(engine.global_best_fitness(), 5.0);
        assert_eq!(engine.stagnation(), 2);

        engine.next_generation(&[6.5, 0.0, 0.0]);
        assert_eq!(engine.global_best_fitness(), 6.5);
        assert_eq!(engine.stagnation(), 0);
    }

    #[test]
    fn test_hall_of_fame_strategy_seeds_slot_zero() {
        let mut engine = EvolutionEngine::new(small_params(4), RetentionStrategy::HallOfFame);
        engine.next_generation(&[1.0, 9.0, 2.0, 3.0]);
        let champion = engine.global_best_genome().unwrap().clone();

        engine.next_generation(&[0.0, 0.0, 0.0, 0.0]);
        assert_eq!(engine.population()[0], champion);
    }

    #[test]
    fn test_generational_scenario_elite_and_pool() {
        // population 4, elitism 1, selection ratio 0.5, no mutation:
        // ranked order is [30, 20, 10, 5]; slot 0 must be the genome that
        // scored 30 and every bred child must combine the genomes that
        // scored 30 and 20.
        let params = EngineParams {
            population_size: 4,
            mutation_rate: 0.0,
            selection_ratio: 0.5,
            elitism_count: 1,
        };
        let mut engine = EvolutionEngine::new(params, RetentionStrategy::Generational);
        let parents: Vec<Genome> = engine.population().to_vec();

        engine.next_generation(&[10.0, 30.0, 5.0, 20.0]);

        let next = engine.population();
        assert_eq!(next.len(), 4);
        assert_eq!(next[0], parents[1]);

        let pool = [&parents[1], &parents[3]];
        for child in &next[1..] {
            for (child_t, a_t, b_t) in [
                (child.w1(), pool[0].w1(), pool[1].w1()),
                (child.b1(), pool[0].b1(), pool[1].b1()),
                (child.w2(), pool[0].w2(), pool[1].w2()),
                (child.b2(), pool[0].b2(), pool[1].b2()),
            ] {
                for (i, &v) in child_t.iter().enumerate() {
                    assert!(v == a_t[i] || v == b_t[i]);
                }
            }
        }
    }

    #[test]
    fn test_elitism_copies_are_byte_for_byte() {
        let params = EngineParams {
            population_size: 6,
            mutation_rate: 0.5,
            selection_ratio: 0.5,
            elitism_count: 3,
        };
        let mut engine = EvolutionEngine::new(params, RetentionStrategy::Generational);
        let parents: Vec<Genome> = engine.population().to_vec();

        engine.next_generation(&[3.0, 6.0, 1.0, 5.0, 2.0, 4.0]);

        // ranked: indices 1 (6.0), 3 (5.0), 5 (4.0)
        assert_eq!(engine.population()[0], parents[1]);
        assert_eq!(engine.population()[1], parents[3]);
        assert_eq!(engine.population()[2], parents[5]);
    }

    #[test]
    fn test_stable_ranking_breaks_ties_by_population_order() {
        let params = EngineParams {
            population_size: 3,
            mutation_rate: 0.0,
            selection_ratio: 0.34,
            elitism_count: 2,
        };
        let mut engine = EvolutionEngine::new(params, RetentionStrategy::Generational);
        let parents: Vec<Genome> = engine.population().to_vec();

        engine.next_generation(&[7.0, 7.0, 7.0]);

        // all tied: elite slots keep original order
        assert_eq!(engine.population()[0], parents[0]);
        assert_eq!(engine.population()[1], parents[1]);
    }

    #[test]
    fn test_dynamic_strategy_boosts_mutation_under_stagnation() {
        let mut engine = EvolutionEngine::new(small_params(3), RetentionStrategy::Dynamic);
        assert_eq!(engine.effective_mutation_rate(), 0.1);

        engine.next_generation(&[5.0, 1.0, 1.0]);
        for _ in 0..11 {
            engine.next_generation(&[5.0, 1.0, 1.0]);
        }
        assert_eq!(engine.stagnation(), 11);
        assert!((engine.effective_mutation_rate() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_dynamic_boost_is_capped() {
        let params = EngineParams {
            mutation_rate: 0.45,
            ..small_params(3)
        };
        let mut engine = EvolutionEngine::new(params, RetentionStrategy::Dynamic);
        engine.next_generation(&[5.0, 1.0, 1.0]);
        for _ in 0..12 {
            engine.next_generation(&[5.0, 1.0, 1.0]);
        }
        assert_eq!(engine.effective_mutation_rate(), 0.5);
    }

    #[test]
    fn test_dynamic_stops_seeding_when_stagnation_is_deep() {
        let mut engine = EvolutionEngine::new(small_params(3), RetentionStrategy::Dynamic);
        engine.next_generation(&[5.0, 1.0, 1.0]);
        assert!(engine.seeds_hall_of_fame());

        for _ in 0..16 {
            engine.next_generation(&[5.0, 1.0, 1.0]);
        }
        assert_eq!(engine.stagnation(), 16);
        assert!(!engine.seeds_hall_of_fame());
    }

    #[test]
    fn test_history_records_each_generation_and_stays_bounded() {
        let mut engine = EvolutionEngine::new(small_params(2), RetentionStrategy::HallOfFame);
        for generation in 0..(HISTORY_CAP + 10) {
            engine.next_generation(&[generation as f32, 0.0]);
        }

        let history = engine.history();
        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history.iter().next().unwrap().generation, 11);
        let latest = history.latest().unwrap();
        assert_eq!(latest.generation, (HISTORY_CAP + 10) as u32);
        assert_eq!(latest.best_fitness, (HISTORY_CAP + 9) as f32);
        assert_eq!(latest.avg_fitness, (HISTORY_CAP + 9) as f32 / 2.0);
    }

    #[test]
    fn test_set_params_shrink_keeps_population_prefix() {
        let mut engine = EvolutionEngine::new(small_params(6), RetentionStrategy::HallOfFame);
        let before: Vec<Genome> = engine.population().to_vec();

        engine.set_params(small_params(4));
        assert_eq!(engine.population().len(), 4);
        assert_eq!(engine.population(), &before[..4]);
    }

    #[test]
    fn test_set_params_grow_appends_fresh_genomes() {
        let mut engine = EvolutionEngine::new(small_params(3), RetentionStrategy::HallOfFame);
        let before: Vec<Genome> = engine.population().to_vec();

        engine.set_params(small_params(5));
        assert_eq!(engine.population().len(), 5);
        assert_eq!(&engine.population()[..3], &before[..]);
    }

    #[test]
    fn test_set_params_floors_population_at_one() {
        let mut engine = EvolutionEngine::new(small_params(3), RetentionStrategy::HallOfFame);
        engine.set_params(small_params(0));
        assert_eq!(engine.population().len(), 1);
        engine.next_generation(&[1.0]);
        assert_eq!(engine.population().len(), 1);
    }

    #[test]
    fn test_breeding_pool_size_never_empty() {
        assert_eq!(breeding_pool_size(50, 0.1), 5);
        assert_eq!(breeding_pool_size(4, 0.5), 2);
        assert_eq!(breeding_pool_size(3, 0.0), 1);
        assert_eq!(breeding_pool_size(1, 0.01), 1);
        assert_eq!(breeding_pool_size(10, 1.0), 10);
    }
}
