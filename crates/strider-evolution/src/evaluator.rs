//! The seam between the evolution loop and the fitness source.

use std::fmt;

use strider_policy::Genome;

/// Scores genomes by running their policies through evaluation episodes.
///
/// Implemented by the external simulation (or any synthetic benchmark).
/// The training loop calls
/// [`evaluate_population`](PolicyEvaluator::evaluate_population) once per
/// generation and
/// feeds the scores, in population order, to
/// [`EvolutionEngine::next_generation`](crate::EvolutionEngine::next_generation).
///
/// Implementations must treat genomes as read-only; the engine owns the
/// population exclusively between transitions.
pub trait PolicyEvaluator: fmt::Debug {
    /// Scores a single genome over one evaluation episode.
    fn evaluate(&self, genome: &Genome) -> f32;

    /// Scores every genome, preserving population order.
    fn evaluate_population(&self, genomes: &[Genome]) -> Vec<f32> {
        genomes.iter().map(|genome| self.evaluate(genome)).collect()
    }
}
