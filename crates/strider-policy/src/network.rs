//! Feed-forward evaluation of a genome against one observation.

use crate::{Genome, HIDDEN_SIZE, INPUT_SIZE, OUTPUT_SIZE};

/// Stateless forward-pass evaluator bound to one [`Genome`].
///
/// Holds no mutable state and caches nothing; constructing one per genome
/// per frame is cheap. The evaluation is a pure function of the genome and
/// the observation.
#[derive(Debug, Clone, Copy)]
pub struct PolicyNetwork<'a> {
    genome: &'a Genome,
}

impl<'a> PolicyNetwork<'a> {
    #[must_use]
    pub fn new(genome: &'a Genome) -> Self {
        Self { genome }
    }

    /// Maps a normalized observation vector to action scores.
    ///
    /// Computes `hidden = relu(w1 · obs + b1)` followed by
    /// `output = sigmoid(w2 · hidden + b2)`. Each returned component lies in
    /// `(0, 1)` and is an independent action probability: jump and crouch
    /// are separate decisions, not a softmax over alternatives.
    ///
    /// Callers are expected to normalize every feature into `[0, 1]`; the
    /// values themselves are not range-checked here.
    ///
    /// # Panics
    ///
    /// Panics if `observation.len() != INPUT_SIZE`.
    #[must_use]
    pub fn evaluate(&self, observation: &[f32]) -> [f32; OUTPUT_SIZE] {
        assert_eq!(
            observation.len(),
            INPUT_SIZE,
            "observation length must match the network input size"
        );

        let mut hidden = [0.0_f32; HIDDEN_SIZE];
        for (h, unit) in hidden.iter_mut().enumerate() {
            let row = &self.genome.w1()[h * INPUT_SIZE..(h + 1) * INPUT_SIZE];
            let z = dot(row, observation) + self.genome.b1()[h];
            *unit = relu(z);
        }

        let mut output = [0.0_f32; OUTPUT_SIZE];
        for (o, unit) in output.iter_mut().enumerate() {
            let row = &self.genome.w2()[o * HIDDEN_SIZE..(o + 1) * HIDDEN_SIZE];
            let z = dot(row, &hidden) + self.genome.b2()[o];
            *unit = sigmoid(z);
        }
        output
    }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    std::iter::zip(a, b).map(|(x, y)| x * y).sum()
}

fn relu(x: f32) -> f32 {
    x.max(0.0)
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}
