//! The genome: one agent's complete parameter set.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{HIDDEN_SIZE, INPUT_SIZE, MUTATION_STD, OUTPUT_SIZE, W_MAX, params};

/// Parameter set defining one agent's decision policy.
///
/// Four dense tensors of a fixed-topology MLP, stored row-major:
/// `w1` (`HIDDEN_SIZE` × `INPUT_SIZE`), `b1` (`HIDDEN_SIZE`),
/// `w2` (`OUTPUT_SIZE` × `HIDDEN_SIZE`), `b2` (`OUTPUT_SIZE`).
///
/// `Clone` performs a deep copy; every population slot and the hall-of-fame
/// reference own their genome outright, so mutating one copy can never
/// corrupt another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    w1: Vec<f32>,
    b1: Vec<f32>,
    w2: Vec<f32>,
    b2: Vec<f32>,
}

impl Genome {
    /// Creates a genome with every parameter drawn uniformly from `[-1, 1]`.
    pub fn random<R>(rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            w1: params::random_vec(rng, HIDDEN_SIZE * INPUT_SIZE),
            b1: params::random_vec(rng, HIDDEN_SIZE),
            w2: params::random_vec(rng, OUTPUT_SIZE * HIDDEN_SIZE),
            b2: params::random_vec(rng, OUTPUT_SIZE),
        }
    }

    /// Mutates this genome in place.
    ///
    /// Each of the four tensors is gated independently: with probability
    /// `rate` the whole tensor receives element-wise Gaussian noise
    /// (`N(0, MUTATION_STD)`) and is clamped back into `[-W_MAX, W_MAX]`.
    /// Tensors that fail the gate keep their exact values. The per-tensor
    /// gate keeps mutation coarse-grained and cheap while still allowing
    /// full-parameter exploration.
    pub fn mutate<R>(&mut self, rate: f32, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        for tensor in [&mut self.w1, &mut self.b1, &mut self.w2, &mut self.b2] {
            if rng.random_bool(rate.into()) {
                params::perturb(tensor, MUTATION_STD, W_MAX, rng);
            }
        }
    }

    /// Breeds a child by uniform crossover of two parents.
    ///
    /// Every element of the child is a verbatim copy of the corresponding
    /// element of `a` or `b`, chosen per element with equal probability.
    /// The parents are left untouched.
    #[must_use]
    pub fn crossover<R>(a: &Self, b: &Self, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        Self {
            w1: params::uniform_cross(&a.w1, &b.w1, rng),
            b1: params::uniform_cross(&a.b1, &b.b1, rng),
            w2: params::uniform_cross(&a.w2, &b.w2, rng),
            b2: params::uniform_cross(&a.b2, &b.b2, rng),
        }
    }

    /// Checks that all four tensors have the configured shapes.
    ///
    /// Genomes restored from storage must pass this check before entering a
    /// population.
    #[must_use]
    pub fn has_expected_shapes(&self) -> bool {
        self.w1.len() == HIDDEN_SIZE * INPUT_SIZE
            && self.b1.len() == HIDDEN_SIZE
            && self.w2.len() == OUTPUT_SIZE * HIDDEN_SIZE
            && self.b2.len() == OUTPUT_SIZE
    }

    /// Input-to-hidden weights, row-major (`HIDDEN_SIZE` rows).
    #[must_use]
    pub fn w1(&self) -> &[f32] {
        &self.w1
    }

    /// Hidden layer biases.
    #[must_use]
    pub fn b1(&self) -> &[f32] {
        &self.b1
    }

    /// Hidden-to-output weights, row-major (`OUTPUT_SIZE` rows).
    #[must_use]
    pub fn w2(&self) -> &[f32] {
        &self.w2
    }

    /// Output layer biases.
    #[must_use]
    pub fn b2(&self) -> &[f32] {
        &self.b2
    }
}
