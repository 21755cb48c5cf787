//! Element-wise operations on parameter vectors.
//!
//! Genome tensors are stored as flat `Vec<f32>` slices; the operators here
//! implement the three ways a tensor's values ever change:
//!
//! - **Initialization**: [`random_vec`] draws fresh parameters
//! - **Mutation**: [`perturb`] adds bounded Gaussian noise in place
//! - **Recombination**: [`uniform_cross`] mixes two parents element-wise
//!
//! Crossover selects, never interpolates: each child element is a verbatim
//! copy of one parent's element, so useful sub-structures survive
//! recombination intact. Mutation is the only operator that produces values
//! not present in either parent, and it clamps its result so parameters
//! cannot run away over many generations.

use rand::Rng;
use rand_distr::Normal;

/// Generates a parameter vector with each element drawn uniformly from
/// `[-1, 1]`.
pub fn random_vec<R>(rng: &mut R, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    (0..len).map(|_| rng.random_range(-1.0..=1.0)).collect()
}

/// Adds `N(0, sigma)` noise to every element in place, clamping each result
/// to `[-bound, bound]`.
pub fn perturb<R>(values: &mut [f32], sigma: f32, bound: f32, rng: &mut R)
where
    R: Rng + ?Sized,
{
    let normal = Normal::new(0.0, sigma).unwrap();
    for v in values {
        *v = (*v + rng.sample(normal)).clamp(-bound, bound);
    }
}

/// Uniform crossover: each element is copied from `a` or `b` with equal
/// probability, independently per element.
///
/// # Panics
///
/// Panics if the parent vectors have different lengths.
pub fn uniform_cross<R>(a: &[f32], b: &[f32], rng: &mut R) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    assert_eq!(a.len(), b.len());
    std::iter::zip(a, b)
        .map(|(&x, &y)| if rng.random_bool(0.5) { x } else { y })
        .collect()
}
