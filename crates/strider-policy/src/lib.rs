//! Policy genomes and the feed-forward network driving a runner agent.
//!
//! A [`Genome`] holds the parameters of a small fixed-topology MLP;
//! a [`PolicyNetwork`] binds one genome and maps normalized game
//! observations to action scores. Genomes are created randomly, bred via
//! uniform crossover, and refined by in-place Gaussian mutation; there is
//! no gradient learning anywhere in this crate.
//!
//! The network shape is fixed by the constants below for the lifetime of a
//! run; every parameter tensor is validated against them when a genome is
//! restored from storage.

pub use self::{genome::Genome, network::PolicyNetwork};

pub mod genome;
pub mod network;
pub mod params;

/// Number of observation features fed to the network.
///
/// Order: distance to the next obstacle, obstacle x, obstacle y, obstacle
/// width, obstacle height, player y, scroll speed. The evaluator normalizes
/// every component into `[0, 1]` before calling
/// [`PolicyNetwork::evaluate`].
pub const INPUT_SIZE: usize = 7;

/// Hidden layer width.
pub const HIDDEN_SIZE: usize = 7;

/// Action scores produced per evaluation: jump and crouch.
pub const OUTPUT_SIZE: usize = 2;

/// Every parameter is clamped to `[-W_MAX, W_MAX]` after mutation.
pub const W_MAX: f32 = 5.0;

/// Standard deviation of the Gaussian mutation noise.
pub const MUTATION_STD: f32 = 0.3;
