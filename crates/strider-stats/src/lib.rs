//! Descriptive statistics over per-generation fitness scores.

pub use self::fitness::FitnessStats;

pub mod fitness;
