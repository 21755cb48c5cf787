//! Generational neuro-evolution for runner policies.
//!
//! This crate owns the population dynamics: given one scalar fitness per
//! genome per generation, it ranks the population, retains champions, breeds
//! replacements, and adapts mutation pressure when progress stalls.
//!
//! # Architecture
//!
//! ```text
//! External simulation (implements PolicyEvaluator)
//!     ↓ one fitness per genome, in population order
//! EvolutionEngine::next_generation
//!     ↓ rank → hall of fame → history → seed/elite → breed
//! Next population
//!     ↓ snapshot / restore on demand
//! ChampionStore (JSON records on disk)
//! ```
//!
//! The simulation itself lives outside this repository; it reads the
//! population through [`EvolutionEngine::population`], runs each genome's
//! policy network for one episode, and feeds the resulting fitness vector
//! back in. Nothing here overlaps generations: the engine assumes a fully
//! formed fitness vector before each transition and owns the population
//! exclusively in between.
//!
//! # Champion retention
//!
//! Three strategies control how past champions re-enter the population;
//! see [`RetentionStrategy`]. All three share elitism (top performers of
//! the current generation are copied over unchanged); they differ in
//! whether the best genome *ever* is reseeded, and in whether stagnation
//! triggers extra mutation pressure and random immigrants.

pub use self::{
    champion::{ChampionRecord, ChampionStore, ChampionStoreError, ChampionSummary},
    engine::{EngineParams, EvolutionEngine, RetentionStrategy},
    evaluator::PolicyEvaluator,
    history::{HistoryRecord, HistoryTracker},
};

pub mod champion;
pub mod engine;
pub mod evaluator;
pub mod history;
