//! Bounded record of recent generations' fitness statistics.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Maximum number of per-generation records retained.
pub const HISTORY_CAP: usize = 100;

/// Fitness statistics for one completed generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub generation: u32,
    pub best_fitness: f32,
    pub avg_fitness: f32,
}

/// Ring buffer of the most recent [`HISTORY_CAP`] generation records.
///
/// The oldest record is dropped first when full, so memory stays bounded
/// over arbitrarily long training sessions.
#[derive(Debug, Clone)]
pub struct HistoryTracker {
    records: VecDeque<HistoryRecord>,
}

impl HistoryTracker {
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: VecDeque::with_capacity(HISTORY_CAP),
        }
    }

    pub fn push(&mut self, record: HistoryRecord) {
        if self.records.len() >= HISTORY_CAP {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The most recently appended record.
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryRecord> {
        self.records.back()
    }

    /// Records in append order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<HistoryRecord> {
        self.records.iter().copied().collect()
    }
}

impl Default for HistoryTracker {
    fn default() -> Self {
        Self::new()
    }
}
