//! Feature → location memory used to detect loop closures.
//!
//! The memory keeps the last location at which each feature was seen and a
//! FIFO window of recent feature sightings. A feature counts as "known"
//! only while at least one of its sightings is still inside the window.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::ring_buffer::RingBuffer;
use crate::simulation::environment::FeatureId;
use crate::simulation::lattice::Location;

/// Result of checking a sighting against memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Not seen within the window; recorded, nothing to compare.
    FirstSeen,
    /// Seen before at the believed location.
    Good,
    /// Seen before elsewhere; the believed location was replaced.
    Bad,
}

/// Outcome plus the believed location after the memory had its say.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recall {
    pub outcome: Outcome,
    pub location: Location,
}

/// Bounded-window associative memory.
#[derive(Clone, Debug)]
pub struct AssociativeMemory {
    locations: HashMap<FeatureId, Location>,
    counts: HashMap<FeatureId, u32>,
    window: RingBuffer<FeatureId>,
}

impl AssociativeMemory {
    /// Creates a memory whose window holds `length` sightings.
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self {
            locations: HashMap::new(),
            counts: HashMap::new(),
            window: RingBuffer::new(length),
        }
    }

    /// Compares a sighting with memory and records it.
    ///
    /// On [`Outcome::Bad`] the returned location is the remembered one: long
    /// term memory wins over the latest transition.
    pub fn observe(&mut self, feature: FeatureId, believed: Location) -> Recall {
        let (outcome, location) = match self.recall(feature) {
            None => (Outcome::FirstSeen, believed),
            Some(remembered) if remembered == believed => (Outcome::Good, believed),
            Some(remembered) => (Outcome::Bad, remembered),
        };

        self.locations.insert(feature, location);
        *self.counts.entry(feature).or_insert(0) += 1;
        if let Some(evicted) = self.window.push(feature) {
            self.release(evicted);
        }

        Recall { outcome, location }
    }

    /// Remembered location of a feature still inside the window.
    #[must_use]
    pub fn recall(&self, feature: FeatureId) -> Option<Location> {
        if self.count(feature) == 0 {
            return None;
        }
        self.locations.get(&feature).copied()
    }

    /// Occurrences of a feature inside the window.
    #[must_use]
    pub fn count(&self, feature: FeatureId) -> u32 {
        self.counts.get(&feature).copied().unwrap_or(0)
    }

    /// Number of sightings in the window.
    #[must_use]
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Sum of all occurrence counters; always equals [`Self::window_len`].
    #[must_use]
    pub fn occurrences(&self) -> usize {
        self.counts.values().map(|&count| count as usize).sum()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.window.capacity()
    }

    /// Forgets the window; stored locations go stale and are ignored.
    pub fn clear(&mut self) {
        self.window.clear();
        self.counts.clear();
    }

    // Stale locations stay in `locations`; they are overwritten on the next sighting.
    fn release(&mut self, feature: FeatureId) {
        if let Some(count) = self.counts.get_mut(&feature) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.counts.remove(&feature);
            }
        }
    }
}
