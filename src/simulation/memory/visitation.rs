//! Per-location visit counts on the lattice.
//!
//! With a coherent mapping the agent's believed location is a fixed
//! function of its world position, so duty cycles across cells flatten out
//! as learning converges.

use serde::{Deserialize, Serialize};

use crate::simulation::lattice::{Location, LocationLattice};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisitationHistogram {
    width: i32,
    counts: Vec<u64>,
}

impl VisitationHistogram {
    #[must_use]
    pub fn new(lattice: &LocationLattice) -> Self {
        Self {
            width: lattice.width(),
            counts: vec![0; lattice.size()],
        }
    }

    /// Lattice width the histogram covers.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    pub fn record(&mut self, location: Location) {
        let index = self.index(location);
        if let Some(count) = self.counts.get_mut(index) {
            *count = count.saturating_add(1);
        }
    }

    #[must_use]
    pub fn visits(&self, location: Location) -> u64 {
        self.counts.get(self.index(location)).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn total_visits(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Largest single-cell count, used to normalise rendering.
    #[must_use]
    pub fn max_visits(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Fraction of visits per cell, ascending.
    #[must_use]
    pub fn duty_cycles(&self) -> Vec<f64> {
        let total = self.total_visits();
        if total == 0 {
            return vec![0.0; self.counts.len()];
        }
        let mut cycles: Vec<f64> = self
            .counts
            .iter()
            .map(|&count| count as f64 / total as f64)
            .collect();
        cycles.sort_by(f64::total_cmp);
        cycles
    }

    const fn index(&self, location: Location) -> usize {
        (location.y * self.width + location.x) as usize
    }
}
