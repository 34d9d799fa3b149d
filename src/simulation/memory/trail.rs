//! Short location → feature trail.
//!
//! If the agent believes it is back at a location it occupied a few steps
//! ago but now senses a different feature, the motor it just used folded
//! two world positions onto one lattice cell.

use super::ring_buffer::RingBuffer;
use crate::simulation::environment::FeatureId;
use crate::simulation::lattice::Location;

#[derive(Clone, Debug)]
pub struct LocationTrail {
    entries: RingBuffer<(Location, FeatureId)>,
}

impl LocationTrail {
    #[must_use]
    pub fn new(length: usize) -> Self {
        Self {
            entries: RingBuffer::new(length),
        }
    }

    /// True if `location` is on the trail with a different feature.
    #[must_use]
    pub fn conflicts(&self, location: Location, feature: FeatureId) -> bool {
        self.entries
            .iter()
            .any(|&(seen, seen_feature)| seen == location && seen_feature != feature)
    }

    pub fn push(&mut self, location: Location, feature: FeatureId) {
        self.entries.push((location, feature));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_needs_different_feature() {
        let mut trail = LocationTrail::new(2);
        trail.push(Location::new(1, 1), 5);
        assert!(!trail.conflicts(Location::new(1, 1), 5));
        assert!(trail.conflicts(Location::new(1, 1), 6));
        assert!(!trail.conflicts(Location::new(0, 1), 6));
    }

    #[test]
    fn test_old_entries_fall_off() {
        let mut trail = LocationTrail::new(2);
        trail.push(Location::new(1, 1), 5);
        trail.push(Location::new(2, 1), 6);
        trail.push(Location::new(0, 1), 7);
        assert!(!trail.conflicts(Location::new(1, 1), 9));
        assert!(trail.conflicts(Location::new(2, 1), 9));
    }
}
