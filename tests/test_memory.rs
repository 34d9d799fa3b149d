//! Tests for the associative memory, location trail and visitation histogram.

use location_learning::simulation::lattice::{Location, LocationLattice};
use location_learning::simulation::memory::{
    AssociativeMemory, LocationTrail, Outcome, VisitationHistogram,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_cycle_detection_keeps_remembered_location() {
    let a = Location::new(0, 0);
    let b = Location::new(2, 1);
    let mut memory = AssociativeMemory::new(10);
    memory.observe(9, a);

    let recall = memory.observe(9, b);
    assert_eq!(recall.outcome, Outcome::Bad);
    assert_eq!(recall.location, a);
    assert_eq!(memory.recall(9), Some(a));
}

#[test]
fn test_good_when_location_agrees() {
    let mut memory = AssociativeMemory::new(10);
    memory.observe(4, Location::new(1, 1));
    memory.observe(5, Location::new(2, 1));
    let recall = memory.observe(4, Location::new(1, 1));
    assert_eq!(recall.outcome, Outcome::Good);
}

#[test]
fn test_repeated_feature_survives_one_eviction() {
    let mut memory = AssociativeMemory::new(3);
    memory.observe(1, Location::new(0, 0));
    memory.observe(1, Location::new(0, 0));
    memory.observe(2, Location::new(1, 0));
    memory.observe(3, Location::new(2, 0));
    assert_eq!(memory.count(1), 1);
    assert_eq!(memory.recall(1), Some(Location::new(0, 0)));

    memory.observe(4, Location::new(2, 2));
    assert_eq!(memory.count(1), 0);
    assert_eq!(memory.observe(1, Location::new(1, 1)).outcome, Outcome::FirstSeen);
}

#[test]
fn test_window_bound_holds_under_random_traffic() {
    let mut rng = StdRng::seed_from_u64(11);
    for capacity in [1, 3, 10] {
        let mut memory = AssociativeMemory::new(capacity);
        for _ in 0..1_000 {
            let feature = rng.random_range(0..6);
            let location = Location::new(rng.random_range(0..3), rng.random_range(0..3));
            memory.observe(feature, location);
            assert!(memory.window_len() <= capacity);
            assert_eq!(memory.occurrences(), memory.window_len());
        }
    }
}

#[test]
fn test_trail_detects_fold() {
    let mut trail = LocationTrail::new(2);
    trail.push(Location::new(0, 0), 1);
    trail.push(Location::new(1, 0), 2);
    assert!(trail.conflicts(Location::new(0, 0), 3));
    assert!(!trail.conflicts(Location::new(0, 0), 1));
    trail.clear();
    assert!(!trail.conflicts(Location::new(0, 0), 3));
}

#[test]
fn test_visitation_duty_cycles_sum_to_one() {
    let lattice = LocationLattice::new(3).unwrap();
    let mut histogram = VisitationHistogram::new(&lattice);
    histogram.record(Location::new(0, 0));
    histogram.record(Location::new(0, 0));
    histogram.record(Location::new(2, 1));
    histogram.record(Location::new(1, 2));

    assert_eq!(histogram.total_visits(), 4);
    assert_eq!(histogram.max_visits(), 2);
    assert_eq!(histogram.visits(Location::new(0, 0)), 2);
    let sum: f64 = histogram.duty_cycles().iter().sum();
    assert!((sum - 1.0).abs() < 1e-12);
}
