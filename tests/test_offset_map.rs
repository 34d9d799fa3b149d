//! Tests for the learned motor → offset map.

use location_learning::simulation::offset_map::{
    Mapping, MotorModel, OffsetMap, Reinforcement, ReinforcementParams,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const CATALOG_LEN: usize = 8;

fn params(initial: f64, increment: f64, decrement: f64) -> ReinforcementParams {
    ReinforcementParams {
        initial_permanence: initial,
        increment,
        decrement,
    }
}

#[test]
fn test_permanence_stays_in_unit_interval() {
    let mut rng = StdRng::seed_from_u64(7);
    for trial in 0..20 {
        let p = params(
            rng.random_range(0.0..=1.0),
            rng.random_range(0.0..=1.0),
            rng.random_range(0.0..=1.0),
        );
        let mut map = OffsetMap::new(4, CATALOG_LEN, p, &mut rng);
        for _ in 0..500 {
            let motor = rng.random_range(0..4);
            let observed = if rng.random_bool(0.2) {
                None
            } else {
                Some(rng.random_range(0..CATALOG_LEN))
            };
            map.reinforce(motor, observed, &mut rng);
            for (_, mapping) in map.iter() {
                assert!(
                    (0.0..=1.0).contains(&mapping.permanence),
                    "trial {trial}: permanence {} out of range",
                    mapping.permanence
                );
                assert!(mapping.offset < CATALOG_LEN);
            }
        }
    }
}

#[test]
fn test_forget_and_reassign_on_underflow() {
    let p = params(0.3, 0.05, 0.02);
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut map = OffsetMap::from_mappings(
            vec![Mapping {
                offset: 2,
                permanence: 0.015,
            }],
            CATALOG_LEN,
            p,
        );
        let result = map.reinforce(0, Some(5), &mut rng);
        assert_eq!(result, Reinforcement::Reassigned);
        let mapping = map.get(0);
        assert!((mapping.permanence - 0.3).abs() < 1e-12);
        assert!(mapping.offset < CATALOG_LEN);
    }
}

#[test]
fn test_repeated_wins_saturate() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut map = OffsetMap::from_mappings(
        vec![Mapping {
            offset: 4,
            permanence: 0.05,
        }],
        CATALOG_LEN,
        params(0.05, 0.05, 0.01),
    );
    for _ in 0..100 {
        map.reinforce(0, Some(4), &mut rng);
    }
    assert!((map.get(0).permanence - 1.0).abs() < 1e-12);
}

#[test]
fn test_losses_eventually_reassign() {
    let mut rng = StdRng::seed_from_u64(2);
    let mut map = OffsetMap::from_mappings(
        vec![Mapping {
            offset: 4,
            permanence: 0.05,
        }],
        CATALOG_LEN,
        params(0.05, 0.05, 0.01),
    );
    let outcomes: Vec<Reinforcement> = (0..5).map(|_| map.reinforce(0, None, &mut rng)).collect();
    assert_eq!(outcomes[..4], [Reinforcement::Weakened; 4]);
    assert_eq!(outcomes[4], Reinforcement::Reassigned);
    assert_eq!(map.reassignments(), 1);
}

#[test]
fn test_forget_resets_confident_mapping() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut map = OffsetMap::from_mappings(
        vec![Mapping {
            offset: 1,
            permanence: 1.0,
        }],
        CATALOG_LEN,
        params(0.05, 0.05, 0.01),
    );
    map.forget(0, &mut rng);
    assert!((map.get(0).permanence - 0.05).abs() < 1e-12);
}
