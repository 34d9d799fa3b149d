//! Tests for world generation and lookup.

use location_learning::simulation::environment::{Position, World};
use location_learning::simulation::error::ExperimentError;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_random_world_is_permutation() {
    let mut rng = StdRng::seed_from_u64(5);
    let world = World::random(10, None, &mut rng).unwrap();
    let mut seen: Vec<u32> = (0..10)
        .flat_map(|y| (0..10).map(move |x| Position::new(x, y)))
        .map(|p| world.feature_at(p).unwrap())
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..100).collect::<Vec<u32>>());
}

#[test]
fn test_random_world_with_few_features() {
    let mut rng = StdRng::seed_from_u64(5);
    let world = World::random(6, Some(3), &mut rng).unwrap();
    for y in 0..6 {
        for x in 0..6 {
            assert!(world.feature_at(Position::new(x, y)).unwrap() < 3);
        }
    }
}

#[test]
fn test_same_seed_same_world() {
    let a = World::random(8, None, &mut StdRng::seed_from_u64(9)).unwrap();
    let b = World::random(8, None, &mut StdRng::seed_from_u64(9)).unwrap();
    for y in 0..8 {
        for x in 0..8 {
            let p = Position::new(x, y);
            assert_eq!(a.feature_at(p), b.feature_at(p));
        }
    }
}

#[test]
fn test_feature_lookup_outside_world() {
    let world = World::uniform(4, 7).unwrap();
    assert_eq!(world.feature_at(Position::new(3, 3)), Some(7));
    assert_eq!(world.feature_at(Position::new(4, 0)), None);
    assert_eq!(world.feature_at(Position::new(0, -1)), None);
}

#[test]
fn test_wrap_and_center() {
    let world = World::uniform(10, 0).unwrap();
    assert_eq!(world.center(), Position::new(5, 5));
    assert_eq!(world.wrap(Position::new(-1, 10)), Position::new(9, 0));
}

#[test]
fn test_from_features_checks_length() {
    assert_eq!(
        World::from_features(2, vec![1, 2, 3]).unwrap_err(),
        ExperimentError::FeatureCount {
            expected: 4,
            got: 3
        }
    );
    let world = World::from_features(2, vec![1, 2, 3, 4]).unwrap();
    assert_eq!(world.feature_at(Position::new(1, 0)), Some(2));
    assert_eq!(world.feature_at(Position::new(0, 1)), Some(3));
}

#[test]
fn test_invalid_widths() {
    let mut rng = StdRng::seed_from_u64(0);
    assert!(World::random(0, None, &mut rng).is_err());
    assert!(World::uniform(-3, 1).is_err());
    assert!(World::random(4, Some(0), &mut rng).is_err());
    assert!(matches!(
        World::random(70_000, None, &mut rng),
        Err(ExperimentError::WidthTooLarge { value: 70_000, .. })
    ));
    assert!(matches!(
        World::uniform(70_000, 1),
        Err(ExperimentError::WidthTooLarge { .. })
    ));
}
