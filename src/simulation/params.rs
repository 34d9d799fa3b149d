//! Default experiment hyperparameters.

pub const LATTICE_WIDTH: i32 = 3;
pub const OFFSET_WIDTH: i32 = 3; // Must be odd, center is the excluded self-transition
pub const WORLD_WIDTH: i32 = 10;
pub const MAX_LATTICE_WIDTH: i32 = 1024;
pub const MAX_WORLD_WIDTH: i32 = 4096; // width² features must fit a FeatureId

pub const INITIAL_PERMANENCE: f64 = 0.05;
pub const INCREMENT: f64 = 0.05;
pub const DECREMENT: f64 = 0.01;

pub const MEMORY_LENGTH: usize = 10;
pub const TRAIL_LENGTH: usize = 2;

pub const ITERATIONS: u64 = 50_000;
pub const EVAL_INTERVAL: u64 = 100;
pub const CONSISTENCY_THRESHOLD: f64 = 0.99;
pub const SEED: u64 = 42;

/// Absolute tolerance when comparing transformed offsets to displacements.
pub const MATCH_TOLERANCE: f64 = 1e-6;
/// Pivots smaller than this mark a linear system as singular.
pub const SINGULAR_EPSILON: f64 = 1e-9;
/// Floor applied to permanence before inverse weighting.
pub const MIN_WEIGHT_PERMANENCE: f64 = 1e-3;
