use crate::simulation::error::{ExperimentError, ExperimentResult};
use crate::simulation::lattice::cell_count;
use crate::simulation::motor::Displacement;
use crate::simulation::params::MAX_WORLD_WIDTH;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Opaque identifier of a sensed feature.
pub type FeatureId = u32;

/// The agent's ground-truth cell in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn moved(self, displacement: Displacement) -> Self {
        Self {
            x: self.x + displacement.dx,
            y: self.y + displacement.dy,
        }
    }
}

/// Represents the square field of features the agent walks over.
///
/// The world has no learned state. It is generated once per era and only
/// answers which feature lies under a position.
#[derive(Clone, Debug)]
pub struct World {
    width: i32,
    features: Vec<FeatureId>,
}

impl World {
    /// Generates a random world.
    ///
    /// Without a feature count (or with at least `width²` features) every
    /// cell holds a distinct feature from a shuffled `0..width²`. Otherwise
    /// each cell draws uniformly from `0..num_features`, so features repeat.
    ///
    /// # Errors
    ///
    /// Returns an error if `width` is not positive or above
    /// [`MAX_WORLD_WIDTH`], or if `num_features` is zero.
    pub fn random<R: Rng + ?Sized>(
        width: i32,
        num_features: Option<u32>,
        rng: &mut R,
    ) -> ExperimentResult<Self> {
        let cells = cell_count("world_width", width, MAX_WORLD_WIDTH)?;
        let features = match num_features {
            Some(0) => return Err(ExperimentError::ZeroLength { name: "num_features" }),
            Some(count) if (count as usize) < cells => {
                (0..cells).map(|_| rng.random_range(0..count)).collect()
            }
            _ => {
                let count = FeatureId::try_from(cells).map_err(|_| ExperimentError::WidthTooLarge {
                    name: "world_width",
                    value: width,
                    max: MAX_WORLD_WIDTH,
                })?;
                let mut features: Vec<FeatureId> = (0..count).collect();
                features.shuffle(rng);
                features
            }
        };
        Ok(Self { width, features })
    }

    /// A world holding one feature everywhere.
    ///
    /// # Errors
    ///
    /// Returns an error if `width` is not positive or above [`MAX_WORLD_WIDTH`].
    pub fn uniform(width: i32, feature: FeatureId) -> ExperimentResult<Self> {
        let cells = cell_count("world_width", width, MAX_WORLD_WIDTH)?;
        Ok(Self {
            width,
            features: vec![feature; cells],
        })
    }

    /// Builds a world from row-major features.
    ///
    /// # Errors
    ///
    /// Returns an error if `features.len()` is not `width²`.
    pub fn from_features(width: i32, features: Vec<FeatureId>) -> ExperimentResult<Self> {
        let cells = cell_count("world_width", width, MAX_WORLD_WIDTH)?;
        if features.len() != cells {
            return Err(ExperimentError::FeatureCount {
                expected: cells,
                got: features.len(),
            });
        }
        Ok(Self { width, features })
    }

    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// True if the position lies inside the world.
    #[must_use]
    pub const fn contains(&self, position: Position) -> bool {
        position.x >= 0 && position.x < self.width && position.y >= 0 && position.y < self.width
    }

    /// Wraps a position onto the world as if it were a torus.
    #[must_use]
    pub const fn wrap(&self, position: Position) -> Position {
        Position::new(
            position.x.rem_euclid(self.width),
            position.y.rem_euclid(self.width),
        )
    }

    /// Returns the feature at a position, or `None` outside the world.
    #[must_use]
    pub fn feature_at(&self, position: Position) -> Option<FeatureId> {
        if !self.contains(position) {
            return None;
        }
        let index = (position.y * self.width + position.x) as usize;
        self.features.get(index).copied()
    }

    /// The central cell, where each run starts.
    #[must_use]
    pub const fn center(&self) -> Position {
        Position::new(self.width / 2, self.width / 2)
    }

    /// Random position, uniform over the world.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        Position::new(
            rng.random_range(0..self.width),
            rng.random_range(0..self.width),
        )
    }
}
