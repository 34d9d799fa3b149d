//! Ground-truth motor commands and their world-space displacements.
//!
//! The catalog is fixed at configuration time and never learned; the agent
//! only ever sees motor ids, never the displacements behind them.

use crate::simulation::error::{ExperimentError, ExperimentResult};
use serde::{Deserialize, Serialize};

/// Index into a [`MotorCatalog`].
pub type MotorId = usize;

/// A world-space step taken by a motor command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Displacement {
    pub dx: i32,
    pub dy: i32,
}

impl Displacement {
    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
        }
    }
}

pub const RIGHT: Displacement = Displacement::new(1, 0);
pub const LEFT: Displacement = Displacement::new(-1, 0);
pub const UP: Displacement = Displacement::new(0, -1);
pub const DOWN: Displacement = Displacement::new(0, 1);

/// Bijection from motor id to displacement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MotorCatalog {
    displacements: Vec<Displacement>,
}

impl MotorCatalog {
    /// Validates and wraps a list of displacements; the index is the motor id.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::InvalidMotors`] if the list is empty, holds a
    /// zero displacement, or repeats a displacement.
    pub fn new(displacements: Vec<Displacement>) -> ExperimentResult<Self> {
        if displacements.is_empty() {
            return Err(ExperimentError::InvalidMotors(
                "at least one motor is required".to_string(),
            ));
        }
        for (id, displacement) in displacements.iter().enumerate() {
            if displacement.dx == 0 && displacement.dy == 0 {
                return Err(ExperimentError::InvalidMotors(format!(
                    "motor {id} has a zero displacement"
                )));
            }
            if displacements[..id].contains(displacement) {
                return Err(ExperimentError::InvalidMotors(format!(
                    "motor {id} repeats displacement ({}, {})",
                    displacement.dx, displacement.dy
                )));
            }
        }
        Ok(Self { displacements })
    }

    /// Right, left, up, down.
    #[must_use]
    pub fn cardinal() -> Self {
        Self {
            displacements: cardinal_displacements(),
        }
    }

    /// The cardinal motors followed by the four diagonals.
    #[must_use]
    pub fn octagonal() -> Self {
        let mut displacements = cardinal_displacements();
        displacements.extend([
            Displacement::new(1, 1),
            Displacement::new(-1, -1),
            Displacement::new(1, -1),
            Displacement::new(-1, 1),
        ]);
        Self { displacements }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.displacements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.displacements.is_empty()
    }

    #[must_use]
    pub fn displacement_of(&self, motor: MotorId) -> Option<Displacement> {
        self.displacements.get(motor).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (MotorId, Displacement)> + '_ {
        self.displacements.iter().copied().enumerate()
    }

    /// Motor pairs `(a, b)`, `a < b`, whose displacements cancel.
    #[must_use]
    pub fn reciprocal_pairs(&self) -> Vec<(MotorId, MotorId)> {
        let mut pairs = Vec::new();
        for (a, da) in self.iter() {
            for (b, db) in self.iter().skip(a + 1) {
                if da.reversed() == db {
                    pairs.push((a, b));
                }
            }
        }
        pairs
    }
}

impl Default for MotorCatalog {
    fn default() -> Self {
        Self::cardinal()
    }
}

/// Displacements of [`MotorCatalog::cardinal`], usable in configuration defaults.
#[must_use]
pub fn cardinal_displacements() -> Vec<Displacement> {
    vec![RIGHT, LEFT, UP, DOWN]
}
