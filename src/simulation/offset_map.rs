//! Learned motor → offset beliefs.
//!
//! Each motor holds exactly one candidate offset and a permanence in
//! `[0, 1]`. A confirmed loop closure strengthens it; a contradiction
//! weakens it, and once the permanence would reach zero the belief is
//! thrown away and re-guessed uniformly from the catalog.

use crate::simulation::lattice::OffsetId;
use crate::simulation::motor::MotorId;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The current belief for one motor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    pub offset: OffsetId,
    pub permanence: f64,
}

/// What a reinforcement call did to a mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reinforcement {
    Strengthened,
    Weakened,
    Reassigned,
}

/// Learning rates for the win-stay / lose-shift rule.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReinforcementParams {
    pub initial_permanence: f64,
    pub increment: f64,
    pub decrement: f64,
}

/// Interface between the engine and whatever model holds motor beliefs.
pub trait MotorModel {
    /// Number of motors with a belief.
    fn motor_count(&self) -> usize;

    /// Current belief for a motor.
    ///
    /// # Panics
    ///
    /// Implementations may panic on an out-of-range motor id.
    fn get(&self, motor: MotorId) -> Mapping;

    /// Feeds back the offset that would have closed the loop, or `None`
    /// when no catalog offset explains the observed displacement.
    fn reinforce<R: Rng + ?Sized>(
        &mut self,
        motor: MotorId,
        observed: Option<OffsetId>,
        rng: &mut R,
    ) -> Reinforcement;

    /// Discards the belief for a motor and guesses again.
    fn forget<R: Rng + ?Sized>(&mut self, motor: MotorId, rng: &mut R);
}

/// Single-hypothesis offset map with a scalar confidence per motor.
#[derive(Clone, Debug)]
pub struct OffsetMap {
    mappings: Vec<Mapping>,
    catalog_len: usize,
    params: ReinforcementParams,
    reassignments: u64,
}

impl OffsetMap {
    /// Gives every motor a random offset at the initial permanence.
    ///
    /// # Panics
    ///
    /// Panics if `catalog_len` is zero.
    pub fn new<R: Rng + ?Sized>(
        motor_count: usize,
        catalog_len: usize,
        params: ReinforcementParams,
        rng: &mut R,
    ) -> Self {
        assert!(catalog_len > 0, "offset catalog must not be empty");
        let mappings = (0..motor_count)
            .map(|_| Mapping {
                offset: rng.random_range(0..catalog_len),
                permanence: params.initial_permanence,
            })
            .collect();
        Self {
            mappings,
            catalog_len,
            params,
            reassignments: 0,
        }
    }

    /// Builds a map from explicit beliefs, used to seed known states.
    #[must_use]
    pub fn from_mappings(
        mappings: Vec<Mapping>,
        catalog_len: usize,
        params: ReinforcementParams,
    ) -> Self {
        Self {
            mappings,
            catalog_len,
            params,
            reassignments: 0,
        }
    }

    /// Number of forget-and-re-guess transitions so far.
    #[must_use]
    pub const fn reassignments(&self) -> u64 {
        self.reassignments
    }

    pub fn iter(&self) -> impl Iterator<Item = (MotorId, Mapping)> + '_ {
        self.mappings.iter().copied().enumerate()
    }

    fn reassign<R: Rng + ?Sized>(&mut self, motor: MotorId, rng: &mut R) {
        let mapping = &mut self.mappings[motor];
        mapping.offset = rng.random_range(0..self.catalog_len);
        mapping.permanence = self.params.initial_permanence;
        self.reassignments += 1;
        log::trace!("motor {motor} re-guessed as offset {}", mapping.offset);
    }
}

impl MotorModel for OffsetMap {
    fn motor_count(&self) -> usize {
        self.mappings.len()
    }

    fn get(&self, motor: MotorId) -> Mapping {
        self.mappings[motor]
    }

    fn reinforce<R: Rng + ?Sized>(
        &mut self,
        motor: MotorId,
        observed: Option<OffsetId>,
        rng: &mut R,
    ) -> Reinforcement {
        let ReinforcementParams {
            increment,
            decrement,
            ..
        } = self.params;
        let mapping = &mut self.mappings[motor];

        if observed == Some(mapping.offset) {
            mapping.permanence = (mapping.permanence + increment).clamp(0.0, 1.0);
            return Reinforcement::Strengthened;
        }

        if mapping.permanence <= decrement {
            self.reassign(motor, rng);
            Reinforcement::Reassigned
        } else {
            mapping.permanence = (mapping.permanence - decrement).clamp(0.0, 1.0);
            Reinforcement::Weakened
        }
    }

    fn forget<R: Rng + ?Sized>(&mut self, motor: MotorId, rng: &mut R) {
        self.reassign(motor, rng);
    }
}
