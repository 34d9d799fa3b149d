//! Experiment configuration.
//!
//! Every constant of the learner is injected here and validated once, when
//! an [`Experiment`](crate::simulation::Experiment) is built.

use serde::{Deserialize, Serialize};

use crate::simulation::error::{ExperimentError, ExperimentResult};
use crate::simulation::lattice::cell_count;
use crate::simulation::motor::{cardinal_displacements, Displacement, MotorId};
use crate::simulation::offset_map::ReinforcementParams;
use crate::simulation::params;
use crate::simulation::policy::SelectionWeighting;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Width `W` of the toroidal location lattice.
    pub lattice_width: i32,
    /// Width `K` of the offset catalog; odd, at most `W`.
    pub offset_width: i32,
    /// Width of the square world.
    pub world_width: i32,
    /// Distinct features to draw from; `None` gives every cell its own.
    pub num_features: Option<u32>,
    /// Let world moves wrap instead of bounds-checking them.
    pub wrap_world: bool,
    /// Ground-truth displacement per motor id.
    pub motors: Vec<Displacement>,

    pub initial_permanence: f64,
    pub increment: f64,
    pub decrement: f64,

    /// Sightings held by the associative memory window.
    pub memory_length: usize,
    /// Recent `(location, feature)` pairs checked for folds; 0 disables.
    pub trail_length: usize,

    /// Step budget.
    pub iterations: u64,
    /// Steps between consistency evaluations.
    pub eval_interval: u64,
    /// Score at which a run stops early.
    pub consistency_threshold: f64,
    pub seed: u64,

    pub weighting: SelectionWeighting,
    /// Added to every motor's selection boost each step.
    pub boost_rate: f64,
    /// Factor applied to the chosen motor's boost.
    pub boost_decay: f64,
    /// Chance per step of teleporting and clearing short-term memory.
    pub reset_chance: f64,
    /// Regenerate the world every this many steps.
    pub steps_per_world: Option<u64>,
    /// Motors issued before the policy starts sampling.
    pub scripted_motors: Vec<MotorId>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            lattice_width: params::LATTICE_WIDTH,
            offset_width: params::OFFSET_WIDTH,
            world_width: params::WORLD_WIDTH,
            num_features: None,
            wrap_world: false,
            motors: cardinal_displacements(),
            initial_permanence: params::INITIAL_PERMANENCE,
            increment: params::INCREMENT,
            decrement: params::DECREMENT,
            memory_length: params::MEMORY_LENGTH,
            trail_length: params::TRAIL_LENGTH,
            iterations: params::ITERATIONS,
            eval_interval: params::EVAL_INTERVAL,
            consistency_threshold: params::CONSISTENCY_THRESHOLD,
            seed: params::SEED,
            weighting: SelectionWeighting::default(),
            boost_rate: 0.0,
            boost_decay: 0.0,
            reset_chance: 0.0,
            steps_per_world: None,
            scripted_motors: Vec::new(),
        }
    }
}

impl ExperimentConfig {
    /// Checks every field, failing on the first invalid one.
    ///
    /// Motor displacements are checked when the catalog is built.
    ///
    /// # Errors
    ///
    /// Returns the [`ExperimentError`] describing the first invalid field.
    pub fn validate(&self) -> ExperimentResult<()> {
        cell_count("lattice_width", self.lattice_width, params::MAX_LATTICE_WIDTH)?;
        cell_count("world_width", self.world_width, params::MAX_WORLD_WIDTH)?;

        if self.offset_width < 3 || self.offset_width % 2 == 0 {
            return Err(ExperimentError::InvalidOffsetWidth(self.offset_width));
        }
        if self.offset_width > self.lattice_width {
            return Err(ExperimentError::OffsetWiderThanLattice {
                offset_width: self.offset_width,
                lattice_width: self.lattice_width,
            });
        }

        unit("initial_permanence", self.initial_permanence)?;
        unit("increment", self.increment)?;
        unit("decrement", self.decrement)?;
        unit("consistency_threshold", self.consistency_threshold)?;
        unit("reset_chance", self.reset_chance)?;
        unit("boost_decay", self.boost_decay)?;
        if !(self.boost_rate.is_finite() && self.boost_rate >= 0.0) {
            return Err(ExperimentError::OutOfUnitRange {
                name: "boost_rate",
                value: self.boost_rate,
            });
        }

        if self.memory_length == 0 {
            return Err(ExperimentError::ZeroLength {
                name: "memory_length",
            });
        }
        if self.eval_interval == 0 {
            return Err(ExperimentError::ZeroLength {
                name: "eval_interval",
            });
        }
        if self.steps_per_world == Some(0) {
            return Err(ExperimentError::ZeroLength {
                name: "steps_per_world",
            });
        }
        if self.num_features == Some(0) {
            return Err(ExperimentError::ZeroLength {
                name: "num_features",
            });
        }
        if self.trail_length >= self.lattice_width as usize {
            return Err(ExperimentError::TrailTooLong {
                value: self.trail_length,
                lattice_width: self.lattice_width,
            });
        }
        if let Some(&motor) = self
            .scripted_motors
            .iter()
            .find(|&&motor| motor >= self.motors.len())
        {
            return Err(ExperimentError::UnknownMotor(motor));
        }
        Ok(())
    }

    /// Learning rates handed to the offset map.
    #[must_use]
    pub const fn reinforcement(&self) -> ReinforcementParams {
        ReinforcementParams {
            initial_permanence: self.initial_permanence,
            increment: self.increment,
            decrement: self.decrement,
        }
    }
}

fn unit(name: &'static str, value: f64) -> ExperimentResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ExperimentError::OutOfUnitRange { name, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ExperimentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_non_positive_lattice() {
        let config = ExperimentConfig {
            lattice_width: 0,
            ..ExperimentConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ExperimentError::NonPositiveWidth {
                name: "lattice_width",
                value: 0
            })
        );
    }

    #[test]
    fn test_rejects_oversized_widths() {
        let config = ExperimentConfig {
            lattice_width: 50_001,
            ..ExperimentConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ExperimentError::WidthTooLarge {
                name: "lattice_width",
                value: 50_001,
                max: params::MAX_LATTICE_WIDTH
            })
        );

        let config = ExperimentConfig {
            world_width: 70_000,
            ..ExperimentConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ExperimentError::WidthTooLarge {
                name: "world_width",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_rates_outside_unit_interval() {
        let config = ExperimentConfig {
            increment: 1.5,
            ..ExperimentConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ExperimentError::OutOfUnitRange {
                name: "increment",
                ..
            })
        ));

        let config = ExperimentConfig {
            decrement: -0.1,
            ..ExperimentConfig::default()
        };
        assert!(config.validate().is_err());

        let config = ExperimentConfig {
            decrement: f64::NAN,
            ..ExperimentConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_trail_as_long_as_lattice() {
        let config = ExperimentConfig {
            trail_length: 3,
            ..ExperimentConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ExperimentError::TrailTooLong { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_scripted_motor() {
        let config = ExperimentConfig {
            scripted_motors: vec![0, 9],
            ..ExperimentConfig::default()
        };
        assert_eq!(config.validate(), Err(ExperimentError::UnknownMotor(9)));
    }
}
