//! The location-learning engine.
//!
//! One [`Experiment`] owns the world, the learned offset map, both memories
//! and its own seeded random generator. Each step:
//! 1. Picks a motor with the policy.
//! 2. Moves the true position by the motor's real displacement and the
//!    believed location by the offset the motor is currently mapped to.
//! 3. Senses the feature under the new position and checks memory.
//! 4. On a loop closure, reinforces the motor with the offset that would
//!    have landed on the remembered location.
//! 5. Re-guesses the motor if the believed location folds onto a recent,
//!    different feature.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::simulation::config::ExperimentConfig;
use crate::simulation::consistency::{Consistency, ConsistencyEvaluator};
use crate::simulation::environment::{FeatureId, Position, World};
use crate::simulation::error::{ExperimentError, ExperimentResult};
use crate::simulation::lattice::{Location, LocationLattice, Offset, OffsetCatalog};
use crate::simulation::memory::{
    AssociativeMemory, LocationTrail, Outcome, VisitationHistogram,
};
use crate::simulation::motor::{Displacement, MotorCatalog, MotorId};
use crate::simulation::offset_map::{MotorModel, OffsetMap};
use crate::simulation::policy::MotorPolicy;

/// Running counters, reset only when an experiment is built.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub steps: u64,
    pub first_seen: u64,
    pub good: u64,
    pub bad: u64,
    /// Steps where no motor kept the agent in bounds.
    pub skipped: u64,
    /// Motors re-guessed because the location trail caught a fold.
    pub conflicts: u64,
    pub resets: u64,
}

/// What happened during one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepEvent {
    Moved { motor: MotorId, outcome: Outcome },
    Skipped,
    Reset,
}

/// One row of the periodic record stream.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub step: u64,
    pub first_seen: u64,
    pub bad: u64,
    pub good: u64,
    pub consistency: f64,
    pub reciprocal: f64,
}

/// Final learned belief for one motor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub motor: MotorId,
    pub displacement: Displacement,
    pub offset: Offset,
    pub permanence: f64,
}

/// Everything a finished run reports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub records: Vec<Record>,
    /// Step at which the score first reached the threshold.
    pub converged_at: Option<u64>,
    pub stats: Stats,
    pub consistency: Consistency,
    pub mappings: Vec<MappingEntry>,
    pub visitation: VisitationHistogram,
}

pub struct Experiment<M: MotorModel = OffsetMap> {
    config: ExperimentConfig,
    rng: StdRng,
    world: World,
    motors: MotorCatalog,
    offsets: OffsetCatalog,
    lattice: LocationLattice,
    evaluator: ConsistencyEvaluator,
    model: M,
    memory: AssociativeMemory,
    trail: LocationTrail,
    policy: MotorPolicy,
    visitation: VisitationHistogram,
    position: Position,
    location: Location,
    stats: Stats,
    converged_at: Option<u64>,
}

impl Experiment<OffsetMap> {
    /// Builds an experiment with a freshly generated world.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid.
    pub fn new(config: ExperimentConfig) -> ExperimentResult<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let world = World::random(config.world_width, config.num_features, &mut rng)?;
        Self::build(config, world, rng)
    }

    /// Builds an experiment on a caller-supplied world.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid or the world width differs
    /// from `config.world_width`.
    pub fn with_world(config: ExperimentConfig, world: World) -> ExperimentResult<Self> {
        config.validate()?;
        let rng = StdRng::seed_from_u64(config.seed);
        Self::build(config, world, rng)
    }

    fn build(config: ExperimentConfig, world: World, mut rng: StdRng) -> ExperimentResult<Self> {
        let offsets = OffsetCatalog::new(config.offset_width)?;
        let motors = MotorCatalog::new(config.motors.clone())?;
        let model = OffsetMap::new(motors.len(), offsets.len(), config.reinforcement(), &mut rng);
        Experiment::with_model(config, world, model, rng)
    }
}

impl<M: MotorModel> Experiment<M> {
    /// Builds an experiment around any motor model.
    ///
    /// # Errors
    ///
    /// Fails if the configuration is invalid, the world width differs from
    /// the configured one, or the model covers a different number of motors.
    pub fn with_model(
        config: ExperimentConfig,
        world: World,
        model: M,
        rng: StdRng,
    ) -> ExperimentResult<Self> {
        config.validate()?;
        if world.width() != config.world_width {
            return Err(ExperimentError::WorldMismatch {
                world: world.width(),
                configured: config.world_width,
            });
        }
        let offsets = OffsetCatalog::new(config.offset_width)?;
        let motors = MotorCatalog::new(config.motors.clone())?;
        if model.motor_count() != motors.len() {
            return Err(ExperimentError::InvalidMotors(format!(
                "model covers {} motors, catalog has {}",
                model.motor_count(),
                motors.len()
            )));
        }
        let lattice = LocationLattice::new(config.lattice_width)?;
        let policy = MotorPolicy::new(config.weighting, motors.len())
            .with_script(config.scripted_motors.iter().copied())
            .with_boosting(config.boost_rate, config.boost_decay);

        log::debug!(
            "experiment seed={} lattice={} world={} motors={}",
            config.seed,
            config.lattice_width,
            config.world_width,
            motors.len()
        );

        Ok(Self {
            evaluator: ConsistencyEvaluator::new(config.lattice_width),
            memory: AssociativeMemory::new(config.memory_length),
            trail: LocationTrail::new(config.trail_length),
            visitation: VisitationHistogram::new(&lattice),
            position: world.center(),
            location: Location::default(),
            stats: Stats::default(),
            converged_at: None,
            config,
            rng,
            world,
            motors,
            offsets,
            lattice,
            model,
            policy,
        })
    }

    /// Advances the simulation by one step.
    pub fn step(&mut self) -> StepEvent {
        if let Some(era) = self.config.steps_per_world {
            if self.stats.steps > 0 && self.stats.steps % era == 0 {
                self.regenerate_world();
            }
        }
        self.stats.steps += 1;

        if self.config.reset_chance > 0.0 && self.rng.random::<f64>() < self.config.reset_chance {
            self.reset();
            return StepEvent::Reset;
        }

        let Some(motor) = self.policy.select(
            self.position,
            &self.world,
            self.config.wrap_world,
            &self.motors,
            &self.model,
            &mut self.rng,
        ) else {
            self.stats.skipped += 1;
            return StepEvent::Skipped;
        };

        let Some(displacement) = self.motors.displacement_of(motor) else {
            self.stats.skipped += 1;
            return StepEvent::Skipped;
        };
        let moved = self.position.moved(displacement);
        self.position = if self.config.wrap_world {
            self.world.wrap(moved)
        } else {
            moved
        };

        match self.world.feature_at(self.position) {
            Some(feature) => StepEvent::Moved {
                motor,
                outcome: self.integrate(motor, feature),
            },
            None => {
                self.stats.skipped += 1;
                StepEvent::Skipped
            }
        }
    }

    /// Accepts one externally sourced observation made after issuing `motor`.
    ///
    /// The world position is left untouched; only the believed location,
    /// memories and learned mapping move.
    ///
    /// # Errors
    ///
    /// Returns [`ExperimentError::UnknownMotor`] for an id outside the catalog.
    pub fn feed(&mut self, motor: MotorId, feature: FeatureId) -> ExperimentResult<(Outcome, Stats)> {
        if motor >= self.motors.len() {
            return Err(ExperimentError::UnknownMotor(motor));
        }
        self.stats.steps += 1;
        let outcome = self.integrate(motor, feature);
        Ok((outcome, self.stats))
    }

    // Shared tail of `step` and `feed`: everything after the world has moved.
    fn integrate(&mut self, motor: MotorId, feature: FeatureId) -> Outcome {
        let previous = self.location;
        let believed = self.offsets.get(self.model.get(motor).offset).map_or(previous, |offset| {
            self.lattice.transition(previous, offset)
        });

        let recall = self.memory.observe(feature, believed);
        self.location = recall.location;

        match recall.outcome {
            Outcome::FirstSeen => self.stats.first_seen += 1,
            Outcome::Good => self.stats.good += 1,
            Outcome::Bad => self.stats.bad += 1,
        }

        if recall.outcome != Outcome::FirstSeen {
            let correct = self
                .offsets
                .index_of(self.lattice.displacement(previous, self.location));
            self.model.reinforce(motor, correct, &mut self.rng);
        }

        if self.trail.conflicts(self.location, feature) {
            self.model.forget(motor, &mut self.rng);
            self.stats.conflicts += 1;
        }
        self.trail.push(self.location, feature);
        self.visitation.record(self.location);

        recall.outcome
    }

    fn reset(&mut self) {
        self.position = self.world.random_position(&mut self.rng);
        self.location = self.lattice.random(&mut self.rng);
        self.memory.clear();
        self.trail.clear();
        self.stats.resets += 1;
    }

    fn regenerate_world(&mut self) {
        match World::random(self.config.world_width, self.config.num_features, &mut self.rng) {
            Ok(world) => {
                self.world = world;
                self.memory.clear();
                self.trail.clear();
                log::info!("new world at step {}", self.stats.steps);
            }
            Err(err) => log::warn!("keeping current world: {err}"),
        }
    }

    /// Scores the current mapping against the true displacements.
    #[must_use]
    pub fn evaluate(&self) -> Consistency {
        self.evaluator.evaluate(&self.learned_pairs())
    }

    /// Fraction of reciprocal motor pairs whose learned offsets cancel.
    #[must_use]
    pub fn reciprocal_score(&self) -> f64 {
        let pairs = self.motors.reciprocal_pairs();
        if pairs.is_empty() {
            return 0.0;
        }
        let cancelling = pairs
            .iter()
            .filter(|&&(a, b)| match (self.learned_offset(a), self.learned_offset(b)) {
                (Some(oa), Some(ob)) => self.lattice.equivalent(oa, ob.reversed()),
                _ => false,
            })
            .count();
        cancelling as f64 / pairs.len() as f64
    }

    /// Snapshot of the counters and scores at the current step.
    #[must_use]
    pub fn record(&self) -> Record {
        self.record_with(&self.evaluate())
    }

    fn record_with(&self, consistency: &Consistency) -> Record {
        Record {
            step: self.stats.steps,
            first_seen: self.stats.first_seen,
            bad: self.stats.bad,
            good: self.stats.good,
            consistency: consistency.score,
            reciprocal: self.reciprocal_score(),
        }
    }

    /// Runs until the budget is spent or the score reaches the threshold.
    pub fn run(&mut self) -> RunReport {
        self.run_with(|_| {})
    }

    /// Like [`Self::run`], handing each record to `sink` as it is produced.
    pub fn run_with<F: FnMut(&Record)>(&mut self, mut sink: F) -> RunReport {
        let mut records = Vec::new();
        let mut last = Consistency::none();

        while self.stats.steps < self.config.iterations && self.converged_at.is_none() {
            self.step();
            if self.stats.steps % self.config.eval_interval != 0 {
                continue;
            }
            last = self.evaluate();
            let record = self.record_with(&last);
            log::debug!(
                "step {} first_seen={} bad={} good={} consistency={:.3}",
                record.step,
                record.first_seen,
                record.bad,
                record.good,
                record.consistency
            );
            sink(&record);
            records.push(record);
            if last.score >= self.config.consistency_threshold {
                self.converged_at = Some(self.stats.steps);
            }
        }

        if records.last().map(|record| record.step) != Some(self.stats.steps) {
            last = self.evaluate();
            let record = self.record_with(&last);
            sink(&record);
            records.push(record);
        }

        match self.converged_at {
            Some(step) => log::info!("converged at step {step} (score {:.3})", last.score),
            None => log::info!(
                "no convergence after {} steps (score {:.3})",
                self.stats.steps,
                last.score
            ),
        }

        RunReport {
            records,
            converged_at: self.converged_at,
            stats: self.stats,
            consistency: last,
            mappings: self.mappings(),
            visitation: self.visitation.clone(),
        }
    }

    /// Current learned belief per motor.
    #[must_use]
    pub fn mappings(&self) -> Vec<MappingEntry> {
        self.motors
            .iter()
            .filter_map(|(motor, displacement)| {
                let mapping = self.model.get(motor);
                self.offsets.get(mapping.offset).map(|offset| MappingEntry {
                    motor,
                    displacement,
                    offset,
                    permanence: mapping.permanence,
                })
            })
            .collect()
    }

    fn learned_offset(&self, motor: MotorId) -> Option<Offset> {
        self.offsets.get(self.model.get(motor).offset)
    }

    fn learned_pairs(&self) -> Vec<(Offset, Displacement)> {
        self.mappings()
            .into_iter()
            .map(|entry| (entry.offset, entry.displacement))
            .collect()
    }

    #[must_use]
    pub const fn stats(&self) -> Stats {
        self.stats
    }

    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn converged_at(&self) -> Option<u64> {
        self.converged_at
    }

    #[must_use]
    pub const fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    #[must_use]
    pub const fn model(&self) -> &M {
        &self.model
    }

    #[must_use]
    pub const fn memory(&self) -> &AssociativeMemory {
        &self.memory
    }

    #[must_use]
    pub const fn visitation(&self) -> &VisitationHistogram {
        &self.visitation
    }

    #[must_use]
    pub const fn offsets(&self) -> &OffsetCatalog {
        &self.offsets
    }

    #[must_use]
    pub const fn motors(&self) -> &MotorCatalog {
        &self.motors
    }
}
