pub mod config;
pub mod consistency;
pub mod environment;
pub mod error;
pub mod experiment;
pub mod lattice;
pub mod memory;
pub mod motor;
pub mod offset_map;
pub mod params;
pub mod policy;
pub mod trials;

pub use config::ExperimentConfig;
pub use consistency::{Consistency, ConsistencyEvaluator, Transform};
pub use environment::{FeatureId, Position, World};
pub use error::{ExperimentError, ExperimentResult};
pub use experiment::{Experiment, MappingEntry, Record, RunReport, Stats, StepEvent};
pub use lattice::{Location, LocationLattice, Offset, OffsetCatalog, OffsetId};
pub use memory::Outcome;
pub use motor::{Displacement, MotorCatalog, MotorId};
pub use offset_map::{Mapping, MotorModel, OffsetMap, Reinforcement, ReinforcementParams};
pub use policy::{MotorPolicy, SelectionWeighting};
