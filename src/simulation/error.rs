//! Error types for experiment construction and external feeding.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExperimentError {
    #[error("{name} must be positive, got {value}")]
    NonPositiveWidth { name: &'static str, value: i32 },

    #[error("{name} {value} exceeds the maximum of {max}")]
    WidthTooLarge {
        name: &'static str,
        value: i32,
        max: i32,
    },

    #[error("{name} must lie in [0, 1], got {value}")]
    OutOfUnitRange { name: &'static str, value: f64 },

    #[error("offset width must be odd and at least 3, got {0}")]
    InvalidOffsetWidth(i32),

    #[error("offset width {offset_width} exceeds the lattice width {lattice_width}")]
    OffsetWiderThanLattice { offset_width: i32, lattice_width: i32 },

    #[error("trail length {value} must be smaller than the lattice width {lattice_width}")]
    TrailTooLong { value: usize, lattice_width: i32 },

    #[error("{name} must be at least 1")]
    ZeroLength { name: &'static str },

    #[error("invalid motor catalog: {0}")]
    InvalidMotors(String),

    #[error("world width {world} does not match configured width {configured}")]
    WorldMismatch { world: i32, configured: i32 },

    #[error("world needs {expected} features, got {got}")]
    FeatureCount { expected: usize, got: usize },

    #[error("unknown motor id {0}")]
    UnknownMotor(usize),
}

pub type ExperimentResult<T> = Result<T, ExperimentError>;
