#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]

//! Learning the geometry of motor commands from loop closures.
//!
//! An agent walks a bounded world of opaque features while tracking a
//! believed position on a small toroidal lattice. Each motor command is
//! mapped to a lattice offset; revisiting a remembered feature tells the
//! agent whether that mapping closed the loop correctly. A periodic
//! consistency check measures whether all learned offsets agree with one
//! global linear transform of the true motor displacements.

pub mod simulation;
pub mod ui;

pub use simulation::{Experiment, ExperimentConfig, ExperimentError, RunReport};
