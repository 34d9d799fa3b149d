//! Memory systems for the location learner.
//!
//! This module provides:
//! - Associative feature → location memory for loop closure
//! - A short location → feature trail for fold detection
//! - A visitation histogram over lattice cells

pub mod associative;
mod ring_buffer;
pub mod trail;
pub mod visitation;

pub use associative::{AssociativeMemory, Outcome, Recall};
pub use ring_buffer::RingBuffer;
pub use trail::LocationTrail;
pub use visitation::VisitationHistogram;
