//! Terminal dashboard for a running experiment.

pub mod field;
pub mod render;

pub use field::compute_histogram_grid;
pub use render::{draw_ui, mapping_lines};
