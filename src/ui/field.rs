use crate::simulation::lattice::Location;
use crate::simulation::memory::VisitationHistogram;
use rayon::prelude::*;

pub const CHARS: [char; 10] = [' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Shades the visitation histogram onto a `rows × cols` character grid.
///
/// Each character samples the lattice cell under it; brightness is the
/// cell's visits relative to the busiest cell.
#[allow(clippy::cast_precision_loss)]
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_sign_loss)]
#[must_use]
pub fn compute_histogram_grid(
    histogram: &VisitationHistogram,
    rows: usize,
    cols: usize,
) -> Vec<String> {
    if rows == 0 || cols == 0 {
        return Vec::new();
    }

    let width = histogram.width().max(1) as usize;
    let max = histogram.max_visits();
    let scale_y = width as f64 / rows as f64;
    let scale_x = width as f64 / cols as f64;

    // Use rayon to compute rows in parallel
    (0..rows)
        .into_par_iter()
        .map(|r| {
            let mut line = String::with_capacity(cols);
            for c in 0..cols {
                let cell_y = ((r as f64 * scale_y) as usize).min(width - 1);
                let cell_x = ((c as f64 * scale_x) as usize).min(width - 1);
                let visits = histogram.visits(Location::new(cell_x as i32, cell_y as i32));

                let val = if max == 0 {
                    0.0
                } else {
                    visits as f64 / max as f64
                };
                let idx = (val * (CHARS.len() - 1) as f64).round() as usize;
                line.push(CHARS[idx.min(CHARS.len() - 1)]);
            }
            line
        })
        .collect()
}
