//! Global consistency of the learned motor mappings.
//!
//! For a pair of motors, the two equations `displacement = offset · T`
//! pin down a 2×2 transform `T`. Applying `T` to every learned offset and
//! comparing the result (modulo the lattice width) with the true
//! displacement tells how many motors that single transform explains.
//!
//! ```text
//! [ox₁ 0   oy₁ 0  ] [a]   [dx₁]
//! [0   ox₁ 0   oy₁] [b] = [dy₁]        T = [a b]
//! [ox₂ 0   oy₂ 0  ] [c]   [dx₂]            [c d]
//! [0   ox₂ 0   oy₂] [d]   [dy₂]
//! ```

use serde::{Deserialize, Serialize};

use crate::simulation::lattice::Offset;
use crate::simulation::motor::{Displacement, MotorId};
use crate::simulation::params::{MATCH_TOLERANCE, SINGULAR_EPSILON};

/// Row-vector linear map from lattice offsets to world displacements.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub m: [[f64; 2]; 2],
}

impl Transform {
    /// `offset · T`
    #[must_use]
    pub fn apply(&self, offset: Offset) -> (f64, f64) {
        let (x, y) = (f64::from(offset.dx), f64::from(offset.dy));
        (
            x * self.m[0][0] + y * self.m[1][0],
            x * self.m[0][1] + y * self.m[1][1],
        )
    }
}

/// Best transform found and the fraction of motors it explains.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Consistency {
    pub score: f64,
    pub transform: Option<Transform>,
    /// Motors whose equations produced the transform.
    pub pair: Option<(MotorId, MotorId)>,
}

impl Consistency {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            score: 0.0,
            transform: None,
            pair: None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ConsistencyEvaluator {
    lattice_width: f64,
}

impl ConsistencyEvaluator {
    #[must_use]
    pub fn new(lattice_width: i32) -> Self {
        Self {
            lattice_width: f64::from(lattice_width),
        }
    }

    /// Scores every motor pair and keeps the best.
    ///
    /// `mappings[i]` is motor `i`'s learned offset and true displacement.
    /// Pairs are tried as `(i, j)`, `i < j`, ascending; a later pair must
    /// score strictly higher to replace an earlier one.
    #[must_use]
    pub fn evaluate(&self, mappings: &[(Offset, Displacement)]) -> Consistency {
        if mappings.is_empty() {
            return Consistency::none();
        }

        let mut best = Consistency::none();
        for i in 0..mappings.len() {
            for j in (i + 1)..mappings.len() {
                let Some(transform) = solve_pair(mappings[i], mappings[j]) else {
                    continue;
                };
                let score = self.score(&transform, mappings);
                if best.transform.is_none() || score > best.score {
                    best = Consistency {
                        score,
                        transform: Some(transform),
                        pair: Some((i, j)),
                    };
                }
            }
        }
        best
    }

    /// Fraction of mappings the transform explains.
    #[must_use]
    pub fn score(&self, transform: &Transform, mappings: &[(Offset, Displacement)]) -> f64 {
        if mappings.is_empty() {
            return 0.0;
        }
        let matches = mappings
            .iter()
            .filter(|&&(offset, displacement)| self.explains(transform, offset, displacement))
            .count();
        matches as f64 / mappings.len() as f64
    }

    // Matches are taken modulo the lattice width, so a displacement outside
    // the centered range (e.g. `(2, 0)` with `W = 3`) still counts.
    fn explains(&self, transform: &Transform, offset: Offset, displacement: Displacement) -> bool {
        let (x, y) = transform.apply(offset);
        let (x, y) = (self.wrap(x), self.wrap(y));
        self.wrapped_distance(x, f64::from(displacement.dx)) < MATCH_TOLERANCE
            && self.wrapped_distance(y, f64::from(displacement.dy)) < MATCH_TOLERANCE
    }

    /// Wraps a coordinate into the centered range `[-W/2, W/2)`.
    #[must_use]
    pub fn wrap(&self, value: f64) -> f64 {
        let half = self.lattice_width / 2.0;
        (value + half).rem_euclid(self.lattice_width) - half
    }

    // Compared on the circle so values straddling the range edge still match.
    fn wrapped_distance(&self, a: f64, b: f64) -> f64 {
        let diff = a - b;
        (diff - self.lattice_width * (diff / self.lattice_width).round()).abs()
    }
}

/// Solves the 4×4 system for one motor pair; `None` when singular.
fn solve_pair(
    (o1, d1): (Offset, Displacement),
    (o2, d2): (Offset, Displacement),
) -> Option<Transform> {
    let (ox1, oy1) = (f64::from(o1.dx), f64::from(o1.dy));
    let (ox2, oy2) = (f64::from(o2.dx), f64::from(o2.dy));
    let mut system = [
        [ox1, 0.0, oy1, 0.0, f64::from(d1.dx)],
        [0.0, ox1, 0.0, oy1, f64::from(d1.dy)],
        [ox2, 0.0, oy2, 0.0, f64::from(d2.dx)],
        [0.0, ox2, 0.0, oy2, f64::from(d2.dy)],
    ];
    let [a, b, c, d] = gaussian_elimination(&mut system)?;
    Some(Transform {
        m: [[a, b], [c, d]],
    })
}

/// Gaussian elimination with partial pivoting on an augmented 4×5 matrix.
fn gaussian_elimination(system: &mut [[f64; 5]; 4]) -> Option<[f64; 4]> {
    for col in 0..4 {
        let pivot = (col..4).max_by(|&a, &b| system[a][col].abs().total_cmp(&system[b][col].abs()))?;
        if system[pivot][col].abs() < SINGULAR_EPSILON {
            return None;
        }
        system.swap(col, pivot);

        for row in (col + 1)..4 {
            let factor = system[row][col] / system[col][col];
            for k in col..5 {
                system[row][k] -= factor * system[col][k];
            }
        }
    }

    let mut solution = [0.0; 4];
    for row in (0..4).rev() {
        let tail: f64 = ((row + 1)..4).map(|k| system[row][k] * solution[k]).sum();
        solution[row] = (system[row][4] - tail) / system[row][row];
    }
    Some(solution)
}
