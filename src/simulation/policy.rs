//! Stochastic motor selection.
//!
//! Candidates are the motors whose true displacement keeps the agent inside
//! the world. Among them a motor is drawn with probability proportional to
//! a weight derived from its permanence, plus an optional exploration boost
//! that grows while a motor goes unused.

use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::simulation::environment::{Position, World};
use crate::simulation::motor::{MotorCatalog, MotorId};
use crate::simulation::offset_map::MotorModel;
use crate::simulation::params::MIN_WEIGHT_PERMANENCE;

/// Maps a motor's permanence to its selection weight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionWeighting {
    /// Every candidate equally likely.
    Uniform,
    /// `1 / p²`: unsure motors are tried far more often.
    #[default]
    InverseSquare,
    /// `p²`: confident motors dominate.
    Square,
}

impl SelectionWeighting {
    #[must_use]
    pub fn weight(self, permanence: f64) -> f64 {
        match self {
            Self::Uniform => 1.0,
            Self::InverseSquare => permanence.max(MIN_WEIGHT_PERMANENCE).powi(-2),
            Self::Square => permanence.powi(2),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MotorPolicy {
    weighting: SelectionWeighting,
    script: VecDeque<MotorId>,
    boosts: Vec<f64>,
    boost_rate: f64,
    boost_decay: f64,
}

impl MotorPolicy {
    #[must_use]
    pub fn new(weighting: SelectionWeighting, motor_count: usize) -> Self {
        Self {
            weighting,
            script: VecDeque::new(),
            boosts: vec![0.0; motor_count],
            boost_rate: 0.0,
            boost_decay: 0.0,
        }
    }

    /// Queues motors to issue, front first, before sampling starts.
    #[must_use]
    pub fn with_script(mut self, script: impl IntoIterator<Item = MotorId>) -> Self {
        self.script.extend(script);
        self
    }

    /// Enables boosting: every step each boost grows by `rate`, and the
    /// chosen motor's boost is multiplied by `decay`.
    #[must_use]
    pub const fn with_boosting(mut self, rate: f64, decay: f64) -> Self {
        self.boost_rate = rate;
        self.boost_decay = decay;
        self
    }

    #[must_use]
    pub fn boost(&self, motor: MotorId) -> f64 {
        self.boosts.get(motor).copied().unwrap_or(0.0)
    }

    /// Chooses the next motor, or `None` when no motor keeps the agent in
    /// bounds. Bounds are ignored when `wrap` is set.
    pub fn select<M: MotorModel, R: Rng + ?Sized>(
        &mut self,
        position: Position,
        world: &World,
        wrap: bool,
        motors: &MotorCatalog,
        model: &M,
        rng: &mut R,
    ) -> Option<MotorId> {
        let in_bounds = |motor: MotorId| {
            wrap || motors
                .displacement_of(motor)
                .is_some_and(|displacement| world.contains(position.moved(displacement)))
        };

        // Scripted motors that would leave the world are dropped.
        while let Some(motor) = self.script.pop_front() {
            if in_bounds(motor) {
                self.settle_boosts(motor);
                return Some(motor);
            }
        }

        let candidates: Vec<(MotorId, f64)> = (0..motors.len())
            .filter(|&motor| in_bounds(motor))
            .map(|motor| {
                let weight = self.weighting.weight(model.get(motor).permanence) + self.boost(motor);
                (motor, weight)
            })
            .collect();

        let motor = draw(&candidates, rng)?;
        self.settle_boosts(motor);
        Some(motor)
    }

    fn settle_boosts(&mut self, chosen: MotorId) {
        if self.boost_rate <= 0.0 {
            return;
        }
        for boost in &mut self.boosts {
            *boost += self.boost_rate;
        }
        if let Some(boost) = self.boosts.get_mut(chosen) {
            *boost *= self.boost_decay;
        }
    }
}

/// Cumulative-weight draw against a uniform value in `[0, total)`.
///
/// Falls back to a uniform pick if the weights do not sum to a positive
/// finite total.
fn draw<R: Rng + ?Sized>(candidates: &[(MotorId, f64)], rng: &mut R) -> Option<MotorId> {
    if candidates.is_empty() {
        return None;
    }
    let total: f64 = candidates.iter().map(|&(_, weight)| weight).sum();
    if !(total.is_finite() && total > 0.0) {
        return Some(candidates[rng.random_range(0..candidates.len())].0);
    }

    let target = rng.random::<f64>() * total;
    let mut cumulative = 0.0;
    for &(motor, weight) in candidates {
        cumulative += weight;
        if target < cumulative {
            return Some(motor);
        }
    }
    candidates.last().map(|&(motor, _)| motor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_inverse_square_prefers_low_permanence() {
        let weighting = SelectionWeighting::InverseSquare;
        assert!(weighting.weight(0.1) > weighting.weight(0.9));
        assert!((weighting.weight(1.0) - 1.0).abs() < 1e-12);
        assert!(weighting.weight(0.0).is_finite());
    }

    #[test]
    fn test_draw_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(draw(&[], &mut rng).is_none());
    }

    #[test]
    fn test_draw_skips_zero_weight() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..100 {
            assert_eq!(draw(&[(0, 0.0), (1, 1.0), (2, 0.0)], &mut rng), Some(1));
        }
    }

    #[test]
    fn test_draw_zero_total_falls_back_to_uniform() {
        let mut rng = StdRng::seed_from_u64(0);
        let picked = draw(&[(3, 0.0), (5, 0.0)], &mut rng);
        assert!(matches!(picked, Some(3 | 5)));
    }
}
