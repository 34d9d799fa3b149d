//! Independent trials run side by side.
//!
//! Experiments share nothing, so a batch is a plain parallel map.

use rayon::prelude::*;

use crate::simulation::config::ExperimentConfig;
use crate::simulation::error::ExperimentResult;
use crate::simulation::experiment::{Experiment, RunReport};

/// Runs each configuration to completion on the rayon pool.
///
/// Results come back in input order.
pub fn run_trials(configs: &[ExperimentConfig]) -> Vec<ExperimentResult<RunReport>> {
    configs
        .par_iter()
        .map(|config| Experiment::new(config.clone()).map(|mut experiment| experiment.run()))
        .collect()
}

/// Runs `base` once per seed.
pub fn seed_sweep(base: &ExperimentConfig, seeds: &[u64]) -> Vec<ExperimentResult<RunReport>> {
    let configs: Vec<ExperimentConfig> = seeds
        .iter()
        .map(|&seed| ExperimentConfig {
            seed,
            ..base.clone()
        })
        .collect();
    let reports = run_trials(&configs);
    log::info!(
        "seed sweep over {} seeds: convergence rate {:.2}",
        seeds.len(),
        convergence_rate(&reports)
    );
    reports
}

/// Fraction of successful reports that converged.
#[must_use]
pub fn convergence_rate(reports: &[ExperimentResult<RunReport>]) -> f64 {
    let finished: Vec<&RunReport> = reports.iter().filter_map(|r| r.as_ref().ok()).collect();
    if finished.is_empty() {
        return 0.0;
    }
    let converged = finished
        .iter()
        .filter(|report| report.converged_at.is_some())
        .count();
    converged as f64 / finished.len() as f64
}
