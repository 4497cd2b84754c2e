//! Input validation and missing-value masking shared by every metric.
use chrono::NaiveDateTime;
use tracing::warn;

use crate::error::{EvalError, Result};
use crate::series::TimeSeries;

/// Observed/simulated values where both are present, with their timestamps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaskedPair {
    pub observed: Vec<f64>,
    pub simulated: Vec<f64>,
    pub timestamps: Vec<NaiveDateTime>,
}

impl MaskedPair {
    /// Number of retained timesteps.
    pub fn len(&self) -> usize {
        self.observed.len()
    }

    /// Returns `true` if no timestep survived masking.
    pub fn is_empty(&self) -> bool {
        self.observed.is_empty()
    }

    /// Drop positions where either value is `NaN`.
    ///
    /// Already-masked pairs come back unchanged.
    pub fn remask(&self) -> MaskedPair {
        filter_valid(&self.observed, &self.simulated, &self.timestamps)
    }
}

/// Check that two series can be compared timestep by timestep.
///
/// Fails when shapes differ, when either series has more than one column,
/// or when the timestamp axes disagree.
pub fn validate_inputs(obs: &TimeSeries, sim: &TimeSeries) -> Result<()> {
    if obs.shape() != sim.shape() {
        return Err(EvalError::ShapeMismatch(format!(
            "observations {:?} and simulations {:?} must have the same shape",
            obs.shape(),
            sim.shape()
        )));
    }
    if obs.shape().1 > 1 {
        return Err(EvalError::ShapeMismatch(format!(
            "metrics are only defined for single-variable time series, got {} columns",
            obs.shape().1
        )));
    }
    if obs.timestamps() != sim.timestamps() {
        return Err(EvalError::ShapeMismatch(
            "observations and simulations must share one timestamp axis".to_string(),
        ));
    }
    Ok(())
}

/// Keep only timesteps where both series are non-missing.
///
/// Callers validate first; the series are assumed to be aligned.
pub fn mask_valid(obs: &TimeSeries, sim: &TimeSeries) -> MaskedPair {
    filter_valid(obs.values(), sim.values(), obs.timestamps())
}

/// Validate, then mask.
pub fn validated_pair(obs: &TimeSeries, sim: &TimeSeries) -> Result<MaskedPair> {
    validate_inputs(obs, sim)?;
    let pair = mask_valid(obs, sim);
    if pair.is_empty() && !obs.is_empty() {
        warn!(n = obs.len(), "no timestep has both an observed and a simulated value");
    }
    Ok(pair)
}

/// Fail with `AllNaN` when either series has no valid value at all.
pub fn check_all_nan(obs: &TimeSeries, sim: &TimeSeries) -> Result<()> {
    if obs.all_nan() || sim.all_nan() {
        return Err(EvalError::AllNaN);
    }
    Ok(())
}

fn filter_valid(obs: &[f64], sim: &[f64], timestamps: &[NaiveDateTime]) -> MaskedPair {
    let mut pair = MaskedPair::default();
    for ((&o, &s), &t) in obs.iter().zip(sim).zip(timestamps) {
        if o.is_nan() || s.is_nan() {
            continue;
        }
        pair.observed.push(o);
        pair.simulated.push(s);
        pair.timestamps.push(t);
    }
    pair
}
