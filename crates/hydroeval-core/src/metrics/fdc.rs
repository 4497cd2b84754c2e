//! Flow-duration-curve signatures (Yilmaz et al., 2008).
//!
//! Each metric sorts the masked observed and simulated flows in descending
//! order and compares a segment of the two curves. Rank positions are
//! `round(fraction * N)` with ties rounded to even.
use super::constants::FDC_EPSILON;
use crate::error::{EvalError, Result};
use crate::series::TimeSeries;
use crate::validation::validated_pair;

/// Percent bias of the FDC mid-segment slope.
///
/// `lower` and `upper` bound the segment as fractions of the curve and must
/// satisfy `0 < lower < upper < 1`.
pub fn fdc_fms(obs: &TimeSeries, sim: &TimeSeries, lower: f64, upper: f64) -> Result<f64> {
    let pair = validated_pair(obs, sim)?;
    if pair.is_empty() {
        return Ok(f64::NAN);
    }
    if !in_open_unit_interval(lower) || !in_open_unit_interval(upper) {
        return Err(EvalError::InvalidArgument(format!(
            "upper and lower have to be in range ]0,1[, got lower={lower}, upper={upper}"
        )));
    }
    if lower >= upper {
        return Err(EvalError::InvalidArgument(format!(
            "lower threshold {lower} has to be smaller than upper {upper}"
        )));
    }

    let mut obs_fdc = flow_duration_curve(&pair.observed);
    let mut sim_fdc = flow_duration_curve(&pair.simulated);
    floor_non_positive(&mut obs_fdc);
    floor_non_positive(&mut sim_fdc);

    let n = obs_fdc.len();
    let lo = clamped_rank(lower, n);
    let up = clamped_rank(upper, n);

    let sim_slope = sim_fdc[lo].ln() - sim_fdc[up].ln();
    let obs_slope = obs_fdc[lo].ln() - obs_fdc[up].ln();

    Ok(100.0 * (sim_slope - obs_slope) / (obs_slope + FDC_EPSILON))
}

/// Percent bias of the high-flow volume (top `h` fraction of the FDC).
pub fn fdc_fhv(obs: &TimeSeries, sim: &TimeSeries, h: f64) -> Result<f64> {
    let pair = validated_pair(obs, sim)?;
    if pair.is_empty() {
        return Ok(f64::NAN);
    }
    if !in_open_unit_interval(h) {
        return Err(EvalError::InvalidArgument(format!(
            "h has to be in range ]0,1[, got {h}; consider small values, e.g. 0.02 for 2% peak flows"
        )));
    }

    let obs_fdc = flow_duration_curve(&pair.observed);
    let sim_fdc = flow_duration_curve(&pair.simulated);
    let k = rank(h, obs_fdc.len());

    let obs_sum: f64 = obs_fdc[..k].iter().sum();
    let sim_sum: f64 = sim_fdc[..k].iter().sum();

    Ok(100.0 * (sim_sum - obs_sum) / obs_sum)
}

/// Percent bias of the low-flow volume (bottom `l` fraction of the FDC, log
/// space). Positive values mean the simulation is too dry.
pub fn fdc_flv(obs: &TimeSeries, sim: &TimeSeries, l: f64) -> Result<f64> {
    let pair = validated_pair(obs, sim)?;
    if pair.is_empty() {
        return Ok(f64::NAN);
    }
    if !in_open_unit_interval(l) {
        return Err(EvalError::InvalidArgument(format!(
            "l has to be in range ]0,1[, got {l}; consider small values, e.g. 0.3 for 30% low flows"
        )));
    }

    let mut obs_fdc = flow_duration_curve(&pair.observed);
    let mut sim_fdc = flow_duration_curve(&pair.simulated);
    floor_non_positive(&mut obs_fdc);
    floor_non_positive(&mut sim_fdc);

    let n = obs_fdc.len();
    let k = rank(l, n);
    let obs_low = anchored_log_sum(&obs_fdc[n - k..]);
    let sim_low = anchored_log_sum(&sim_fdc[n - k..]);

    Ok(-100.0 * (sim_low - obs_low) / (obs_low + FDC_EPSILON))
}

/// Flows sorted from highest to lowest.
pub fn flow_duration_curve(values: &[f64]) -> Vec<f64> {
    let mut fdc = values.to_vec();
    fdc.sort_unstable_by(|a, b| b.total_cmp(a));
    fdc
}

fn in_open_unit_interval(x: f64) -> bool {
    x > 0.0 && x < 1.0
}

fn floor_non_positive(fdc: &mut [f64]) {
    for q in fdc.iter_mut().filter(|q| **q <= 0.0) {
        *q = FDC_EPSILON;
    }
}

fn rank(fraction: f64, n: usize) -> usize {
    (fraction * n as f64).round_ties_even() as usize
}

// round(0.7 * 3) = 2 is fine, but round(0.9 * 2) = 2 would step past the end
fn clamped_rank(fraction: f64, n: usize) -> usize {
    rank(fraction, n).min(n - 1)
}

/// Sum of log flows measured from the segment's own minimum.
fn anchored_log_sum(segment: &[f64]) -> f64 {
    let logs: Vec<f64> = segment.iter().map(|q| q.ln()).collect();
    let min = logs.iter().copied().fold(f64::INFINITY, f64::min);
    logs.iter().map(|q| q - min).sum()
}
