//! Kling-Gupta Efficiency.
use super::constants::{KGE_WEIGHT_COUNT, MIN_CORRELATION_POINTS};
use super::stats::{mean, pearson, std};
use crate::error::{EvalError, Result};
use crate::series::TimeSeries;
use crate::validation::validated_pair;

/// Kling-Gupta Efficiency. Range: (-inf, 1], 1 = perfect.
///
/// `weights` scale the correlation, variability and bias terms:
/// `1 - sqrt(s_r (r-1)^2 + s_a (alpha-1)^2 + s_b (beta-1)^2)`.
/// Returns `NaN` with fewer than 2 valid pairs.
pub fn kge(obs: &TimeSeries, sim: &TimeSeries, weights: &[f64]) -> Result<f64> {
    if weights.len() != KGE_WEIGHT_COUNT {
        return Err(EvalError::InvalidArgument(format!(
            "KGE needs exactly {} weights, got {}",
            KGE_WEIGHT_COUNT,
            weights.len()
        )));
    }

    let pair = validated_pair(obs, sim)?;
    if pair.len() < MIN_CORRELATION_POINTS {
        return Ok(f64::NAN);
    }

    let r = pearson(&pair.observed, &pair.simulated);
    let alpha = std(&pair.simulated) / std(&pair.observed);
    let beta = mean(&pair.simulated) / mean(&pair.observed);

    let value = weights[0] * (r - 1.0).powi(2)
        + weights[1] * (alpha - 1.0).powi(2)
        + weights[2] * (beta - 1.0).powi(2);
    Ok(1.0 - value.sqrt())
}
