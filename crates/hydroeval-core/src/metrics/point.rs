//! Point-error metrics and the NSE/KGE decomposition terms.
//!
//! Every function validates the pair, drops timesteps where either series is
//! missing, and computes on what remains. Zero denominators are not guarded:
//! the IEEE-754 result (`inf`, `-inf` or `NaN`) is returned as-is.
use super::constants::MIN_CORRELATION_POINTS;
use super::stats::{mean, pearson, std};
use crate::error::Result;
use crate::series::TimeSeries;
use crate::validation::validated_pair;

/// Mean Squared Error. Range: [0, inf), 0 = perfect.
pub fn mse(obs: &TimeSeries, sim: &TimeSeries) -> Result<f64> {
    let pair = validated_pair(obs, sim)?;
    Ok(squared_error_sum(&pair.observed, &pair.simulated) / pair.len() as f64)
}

/// Root Mean Squared Error. Range: [0, inf), 0 = perfect.
pub fn rmse(obs: &TimeSeries, sim: &TimeSeries) -> Result<f64> {
    Ok(mse(obs, sim)?.sqrt())
}

/// Nash-Sutcliffe Efficiency. Range: (-inf, 1], 1 = perfect.
///
/// A constant observed series gives `-inf` (or `NaN` if the simulation
/// matches it exactly).
pub fn nse(obs: &TimeSeries, sim: &TimeSeries) -> Result<f64> {
    let pair = validated_pair(obs, sim)?;
    let mean_obs = mean(&pair.observed);
    let denominator: f64 = pair.observed.iter().map(|o| (o - mean_obs).powi(2)).sum();
    let numerator = squared_error_sum(&pair.observed, &pair.simulated);
    Ok(1.0 - numerator / denominator)
}

/// Alpha NSE decomposition: `std(sim) / std(obs)`. Optimal = 1.
pub fn alpha_nse(obs: &TimeSeries, sim: &TimeSeries) -> Result<f64> {
    let pair = validated_pair(obs, sim)?;
    Ok(std(&pair.simulated) / std(&pair.observed))
}

/// Beta NSE decomposition: `(mean(sim) - mean(obs)) / std(obs)`. Optimal = 0.
pub fn beta_nse(obs: &TimeSeries, sim: &TimeSeries) -> Result<f64> {
    let pair = validated_pair(obs, sim)?;
    Ok((mean(&pair.simulated) - mean(&pair.observed)) / std(&pair.observed))
}

/// Beta KGE term: `mean(sim) / mean(obs)`. Optimal = 1.
pub fn beta_kge(obs: &TimeSeries, sim: &TimeSeries) -> Result<f64> {
    let pair = validated_pair(obs, sim)?;
    Ok(mean(&pair.simulated) / mean(&pair.observed))
}

/// Pearson correlation coefficient. `NaN` with fewer than 2 valid pairs.
pub fn pearson_r(obs: &TimeSeries, sim: &TimeSeries) -> Result<f64> {
    let pair = validated_pair(obs, sim)?;
    if pair.len() < MIN_CORRELATION_POINTS {
        return Ok(f64::NAN);
    }
    Ok(pearson(&pair.observed, &pair.simulated))
}

fn squared_error_sum(observed: &[f64], simulated: &[f64]) -> f64 {
    observed
        .iter()
        .zip(simulated)
        .map(|(o, s)| (s - o).powi(2))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvalError;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> TimeSeries {
        let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        TimeSeries::daily(start, values.to_vec()).unwrap()
    }

    fn pair(obs: &[f64], sim: &[f64]) -> (TimeSeries, TimeSeries) {
        (series(obs), series(sim))
    }

    // --- NSE tests ---

    #[test]
    fn nse_perfect_match() {
        let (obs, sim) = pair(&[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(nse(&obs, &sim).unwrap(), 1.0);
    }

    #[test]
    fn nse_mean_simulation_gives_zero() {
        let (obs, sim) = pair(&[1.0, 2.0, 3.0, 4.0, 5.0], &[3.0; 5]);
        assert_relative_eq!(nse(&obs, &sim).unwrap(), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn nse_known_value() {
        // num = 0.01 + 0.04 + 0.04 + 0.01 + 0.01 = 0.11, den = 10
        let (obs, sim) = pair(&[1.0, 2.0, 3.0, 4.0, 5.0], &[1.1, 2.2, 2.8, 4.1, 4.9]);
        assert_relative_eq!(nse(&obs, &sim).unwrap(), 0.989, epsilon = 1e-10);
    }

    #[test]
    fn nse_constant_observed_propagates_ieee() {
        let (obs, sim) = pair(&[5.0; 5], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(nse(&obs, &sim).unwrap(), f64::NEG_INFINITY);

        let (obs, sim) = pair(&[5.0; 5], &[5.0; 5]);
        assert!(nse(&obs, &sim).unwrap().is_nan());
    }

    #[test]
    fn nse_ignores_missing_values() {
        let (obs, sim) = pair(&[1.0, 2.0, f64::NAN, 4.0, 5.0], &[1.0, 2.0, 3.0, 4.0, f64::NAN]);
        assert_eq!(nse(&obs, &sim).unwrap(), 1.0);
    }

    #[test]
    fn nse_rejects_shape_mismatch() {
        let (obs, sim) = pair(&[1.0, 2.0, 3.0], &[1.0, 2.0]);
        assert!(matches!(nse(&obs, &sim), Err(EvalError::ShapeMismatch(_))));
    }

    // --- MSE / RMSE tests ---

    #[test]
    fn mse_known_value() {
        let (obs, sim) = pair(&[1.0, 2.0, 3.0], &[1.0, 2.0, 4.0]);
        assert_relative_eq!(mse(&obs, &sim).unwrap(), 1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn rmse_perfect_match() {
        let (obs, sim) = pair(&[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(rmse(&obs, &sim).unwrap(), 0.0);
    }

    #[test]
    fn rmse_constant_error() {
        let (obs, sim) = pair(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_relative_eq!(rmse(&obs, &sim).unwrap(), 1.0, epsilon = 1e-10);
    }

    #[test]
    fn rmse_is_sqrt_of_mse() {
        let (obs, sim) = pair(&[0.3, 1.7, 2.2, 8.1], &[0.1, 2.0, 2.9, 6.5]);
        assert_eq!(rmse(&obs, &sim).unwrap(), mse(&obs, &sim).unwrap().sqrt());
    }

    #[test]
    fn mse_of_empty_pair_is_nan() {
        let (obs, sim) = pair(&[f64::NAN, 1.0], &[1.0, f64::NAN]);
        assert!(mse(&obs, &sim).unwrap().is_nan());
    }

    // --- Decomposition tests ---

    #[test]
    fn alpha_nse_ratio_of_spread() {
        // sim deviations are twice the observed ones
        let (obs, sim) = pair(&[1.0, 2.0, 3.0], &[0.0, 2.0, 4.0]);
        assert_relative_eq!(alpha_nse(&obs, &sim).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn beta_nse_shift_in_std_units() {
        // std(obs) = sqrt(2/3), mean shift = 1
        let (obs, sim) = pair(&[1.0, 2.0, 3.0], &[2.0, 3.0, 4.0]);
        assert_relative_eq!(
            beta_nse(&obs, &sim).unwrap(),
            1.0 / (2.0_f64 / 3.0).sqrt(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn beta_kge_ratio_of_means() {
        let (obs, sim) = pair(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]);
        assert_relative_eq!(beta_kge(&obs, &sim).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn alpha_nse_zero_variance_is_inf() {
        let (obs, sim) = pair(&[2.0; 3], &[1.0, 2.0, 3.0]);
        assert_eq!(alpha_nse(&obs, &sim).unwrap(), f64::INFINITY);
    }

    // --- Pearson-r tests ---

    #[test]
    fn pearson_r_perfect_match() {
        let (obs, sim) = pair(&[1.0, 2.0, 3.0, 4.0, 5.0], &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_relative_eq!(pearson_r(&obs, &sim).unwrap(), 1.0);
    }

    #[test]
    fn pearson_r_needs_two_points() {
        let (obs, sim) = pair(&[1.0, f64::NAN, 3.0], &[1.0, 2.0, f64::NAN]);
        assert!(pearson_r(&obs, &sim).unwrap().is_nan());
    }
}
