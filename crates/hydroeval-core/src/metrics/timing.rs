//! Mean absolute peak-timing error (Kratzert et al., 2020, appendix).
use tracing::{debug, trace};

use super::constants::{MIN_PEAK_WINDOW, PEAK_DISTANCE, PEAK_WINDOW_SPAN};
use super::peaks::find_peaks;
use super::stats::std;
use crate::error::{EvalError, Result};
use crate::resolution::Resolution;
use crate::series::TimeSeries;
use crate::validation::{validated_pair, MaskedPair};

/// Mean absolute offset between observed peaks and their simulated match,
/// in units of `resolution`.
///
/// Observed peaks need a prominence of at least one standard deviation and
/// at least 100 samples of spacing. Each peak is matched inside
/// `[i - window, i + window]`: the simulated value at `i` if it is itself a
/// strict local maximum, otherwise the window maximum. Peaks whose window
/// hits the series edge or spans a masked-out gap are skipped.
///
/// `window` defaults to the number of steps in 12 hours, at least 3.
/// Returns `NaN` when no peak could be evaluated.
pub fn mean_peak_timing(
    obs: &TimeSeries,
    sim: &TimeSeries,
    window: Option<usize>,
    resolution: &Resolution,
    datetime_coord: Option<&str>,
) -> Result<f64> {
    let pair = validated_pair(obs, sim)?;
    resolve_datetime_coord(obs, datetime_coord)?;

    let window = match window {
        Some(0) => {
            return Err(EvalError::InvalidArgument(
                "peak timing window must be at least one step".to_string(),
            ))
        }
        Some(w) => w,
        None => default_window(resolution),
    };

    let peaks = find_peaks(&pair.observed, PEAK_DISTANCE, std(&pair.observed));

    let mut errors = Vec::with_capacity(peaks.len());
    for &idx in &peaks {
        if idx < window || idx + window >= pair.len() {
            trace!(idx, "peak window runs off the series");
            continue;
        }
        if !is_contiguous(&pair, idx - window, idx + window, resolution) {
            trace!(idx, "peak window spans a gap");
            continue;
        }

        let sim_idx = matching_peak(&pair.simulated, idx, window);
        let delta = pair.timestamps[idx] - pair.timestamps[sim_idx];
        errors.push(resolution.steps_in(delta).abs());
    }

    debug!(
        detected = peaks.len(),
        evaluated = errors.len(),
        window,
        "peak timing"
    );

    if errors.is_empty() {
        return Ok(f64::NAN);
    }
    Ok(errors.iter().sum::<f64>() / errors.len() as f64)
}

/// Half-window covering 12 hours at `resolution`, but never below 3 steps.
pub fn default_window(resolution: &Resolution) -> usize {
    (PEAK_WINDOW_SPAN.frequency_factor(resolution) as usize).max(MIN_PEAK_WINDOW)
}

/// Name of the datetime coordinate to use for `series`.
///
/// An explicit name must match the series' coordinate. Otherwise the
/// series' coordinate is used if its name contains `"date"`.
pub fn resolve_datetime_coord<'a>(
    series: &'a TimeSeries,
    requested: Option<&str>,
) -> Result<&'a str> {
    let coord = series.datetime_coord();
    match requested {
        Some(name) if name == coord => Ok(coord),
        Some(name) => Err(EvalError::InvalidArgument(format!(
            "series has no datetime coordinate {name:?} (found {coord:?})"
        ))),
        None if coord.contains("date") => Ok(coord),
        None => Err(EvalError::InvalidArgument(format!(
            "could not infer the datetime coordinate: {coord:?} does not contain 'date'"
        ))),
    }
}

// masking can silently join two distant stretches of the record
fn is_contiguous(pair: &MaskedPair, start: usize, end: usize, resolution: &Resolution) -> bool {
    let step = resolution.step();
    pair.timestamps[start..=end]
        .windows(2)
        .all(|w| w[1] - w[0] == step)
}

fn matching_peak(sim: &[f64], idx: usize, window: usize) -> usize {
    if sim[idx] > sim[idx - 1] && sim[idx] > sim[idx + 1] {
        return idx;
    }
    let start = idx - window;
    let mut best = start;
    for (offset, &v) in sim[start..=idx + window].iter().enumerate() {
        if v > sim[best] {
            best = start + offset;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveDateTime};

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2005, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    /// Flat baseline with triangular events at `peaks`.
    fn hydrograph(n: usize, peaks: &[(usize, f64)]) -> Vec<f64> {
        let mut x = vec![1.0; n];
        for &(p, h) in peaks {
            for (offset, frac) in [(0, 1.0), (1, 0.5), (2, 0.25)] {
                if p >= offset {
                    x[p - offset] = f64::max(x[p - offset], 1.0 + h * frac);
                }
                if p + offset < n {
                    x[p + offset] = f64::max(x[p + offset], 1.0 + h * frac);
                }
            }
        }
        x
    }

    fn daily(values: Vec<f64>) -> TimeSeries {
        TimeSeries::from_start(start(), &Resolution::DAILY, values).unwrap()
    }

    #[test]
    fn default_window_by_resolution() {
        assert_eq!(default_window(&Resolution::DAILY), 3);
        assert_eq!(default_window(&Resolution::HOURLY), 12);
        assert_eq!(default_window(&"15min".parse().unwrap()), 48);
    }

    #[test]
    fn perfect_timing_is_zero() {
        let obs = daily(hydrograph(400, &[(100, 20.0), (250, 15.0)]));
        let t = mean_peak_timing(&obs, &obs, None, &Resolution::DAILY, None).unwrap();
        assert_eq!(t, 0.0);
    }

    #[test]
    fn shifted_peaks_average_offset() {
        let obs = daily(hydrograph(400, &[(100, 20.0), (250, 15.0)]));
        let sim = daily(hydrograph(400, &[(102, 20.0), (249, 15.0)]));
        let t = mean_peak_timing(&obs, &sim, None, &Resolution::DAILY, None).unwrap();
        assert_relative_eq!(t, 1.5);
    }

    #[test]
    fn simulated_peak_outside_window_uses_window_max() {
        let obs = daily(hydrograph(400, &[(100, 20.0)]));
        // the simulated event sits 10 days late; the window edge is the best match
        let sim = daily(hydrograph(400, &[(110, 20.0)]));
        let t = mean_peak_timing(&obs, &sim, Some(3), &Resolution::DAILY, None).unwrap();
        // sim rises from day 108, so inside [97, 103] everything is flat and
        // the first sample of the window wins
        assert_relative_eq!(t, 3.0);
    }

    #[test]
    fn peaks_at_edges_are_skipped() {
        let obs = daily(hydrograph(200, &[(1, 20.0)]));
        let t = mean_peak_timing(&obs, &obs, Some(3), &Resolution::DAILY, None).unwrap();
        assert!(t.is_nan());
    }

    #[test]
    fn window_across_masked_gap_is_skipped() {
        let mut values = hydrograph(400, &[(100, 20.0), (250, 15.0)]);
        let obs_clean = daily(values.clone());
        values[98] = f64::NAN;
        let obs = daily(values);
        let sim = daily(hydrograph(400, &[(101, 20.0), (251, 15.0)]));

        let gapped = mean_peak_timing(&obs, &sim, None, &Resolution::DAILY, None).unwrap();
        let clean = mean_peak_timing(&obs_clean, &sim, None, &Resolution::DAILY, None).unwrap();
        // only the second peak survives the gap check
        assert_relative_eq!(gapped, 1.0);
        assert_relative_eq!(clean, 1.0);
    }

    #[test]
    fn hourly_offsets_in_hours() {
        let obs = TimeSeries::from_start(
            start(),
            &Resolution::HOURLY,
            hydrograph(500, &[(200, 30.0)]),
        )
        .unwrap();
        let sim = TimeSeries::from_start(
            start(),
            &Resolution::HOURLY,
            hydrograph(500, &[(205, 30.0)]),
        )
        .unwrap();
        let t = mean_peak_timing(&obs, &sim, None, &Resolution::HOURLY, None).unwrap();
        assert_relative_eq!(t, 5.0);
    }

    #[test]
    fn zero_window_is_rejected() {
        let obs = daily(hydrograph(200, &[(100, 20.0)]));
        assert!(matches!(
            mean_peak_timing(&obs, &obs, Some(0), &Resolution::DAILY, None),
            Err(EvalError::InvalidArgument(_))
        ));
    }

    #[test]
    fn no_peaks_is_nan() {
        let obs = daily(vec![1.0; 300]);
        let t = mean_peak_timing(&obs, &obs, None, &Resolution::DAILY, None).unwrap();
        assert!(t.is_nan());
    }

    // -- datetime coordinate --

    #[test]
    fn explicit_coord_must_match() {
        let obs = daily(vec![1.0; 5]);
        assert_eq!(resolve_datetime_coord(&obs, Some("date")).unwrap(), "date");
        assert!(resolve_datetime_coord(&obs, Some("time")).is_err());
    }

    #[test]
    fn inferred_coord_needs_date_in_name() {
        let obs = daily(vec![1.0; 5]).with_datetime_coord("datetime");
        assert_eq!(resolve_datetime_coord(&obs, None).unwrap(), "datetime");
        let obs = daily(vec![1.0; 5]).with_datetime_coord("time");
        assert!(resolve_datetime_coord(&obs, None).is_err());
    }
}
