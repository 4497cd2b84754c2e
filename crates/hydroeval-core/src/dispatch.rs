//! Name-based metric selection.
//!
//! Metric names resolve case-insensitively to a `Metric`, each of which
//! carries its canonical display key and the function that computes it.
use std::fmt;
use std::str::FromStr;

use serde::ser::{Serialize, SerializeMap, Serializer};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::config::EvaluationConfig;
use crate::error::{EvalError, Result};
use crate::metrics;
use crate::resolution::Resolution;
use crate::series::TimeSeries;
use crate::validation::check_all_nan;

/// Request sentinel selecting every metric.
pub const ALL_METRICS: &str = "all";

type MetricFn = fn(&TimeSeries, &TimeSeries, &EvaluationConfig) -> Result<f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Nse,
    Mse,
    Rmse,
    Kge,
    AlphaNse,
    PearsonR,
    BetaKge,
    BetaNse,
    Fhv,
    Fms,
    Flv,
    PeakTiming,
}

impl Metric {
    /// Every metric, in the order `"all"` reports them.
    pub const ALL: [Metric; 12] = [
        Metric::Nse,
        Metric::Mse,
        Metric::Rmse,
        Metric::Kge,
        Metric::AlphaNse,
        Metric::PearsonR,
        Metric::BetaKge,
        Metric::BetaNse,
        Metric::Fhv,
        Metric::Fms,
        Metric::Flv,
        Metric::PeakTiming,
    ];

    /// Canonical display key.
    pub fn key(self) -> &'static str {
        match self {
            Metric::Nse => "NSE",
            Metric::Mse => "MSE",
            Metric::Rmse => "RMSE",
            Metric::Kge => "KGE",
            Metric::AlphaNse => "Alpha-NSE",
            Metric::PearsonR => "Pearson-r",
            Metric::BetaKge => "Beta-KGE",
            Metric::BetaNse => "Beta-NSE",
            Metric::Fhv => "FHV",
            Metric::Fms => "FMS",
            Metric::Flv => "FLV",
            Metric::PeakTiming => "Peak-Timing",
        }
    }

    fn function(self) -> MetricFn {
        match self {
            Metric::Nse => |o, s, _| metrics::nse(o, s),
            Metric::Mse => |o, s, _| metrics::mse(o, s),
            Metric::Rmse => |o, s, _| metrics::rmse(o, s),
            Metric::Kge => |o, s, c| metrics::kge(o, s, &c.kge_weights),
            Metric::AlphaNse => |o, s, _| metrics::alpha_nse(o, s),
            Metric::PearsonR => |o, s, _| metrics::pearson_r(o, s),
            Metric::BetaKge => |o, s, _| metrics::beta_kge(o, s),
            Metric::BetaNse => |o, s, _| metrics::beta_nse(o, s),
            Metric::Fhv => |o, s, c| metrics::fdc_fhv(o, s, c.fhv_h),
            Metric::Fms => |o, s, c| metrics::fdc_fms(o, s, c.fms_lower, c.fms_upper),
            Metric::Flv => |o, s, c| metrics::fdc_flv(o, s, c.flv_l),
            Metric::PeakTiming => |o, s, c| {
                metrics::mean_peak_timing(
                    o,
                    s,
                    c.peak_window,
                    &c.resolution,
                    c.datetime_coord.as_deref(),
                )
            },
        }
    }

    /// Compute this metric with parameters from `config`.
    pub fn compute(self, obs: &TimeSeries, sim: &TimeSeries, config: &EvaluationConfig) -> Result<f64> {
        (self.function())(obs, sim, config)
    }
}

impl FromStr for Metric {
    type Err = EvalError;

    fn from_str(name: &str) -> Result<Self> {
        Metric::ALL
            .into_iter()
            .find(|m| m.key().eq_ignore_ascii_case(name))
            .ok_or_else(|| EvalError::UnknownMetric(name.to_string()))
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Metric values keyed by canonical name, in request order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricValues {
    entries: Vec<(&'static str, f64)>,
}

impl MetricValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, keeping its first position if it was already present.
    pub fn insert(&mut self, key: &'static str, value: f64) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries.iter().find(|(k, _)| *k == key).map(|&(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|&(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for MetricValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Compute the requested metrics with default parameters.
///
/// `names` are matched case-insensitively against the canonical keys; the
/// sentinel `"all"` selects every metric. Every name is resolved before any
/// computation, so an unknown name fails without partial work.
pub fn calculate_metrics<S: AsRef<str>>(
    obs: &TimeSeries,
    sim: &TimeSeries,
    names: &[S],
    resolution: &Resolution,
    datetime_coord: Option<&str>,
) -> Result<MetricValues> {
    let mut config = EvaluationConfig::default().with_resolution(*resolution);
    config.datetime_coord = datetime_coord.map(str::to_string);
    calculate_metrics_with(obs, sim, names, &config)
}

/// Compute the requested metrics with parameters from `config`.
#[tracing::instrument(skip_all, fields(n = obs.len(), requested = names.len()))]
pub fn calculate_metrics_with<S: AsRef<str>>(
    obs: &TimeSeries,
    sim: &TimeSeries,
    names: &[S],
    config: &EvaluationConfig,
) -> Result<MetricValues> {
    if names
        .iter()
        .any(|n| n.as_ref().eq_ignore_ascii_case(ALL_METRICS))
    {
        return compute_all(obs, sim, config);
    }

    check_all_nan(obs, sim)?;

    let selected = names
        .iter()
        .map(|n| n.as_ref().parse::<Metric>())
        .collect::<Result<SmallVec<[Metric; 12]>>>()?;
    debug!(metrics = ?selected, "resolved metric names");

    let mut values = MetricValues::new();
    for metric in selected {
        values.insert(metric.key(), metric.compute(obs, sim, config)?);
    }
    Ok(values)
}

/// Compute every metric with default parameters.
pub fn calculate_all_metrics(
    obs: &TimeSeries,
    sim: &TimeSeries,
    resolution: &Resolution,
    datetime_coord: Option<&str>,
) -> Result<MetricValues> {
    calculate_metrics(obs, sim, &[ALL_METRICS], resolution, datetime_coord)
}

fn compute_all(obs: &TimeSeries, sim: &TimeSeries, config: &EvaluationConfig) -> Result<MetricValues> {
    check_all_nan(obs, sim)?;

    let mut values = MetricValues::new();
    for metric in Metric::ALL {
        let value = metric.compute(obs, sim, config)?;
        if value.is_nan() {
            warn!(metric = metric.key(), "metric is undefined for this pair");
        }
        values.insert(metric.key(), value);
    }
    Ok(values)
}
