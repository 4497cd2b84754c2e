use numpy::PyReadonlyArray1;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use hydroeval_core::metrics::constants::{DEFAULT_KGE_WEIGHTS, FHV_H, FLV_L, FMS_LOWER, FMS_UPPER};
use hydroeval_core::{metrics, Resolution};

use crate::convert::{contiguous_slice, daily_pair, timed_pair, to_py_err};

define_pair_metrics! {
    /// Nash-Sutcliffe Efficiency.
    nse,
    /// Mean squared error.
    mse,
    /// Root mean squared error.
    rmse,
    /// std(sim) / std(obs).
    alpha_nse,
    /// (mean(sim) - mean(obs)) / std(obs).
    beta_nse,
    /// mean(sim) / mean(obs).
    beta_kge,
    /// Pearson correlation coefficient.
    pearson_r,
}

fn parse_resolution(alias: &str) -> PyResult<Resolution> {
    alias.parse().map_err(to_py_err)
}

/// Kling-Gupta Efficiency with weights `(s_r, s_alpha, s_beta)`.
#[pyfunction]
#[pyo3(signature = (obs, sim, weights=None))]
fn kge<'py>(
    obs: PyReadonlyArray1<'py, f64>,
    sim: PyReadonlyArray1<'py, f64>,
    weights: Option<PyReadonlyArray1<'py, f64>>,
) -> PyResult<f64> {
    let (obs, sim) = daily_pair(&obs, &sim)?;
    let weights = match &weights {
        Some(w) => contiguous_slice(w)?,
        None => &DEFAULT_KGE_WEIGHTS[..],
    };
    metrics::kge(&obs, &sim, weights).map_err(to_py_err)
}

/// Bias of the mid-segment slope of the flow duration curve [%].
#[pyfunction]
#[pyo3(signature = (obs, sim, lower=FMS_LOWER, upper=FMS_UPPER))]
fn fdc_fms<'py>(
    obs: PyReadonlyArray1<'py, f64>,
    sim: PyReadonlyArray1<'py, f64>,
    lower: f64,
    upper: f64,
) -> PyResult<f64> {
    let (obs, sim) = daily_pair(&obs, &sim)?;
    metrics::fdc_fms(&obs, &sim, lower, upper).map_err(to_py_err)
}

/// Peak flow bias of the flow duration curve [%].
#[pyfunction]
#[pyo3(signature = (obs, sim, h=FHV_H))]
fn fdc_fhv<'py>(obs: PyReadonlyArray1<'py, f64>, sim: PyReadonlyArray1<'py, f64>, h: f64) -> PyResult<f64> {
    let (obs, sim) = daily_pair(&obs, &sim)?;
    metrics::fdc_fhv(&obs, &sim, h).map_err(to_py_err)
}

/// Low flow bias of the flow duration curve [%].
#[pyfunction]
#[pyo3(signature = (obs, sim, l=FLV_L))]
fn fdc_flv<'py>(obs: PyReadonlyArray1<'py, f64>, sim: PyReadonlyArray1<'py, f64>, l: f64) -> PyResult<f64> {
    let (obs, sim) = daily_pair(&obs, &sim)?;
    metrics::fdc_flv(&obs, &sim, l).map_err(to_py_err)
}

/// Mean absolute peak timing error in steps of `resolution`.
///
/// `timestamps_ns` is the shared time axis as int64 nanoseconds
/// (`datetime64[ns].astype("int64")`).
#[pyfunction]
#[pyo3(signature = (obs, sim, timestamps_ns, window=None, resolution="1D"))]
fn mean_peak_timing<'py>(
    obs: PyReadonlyArray1<'py, f64>,
    sim: PyReadonlyArray1<'py, f64>,
    timestamps_ns: PyReadonlyArray1<'py, i64>,
    window: Option<usize>,
    resolution: &str,
) -> PyResult<f64> {
    let resolution = parse_resolution(resolution)?;
    let (obs, sim) = timed_pair(&obs, &sim, &timestamps_ns)?;
    metrics::mean_peak_timing(&obs, &sim, window, &resolution, None).map_err(to_py_err)
}

/// Compute the named metrics (or `["all"]`) and return them as a dict in
/// request order.
#[pyfunction]
#[pyo3(signature = (obs, sim, timestamps_ns, metrics, resolution="1D"))]
fn calculate_metrics<'py>(
    py: Python<'py>,
    obs: PyReadonlyArray1<'py, f64>,
    sim: PyReadonlyArray1<'py, f64>,
    timestamps_ns: PyReadonlyArray1<'py, i64>,
    metrics: Vec<String>,
    resolution: &str,
) -> PyResult<Bound<'py, PyDict>> {
    let resolution = parse_resolution(resolution)?;
    let (obs, sim) = timed_pair(&obs, &sim, &timestamps_ns)?;
    let values = hydroeval_core::calculate_metrics(&obs, &sim, &metrics, &resolution, None)
        .map_err(to_py_err)?;

    let dict = PyDict::new(py);
    for (key, value) in values.iter() {
        dict.set_item(key, value)?;
    }
    Ok(dict)
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "metrics")?;
    m.add_function(wrap_pyfunction!(nse, &m)?)?;
    m.add_function(wrap_pyfunction!(mse, &m)?)?;
    m.add_function(wrap_pyfunction!(rmse, &m)?)?;
    m.add_function(wrap_pyfunction!(alpha_nse, &m)?)?;
    m.add_function(wrap_pyfunction!(beta_nse, &m)?)?;
    m.add_function(wrap_pyfunction!(beta_kge, &m)?)?;
    m.add_function(wrap_pyfunction!(pearson_r, &m)?)?;
    m.add_function(wrap_pyfunction!(kge, &m)?)?;
    m.add_function(wrap_pyfunction!(fdc_fms, &m)?)?;
    m.add_function(wrap_pyfunction!(fdc_fhv, &m)?)?;
    m.add_function(wrap_pyfunction!(fdc_flv, &m)?)?;
    m.add_function(wrap_pyfunction!(mean_peak_timing, &m)?)?;
    m.add_function(wrap_pyfunction!(calculate_metrics, &m)?)?;
    parent.add_submodule(&m)?;
    Ok(())
}
