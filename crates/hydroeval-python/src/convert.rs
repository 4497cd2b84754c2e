use chrono::{DateTime, NaiveDate, NaiveDateTime};
use numpy::{Element, PyReadonlyArray1};
use pyo3::exceptions::{PyFileNotFoundError, PyOSError, PyValueError};
use pyo3::prelude::*;

use hydroeval_core::{EvalError, TimeSeries};

const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Validate that a numpy array is C-contiguous and return its slice.
pub fn contiguous_slice<'py, T: Element>(arr: &'py PyReadonlyArray1<'py, T>) -> PyResult<&'py [T]> {
    arr.as_slice()
        .map_err(|_| PyValueError::new_err("array must be C-contiguous"))
}

/// Map a core error onto the matching Python exception.
pub fn to_py_err(err: EvalError) -> PyErr {
    match err {
        EvalError::NotFound(_) => PyFileNotFoundError::new_err(err.to_string()),
        EvalError::Io(_) => PyOSError::new_err(err.to_string()),
        _ => PyValueError::new_err(err.to_string()),
    }
}

/// Nanoseconds since the Unix epoch (numpy `datetime64[ns]` as int64) to
/// naive UTC timestamps.
pub fn timestamps_from_ns(ns: &[i64]) -> PyResult<Vec<NaiveDateTime>> {
    ns.iter()
        .map(|&t| {
            let secs = t.div_euclid(NANOS_PER_SECOND);
            let nanos = t.rem_euclid(NANOS_PER_SECOND) as u32;
            DateTime::from_timestamp(secs, nanos)
                .map(|dt| dt.naive_utc())
                .ok_or_else(|| PyValueError::new_err(format!("timestamp {t} is out of range (NaT?)")))
        })
        .collect()
}

pub fn timestamps_to_ns(timestamps: &[NaiveDateTime]) -> PyResult<Vec<i64>> {
    timestamps
        .iter()
        .map(|t| {
            t.and_utc()
                .timestamp_nanos_opt()
                .ok_or_else(|| PyValueError::new_err(format!("{t} does not fit in datetime64[ns]")))
        })
        .collect()
}

/// Build an observed/simulated pair on an implied daily axis.
pub fn daily_pair(
    obs: &PyReadonlyArray1<'_, f64>,
    sim: &PyReadonlyArray1<'_, f64>,
) -> PyResult<(TimeSeries, TimeSeries)> {
    let start = NaiveDate::from_ymd_opt(1970, 1, 1)
        .ok_or_else(|| PyValueError::new_err("invalid epoch"))?;
    let obs = TimeSeries::daily(start, contiguous_slice(obs)?.to_vec()).map_err(to_py_err)?;
    let sim = TimeSeries::daily(start, contiguous_slice(sim)?.to_vec()).map_err(to_py_err)?;
    Ok((obs, sim))
}

/// Build an observed/simulated pair sharing the given timestamp axis.
pub fn timed_pair(
    obs: &PyReadonlyArray1<'_, f64>,
    sim: &PyReadonlyArray1<'_, f64>,
    timestamps_ns: &PyReadonlyArray1<'_, i64>,
) -> PyResult<(TimeSeries, TimeSeries)> {
    let timestamps = timestamps_from_ns(contiguous_slice(timestamps_ns)?)?;
    let obs = TimeSeries::new(timestamps.clone(), contiguous_slice(obs)?.to_vec()).map_err(to_py_err)?;
    let sim = TimeSeries::new(timestamps, contiguous_slice(sim)?.to_vec()).map_err(to_py_err)?;
    Ok((obs, sim))
}
