use std::path::PathBuf;

use numpy::PyArray1;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use hydroeval_core::camels;

use crate::convert::{timestamps_to_ns, to_py_err};

/// Load basin-mean forcings as `({"date": int64 ns, column: float64, ...}, area_m2)`.
#[pyfunction]
#[pyo3(signature = (data_dir, basin, forcings="daymet"))]
fn load_forcings<'py>(
    py: Python<'py>,
    data_dir: PathBuf,
    basin: &str,
    forcings: &str,
) -> PyResult<(Bound<'py, PyDict>, i64)> {
    let (table, area) = camels::load_forcings(&data_dir, basin, forcings).map_err(to_py_err)?;
    let dates = timestamps_to_ns(&table.dates)?;

    let dict = columns_to_dict!(py, table.columns, dayl, prcp, srad, swe, tmax, tmin, vp);
    dict.set_item("date", PyArray1::from_vec(py, dates))?;
    Ok((dict, area))
}

/// Load USGS discharge in mm/day as `(timestamps_ns, values)`.
#[pyfunction]
fn load_usgs<'py>(
    py: Python<'py>,
    data_dir: PathBuf,
    basin: &str,
    area: i64,
) -> PyResult<(Bound<'py, PyArray1<i64>>, Bound<'py, PyArray1<f64>>)> {
    let series = camels::load_usgs(&data_dir, basin, area).map_err(to_py_err)?;
    let timestamps = timestamps_to_ns(series.timestamps())?;
    Ok((
        PyArray1::from_vec(py, timestamps),
        PyArray1::from_slice(py, series.values()),
    ))
}

pub fn register(parent: &Bound<'_, PyModule>) -> PyResult<()> {
    let m = PyModule::new(parent.py(), "camels")?;
    m.add_function(wrap_pyfunction!(load_forcings, &m)?)?;
    m.add_function(wrap_pyfunction!(load_usgs, &m)?)?;
    parent.add_submodule(&m)?;
    Ok(())
}
