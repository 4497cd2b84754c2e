/// Generate one `#[pyfunction]` per core metric of the form
/// `fn(&TimeSeries, &TimeSeries) -> Result<f64>`.
///
/// The generated functions take two 1-D float arrays on an implied daily
/// axis and share the core function's name.
macro_rules! define_pair_metrics {
    ($( $(#[$meta:meta])* $name:ident ),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[pyo3::pyfunction]
            fn $name<'py>(
                obs: numpy::PyReadonlyArray1<'py, f64>,
                sim: numpy::PyReadonlyArray1<'py, f64>,
            ) -> pyo3::PyResult<f64> {
                let (obs, sim) = $crate::convert::daily_pair(&obs, &sim)?;
                hydroeval_core::metrics::$name(&obs, &sim).map_err($crate::convert::to_py_err)
            }
        )+
    };
}

/// Move the named `Vec<f64>` columns of a table into a `PyDict` of numpy
/// arrays keyed by field name.
macro_rules! columns_to_dict {
    ($py:expr, $columns:expr, $($field:ident),+ $(,)?) => {{
        let dict = pyo3::types::PyDict::new($py);
        $(
            dict.set_item(stringify!($field), numpy::PyArray1::from_vec($py, $columns.$field))?;
        )+
        dict
    }};
}
