use std::fs;
use std::path::Path;

use tracing::debug;

use super::{find_file, parse_date, parse_value, CUBIC_FOOT_MM3, SECONDS_PER_DAY};
use crate::error::{EvalError, Result};
use crate::series::TimeSeries;

/// Convert discharge from cubic feet per second to mm/day over a
/// catchment of `area` square metres.
pub fn cfs_to_mm_per_day(q: f64, area: f64) -> f64 {
    q * CUBIC_FOOT_MM3 * SECONDS_PER_DAY / (area * 1e6)
}

/// Load the USGS streamflow record of `basin`, normalised to mm/day.
///
/// The file `<basin>_streamflow_qc.txt` is searched below
/// `<data_dir>/usgs_streamflow/`. Rows are `basin Year Mnth Day QObs flag`
/// with QObs in ft^3/s; `area` is the catchment area in square metres as
/// returned by [`load_forcings`](super::load_forcings). Missing-value
/// sentinels in the file are converted like any other value.
#[tracing::instrument(skip(data_dir), fields(data_dir = %data_dir.display()))]
pub fn load_usgs(data_dir: &Path, basin: &str, area: i64) -> Result<TimeSeries> {
    if area <= 0 {
        return Err(EvalError::InvalidArgument(format!(
            "catchment area must be positive, got {area}"
        )));
    }

    let discharge_dir = data_dir.join("usgs_streamflow");
    if !discharge_dir.is_dir() {
        return Err(EvalError::NotFound(format!(
            "streamflow directory {} does not exist",
            discharge_dir.display()
        )));
    }

    let file_name = format!("{basin}_streamflow_qc.txt");
    let path = find_file(&discharge_dir, &|name: &str| name == file_name)?
        .ok_or_else(|| EvalError::NotFound(format!("no streamflow file for basin {basin}")))?;

    let content = fs::read_to_string(&path)?;
    let mut timestamps = Vec::new();
    let mut values = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let line_no = i + 1;
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.len() {
            0 => continue,
            // the quality flag is occasionally left blank
            5 | 6 => {}
            n => {
                return Err(EvalError::parse(
                    &path,
                    line_no,
                    format!("expected 5 or 6 columns, found {n}"),
                ))
            }
        }
        timestamps.push(parse_date(&path, line_no, tokens[1], tokens[2], tokens[3])?);
        let q = parse_value(&path, line_no, tokens[4])?;
        values.push(cfs_to_mm_per_day(q, area as f64));
    }

    debug!(path = %path.display(), rows = values.len(), "loaded streamflow");
    TimeSeries::new(timestamps, values).map_err(|e| match e {
        EvalError::InvalidArgument(message) => EvalError::parse(&path, 0, message),
        other => other,
    })
}
