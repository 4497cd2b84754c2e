//! Loaders for the CAMELS-US data set layout.
//!
//! ```text
//! <data_dir>/
//!   basin_mean_forcing/<forcings>/<huc>/<basin>_*_forcing_leap.txt
//!   usgs_streamflow/<huc>/<basin>_streamflow_qc.txt
//! ```
mod discharge;
mod forcing;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{EvalError, Result};

pub use discharge::{cfs_to_mm_per_day, load_usgs};
pub use forcing::{load_forcings, ForcingColumns, ForcingRecord, ForcingTable};

/// Volume of one cubic foot [mm^3].
pub const CUBIC_FOOT_MM3: f64 = 28_316_846.592;

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// First file below `dir` (any depth) whose name satisfies `matches`.
///
/// Entries are visited in sorted order so the result does not depend on
/// directory iteration order.
pub(crate) fn find_file(dir: &Path, matches: &dyn Fn(&str) -> bool) -> Result<Option<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in &entries {
        if path.is_file() && path.file_name().and_then(|n| n.to_str()).is_some_and(matches) {
            return Ok(Some(path.clone()));
        }
    }
    for path in entries.iter().filter(|p| p.is_dir()) {
        if let Some(found) = find_file(path, matches)? {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Midnight of the date given by year, month and day tokens.
pub(crate) fn parse_date(
    path: &Path,
    line: usize,
    year: &str,
    month: &str,
    day: &str,
) -> Result<NaiveDateTime> {
    let field = |token: &str, what: &str| {
        token
            .parse::<u32>()
            .map_err(|_| EvalError::parse(path, line, format!("invalid {what} {token:?}")))
    };
    let year = field(year, "year")?;
    let month = field(month, "month")?;
    let day = field(day, "day")?;
    NaiveDate::from_ymd_opt(year as i32, month, day)
        .map(|d| d.and_time(NaiveTime::MIN))
        .ok_or_else(|| EvalError::parse(path, line, format!("invalid date {year}/{month}/{day}")))
}

pub(crate) fn parse_value(path: &Path, line: usize, token: &str) -> Result<f64> {
    token
        .parse::<f64>()
        .map_err(|_| EvalError::parse(path, line, format!("invalid number {token:?}")))
}
