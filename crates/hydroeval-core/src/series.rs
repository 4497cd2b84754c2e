//! Time-indexed discharge series.
//!
//! A `TimeSeries` owns its values and the timestamp axis they share. Values
//! are stored row-major with an explicit column count so that `(n, d)` model
//! outputs can be carried as-is and rejected by validation when `d > 1`.
//! Missing values are `NaN`.
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{EvalError, Result};
use crate::resolution::Resolution;

/// Datetime coordinate name used when none is given.
pub const DEFAULT_DATETIME_COORD: &str = "date";

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    timestamps: Vec<NaiveDateTime>,
    values: Vec<f64>,
    n_columns: usize,
    datetime_coord: String,
}

impl TimeSeries {
    /// Create a single-variable series.
    ///
    /// Validates:
    /// - `timestamps` and `values` have the same length
    /// - timestamps are strictly increasing
    pub fn new(timestamps: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self> {
        Self::with_columns(timestamps, values, 1)
    }

    /// Create an `(n, n_columns)` series from row-major `values`.
    pub fn with_columns(
        timestamps: Vec<NaiveDateTime>,
        values: Vec<f64>,
        n_columns: usize,
    ) -> Result<Self> {
        if n_columns == 0 {
            return Err(EvalError::ShapeMismatch(
                "series must have at least one column".to_string(),
            ));
        }
        if values.len() != timestamps.len() * n_columns {
            return Err(EvalError::ShapeMismatch(format!(
                "{} values do not fill {} timestamps x {} columns",
                values.len(),
                timestamps.len(),
                n_columns
            )));
        }
        if let Some(pos) = timestamps.windows(2).position(|w| w[1] <= w[0]) {
            return Err(EvalError::InvalidArgument(format!(
                "timestamps must be strictly increasing (position {})",
                pos + 1
            )));
        }
        Ok(Self {
            timestamps,
            values,
            n_columns,
            datetime_coord: DEFAULT_DATETIME_COORD.to_string(),
        })
    }

    /// Create a series on a regular axis starting at `start`.
    pub fn from_start(start: NaiveDateTime, resolution: &Resolution, values: Vec<f64>) -> Result<Self> {
        let step = resolution.step();
        let mut timestamps = Vec::with_capacity(values.len());
        let mut current = start;
        for i in 0..values.len() {
            if i > 0 {
                current = current.checked_add_signed(step).ok_or_else(|| {
                    EvalError::InvalidArgument("timestamp axis overflows the calendar".to_string())
                })?;
            }
            timestamps.push(current);
        }
        Self::new(timestamps, values)
    }

    /// Daily series starting at midnight of `start`.
    pub fn daily(start: NaiveDate, values: Vec<f64>) -> Result<Self> {
        Self::from_start(start.and_time(chrono::NaiveTime::MIN), &Resolution::DAILY, values)
    }

    /// Rename the datetime coordinate.
    pub fn with_datetime_coord(mut self, name: impl Into<String>) -> Self {
        self.datetime_coord = name.into();
        self
    }

    /// Number of timesteps.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Returns `true` if there are no timesteps.
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// `(timesteps, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.timestamps.len(), self.n_columns)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn datetime_coord(&self) -> &str {
        &self.datetime_coord
    }

    /// Returns `true` if every value is `NaN` (also for an empty series).
    pub fn all_nan(&self) -> bool {
        self.values.iter().all(|v| v.is_nan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn valid_series() {
        let s = TimeSeries::new(vec![day(1), day(2), day(3)], vec![1.0, f64::NAN, 3.0]).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.shape(), (3, 1));
        assert_eq!(s.datetime_coord(), "date");
    }

    #[test]
    fn rejects_length_mismatch() {
        let s = TimeSeries::new(vec![day(1), day(2)], vec![1.0]);
        assert!(matches!(s, Err(EvalError::ShapeMismatch(_))));
    }

    #[test]
    fn rejects_unordered_timestamps() {
        let s = TimeSeries::new(vec![day(2), day(1)], vec![1.0, 2.0]);
        assert!(matches!(s, Err(EvalError::InvalidArgument(_))));
    }

    #[test]
    fn rejects_duplicate_timestamps() {
        let s = TimeSeries::new(vec![day(1), day(1)], vec![1.0, 2.0]);
        assert!(s.is_err());
    }

    #[test]
    fn multi_column_shape() {
        let s = TimeSeries::with_columns(vec![day(1), day(2)], vec![1.0, 2.0, 3.0, 4.0], 2).unwrap();
        assert_eq!(s.shape(), (2, 2));
    }

    #[test]
    fn daily_axis_is_regular() {
        let start = NaiveDate::from_ymd_opt(1999, 12, 30).unwrap();
        let s = TimeSeries::daily(start, vec![0.0; 4]).unwrap();
        let ts = s.timestamps();
        assert!(ts.windows(2).all(|w| w[1] - w[0] == TimeDelta::days(1)));
        assert_eq!(ts[3], day(2));
    }

    #[test]
    fn hourly_axis_from_start() {
        let s = TimeSeries::from_start(day(1), &Resolution::HOURLY, vec![0.0; 25]).unwrap();
        assert_eq!(s.timestamps()[24], day(2));
    }

    #[test]
    fn all_nan_detection() {
        let s = TimeSeries::daily(NaiveDate::MIN, vec![f64::NAN, f64::NAN]).unwrap();
        assert!(s.all_nan());
        let s = s.clone().with_datetime_coord("datetime");
        assert_eq!(s.datetime_coord(), "datetime");
    }
}
