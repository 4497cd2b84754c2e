//! Run-time metric parameters.
//!
//! Defaults come from `metrics::constants`; a config can be deserialised
//! from JSON to evaluate many basins with the same non-default settings.
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};
use crate::metrics::constants::{
    DEFAULT_KGE_WEIGHTS, FHV_H, FLV_L, FMS_LOWER, FMS_UPPER, KGE_WEIGHT_COUNT,
};
use crate::resolution::Resolution;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluationConfig {
    /// Lower bound of the FDC mid-segment.
    pub fms_lower: f64,
    /// Upper bound of the FDC mid-segment.
    pub fms_upper: f64,
    /// Peak-flow fraction for FHV.
    pub fhv_h: f64,
    /// Low-flow fraction for FLV.
    pub flv_l: f64,
    /// KGE weights `(s_r, s_alpha, s_beta)`.
    pub kge_weights: Vec<f64>,
    /// Half-width of the peak matching window; inferred when `None`.
    pub peak_window: Option<usize>,
    pub resolution: Resolution,
    /// Explicit datetime coordinate; inferred when `None`.
    pub datetime_coord: Option<String>,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            fms_lower: FMS_LOWER,
            fms_upper: FMS_UPPER,
            fhv_h: FHV_H,
            flv_l: FLV_L,
            kge_weights: DEFAULT_KGE_WEIGHTS.to_vec(),
            peak_window: None,
            resolution: Resolution::DAILY,
            datetime_coord: None,
        }
    }
}

impl EvaluationConfig {
    /// Parse a (possibly partial) JSON object; missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| EvalError::InvalidArgument(format!("invalid evaluation config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_datetime_coord(mut self, name: impl Into<String>) -> Self {
        self.datetime_coord = Some(name.into());
        self
    }

    pub fn with_fms_bounds(mut self, lower: f64, upper: f64) -> Self {
        self.fms_lower = lower;
        self.fms_upper = upper;
        self
    }

    pub fn with_fhv_h(mut self, h: f64) -> Self {
        self.fhv_h = h;
        self
    }

    pub fn with_flv_l(mut self, l: f64) -> Self {
        self.flv_l = l;
        self
    }

    pub fn with_kge_weights(mut self, weights: impl Into<Vec<f64>>) -> Self {
        self.kge_weights = weights.into();
        self
    }

    pub fn with_peak_window(mut self, window: usize) -> Self {
        self.peak_window = Some(window);
        self
    }

    /// Check every parameter against its domain.
    ///
    /// The metrics repeat these checks; validating up front lets a batch
    /// run fail before the first basin is evaluated.
    pub fn validate(&self) -> Result<()> {
        let open_unit = |x: f64| x > 0.0 && x < 1.0;
        if !open_unit(self.fms_lower) || !open_unit(self.fms_upper) || self.fms_lower >= self.fms_upper {
            return Err(EvalError::InvalidArgument(format!(
                "FMS bounds must satisfy 0 < lower < upper < 1, got {} and {}",
                self.fms_lower, self.fms_upper
            )));
        }
        if !open_unit(self.fhv_h) {
            return Err(EvalError::InvalidArgument(format!(
                "fhv_h must be in ]0,1[, got {}",
                self.fhv_h
            )));
        }
        if !open_unit(self.flv_l) {
            return Err(EvalError::InvalidArgument(format!(
                "flv_l must be in ]0,1[, got {}",
                self.flv_l
            )));
        }
        if self.kge_weights.len() != KGE_WEIGHT_COUNT {
            return Err(EvalError::InvalidArgument(format!(
                "KGE needs exactly {} weights, got {}",
                KGE_WEIGHT_COUNT,
                self.kge_weights.len()
            )));
        }
        if self.peak_window == Some(0) {
            return Err(EvalError::InvalidArgument(
                "peak_window must be at least one step".to_string(),
            ));
        }
        Ok(())
    }
}
