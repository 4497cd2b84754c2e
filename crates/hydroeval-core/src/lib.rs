//! hydroeval: evaluation of rainfall-runoff model output.
//!
//! Loads CAMELS-US forcing and streamflow records and scores simulated
//! discharge against observations with the usual hydrological metrics
//! (NSE, KGE, flow-duration-curve signatures, peak timing).
pub mod camels;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod metrics;
pub mod resolution;
pub mod series;
pub mod validation;

pub use config::EvaluationConfig;
pub use dispatch::{calculate_all_metrics, calculate_metrics, calculate_metrics_with, Metric, MetricValues};
pub use error::{EvalError, Result};
pub use resolution::{Frequency, Resolution};
pub use series::TimeSeries;
