//! Goodness-of-fit metrics between observed and simulated discharge.
//!
//! All metrics take two aligned `TimeSeries`, drop timesteps where either is
//! missing, and return a scalar. `NaN` marks a metric that is undefined for
//! the data (too few valid points, empty segments); errors are reserved for
//! invalid input.
pub mod constants;
mod fdc;
mod kge;
pub mod peaks;
mod point;
mod stats;
mod timing;

pub use fdc::{fdc_fhv, fdc_flv, fdc_fms, flow_duration_curve};
pub use kge::kge;
pub use point::{alpha_nse, beta_kge, beta_nse, mse, nse, pearson_r, rmse};
pub use timing::{default_window, mean_peak_timing, resolve_datetime_coord};
