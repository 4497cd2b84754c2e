/// Metric defaults and numerical safeguards.
///
/// Centralises all fixed values used by the metric suite. Run-time
/// overrides go through `EvaluationConfig`.
use crate::resolution::Resolution;

// -- Numerical safeguards --

/// Replacement for non-positive flows before taking logarithms, and the
/// stabiliser added to FMS/FLV denominators.
pub const FDC_EPSILON: f64 = 1e-6;

/// Minimum number of valid pairs for correlation-based metrics.
pub const MIN_CORRELATION_POINTS: usize = 2;

// -- Flow duration curve --

/// Lower bound of the FDC mid-segment (fraction of ranks).
pub const FMS_LOWER: f64 = 0.2;

/// Upper bound of the FDC mid-segment (fraction of ranks).
pub const FMS_UPPER: f64 = 0.7;

/// Top fraction of the FDC treated as peak flows.
pub const FHV_H: f64 = 0.02;

/// Bottom fraction of the FDC treated as low flows.
pub const FLV_L: f64 = 0.3;

// -- KGE --

/// Weights of the correlation, variability and bias terms.
pub const DEFAULT_KGE_WEIGHTS: [f64; 3] = [1.0, 1.0, 1.0];

/// Number of KGE weights.
pub const KGE_WEIGHT_COUNT: usize = 3;

// -- Peak timing --

/// Minimum horizontal distance between two observed peaks [samples].
pub const PEAK_DISTANCE: usize = 100;

/// Span that the default peak-matching half-window covers.
pub const PEAK_WINDOW_SPAN: Resolution = Resolution::HALF_DAY;

/// Smallest default half-window [samples].
pub const MIN_PEAK_WINDOW: usize = 3;
