//! Risk Scoring Constants
//!
//! Weights and decay rates of the composite neuro risk score (NRS) and the
//! level boundaries the caller alerts on.

/// Weight of the previous cumulative load index in its moving average.
///
/// `CLI' = 0.99 * CLI + 0.01 * ISS`
pub const CLI_DECAY_WEIGHT: f64 = 0.99;

/// Exponential decay rate of per-impact exposure (1/day).
///
/// Half-life is `ln 2 / 0.4` ≈ 1.7 days.
pub const EXPOSURE_DECAY_PER_DAY: f64 = 0.4;

/// Weight of the latest impact severity in the composite score.
pub const NRS_SEVERITY_WEIGHT: f64 = 0.35;

/// Weight of time-weighted exposure in the composite score.
pub const NRS_EXPOSURE_WEIGHT: f64 = 0.35;

/// Weight of the cumulative load index in the composite score.
pub const NRS_LOAD_WEIGHT: f64 = 0.2;

// ===== RISK LEVELS =====

/// Composite score at which the level becomes moderate.
pub const RISK_MODERATE_THRESHOLD: f64 = 3.0;

/// Composite score at which the level becomes high (alerting).
pub const RISK_HIGH_THRESHOLD: f64 = 6.0;

/// Composite score at which the level becomes severe (alerting).
pub const RISK_SEVERE_THRESHOLD: f64 = 8.0;
