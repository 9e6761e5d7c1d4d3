//! Constants for NeuroRisk Core
//!
//! Every default threshold, window and weight used by the pipeline lives
//! here with its unit. Configuration structs take their `Default` values
//! from these constants, so changing a default is a one-line edit.
//!
//! ## Organization
//!
//! - **Physics**: gravity and unit conversions
//! - **Sensors**: smoothing, calibration, stillness and impact thresholds
//! - **Risk**: scoring weights, decay rates and level boundaries
//! - **Time**: durations, intervals and conversion factors
//! - **Buffers**: fixed capacities of the in-memory windows

/// Physical constants and unit conversions.
pub mod physics;

/// Sensor conditioning and impact detection defaults.
pub mod sensors;

/// Risk scoring weights and level thresholds.
pub mod risk;

/// Time-related constants for intervals and guards.
pub mod time;

/// Buffer capacities for embedded-friendly fixed windows.
pub mod buffers;

pub use physics::{STANDARD_GRAVITY_MS2, RESTING_ACCEL_OFFSET};

pub use sensors::{
    DEFAULT_SMOOTHING_WINDOW, DEFAULT_GYRO_SCALE, DEFAULT_SAMPLE_RATE_HZ,
    ACCEL_STILL_STD_THRESHOLD, GYRO_STILL_STD_THRESHOLD, MIN_STILLNESS_SAMPLES,
};

pub use risk::{
    CLI_DECAY_WEIGHT, EXPOSURE_DECAY_PER_DAY, RISK_MODERATE_THRESHOLD,
    RISK_HIGH_THRESHOLD, RISK_SEVERE_THRESHOLD,
};

pub use time::{MS_PER_SECOND, MS_PER_DAY, DEFAULT_SAMPLE_INTERVAL_MS, DEFAULT_RISK_TICK_MS};

pub use buffers::{MAX_SMOOTHING_WINDOW, MAX_STILLNESS_WINDOW, MAX_EVENTS_PER_SAMPLE};
