//! Physical Constants for NeuroRisk
//!
//! Fundamental values used to convert raw accelerometer output into
//! physically meaningful quantities.

use crate::types::Vec3;

/// Standard gravity (m/s²).
///
/// Used to express linear acceleration magnitude in g and as the resting
/// z-axis offset of a device lying flat.
///
/// Source: CGPM 1901, rounded to the precision the sensor feed reports
pub const STANDARD_GRAVITY_MS2: f32 = 9.81;

/// Default accelerometer zero offset (m/s²).
///
/// A wearable at rest reads one g on the axis aligned with gravity; the
/// default assumes that axis is z until the first calibration.
pub const RESTING_ACCEL_OFFSET: Vec3 = Vec3::new(0.0, 0.0, STANDARD_GRAVITY_MS2);

/// Default gyroscope zero offset (rad/s).
pub const RESTING_GYRO_OFFSET: Vec3 = Vec3::ZERO;
