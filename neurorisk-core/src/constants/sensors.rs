//! Sensor Conditioning and Impact Detection Defaults
//!
//! Thresholds here were tuned against the 100 Hz head-worn IMU feed the
//! pipeline was built for. They are defaults only; every value can be
//! overridden through the configuration structs.

// ===== SAMPLING =====

/// Nominal sample rate of the sensor feed (Hz).
pub const DEFAULT_SAMPLE_RATE_HZ: f32 = 100.0;

// ===== SMOOTHING =====

/// Moving-average window length (samples).
///
/// Seven samples at 100 Hz is a 70 ms window: enough to suppress
/// single-sample spikes without flattening impact peaks.
pub const DEFAULT_SMOOTHING_WINDOW: usize = 7;

// ===== CALIBRATION =====

/// Gyroscope scale correction applied after offset removal.
///
/// The sensor feed under-reports angular rate by this factor.
pub const DEFAULT_GYRO_SCALE: f32 = 2.5;

// ===== STILLNESS =====

/// Duration of the stillness evaluation window (milliseconds).
pub const DEFAULT_STILLNESS_WINDOW_MS: u32 = 500;

/// Smallest permitted stillness window (samples).
///
/// Fewer points make the sample standard deviation meaningless.
pub const MIN_STILLNESS_SAMPLES: usize = 5;

/// Accelerometer stillness threshold: max per-axis std dev (m/s²).
pub const ACCEL_STILL_STD_THRESHOLD: f32 = 0.25;

/// Gyroscope stillness threshold: max per-axis std dev of scaled rate (rad/s).
pub const GYRO_STILL_STD_THRESHOLD: f32 = 0.12;

// ===== IMPACT DETECTION =====

/// Minimum linear acceleration for an impact candidate (g).
pub const MIN_IMPACT_LINEAR_G: f32 = 1.0;

/// Minimum angular acceleration for an impact candidate (rad/s²).
pub const MIN_IMPACT_ANGULAR_ACCEL: f32 = 150.0;

/// Composite detection score required to fire an impact.
pub const WHISE_FIRE_THRESHOLD: f32 = 0.1;

/// Weight of normalized linear acceleration in the detection score.
pub const WHISE_LINEAR_WEIGHT: f32 = 0.4;

/// Weight of normalized angular acceleration in the detection score.
pub const WHISE_ANGULAR_WEIGHT: f32 = 0.6;

/// Linear acceleration normalizer for the detection score (g).
pub const WHISE_LINEAR_NORM_G: f32 = 100.0;

/// Angular acceleration normalizer for the detection score (rad/s²).
pub const WHISE_ANGULAR_NORM: f32 = 6000.0;

/// Linear-g multiplier inside the severity logarithm.
pub const ISS_LINEAR_FACTOR: f32 = 0.8;

/// Angular acceleration normalizer for severity (rad/s²).
pub const ISS_ANGULAR_NORM: f32 = 4500.0;

/// Overall severity scale.
pub const ISS_SCALE: f32 = 0.75;
