//! Pipeline configuration
//!
//! One struct per stage, aggregated in [`PipelineConfig`]. Defaults come
//! from [`crate::constants`]. With the `serde` feature every struct
//! deserializes with `#[serde(default)]`, so a JSON document only needs the
//! fields it overrides.
//!
//! ```rust
//! use neurorisk_core::config::{PipelineConfig, ImpactConfig};
//!
//! let config = PipelineConfig::default()
//!     .with_sample_rate(200.0)
//!     .with_impact(ImpactConfig::default().with_dead_time_ms(500));
//! assert!(config.validate().is_ok());
//! ```

use crate::constants::{buffers, physics, risk, sensors, time};
use crate::errors::ConfigError;
use crate::types::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub(crate) fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

/// Moving-average smoothing
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct SmoothingConfig {
    /// Window length in samples
    pub window: usize,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self { window: sensors::DEFAULT_SMOOTHING_WINDOW }
    }
}

impl SmoothingConfig {
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window == 0 || self.window > buffers::MAX_SMOOTHING_WINDOW {
            return Err(ConfigError::WindowOutOfRange {
                name: "smoothing",
                len: self.window,
                min: 1,
                max: buffers::MAX_SMOOTHING_WINDOW,
            });
        }
        Ok(())
    }
}

/// Zero offsets and gyro scale correction
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct CalibrationConfig {
    /// Initial accelerometer offset (m/s²)
    pub accel_offset: Vec3,
    /// Initial gyroscope offset (rad/s)
    pub gyro_offset: Vec3,
    /// Multiplier applied to gyro values after offset removal
    pub gyro_scale: f32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            accel_offset: physics::RESTING_ACCEL_OFFSET,
            gyro_offset: physics::RESTING_GYRO_OFFSET,
            gyro_scale: sensors::DEFAULT_GYRO_SCALE,
        }
    }
}

impl CalibrationConfig {
    pub fn with_gyro_scale(mut self, scale: f32) -> Self {
        self.gyro_scale = scale;
        self
    }

    pub fn with_offsets(mut self, accel: Vec3, gyro: Vec3) -> Self {
        self.accel_offset = accel;
        self.gyro_offset = gyro;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("gyro_scale", self.gyro_scale)?;
        if !self.accel_offset.is_finite() {
            return Err(ConfigError::NonPositive { name: "accel_offset", value: f32::NAN });
        }
        if !self.gyro_offset.is_finite() {
            return Err(ConfigError::NonPositive { name: "gyro_offset", value: f32::NAN });
        }
        Ok(())
    }
}

/// Stillness detection
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct StillnessConfig {
    /// Evaluation window duration (milliseconds)
    pub window_ms: u32,
    /// Max per-axis accel std dev still considered still (m/s²)
    pub accel_threshold: f32,
    /// Max per-axis scaled gyro std dev still considered still (rad/s)
    pub gyro_threshold: f32,
}

impl Default for StillnessConfig {
    fn default() -> Self {
        Self {
            window_ms: sensors::DEFAULT_STILLNESS_WINDOW_MS,
            accel_threshold: sensors::ACCEL_STILL_STD_THRESHOLD,
            gyro_threshold: sensors::GYRO_STILL_STD_THRESHOLD,
        }
    }
}

impl StillnessConfig {
    pub fn with_window_ms(mut self, window_ms: u32) -> Self {
        self.window_ms = window_ms;
        self
    }

    pub fn with_thresholds(mut self, accel: f32, gyro: f32) -> Self {
        self.accel_threshold = accel;
        self.gyro_threshold = gyro;
        self
    }

    /// Window length in samples at `sample_rate_hz`, never below the minimum
    pub fn window_samples(&self, sample_rate_hz: f32) -> usize {
        let derived = libm::roundf(self.window_ms as f32 * sample_rate_hz / time::MS_PER_SECOND as f32);
        let derived = if derived.is_finite() && derived > 0.0 { derived as usize } else { 0 };
        derived.max(sensors::MIN_STILLNESS_SAMPLES)
    }

    pub fn validate(&self, sample_rate_hz: f32) -> Result<(), ConfigError> {
        if self.window_ms == 0 {
            return Err(ConfigError::WindowOutOfRange {
                name: "stillness",
                len: 0,
                min: sensors::MIN_STILLNESS_SAMPLES,
                max: buffers::MAX_STILLNESS_WINDOW,
            });
        }
        self.validate_window(self.window_samples(sample_rate_hz))
    }

    /// Checks a window already expressed in samples, plus the thresholds
    pub fn validate_window(&self, window: usize) -> Result<(), ConfigError> {
        if !(sensors::MIN_STILLNESS_SAMPLES..=buffers::MAX_STILLNESS_WINDOW).contains(&window) {
            return Err(ConfigError::WindowOutOfRange {
                name: "stillness",
                len: window,
                min: sensors::MIN_STILLNESS_SAMPLES,
                max: buffers::MAX_STILLNESS_WINDOW,
            });
        }
        non_negative("accel_threshold", self.accel_threshold)?;
        non_negative("gyro_threshold", self.gyro_threshold)
    }
}

/// Auto-zero guards
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct AutoZeroConfig {
    /// Master switch; when false the controller never acts
    pub enabled: bool,
    /// Stillness must persist this long before a recompute (ms)
    pub hold_ms: u64,
    /// Minimum spacing between recomputes (ms)
    pub cooldown_ms: u64,
    /// Grace period after connection (ms)
    pub min_uptime_ms: u64,
    /// Quiet period after an impact (ms)
    pub impact_suppression_ms: u64,
}

impl Default for AutoZeroConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            hold_ms: time::DEFAULT_STILL_HOLD_MS,
            cooldown_ms: time::DEFAULT_AUTO_ZERO_COOLDOWN_MS,
            min_uptime_ms: time::DEFAULT_MIN_UPTIME_MS,
            impact_suppression_ms: time::DEFAULT_IMPACT_SUPPRESSION_MS,
        }
    }
}

impl AutoZeroConfig {
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_hold_ms(mut self, hold_ms: u64) -> Self {
        self.hold_ms = hold_ms;
        self
    }

    pub fn with_cooldown_ms(mut self, cooldown_ms: u64) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }

    pub fn with_min_uptime_ms(mut self, min_uptime_ms: u64) -> Self {
        self.min_uptime_ms = min_uptime_ms;
        self
    }

    pub fn with_impact_suppression_ms(mut self, ms: u64) -> Self {
        self.impact_suppression_ms = ms;
        self
    }
}

/// Impact detection thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ImpactConfig {
    /// Refractory period after an impact (ms)
    pub dead_time_ms: u64,
    /// Fixed interval for the angular finite difference (ms)
    pub sample_interval_ms: f32,
    /// Linear magnitude gate (g)
    pub min_linear_g: f32,
    /// Angular acceleration gate (rad/s²)
    pub min_angular_accel: f32,
    /// Composite score required to fire
    pub fire_threshold: f32,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            dead_time_ms: time::DEFAULT_IMPACT_DEAD_TIME_MS,
            sample_interval_ms: time::DEFAULT_SAMPLE_INTERVAL_MS,
            min_linear_g: sensors::MIN_IMPACT_LINEAR_G,
            min_angular_accel: sensors::MIN_IMPACT_ANGULAR_ACCEL,
            fire_threshold: sensors::WHISE_FIRE_THRESHOLD,
        }
    }
}

impl ImpactConfig {
    pub fn with_dead_time_ms(mut self, dead_time_ms: u64) -> Self {
        self.dead_time_ms = dead_time_ms;
        self
    }

    pub fn with_gates(mut self, min_linear_g: f32, min_angular_accel: f32) -> Self {
        self.min_linear_g = min_linear_g;
        self.min_angular_accel = min_angular_accel;
        self
    }

    pub fn with_fire_threshold(mut self, threshold: f32) -> Self {
        self.fire_threshold = threshold;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("sample_interval_ms", self.sample_interval_ms)?;
        non_negative("min_linear_g", self.min_linear_g)?;
        non_negative("min_angular_accel", self.min_angular_accel)?;
        non_negative("fire_threshold", self.fire_threshold)
    }
}

/// Risk scoring weights and decay
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct RiskConfig {
    /// Weight of the previous CLI in its moving average
    pub cli_decay: f64,
    /// Exposure decay rate per day
    pub exposure_decay_per_day: f64,
    /// Composite weight of the latest severity
    pub severity_weight: f64,
    /// Composite weight of exposure
    pub exposure_weight: f64,
    /// Composite weight of CLI
    pub load_weight: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            cli_decay: risk::CLI_DECAY_WEIGHT,
            exposure_decay_per_day: risk::EXPOSURE_DECAY_PER_DAY,
            severity_weight: risk::NRS_SEVERITY_WEIGHT,
            exposure_weight: risk::NRS_EXPOSURE_WEIGHT,
            load_weight: risk::NRS_LOAD_WEIGHT,
        }
    }
}

impl RiskConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cli_decay.is_finite() && (0.0..=1.0).contains(&self.cli_decay)) {
            return Err(ConfigError::Negative { name: "cli_decay", value: self.cli_decay as f32 });
        }
        for (name, value) in [
            ("exposure_decay_per_day", self.exposure_decay_per_day),
            ("severity_weight", self.severity_weight),
            ("exposure_weight", self.exposure_weight),
            ("load_weight", self.load_weight),
        ] {
            non_negative(name, value as f32)?;
        }
        Ok(())
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct PipelineConfig {
    /// Nominal sample rate (Hz)
    pub sample_rate_hz: f32,
    /// Delay after connect before detection starts and the first zero (ms)
    pub settling_delay_ms: u64,
    pub smoothing: SmoothingConfig,
    pub calibration: CalibrationConfig,
    pub stillness: StillnessConfig,
    pub auto_zero: AutoZeroConfig,
    pub impact: ImpactConfig,
    pub risk: RiskConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: sensors::DEFAULT_SAMPLE_RATE_HZ,
            settling_delay_ms: time::DEFAULT_SETTLING_DELAY_MS,
            smoothing: SmoothingConfig::default(),
            calibration: CalibrationConfig::default(),
            stillness: StillnessConfig::default(),
            auto_zero: AutoZeroConfig::default(),
            impact: ImpactConfig::default(),
            risk: RiskConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn with_sample_rate(mut self, hz: f32) -> Self {
        self.sample_rate_hz = hz;
        self
    }

    pub fn with_settling_delay_ms(mut self, ms: u64) -> Self {
        self.settling_delay_ms = ms;
        self
    }

    pub fn with_smoothing(mut self, smoothing: SmoothingConfig) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_calibration(mut self, calibration: CalibrationConfig) -> Self {
        self.calibration = calibration;
        self
    }

    pub fn with_stillness(mut self, stillness: StillnessConfig) -> Self {
        self.stillness = stillness;
        self
    }

    pub fn with_auto_zero(mut self, auto_zero: AutoZeroConfig) -> Self {
        self.auto_zero = auto_zero;
        self
    }

    pub fn with_impact(mut self, impact: ImpactConfig) -> Self {
        self.impact = impact;
        self
    }

    pub fn with_risk(mut self, risk: RiskConfig) -> Self {
        self.risk = risk;
        self
    }

    /// Checks every stage; the first violation wins
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("sample_rate_hz", self.sample_rate_hz)?;
        self.smoothing.validate()?;
        self.calibration.validate()?;
        self.stillness.validate(self.sample_rate_hz)?;
        self.impact.validate()?;
        self.risk.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.smoothing.window, 7);
        assert_eq!(config.impact.dead_time_ms, 770);
        assert_eq!(config.calibration.accel_offset, Vec3::new(0.0, 0.0, 9.81));
    }

    #[test]
    fn zero_smoothing_window_rejected() {
        let config = PipelineConfig::default()
            .with_smoothing(SmoothingConfig::default().with_window(0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WindowOutOfRange { name: "smoothing", .. })
        ));
    }

    #[test]
    fn oversized_stillness_window_rejected() {
        let config = PipelineConfig::default()
            .with_stillness(StillnessConfig::default().with_window_ms(10_000));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WindowOutOfRange { name: "stillness", .. })
        ));
    }

    #[test]
    fn stillness_window_has_floor() {
        let still = StillnessConfig::default().with_window_ms(10);
        // 10 ms at 100 Hz is one sample, raised to the minimum
        assert_eq!(still.window_samples(100.0), 5);
        assert_eq!(StillnessConfig::default().window_samples(100.0), 50);
    }

    #[test]
    fn non_positive_rate_rejected() {
        let config = PipelineConfig::default().with_sample_rate(0.0);
        assert!(matches!(config.validate(), Err(ConfigError::NonPositive { .. })));

        let config = PipelineConfig::default().with_sample_rate(-100.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_threshold_rejected() {
        let config = PipelineConfig::default()
            .with_stillness(StillnessConfig::default().with_thresholds(-0.1, 0.12));
        assert!(matches!(config.validate(), Err(ConfigError::Negative { .. })));
    }
}
