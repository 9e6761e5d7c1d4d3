//! Threshold-based impact detection
//!
//! ## Scoring
//!
//! For every zeroed sample:
//!
//! ```text
//! linG  = |accel| / 9.81                      (g)
//! ω     = |gyro|                              (rad/s, scale-corrected)
//! α     = (ω - ω_prev) / dt                   (rad/s², dt fixed, default 10 ms)
//! WHISE = 0.4 · linG/100 + 0.6 · |α|/6000
//! ```
//!
//! An impact fires when `linG ≥ min_linear_g`, `|α| ≥ min_angular_accel`
//! and `WHISE ≥ fire_threshold`, and the previous impact is at least
//! `dead_time_ms` old. Its severity is
//!
//! ```text
//! ISS = log10(1 + 0.8 · linG) · (1 + |α|/4500) · 0.75      rounded to 0.01
//! ```
//!
//! `dt` is the nominal interval, not the measured one: arrival jitter is
//! ignored. The very first sample after a reset has no predecessor and
//! gets `α = 0`.

use crate::config::ImpactConfig;
use crate::constants::{physics, sensors, MS_PER_SECOND};
use crate::risk::RiskUpdate;
use crate::time::Timestamp;
use crate::types::ZeroedSample;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One detected impact
///
/// Detection fills time, peaks and severity. The risk fields are
/// back-filled once the scorer has processed the impact.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImpactEvent {
    /// Detection time (ms since Unix epoch)
    pub time: Timestamp,
    /// Linear acceleration magnitude at detection (g)
    pub peak_linear_g: f32,
    /// Angular acceleration magnitude at detection (rad/s²)
    pub peak_angular_accel: f32,
    /// Impact severity score (ISS)
    pub severity: f64,
    /// Composite neuro risk score right after this impact
    pub composite_risk_at_time: f64,
    /// Time-weighted exposure right after this impact
    pub exposure_at_time: f64,
    /// Cumulative load index right after this impact
    pub cumulative_load_at_time: f64,
}

impl ImpactEvent {
    /// Event with risk fields not yet scored
    pub fn new(time: Timestamp, peak_linear_g: f32, peak_angular_accel: f32, severity: f64) -> Self {
        Self {
            time,
            peak_linear_g,
            peak_angular_accel,
            severity,
            composite_risk_at_time: 0.0,
            exposure_at_time: 0.0,
            cumulative_load_at_time: 0.0,
        }
    }

    /// Back-fills the risk fields from the update this impact produced
    pub fn apply_scores(&mut self, update: &RiskUpdate) {
        self.composite_risk_at_time = update.composite;
        self.exposure_at_time = update.exposure;
        self.cumulative_load_at_time = update.cumulative_load;
    }
}

/// WHISE detection score
pub fn whise_score(linear_g: f32, angular_accel: f32) -> f32 {
    sensors::WHISE_LINEAR_WEIGHT * (linear_g / sensors::WHISE_LINEAR_NORM_G)
        + sensors::WHISE_ANGULAR_WEIGHT * (libm::fabsf(angular_accel) / sensors::WHISE_ANGULAR_NORM)
}

/// Impact severity score, rounded to two decimals
pub fn impact_severity(linear_g: f32, angular_accel: f32) -> f64 {
    let lin = f64::from(linear_g);
    let alpha = f64::from(libm::fabsf(angular_accel));
    let iss = libm::log10(1.0 + lin * f64::from(sensors::ISS_LINEAR_FACTOR))
        * (1.0 + alpha / f64::from(sensors::ISS_ANGULAR_NORM))
        * f64::from(sensors::ISS_SCALE);
    round_to(iss, 2)
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = (0..decimals).fold(1.0, |f, _| f * 10.0);
    libm::round(value * factor) / factor
}

/// Per-sample impact detector with refractory guard
#[derive(Debug, Clone)]
pub struct ImpactDetector {
    config: ImpactConfig,
    last_impact: Option<Timestamp>,
    last_omega: Option<f32>,
}

impl ImpactDetector {
    pub fn new(config: ImpactConfig) -> Self {
        Self {
            config,
            last_impact: None,
            last_omega: None,
        }
    }

    /// Evaluates one zeroed sample
    ///
    /// The angular history advances on every call, including during the
    /// refractory period, so α always compares adjacent samples.
    pub fn detect(&mut self, zeroed: &ZeroedSample, now: Timestamp) -> Option<ImpactEvent> {
        let omega = zeroed.gyro.magnitude();
        let dt_s = self.config.sample_interval_ms / MS_PER_SECOND as f32;
        let alpha = match self.last_omega {
            Some(prev) => (omega - prev) / dt_s,
            None => 0.0,
        };
        self.last_omega = Some(omega);

        if self.in_refractory(now) {
            return None;
        }

        let linear_g = zeroed.accel.magnitude() / physics::STANDARD_GRAVITY_MS2;
        let alpha_abs = libm::fabsf(alpha);
        if linear_g < self.config.min_linear_g || alpha_abs < self.config.min_angular_accel {
            return None;
        }

        let score = whise_score(linear_g, alpha_abs);
        if score < self.config.fire_threshold {
            return None;
        }

        self.last_impact = Some(now);
        let severity = impact_severity(linear_g, alpha_abs);
        log_info!(
            "impact at {}: {}g {}rad/s2 whise={} iss={}",
            now,
            linear_g,
            alpha_abs,
            score,
            severity
        );
        Some(ImpactEvent::new(now, linear_g, alpha_abs, severity))
    }

    /// Forget angular history while detection is off
    ///
    /// The first sample after resuming then gets α = 0.
    pub fn suspend(&mut self) {
        self.last_omega = None;
    }

    pub fn in_refractory(&self, now: Timestamp) -> bool {
        match self.last_impact {
            Some(last) => now.saturating_sub(last) < self.config.dead_time_ms,
            None => false,
        }
    }

    pub fn last_impact(&self) -> Option<Timestamp> {
        self.last_impact
    }

    pub fn config(&self) -> &ImpactConfig {
        &self.config
    }
}
