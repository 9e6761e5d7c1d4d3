//! Stillness detection over a short rolling window
//!
//! The window holds smoothed readings before offset removal, gyro unscaled.
//! Standard deviation ignores a constant shift, so the verdict is the same
//! as on zeroed data, and the window mean is directly a candidate offset.
//! The gyro spread is multiplied by the scale correction before it is
//! compared with the gyro threshold, which equals evaluating pre-scaled
//! values.
//!
//! A window that is not yet full is never still. That keeps auto-zero from
//! acting on a handful of samples right after a reset.

use crate::buffer::SampleWindow;
use crate::config::{positive, StillnessConfig};
use crate::constants::buffers::MAX_STILLNESS_WINDOW;
use crate::errors::ConfigError;
use crate::types::{Sample, Vec3};

/// Rolling std-dev test for "device at rest"
#[derive(Debug, Clone)]
pub struct StillnessDetector {
    accel: SampleWindow<MAX_STILLNESS_WINDOW>,
    gyro: SampleWindow<MAX_STILLNESS_WINDOW>,
    accel_threshold: f32,
    gyro_threshold: f32,
    gyro_scale: f32,
}

impl StillnessDetector {
    /// `window` is the derived sample count, at least five
    pub fn new(config: &StillnessConfig, window: usize, gyro_scale: f32) -> Result<Self, ConfigError> {
        config.validate_window(window)?;
        positive("gyro_scale", gyro_scale)?;
        Ok(Self {
            accel: SampleWindow::with_limit(window)?,
            gyro: SampleWindow::with_limit(window)?,
            accel_threshold: config.accel_threshold,
            gyro_threshold: config.gyro_threshold,
            gyro_scale,
        })
    }

    pub fn push_sample(&mut self, smoothed: &Sample) {
        self.accel.push(smoothed.accel);
        self.gyro.push(smoothed.gyro);
    }

    pub fn is_accel_still(&self) -> bool {
        self.accel.is_full() && self.accel_spread() < self.accel_threshold
    }

    pub fn is_gyro_still(&self) -> bool {
        self.gyro.is_full() && self.gyro_spread() < self.gyro_threshold
    }

    /// Largest per-axis accel std dev (m/s²)
    pub fn accel_spread(&self) -> f32 {
        self.accel.sample_std_dev().max_component()
    }

    /// Largest per-axis scaled gyro std dev (rad/s)
    pub fn gyro_spread(&self) -> f32 {
        self.gyro.sample_std_dev().max_component() * self.gyro_scale
    }

    /// Mean of the accel window, in offset units
    pub fn accel_mean(&self) -> Option<Vec3> {
        self.accel.mean()
    }

    /// Mean of the unscaled gyro window, in offset units
    pub fn gyro_mean(&self) -> Option<Vec3> {
        self.gyro.mean()
    }

    pub fn window_len(&self) -> usize {
        self.accel.limit()
    }

    pub fn len(&self) -> usize {
        self.accel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accel.is_empty()
    }

    pub fn reset(&mut self) {
        self.accel.clear();
        self.gyro.clear();
    }
}
