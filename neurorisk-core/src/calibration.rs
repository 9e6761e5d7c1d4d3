//! Sensor zero offsets
//!
//! Offsets are subtracted from every smoothed sample. The gyro is then
//! multiplied by the scale correction, because the sensor feed reports
//! angular rate too low by a fixed factor.
//!
//! Offsets change in exactly two ways:
//! - the auto-zero controller recomputes one or both after sustained stillness
//! - an instant zero copies the latest raw reading (user reset, or the
//!   first settle after connecting)

use crate::config::CalibrationConfig;
use crate::types::{Sample, Vec3, ZeroedSample};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current accel and gyro zero points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CalibrationOffsets {
    accel: Vec3,
    gyro: Vec3,
    gyro_scale: f32,
}

impl CalibrationOffsets {
    pub fn new(config: &CalibrationConfig) -> Self {
        Self {
            accel: config.accel_offset,
            gyro: config.gyro_offset,
            gyro_scale: config.gyro_scale,
        }
    }

    /// Removes offsets and applies the gyro scale correction
    pub fn zero(&self, smoothed: &Sample) -> ZeroedSample {
        ZeroedSample {
            accel: smoothed.accel - self.accel,
            gyro: (smoothed.gyro - self.gyro) * self.gyro_scale,
        }
    }

    /// Takes the raw reading as the new zero point for both sensors
    pub fn instant_zero(&mut self, latest_raw: &Sample) {
        self.accel = latest_raw.accel;
        self.gyro = latest_raw.gyro;
    }

    pub fn set_accel(&mut self, offset: Vec3) {
        self.accel = offset;
    }

    pub fn set_gyro(&mut self, offset: Vec3) {
        self.gyro = offset;
    }

    pub fn accel(&self) -> Vec3 {
        self.accel
    }

    pub fn gyro(&self) -> Vec3 {
        self.gyro
    }

    pub fn gyro_scale(&self) -> f32 {
        self.gyro_scale
    }
}

impl Default for CalibrationOffsets {
    fn default() -> Self {
        Self::new(&CalibrationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_offsets_remove_gravity() {
        let offsets = CalibrationOffsets::default();
        let resting = Sample::new(Vec3::new(0.0, 0.0, 9.81), Vec3::ZERO);
        let zeroed = offsets.zero(&resting);
        assert_eq!(zeroed.accel, Vec3::ZERO);
        assert_eq!(zeroed.gyro, Vec3::ZERO);
    }

    #[test]
    fn gyro_offset_then_scale() {
        let mut offsets = CalibrationOffsets::default();
        offsets.set_gyro(Vec3::new(0.5, 0.0, 0.0));
        let s = Sample::new(Vec3::new(0.0, 0.0, 9.81), Vec3::new(1.5, 0.0, -1.0));
        let zeroed = offsets.zero(&s);
        assert_eq!(zeroed.gyro, Vec3::new(2.5, 0.0, -2.5));
    }

    #[test]
    fn instant_zero_uses_raw_reading() {
        let mut offsets = CalibrationOffsets::default();
        let raw = Sample::new(Vec3::new(0.3, 9.7, 0.2), Vec3::new(0.01, -0.02, 0.0));
        offsets.instant_zero(&raw);
        assert_eq!(offsets.accel(), raw.accel);
        assert_eq!(offsets.gyro(), raw.gyro);

        let zeroed = offsets.zero(&raw);
        assert_eq!(zeroed.accel, Vec3::ZERO);
        assert_eq!(zeroed.gyro, Vec3::ZERO);
    }
}
