//! Sensor value types shared by every pipeline stage
//!
//! Accelerometer values are m/s², gyroscope values rad/s. All components
//! are `f32` to match what the sensor feed delivers; risk scoring widens
//! to `f64` where decayed sums over days need the headroom.

use core::ops::{Add, Mul, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Three-axis vector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    /// All components zero
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }

    /// True when no component is NaN or infinite
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Largest component
    pub fn max_component(&self) -> f32 {
        self.x.max(self.y).max(self.z)
    }

    /// Components as an array, x first
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, k: f32) -> Vec3 {
        Vec3::new(self.x * k, self.y * k, self.z * k)
    }
}

/// One decoded IMU reading as delivered by the transport
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sample {
    /// Linear acceleration (m/s²)
    pub accel: Vec3,
    /// Angular rate (rad/s), before scale correction
    pub gyro: Vec3,
}

impl Sample {
    pub const fn new(accel: Vec3, gyro: Vec3) -> Self {
        Self { accel, gyro }
    }

    /// A sample is usable only if every component is a real number
    pub fn is_finite(&self) -> bool {
        self.accel.is_finite() && self.gyro.is_finite()
    }
}

/// Offset-corrected values handed to detection and presentation
///
/// `gyro` is already multiplied by the gyro scale factor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZeroedSample {
    pub accel: Vec3,
    pub gyro: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_of_unit_axes() {
        assert_eq!(Vec3::new(3.0, 4.0, 0.0).magnitude(), 5.0);
        assert_eq!(Vec3::ZERO.magnitude(), 0.0);
    }

    #[test]
    fn arithmetic() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(0.5, 0.5, 0.5);
        assert_eq!(a - b, Vec3::new(0.5, 1.5, 2.5));
        assert_eq!(a + b, Vec3::new(1.5, 2.5, 3.5));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn non_finite_sample_rejected() {
        let good = Sample::new(Vec3::new(0.0, 0.0, 9.81), Vec3::ZERO);
        assert!(good.is_finite());

        let bad = Sample::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ZERO);
        assert!(!bad.is_finite());

        let inf = Sample::new(Vec3::ZERO, Vec3::new(0.0, f32::INFINITY, 0.0));
        assert!(!inf.is_finite());
    }
}
