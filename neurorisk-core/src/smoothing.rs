//! Per-axis moving-average smoothing of raw samples

use crate::buffer::SampleWindow;
use crate::config::SmoothingConfig;
use crate::constants::buffers::MAX_SMOOTHING_WINDOW;
use crate::errors::ConfigError;
use crate::types::Sample;

/// Running average over the last W raw samples
#[derive(Debug, Clone)]
pub struct SmoothingFilter {
    accel: SampleWindow<MAX_SMOOTHING_WINDOW>,
    gyro: SampleWindow<MAX_SMOOTHING_WINDOW>,
}

impl SmoothingFilter {
    pub fn new(config: &SmoothingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            accel: SampleWindow::with_limit(config.window)?,
            gyro: SampleWindow::with_limit(config.window)?,
        })
    }

    /// Pushes `sample` and returns the mean of the window contents
    pub fn smooth(&mut self, sample: &Sample) -> Sample {
        self.accel.push(sample.accel);
        self.gyro.push(sample.gyro);

        // Both windows hold at least the sample just pushed
        Sample {
            accel: self.accel.mean().unwrap_or(sample.accel),
            gyro: self.gyro.mean().unwrap_or(sample.gyro),
        }
    }

    /// Drops all history, e.g. on reconnect
    pub fn reset(&mut self) {
        self.accel.clear();
        self.gyro.clear();
    }

    pub fn len(&self) -> usize {
        self.accel.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accel.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Vec3;

    fn sample(ax: f32, gz: f32) -> Sample {
        Sample::new(Vec3::new(ax, 0.0, 9.81), Vec3::new(0.0, 0.0, gz))
    }

    #[test]
    fn first_sample_passes_through() {
        let mut filter = SmoothingFilter::new(&SmoothingConfig::default()).unwrap();
        let out = filter.smooth(&sample(1.0, 0.5));
        assert_eq!(out, sample(1.0, 0.5));
    }

    #[test]
    fn averages_over_window() {
        let mut filter = SmoothingFilter::new(&SmoothingConfig::default().with_window(3)).unwrap();
        filter.smooth(&sample(3.0, 0.0));
        filter.smooth(&sample(6.0, 0.0));
        let out = filter.smooth(&sample(9.0, 3.0));
        assert!((out.accel.x - 6.0).abs() < 1e-5);
        assert!((out.gyro.z - 1.0).abs() < 1e-5);

        // 3.0 evicted
        let out = filter.smooth(&sample(0.0, 0.0));
        assert!((out.accel.x - 5.0).abs() < 1e-5);
        assert_eq!(filter.len(), 3);
    }

    #[test]
    fn spike_is_attenuated() {
        let mut filter = SmoothingFilter::new(&SmoothingConfig::default()).unwrap();
        for _ in 0..6 {
            filter.smooth(&sample(0.0, 0.0));
        }
        let out = filter.smooth(&sample(70.0, 0.0));
        assert!((out.accel.x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn window_out_of_range_is_rejected() {
        for window in [0, MAX_SMOOTHING_WINDOW + 1] {
            assert!(matches!(
                SmoothingFilter::new(&SmoothingConfig::default().with_window(window)),
                Err(ConfigError::WindowOutOfRange { name: "smoothing", .. })
            ));
        }
    }

    #[test]
    fn reset_clears_history() {
        let mut filter = SmoothingFilter::new(&SmoothingConfig::default()).unwrap();
        filter.smooth(&sample(100.0, 0.0));
        filter.reset();
        assert!(filter.is_empty());
        let out = filter.smooth(&sample(1.0, 0.0));
        assert_eq!(out.accel.x, 1.0);
    }
}
