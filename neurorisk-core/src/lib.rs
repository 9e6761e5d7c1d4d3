//! Streaming IMU conditioning and neuro risk scoring
//!
//! Turns raw accelerometer/gyroscope samples from a wearable into zeroed
//! readings, discrete impact events and a decayed risk score.
//! Designed to run on the sensor hub itself as well as on a phone.
//!
//! Key constraints:
//! - One sample at a time, O(window) work per sample
//! - No heap allocation on the per-sample path except history appends
//! - Caller supplies time; the core never reads a clock
//!
//! ```no_run
//! use neurorisk_core::{ImpactPipeline, PipelineConfig, Sample, Vec3};
//!
//! let mut pipeline = ImpactPipeline::new(PipelineConfig::default()).unwrap();
//! pipeline.on_connect(0);
//!
//! let sample = Sample::new(Vec3::new(0.0, 0.0, 9.81), Vec3::ZERO);
//! let report = pipeline.process_sample(&sample, 1_500).unwrap();
//! for event in &report.events {
//!     // hand to presentation
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[cfg(feature = "log")]
macro_rules! log_debug {
    ($($arg:tt)*) => { log::debug!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_info {
    ($($arg:tt)*) => { log::info!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "log")]
macro_rules! log_warn {
    ($($arg:tt)*) => { log::warn!($($arg)*) };
}

#[cfg(not(feature = "log"))]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

pub mod autozero;
pub mod buffer;
pub mod calibration;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod flags;
pub mod history;
pub mod impact;
pub mod pipeline;
pub mod risk;
pub mod smoothing;
pub mod stillness;
pub mod time;
pub mod types;

// Public API
pub use autozero::{AutoZeroController, AutoZeroOutcome, AutoZeroState, RecomputedSensors};
pub use calibration::CalibrationOffsets;
pub use config::{
    AutoZeroConfig, CalibrationConfig, ImpactConfig, PipelineConfig, RiskConfig, SmoothingConfig,
    StillnessConfig,
};
pub use errors::{ConfigError, PipelineError, PipelineResult};
pub use events::{OffsetSource, PipelineEvent};
pub use flags::{ControlFlags, FlagSnapshot};
pub use history::ImpactHistoryStore;
pub use impact::{ImpactDetector, ImpactEvent};
pub use pipeline::{ImpactPipeline, SampleReport};
pub use risk::{RiskLevel, RiskScorer, RiskSnapshot, RiskState, RiskUpdate};
pub use smoothing::SmoothingFilter;
pub use stillness::StillnessDetector;
pub use time::{ManualClock, TimeSource, Timestamp};
pub use types::{Sample, Vec3, ZeroedSample};

#[cfg(feature = "std")]
pub use time::SystemTime;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
