//! Error Types for the Impact Pipeline
//!
//! ## Design
//!
//! Errors are small `Copy` enums carrying only numbers and `&'static str`
//! reasons, so they can be returned from the per-sample hot path without
//! allocation and stored in queues on constrained targets.
//!
//! Two families exist:
//!
//! - [`ConfigError`]: raised once, at construction. A misconfigured window
//!   or threshold is a programming error and is rejected before any sample
//!   is processed.
//! - [`PipelineError`]: raised per call. A sample with a non-finite
//!   component is refused without mutating any state; the caller decides
//!   whether to log it.
//!
//! ```rust
//! use neurorisk_core::{ImpactPipeline, PipelineConfig, PipelineError, Sample, Vec3};
//!
//! let mut pipeline = ImpactPipeline::new(PipelineConfig::default()).unwrap();
//! let bad = Sample::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ZERO);
//!
//! match pipeline.process_sample(&bad, 0) {
//!     Err(PipelineError::InvalidSample) => { /* drop it */ }
//!     _ => unreachable!(),
//! }
//! ```

use thiserror_no_std::Error;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Construction-time configuration errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// A window length is zero or exceeds the buffer capacity
    #[error("{name} window of {len} samples outside [{min}, {max}]")]
    WindowOutOfRange {
        /// Which window was rejected
        name: &'static str,
        /// Requested length in samples
        len: usize,
        /// Smallest accepted length
        min: usize,
        /// Largest accepted length (buffer capacity)
        max: usize,
    },

    /// A rate, interval or scale that must be strictly positive is not
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive {
        /// Offending parameter
        name: &'static str,
        /// Value supplied
        value: f32,
    },

    /// A threshold or weight that must be non-negative is not
    #[error("{name} must be non-negative and finite, got {value}")]
    Negative {
        /// Offending parameter
        name: &'static str,
        /// Value supplied
        value: f32,
    },
}

/// Per-call pipeline errors
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum PipelineError {
    /// Sample contains NaN or infinity; dropped without touching state
    #[error("Invalid sample: non-finite component")]
    InvalidSample,

    /// A manual zero was requested before any raw sample arrived
    #[error("No sample received yet")]
    NoSample,

    /// Rejected configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::WindowOutOfRange { name, len, min, max } =>
                defmt::write!(fmt, "{} window {} outside [{}, {}]", name, len, min, max),
            Self::NonPositive { name, value } =>
                defmt::write!(fmt, "{} must be positive, got {}", name, value),
            Self::Negative { name, value } =>
                defmt::write!(fmt, "{} must be non-negative, got {}", name, value),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PipelineError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidSample => defmt::write!(fmt, "Invalid sample"),
            Self::NoSample => defmt::write!(fmt, "No sample yet"),
            Self::Config(e) => defmt::write!(fmt, "Config: {}", e),
        }
    }
}
