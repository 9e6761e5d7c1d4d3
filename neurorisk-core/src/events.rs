//! Events emitted by the per-sample pipeline
//!
//! ## Event Flow
//!
//! A sample can produce several events, always in this order:
//!
//! 1. `OffsetsUpdated { source: Settle }` on the first sample after settling
//! 2. `ImpactDetected` when the detector fires
//! 3. `RiskUpdated` for the recompute triggered by that impact
//! 4. `Alert` when that recompute lands at high or severe
//! 5. `OffsetsUpdated { source: AutoZero }` when the controller recomputes
//!
//! Events are plain values. The pipeline hands them back in a
//! [`SampleReport`](crate::pipeline::SampleReport) and never calls out to
//! listeners itself.

use crate::autozero::RecomputedSensors;
use crate::impact::ImpactEvent;
use crate::risk::{RiskLevel, RiskUpdate};
use crate::time::Timestamp;
use crate::types::Vec3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What changed the calibration offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OffsetSource {
    /// Stillness-driven recompute of the flagged sensors
    AutoZero(RecomputedSensors),
    /// Instant zero at the end of the post-connect settling period
    Settle,
    /// User-requested instant zero
    Manual,
}

impl OffsetSource {
    pub const fn name(&self) -> &'static str {
        match self {
            OffsetSource::AutoZero(_) => "auto-zero",
            OffsetSource::Settle => "settle",
            OffsetSource::Manual => "manual",
        }
    }
}

/// Output of the pipeline
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PipelineEvent {
    /// A new impact, already scored and appended to history
    ImpactDetected(ImpactEvent),

    /// Risk recompute from an impact, a tick or a restore
    RiskUpdated(RiskUpdate),

    /// Composite score reached an alerting level at impact time
    Alert {
        level: RiskLevel,
        composite: f64,
        timestamp: Timestamp,
    },

    /// Calibration offsets replaced
    OffsetsUpdated {
        source: OffsetSource,
        accel: Vec3,
        gyro: Vec3,
        timestamp: Timestamp,
    },
}

impl PipelineEvent {
    /// Get event timestamp
    pub fn timestamp(&self) -> Timestamp {
        match self {
            PipelineEvent::ImpactDetected(event) => event.time,
            PipelineEvent::RiskUpdated(update) => update.timestamp,
            PipelineEvent::Alert { timestamp, .. } => *timestamp,
            PipelineEvent::OffsetsUpdated { timestamp, .. } => *timestamp,
        }
    }

    pub fn is_alert(&self) -> bool {
        matches!(self, PipelineEvent::Alert { .. })
    }
}
