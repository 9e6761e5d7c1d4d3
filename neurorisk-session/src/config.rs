//! Session configuration
//!
//! Loaded from JSON; every field is optional and falls back to the
//! default. Pipeline thresholds nest under `"pipeline"`:
//!
//! ```json
//! {
//!   "tick_interval_ms": 5000,
//!   "persist_on_impact": true,
//!   "output_capacity": 256,
//!   "pipeline": { "impact": { "dead_time_ms": 770 } }
//! }
//! ```

use neurorisk_core::constants::DEFAULT_RISK_TICK_MS;
use neurorisk_core::PipelineConfig;
use serde::{Deserialize, Serialize};

use crate::error::SessionResult;

/// Default broadcast buffer per subscriber
pub const DEFAULT_OUTPUT_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub pipeline: PipelineConfig,
    /// Period of the background risk tick (ms)
    pub tick_interval_ms: u64,
    /// Save history and risk after every detected impact
    pub persist_on_impact: bool,
    /// Outputs buffered per subscriber before the slowest one lags
    pub output_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            tick_interval_ms: DEFAULT_RISK_TICK_MS,
            persist_on_impact: true,
            output_capacity: DEFAULT_OUTPUT_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Parses and validates a JSON configuration
    pub fn from_json_str(json: &str) -> SessionResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.pipeline.validate()?;
        Ok(config)
    }

    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_tick_interval_ms(mut self, ms: u64) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    pub fn with_persist_on_impact(mut self, enabled: bool) -> Self {
        self.persist_on_impact = enabled;
        self
    }
}
