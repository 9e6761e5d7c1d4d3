//! Neuro Risk Scoring
//!
//! ## Overview
//!
//! Four quantities describe accumulated risk:
//!
//! | Name | Symbol | Changes on |
//! |------|--------|------------|
//! | Latest severity | ISS | new impact |
//! | Cumulative load index | CLI | new impact only (moving average) |
//! | Time-weighted exposure | AWE | every recompute (decays continuously) |
//! | Composite neuro risk score | NRS | every recompute |
//!
//! ## Formulas
//!
//! ```text
//! CLI' = 0.99 · CLI + 0.01 · ISS
//! AWE  = Σ ISS_i · exp(-0.4 · days_since_i)        over the full history
//! NRS  = round1(max(0, 0.35 · ISS + 0.35 · AWE + 0.2 · CLI))
//! ```
//!
//! The exposure sum always covers the entire history, whichever path
//! triggers it (impact, periodic tick or restore). There is one composite
//! scale; no path multiplies the result further.
//!
//! ## Update Paths
//!
//! - [`RiskScorer::on_impact`]: moves CLI and ISS, recomputes AWE and NRS.
//! - [`RiskScorer::tick`]: recomputes AWE and NRS with the last recorded
//!   ISS. CLI is never touched, so between impacts AWE only decays.
//! - [`RiskScorer::restore`]: trusts the persisted CLI, takes ISS from the
//!   newest restored impact, recomputes the rest.

use crate::config::RiskConfig;
use crate::constants::risk as thresholds;
use crate::impact::{round_to, ImpactEvent};
use crate::time::{days_between, Timestamp};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Presentation bucket of the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RiskLevel {
    /// `< 3`
    Low,
    /// `[3, 6)`
    Moderate,
    /// `[6, 8)`, alerting
    High,
    /// `>= 8`, alerting
    Severe,
}

impl RiskLevel {
    pub fn classify(score: f64) -> Self {
        if score >= thresholds::RISK_SEVERE_THRESHOLD {
            RiskLevel::Severe
        } else if score >= thresholds::RISK_HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= thresholds::RISK_MODERATE_THRESHOLD {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }

    /// High and severe levels raise an alert at impact time
    pub fn is_alerting(&self) -> bool {
        matches!(self, RiskLevel::High | RiskLevel::Severe)
    }

    pub const fn name(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Severe => "severe",
        }
    }
}

/// Live risk state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RiskState {
    pub cumulative_load_index: f64,
    pub time_weighted_exposure: f64,
    pub latest_severity: f64,
    pub composite_score: f64,
    /// Time of the last recompute
    pub last_update: Timestamp,
}

/// Result of one recompute, handed to presentation
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RiskUpdate {
    pub timestamp: Timestamp,
    pub composite: f64,
    pub exposure: f64,
    pub cumulative_load: f64,
    pub latest_severity: f64,
    pub level: RiskLevel,
}

/// Persisted subset of [`RiskState`]
///
/// Only CLI and latest severity are trusted on restore; exposure is stored
/// for inspection and recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RiskSnapshot {
    pub last_update: Timestamp,
    pub cumulative_load_index: f64,
    pub time_weighted_exposure: f64,
    pub latest_severity: f64,
}

/// Maintains [`RiskState`] across impacts and ticks
#[derive(Debug, Clone)]
pub struct RiskScorer {
    config: RiskConfig,
    state: RiskState,
}

impl RiskScorer {
    pub fn new(config: RiskConfig) -> Self {
        Self { config, state: RiskState::default() }
    }

    /// Decayed severity sum over `history` as seen at `now`
    pub fn exposure(&self, history: &[ImpactEvent], now: Timestamp) -> f64 {
        history
            .iter()
            .map(|e| {
                e.severity * libm::exp(-self.config.exposure_decay_per_day * days_between(e.time, now))
            })
            .sum()
    }

    /// Composite score, clamped non-negative and rounded to 0.1
    pub fn composite(&self, severity: f64, exposure: f64, cumulative_load: f64) -> f64 {
        let raw = self.config.severity_weight * severity
            + self.config.exposure_weight * exposure
            + self.config.load_weight * cumulative_load;
        round_to(raw.max(0.0), 1)
    }

    /// Impact path; `history` must already contain the new impact
    pub fn on_impact(&mut self, severity: f64, history: &[ImpactEvent], now: Timestamp) -> RiskUpdate {
        let decay = self.config.cli_decay;
        self.state.cumulative_load_index =
            decay * self.state.cumulative_load_index + (1.0 - decay) * severity;
        self.state.latest_severity = severity;
        self.recompute(history, now)
    }

    /// Periodic path; `None` while there is no impact to score
    pub fn tick(&mut self, history: &[ImpactEvent], now: Timestamp) -> Option<RiskUpdate> {
        if history.is_empty() {
            return None;
        }
        Some(self.recompute(history, now))
    }

    /// Rebuilds state from persisted data
    pub fn restore(&mut self, snapshot: &RiskSnapshot, history: &[ImpactEvent], now: Timestamp) -> RiskUpdate {
        self.state.cumulative_load_index = snapshot.cumulative_load_index;
        self.state.latest_severity = history
            .last()
            .map(|e| e.severity)
            .unwrap_or(snapshot.latest_severity);
        self.recompute(history, now)
    }

    /// Zeroes everything
    pub fn reset(&mut self) {
        self.state = RiskState::default();
    }

    pub fn state(&self) -> &RiskState {
        &self.state
    }

    pub fn snapshot(&self) -> RiskSnapshot {
        RiskSnapshot {
            last_update: self.state.last_update,
            cumulative_load_index: self.state.cumulative_load_index,
            time_weighted_exposure: self.state.time_weighted_exposure,
            latest_severity: self.state.latest_severity,
        }
    }

    fn recompute(&mut self, history: &[ImpactEvent], now: Timestamp) -> RiskUpdate {
        let exposure = self.exposure(history, now);
        let composite = self.composite(
            self.state.latest_severity,
            exposure,
            self.state.cumulative_load_index,
        );
        self.state.time_weighted_exposure = exposure;
        self.state.composite_score = composite;
        self.state.last_update = now;

        RiskUpdate {
            timestamp: now,
            composite,
            exposure,
            cumulative_load: self.state.cumulative_load_index,
            latest_severity: self.state.latest_severity,
            level: RiskLevel::classify(composite),
        }
    }
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::new(RiskConfig::default())
    }
}
