//! Per-Sample Impact Pipeline
//!
//! ## Overview
//!
//! [`ImpactPipeline`] owns every piece of mutable state (windows, offsets,
//! controller, detector, risk, history) and advances all of it one sample
//! at a time:
//!
//! ```text
//! raw ─→ SmoothingFilter ─→ smoothed ─┬─→ StillnessDetector
//!                                     │
//!                                     └─→ CalibrationOffsets::zero ─→ zeroed
//!                                                                       │
//!        ┌──────────────────────────────────────────────────────────────┘
//!        ↓
//!  ImpactDetector ─→ ImpactHistoryStore ─→ RiskScorer      (impact path)
//!        ↓
//!  AutoZeroController ─→ CalibrationOffsets                 (next sample)
//! ```
//!
//! Detection runs before auto-zero so that an impact suppresses a
//! recompute on the very sample it was detected on.
//!
//! ## Concurrency
//!
//! The pipeline is a plain owned value. Callers that drive samples and the
//! periodic tick from different tasks serialize them behind one lock.
//! Only [`ControlFlags`] is shared, and it is read once per sample.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! on_connect(t) ──→ settling (detection off) ──→ first sample ≥ t + settle
//!                                                   │ instant zero
//!                                                   ↓
//!                                                running
//! ```
//!
//! Auto-zero additionally waits out the minimum uptime after `t`.

use alloc::sync::Arc;
use alloc::vec::Vec;
use heapless::Vec as BoundedVec;

use crate::autozero::{AutoZeroController, AutoZeroInputs, AutoZeroOutcome, AutoZeroState};
use crate::calibration::CalibrationOffsets;
use crate::config::PipelineConfig;
use crate::constants::buffers::MAX_EVENTS_PER_SAMPLE;
use crate::errors::{ConfigError, PipelineError, PipelineResult};
use crate::events::{OffsetSource, PipelineEvent};
use crate::flags::{ControlFlags, FlagSnapshot};
use crate::history::ImpactHistoryStore;
use crate::impact::{ImpactDetector, ImpactEvent};
use crate::risk::{RiskLevel, RiskScorer, RiskSnapshot, RiskState, RiskUpdate};
use crate::smoothing::SmoothingFilter;
use crate::stillness::StillnessDetector;
use crate::time::Timestamp;
use crate::types::{Sample, ZeroedSample};

/// Events raised by one sample
pub type SampleEvents = BoundedVec<PipelineEvent, MAX_EVENTS_PER_SAMPLE>;

/// Everything one sample produced
#[derive(Debug, Clone, PartialEq)]
pub struct SampleReport {
    /// Offset-corrected sample for presentation
    pub zeroed: ZeroedSample,
    /// Events in the order they happened
    pub events: SampleEvents,
}

impl SampleReport {
    /// The impact detected on this sample, if any
    pub fn impact(&self) -> Option<&ImpactEvent> {
        self.events.iter().find_map(|e| match e {
            PipelineEvent::ImpactDetected(event) => Some(event),
            _ => None,
        })
    }

    /// The risk update triggered by this sample, if any
    pub fn risk_update(&self) -> Option<&RiskUpdate> {
        self.events.iter().find_map(|e| match e {
            PipelineEvent::RiskUpdated(update) => Some(update),
            _ => None,
        })
    }

    pub fn has_alert(&self) -> bool {
        self.events.iter().any(PipelineEvent::is_alert)
    }

    pub fn offsets_updated(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e, PipelineEvent::OffsetsUpdated { .. }))
    }
}

/// Complete per-sample conditioning, detection and scoring state
#[derive(Debug)]
pub struct ImpactPipeline {
    config: PipelineConfig,
    flags: Arc<ControlFlags>,
    smoothing: SmoothingFilter,
    offsets: CalibrationOffsets,
    stillness: StillnessDetector,
    auto_zero: AutoZeroController,
    detector: ImpactDetector,
    scorer: RiskScorer,
    history: ImpactHistoryStore,
    connected_at: Option<Timestamp>,
    settle_deadline: Option<Timestamp>,
    last_raw: Option<Sample>,
}

impl ImpactPipeline {
    /// Builds a pipeline, rejecting invalid configuration up front
    pub fn new(config: PipelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let still_window = config.stillness.window_samples(config.sample_rate_hz);
        Ok(Self {
            flags: Arc::new(ControlFlags::new(config.auto_zero.enabled)),
            smoothing: SmoothingFilter::new(&config.smoothing)?,
            offsets: CalibrationOffsets::new(&config.calibration),
            stillness: StillnessDetector::new(
                &config.stillness,
                still_window,
                config.calibration.gyro_scale,
            )?,
            auto_zero: AutoZeroController::new(config.auto_zero),
            detector: ImpactDetector::new(config.impact),
            scorer: RiskScorer::new(config.risk),
            history: ImpactHistoryStore::new(),
            connected_at: None,
            settle_deadline: None,
            last_raw: None,
            config,
        })
    }

    /// Handle for flipping pause and feature switches from another thread
    pub fn flags(&self) -> Arc<ControlFlags> {
        Arc::clone(&self.flags)
    }

    /// Starts a fresh connection
    ///
    /// Windows and timers restart; offsets, history and risk carry over.
    pub fn on_connect(&mut self, now: Timestamp) {
        self.smoothing.reset();
        self.stillness.reset();
        self.detector.suspend();
        self.auto_zero.reset();
        self.last_raw = None;
        self.connected_at = Some(now);
        self.settle_deadline = Some(now.saturating_add(self.config.settling_delay_ms));
        log_info!("connected at {}, settling for {} ms", now, self.config.settling_delay_ms);
    }

    /// Advances the pipeline by one raw sample
    ///
    /// A sample with a non-finite component is rejected before any state
    /// changes.
    pub fn process_sample(&mut self, sample: &Sample, now: Timestamp) -> PipelineResult<SampleReport> {
        if !sample.is_finite() {
            return Err(PipelineError::InvalidSample);
        }

        let flags = self.flags.snapshot();
        let mut events = SampleEvents::new();
        self.last_raw = Some(*sample);

        let smoothed = self.smoothing.smooth(sample);
        self.stillness.push_sample(&smoothed);

        let settling = match self.settle_deadline {
            Some(deadline) if now >= deadline => {
                self.settle_deadline = None;
                self.offsets.instant_zero(sample);
                self.auto_zero.note_manual_zero(now);
                log_debug!("settled at {}, offsets zeroed", now);
                emit(&mut events, self.offsets_event(OffsetSource::Settle, now));
                false
            }
            Some(_) => true,
            None => false,
        };

        let zeroed = self.offsets.zero(&smoothed);

        if flags.paused || flags.detection_disabled || settling {
            self.detector.suspend();
        } else if let Some(event) = self.detector.detect(&zeroed, now) {
            self.record_impact(event, now, &mut events);
        }

        self.run_auto_zero(flags, now, &mut events);

        Ok(SampleReport { zeroed, events })
    }

    /// Takes the most recent raw sample as the new zero point
    pub fn manual_zero(&mut self, now: Timestamp) -> PipelineResult<PipelineEvent> {
        let latest = self.last_raw.ok_or(PipelineError::NoSample)?;
        self.offsets.instant_zero(&latest);
        self.auto_zero.note_manual_zero(now);
        log_info!("manual zero at {}", now);
        Ok(self.offsets_event(OffsetSource::Manual, now))
    }

    /// Periodic risk recompute; `None` while history is empty
    pub fn tick(&mut self, now: Timestamp) -> Option<RiskUpdate> {
        self.scorer.tick(self.history.all(), now)
    }

    /// Drops all impacts and zeroes the risk state
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.scorer.reset();
        log_info!("impact history cleared");
    }

    /// Replaces history and risk with persisted state, then recomputes
    pub fn restore(&mut self, history: Vec<ImpactEvent>, snapshot: RiskSnapshot, now: Timestamp) -> RiskUpdate {
        self.history = ImpactHistoryStore::from_events(history);
        let update = self.scorer.restore(&snapshot, self.history.all(), now);
        log_info!(
            "restored {} impacts, composite {}",
            self.history.len(),
            update.composite
        );
        update
    }

    /// Persistable risk state
    pub fn snapshot(&self) -> RiskSnapshot {
        self.scorer.snapshot()
    }

    pub fn history(&self) -> &[ImpactEvent] {
        self.history.all()
    }

    pub fn offsets(&self) -> &CalibrationOffsets {
        &self.offsets
    }

    pub fn risk_state(&self) -> &RiskState {
        self.scorer.state()
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::classify(self.scorer.state().composite_score)
    }

    pub fn auto_zero_state(&self) -> AutoZeroState {
        self.auto_zero.state()
    }

    pub fn stillness(&self) -> &StillnessDetector {
        &self.stillness
    }

    /// Whether detection is still held off after the last connect
    pub fn is_settling(&self) -> bool {
        self.settle_deadline.is_some()
    }

    pub fn connected_at(&self) -> Option<Timestamp> {
        self.connected_at
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn record_impact(&mut self, mut event: ImpactEvent, now: Timestamp, events: &mut SampleEvents) {
        self.history.append(event);
        let update = self.scorer.on_impact(event.severity, self.history.all(), now);
        event.apply_scores(&update);
        if let Some(stored) = self.history.latest_mut() {
            if stored.time == event.time {
                stored.apply_scores(&update);
            }
        }

        emit(events, PipelineEvent::ImpactDetected(event));
        emit(events, PipelineEvent::RiskUpdated(update));
        if update.level.is_alerting() {
            log_warn!(
                "{} risk at {}: composite {}",
                update.level.name(),
                now,
                update.composite
            );
            emit(
                events,
                PipelineEvent::Alert {
                    level: update.level,
                    composite: update.composite,
                    timestamp: now,
                },
            );
        }
    }

    fn run_auto_zero(&mut self, flags: FlagSnapshot, now: Timestamp, events: &mut SampleEvents) {
        let inputs = AutoZeroInputs {
            enabled: flags.auto_zero_enabled,
            paused: flags.paused,
            connected_at: self.connected_at,
            last_impact: self.detector.last_impact(),
        };
        let outcome = self
            .auto_zero
            .evaluate(now, inputs, &self.stillness, &mut self.offsets);
        if let AutoZeroOutcome::Recomputed(sensors) = outcome {
            emit(events, self.offsets_event(OffsetSource::AutoZero(sensors), now));
        }
    }

    fn offsets_event(&self, source: OffsetSource, now: Timestamp) -> PipelineEvent {
        PipelineEvent::OffsetsUpdated {
            source,
            accel: self.offsets.accel(),
            gyro: self.offsets.gyro(),
            timestamp: now,
        }
    }
}

fn emit(events: &mut SampleEvents, event: PipelineEvent) {
    if events.push(event).is_err() {
        log_warn!("per-sample event buffer full, event dropped");
    }
}
