//! Auto-Zero Controller
//!
//! ## Overview
//!
//! Sensor offsets drift with temperature and strap position. When the
//! wearer is at rest long enough, the controller replaces the offsets with
//! the mean of the stillness window.
//!
//! ## State Machine
//!
//! ```text
//!                 still (either sensor)
//!   ┌──────────┐ ─────────────────────→ ┌───────────────────┐
//!   │ Tracking │                        │ Accumulating{since}│
//!   └──────────┘ ←───────────────────── └───────────────────┘
//!        ↑          neither still                 │
//!        │                                        │ held ≥ hold_ms
//!        │                                        │ and cooldown elapsed
//!        └──────────── recompute ←────────────────┘
//! ```
//!
//! Guards are evaluated once per sample, in order, and short-circuit:
//!
//! 1. feature disabled or capture paused
//! 2. inside the minimum-uptime grace period after connecting
//! 3. inside the suppression window after an impact
//! 4. neither sensor still → back to `Tracking`
//! 5. stillness not yet held for `hold_ms` → stay `Accumulating`
//! 6. previous recompute closer than `cooldown_ms` → `Blocked`
//! 7. recompute every sensor that is still on its own
//!
//! The hold debounces short pauses; the cooldown stops the controller from
//! re-zeroing on top of a correction it has just applied.

use crate::calibration::CalibrationOffsets;
use crate::config::AutoZeroConfig;
use crate::stillness::StillnessDetector;
use crate::time::Timestamp;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoZeroState {
    /// Moving, or not yet evaluated
    Tracking,
    /// Still since `since`, waiting out the hold and cooldown
    Accumulating {
        /// When stillness was first seen
        since: Timestamp,
    },
}

/// Why an evaluation did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Disabled,
    Paused,
    WarmingUp,
    RecentImpact,
}

/// Result of one evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoZeroOutcome {
    /// A guard short-circuited before stillness was looked at
    Skipped(SkipReason),
    /// Not still
    Tracking,
    /// Still, hold not yet satisfied
    Accumulating,
    /// Still and held, but the cooldown has not elapsed
    Blocked,
    /// Offsets were replaced for the sensors flagged true
    Recomputed(RecomputedSensors),
}

/// Which offsets a recompute replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RecomputedSensors {
    pub accel: bool,
    pub gyro: bool,
}

/// Per-sample inputs the controller does not own
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoZeroInputs {
    /// Feature switch for this sample
    pub enabled: bool,
    /// Capture paused by the user
    pub paused: bool,
    /// Time of the most recent (re)connection
    pub connected_at: Option<Timestamp>,
    /// Time of the most recent impact
    pub last_impact: Option<Timestamp>,
}

/// Stillness-driven offset recalibration
#[derive(Debug, Clone)]
pub struct AutoZeroController {
    config: AutoZeroConfig,
    state: AutoZeroState,
    last_recompute: Option<Timestamp>,
}

impl AutoZeroController {
    pub fn new(config: AutoZeroConfig) -> Self {
        Self {
            config,
            state: AutoZeroState::Tracking,
            last_recompute: None,
        }
    }

    /// Runs the guard chain for one sample
    pub fn evaluate(
        &mut self,
        now: Timestamp,
        inputs: AutoZeroInputs,
        stillness: &StillnessDetector,
        offsets: &mut CalibrationOffsets,
    ) -> AutoZeroOutcome {
        if !inputs.enabled {
            return AutoZeroOutcome::Skipped(SkipReason::Disabled);
        }
        if inputs.paused {
            return AutoZeroOutcome::Skipped(SkipReason::Paused);
        }
        if let Some(connected) = inputs.connected_at {
            if now.saturating_sub(connected) < self.config.min_uptime_ms {
                return AutoZeroOutcome::Skipped(SkipReason::WarmingUp);
            }
        }
        if let Some(impact) = inputs.last_impact {
            if now.saturating_sub(impact) < self.config.impact_suppression_ms {
                return AutoZeroOutcome::Skipped(SkipReason::RecentImpact);
            }
        }

        let accel_still = stillness.is_accel_still();
        let gyro_still = stillness.is_gyro_still();
        if !accel_still && !gyro_still {
            self.state = AutoZeroState::Tracking;
            return AutoZeroOutcome::Tracking;
        }

        let since = match self.state {
            AutoZeroState::Accumulating { since } => since,
            AutoZeroState::Tracking => {
                self.state = AutoZeroState::Accumulating { since: now };
                now
            }
        };
        if now.saturating_sub(since) < self.config.hold_ms {
            return AutoZeroOutcome::Accumulating;
        }

        if let Some(last) = self.last_recompute {
            if now.saturating_sub(last) < self.config.cooldown_ms {
                return AutoZeroOutcome::Blocked;
            }
        }

        let mut replaced = RecomputedSensors { accel: false, gyro: false };
        if accel_still {
            if let Some(mean) = stillness.accel_mean() {
                offsets.set_accel(mean);
                replaced.accel = true;
            }
        }
        if gyro_still {
            if let Some(mean) = stillness.gyro_mean() {
                offsets.set_gyro(mean);
                replaced.gyro = true;
            }
        }

        self.last_recompute = Some(now);
        self.state = AutoZeroState::Tracking;
        log_info!(
            "auto-zero at {}: accel={} gyro={}",
            now,
            replaced.accel,
            replaced.gyro
        );
        AutoZeroOutcome::Recomputed(replaced)
    }

    /// A manual zero counts as a recompute for cooldown purposes
    pub fn note_manual_zero(&mut self, now: Timestamp) {
        self.last_recompute = Some(now);
        self.state = AutoZeroState::Tracking;
    }

    /// Forget the accumulation timer, e.g. on reconnect
    pub fn reset(&mut self) {
        self.state = AutoZeroState::Tracking;
    }

    pub fn state(&self) -> AutoZeroState {
        self.state
    }

    pub fn last_recompute(&self) -> Option<Timestamp> {
        self.last_recompute
    }

    pub fn config(&self) -> &AutoZeroConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StillnessConfig;
    use crate::types::{Sample, Vec3};

    fn config() -> AutoZeroConfig {
        AutoZeroConfig::default()
            .with_hold_ms(100)
            .with_cooldown_ms(1000)
            .with_min_uptime_ms(0)
            .with_impact_suppression_ms(500)
    }

    fn inputs() -> AutoZeroInputs {
        AutoZeroInputs { enabled: true, ..Default::default() }
    }

    fn still_detector(rest: Sample) -> StillnessDetector {
        let mut d = StillnessDetector::new(&StillnessConfig::default(), 5, 2.5).unwrap();
        for _ in 0..5 {
            d.push_sample(&rest);
        }
        d
    }

    fn rest() -> Sample {
        Sample::new(Vec3::new(0.2, 0.1, 9.7), Vec3::new(0.02, -0.01, 0.0))
    }

    #[test]
    fn recomputes_after_hold() {
        let mut ctl = AutoZeroController::new(config());
        let d = still_detector(rest());
        let mut offsets = CalibrationOffsets::default();

        assert_eq!(ctl.evaluate(0, inputs(), &d, &mut offsets), AutoZeroOutcome::Accumulating);
        assert_eq!(ctl.state(), AutoZeroState::Accumulating { since: 0 });
        assert_eq!(ctl.evaluate(50, inputs(), &d, &mut offsets), AutoZeroOutcome::Accumulating);

        let outcome = ctl.evaluate(100, inputs(), &d, &mut offsets);
        assert_eq!(
            outcome,
            AutoZeroOutcome::Recomputed(RecomputedSensors { accel: true, gyro: true })
        );
        assert_eq!(offsets.accel(), rest().accel);
        assert_eq!(offsets.gyro(), rest().gyro);
        assert_eq!(ctl.state(), AutoZeroState::Tracking);
        assert_eq!(ctl.last_recompute(), Some(100));
    }

    #[test]
    fn cooldown_blocks_second_recompute() {
        let mut ctl = AutoZeroController::new(config());
        let d = still_detector(rest());
        let mut offsets = CalibrationOffsets::default();

        ctl.evaluate(0, inputs(), &d, &mut offsets);
        assert!(matches!(ctl.evaluate(100, inputs(), &d, &mut offsets), AutoZeroOutcome::Recomputed(_)));

        ctl.evaluate(200, inputs(), &d, &mut offsets);
        assert_eq!(ctl.evaluate(400, inputs(), &d, &mut offsets), AutoZeroOutcome::Blocked);
        assert!(matches!(ctl.evaluate(1100, inputs(), &d, &mut offsets), AutoZeroOutcome::Recomputed(_)));
    }

    #[test]
    fn loss_of_stillness_clears_timer() {
        let mut ctl = AutoZeroController::new(config());
        let still = still_detector(rest());
        let moving = StillnessDetector::new(&StillnessConfig::default(), 5, 2.5).unwrap();
        let mut offsets = CalibrationOffsets::default();

        ctl.evaluate(0, inputs(), &still, &mut offsets);
        assert_eq!(ctl.evaluate(50, inputs(), &moving, &mut offsets), AutoZeroOutcome::Tracking);
        assert_eq!(ctl.state(), AutoZeroState::Tracking);

        // timer restarts from 80
        assert_eq!(ctl.evaluate(80, inputs(), &still, &mut offsets), AutoZeroOutcome::Accumulating);
        assert_eq!(ctl.evaluate(150, inputs(), &still, &mut offsets), AutoZeroOutcome::Accumulating);
        assert!(matches!(ctl.evaluate(180, inputs(), &still, &mut offsets), AutoZeroOutcome::Recomputed(_)));
    }

    #[test]
    fn guards_short_circuit() {
        let mut ctl = AutoZeroController::new(config().with_min_uptime_ms(3000));
        let d = still_detector(rest());
        let mut offsets = CalibrationOffsets::default();

        let disabled = AutoZeroInputs { enabled: false, ..inputs() };
        assert_eq!(
            ctl.evaluate(0, disabled, &d, &mut offsets),
            AutoZeroOutcome::Skipped(SkipReason::Disabled)
        );

        let paused = AutoZeroInputs { paused: true, ..inputs() };
        assert_eq!(
            ctl.evaluate(0, paused, &d, &mut offsets),
            AutoZeroOutcome::Skipped(SkipReason::Paused)
        );

        let warming = AutoZeroInputs { connected_at: Some(1000), ..inputs() };
        assert_eq!(
            ctl.evaluate(2000, warming, &d, &mut offsets),
            AutoZeroOutcome::Skipped(SkipReason::WarmingUp)
        );

        let impact = AutoZeroInputs { last_impact: Some(9800), ..inputs() };
        assert_eq!(
            ctl.evaluate(10_000, impact, &d, &mut offsets),
            AutoZeroOutcome::Skipped(SkipReason::RecentImpact)
        );

        assert_eq!(offsets, CalibrationOffsets::default());
        assert_eq!(ctl.state(), AutoZeroState::Tracking);
    }

    #[test]
    fn only_still_sensor_is_recomputed() {
        let mut ctl = AutoZeroController::new(config().with_hold_ms(0));
        let mut d = StillnessDetector::new(&StillnessConfig::default(), 5, 2.5).unwrap();
        for i in 0..5 {
            let mut s = rest();
            s.gyro.x += if i % 2 == 0 { 0.5 } else { -0.5 };
            d.push_sample(&s);
        }
        let mut offsets = CalibrationOffsets::default();

        let outcome = ctl.evaluate(0, inputs(), &d, &mut offsets);
        assert_eq!(
            outcome,
            AutoZeroOutcome::Recomputed(RecomputedSensors { accel: true, gyro: false })
        );
        assert_eq!(offsets.accel(), rest().accel);
        assert_eq!(offsets.gyro(), Vec3::ZERO);
    }

    #[test]
    fn manual_zero_starts_cooldown() {
        let mut ctl = AutoZeroController::new(config().with_hold_ms(0));
        let d = still_detector(rest());
        let mut offsets = CalibrationOffsets::default();

        ctl.note_manual_zero(0);
        assert_eq!(ctl.evaluate(500, inputs(), &d, &mut offsets), AutoZeroOutcome::Blocked);
        assert!(matches!(ctl.evaluate(1000, inputs(), &d, &mut offsets), AutoZeroOutcome::Recomputed(_)));
    }
}
