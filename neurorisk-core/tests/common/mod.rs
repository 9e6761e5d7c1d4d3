//! Shared fixtures for pipeline integration tests
//!
//! Provides:
//! - resting and impact sample builders in sensor units
//! - configurations that shrink windows and timers for short traces
//! - a driver that feeds a sample trace at the nominal 10 ms interval

#![allow(dead_code)]

use neurorisk_core::{
    AutoZeroConfig, ImpactPipeline, PipelineConfig, PipelineEvent, Sample, SampleReport,
    SmoothingConfig, StillnessConfig, Timestamp, Vec3,
};

/// Nominal sample interval (ms)
pub const TICK_MS: Timestamp = 10;

pub const GRAVITY: f32 = 9.81;

/// A resting reading that differs from the default offsets
pub fn tilted_rest() -> Sample {
    Sample::new(Vec3::new(0.12, -0.05, 9.74), Vec3::new(0.01, -0.02, 0.005))
}

/// Reading at default offsets plus `linear_g` along z and `omega` raw gyro
pub fn loaded(linear_g: f32, raw_omega: f32) -> Sample {
    Sample::new(
        Vec3::new(0.0, 0.0, GRAVITY + linear_g * GRAVITY),
        Vec3::new(0.0, 0.0, raw_omega),
    )
}

/// Two samples whose second one produces an impact under default gates
///
/// `omega_step` is the raw gyro jump; the scale factor multiplies it.
pub fn impact_pair(linear_g: f32, omega_step: f32) -> [Sample; 2] {
    [loaded(linear_g, 0.0), loaded(linear_g, omega_step)]
}

/// No smoothing, no settling, auto-zero off
pub fn detection_config() -> PipelineConfig {
    PipelineConfig::default()
        .with_smoothing(SmoothingConfig::default().with_window(1))
        .with_settling_delay_ms(0)
        .with_auto_zero(AutoZeroConfig::default().with_enabled(false))
}

/// Small stillness window and short timers for auto-zero traces
pub fn fast_auto_zero_config() -> PipelineConfig {
    PipelineConfig::default()
        .with_smoothing(SmoothingConfig::default().with_window(1))
        .with_settling_delay_ms(0)
        .with_stillness(StillnessConfig::default().with_window_ms(50))
        .with_auto_zero(
            AutoZeroConfig::default()
                .with_hold_ms(50)
                .with_cooldown_ms(300)
                .with_min_uptime_ms(0)
                .with_impact_suppression_ms(200),
        )
}

/// Feeds `samples` starting at `start`, one every [`TICK_MS`]
pub fn feed(pipeline: &mut ImpactPipeline, samples: &[Sample], start: Timestamp) -> Vec<(Timestamp, SampleReport)> {
    samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            let now = start + i as Timestamp * TICK_MS;
            let report = pipeline.process_sample(sample, now).expect("valid sample");
            (now, report)
        })
        .collect()
}

/// Feeds `count` copies of `sample`
pub fn feed_constant(
    pipeline: &mut ImpactPipeline,
    sample: Sample,
    count: usize,
    start: Timestamp,
) -> Vec<(Timestamp, SampleReport)> {
    feed(pipeline, &vec![sample; count], start)
}

/// Times at which auto-zero replaced offsets
pub fn auto_zero_times(reports: &[(Timestamp, SampleReport)]) -> Vec<Timestamp> {
    reports
        .iter()
        .filter(|(_, r)| {
            r.events.iter().any(|e| {
                matches!(
                    e,
                    PipelineEvent::OffsetsUpdated { source: neurorisk_core::OffsetSource::AutoZero(_), .. }
                )
            })
        })
        .map(|(t, _)| *t)
        .collect()
}

/// Times at which an impact fired
pub fn impact_times(reports: &[(Timestamp, SampleReport)]) -> Vec<Timestamp> {
    reports
        .iter()
        .filter_map(|(_, r)| r.impact().map(|e| e.time))
        .collect()
}
