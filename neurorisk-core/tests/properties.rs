//! Property tests over arbitrary sample traces

#![cfg(test)]

mod common;

use neurorisk_core::{
    config::{ImpactConfig, SmoothingConfig, StillnessConfig},
    ImpactDetector, ImpactEvent, ImpactPipeline, RiskScorer, Sample, SmoothingFilter,
    StillnessDetector, Vec3, ZeroedSample,
};
use proptest::prelude::*;

use common::{auto_zero_times, fast_auto_zero_config, feed, tilted_rest};

fn vec3(range: core::ops::Range<f32>) -> impl Strategy<Value = Vec3> {
    (range.clone(), range.clone(), range).prop_map(|(x, y, z)| Vec3::new(x, y, z))
}

fn sample(accel: core::ops::Range<f32>, gyro: core::ops::Range<f32>) -> impl Strategy<Value = Sample> {
    (vec3(accel), vec3(gyro)).prop_map(|(a, g)| Sample::new(a, g))
}

/// Rest with a little jitter, or a jolt
fn mixed_sample() -> impl Strategy<Value = Sample> {
    let rest = tilted_rest();
    prop_oneof![
        3 => vec3(-0.02..0.02).prop_map(move |n| Sample::new(rest.accel + n, rest.gyro)),
        1 => sample(-40.0..40.0, -10.0..10.0),
    ]
}

proptest! {
    #[test]
    fn smoothing_converges_to_constant(
        window in 1usize..=64,
        value in sample(-200.0..200.0, -30.0..30.0),
        noise in proptest::collection::vec(sample(-200.0..200.0, -30.0..30.0), 0..20),
        extra in 0usize..10,
    ) {
        let mut filter = SmoothingFilter::new(&SmoothingConfig::default().with_window(window)).unwrap();
        for s in &noise {
            filter.smooth(s);
        }
        let mut out = filter.smooth(&value);
        for _ in 1..window + extra {
            out = filter.smooth(&value);
        }
        prop_assert_eq!(out, value);
    }

    #[test]
    fn stillness_needs_full_window(
        window in 5usize..=100,
        samples in proptest::collection::vec(sample(-1.0..1.0, -0.01..0.01), 0..100),
    ) {
        let mut detector = StillnessDetector::new(&StillnessConfig::default(), window, 2.5).unwrap();
        for (i, s) in samples.iter().enumerate() {
            detector.push_sample(s);
            if i + 1 < window {
                prop_assert!(!detector.is_accel_still());
                prop_assert!(!detector.is_gyro_still());
            }
        }
    }

    #[test]
    fn auto_zero_respects_cooldown(trace in proptest::collection::vec(mixed_sample(), 1..400)) {
        let config = fast_auto_zero_config();
        let cooldown = config.auto_zero.cooldown_ms;
        let mut pipeline = ImpactPipeline::new(config).expect("config");

        let reports = feed(&mut pipeline, &trace, 0);
        let times = auto_zero_times(&reports);
        for pair in times.windows(2) {
            prop_assert!(pair[1] - pair[0] >= cooldown);
        }
    }

    #[test]
    fn impacts_respect_dead_time(
        trace in proptest::collection::vec((0.0f32..60.0, 0.0f32..80.0), 1..300),
        jitter in proptest::collection::vec(1u64..25, 300),
    ) {
        let config = ImpactConfig::default();
        let mut detector = ImpactDetector::new(config);
        let mut now = 0;
        let mut fired = Vec::new();
        for (i, (lin_g, omega)) in trace.iter().enumerate() {
            now += jitter[i];
            let zeroed = ZeroedSample {
                accel: Vec3::new(0.0, 0.0, lin_g * 9.81),
                gyro: Vec3::new(*omega, 0.0, 0.0),
            };
            if let Some(event) = detector.detect(&zeroed, now) {
                fired.push(event.time);
            }
        }
        for pair in fired.windows(2) {
            prop_assert!(pair[1] - pair[0] >= config.dead_time_ms);
        }
    }

    #[test]
    fn exposure_decays_between_ticks(
        impacts in proptest::collection::vec((0u64..86_400_000, 0.01f64..20.0), 1..20),
        first_gap in 0u64..86_400_000,
        second_gap in 1_000u64..864_000_000,
    ) {
        let latest = impacts.iter().map(|(t, _)| *t).max().unwrap_or(0);
        let mut history: Vec<ImpactEvent> = impacts
            .iter()
            .map(|(t, s)| ImpactEvent::new(*t, 2.0, 500.0, *s))
            .collect();
        history.sort_by_key(|e| e.time);

        let mut scorer = RiskScorer::default();
        let t1 = latest + first_gap;
        let t2 = t1 + second_gap;
        let a = scorer.tick(&history, t1).expect("history present");
        let b = scorer.tick(&history, t2).expect("history present");

        prop_assert!(b.exposure < a.exposure);
        prop_assert!(b.composite <= a.composite);
        prop_assert_eq!(a.cumulative_load, b.cumulative_load);
    }
}
