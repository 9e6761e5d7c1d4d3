//! Save, reload and restore against a live pipeline

use neurorisk_core::{
    constants::MS_PER_DAY, AutoZeroConfig, ImpactPipeline, PipelineConfig, Sample,
    SmoothingConfig, Vec3,
};
use neurorisk_store::{JsonFileStore, MemoryStore, PersistedState, SnapshotStore};

fn detection_config() -> PipelineConfig {
    PipelineConfig::default()
        .with_smoothing(SmoothingConfig::default().with_window(1))
        .with_settling_delay_ms(0)
        .with_auto_zero(AutoZeroConfig::default().with_enabled(false))
}

fn hit(pipeline: &mut ImpactPipeline, linear_g: f32, raw_omega: f32, at: u64) {
    let accel = Vec3::new(0.0, 0.0, 9.81 + linear_g * 9.81);
    pipeline
        .process_sample(&Sample::new(accel, Vec3::ZERO), at)
        .expect("sample");
    pipeline
        .process_sample(&Sample::new(accel, Vec3::new(0.0, 0.0, raw_omega)), at + 10)
        .expect("sample");
}

fn live_pipeline() -> ImpactPipeline {
    let mut pipeline = ImpactPipeline::new(detection_config()).expect("config");
    hit(&mut pipeline, 1.5, 24.0, 1_000);
    hit(&mut pipeline, 6.0, 60.0, 3_600_000);
    hit(&mut pipeline, 3.0, 30.0, MS_PER_DAY);
    assert_eq!(pipeline.history().len(), 3);
    pipeline
}

#[test]
fn file_roundtrip_recomputes_same_composite() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = JsonFileStore::new(dir.path().join("state.json"));

    let mut live = live_pipeline();
    let saved = PersistedState::capture(&live);
    store.save(&saved).expect("save");

    let loaded = store.load().expect("load").expect("state present");
    assert_eq!(loaded, saved);

    let now = 3 * MS_PER_DAY;
    let mut restored = ImpactPipeline::new(detection_config()).expect("config");
    let update = loaded.restore_into(&mut restored, now);
    let fresh = live.tick(now).expect("tick");

    assert_eq!(update.composite, fresh.composite);
    assert_eq!(update.exposure, fresh.exposure);
    assert_eq!(update.cumulative_load, fresh.cumulative_load);
    assert_eq!(restored.history(), live.history());
}

#[test]
fn stored_derived_fields_are_not_trusted() {
    let live = live_pipeline();
    let mut state = PersistedState::capture(&live);
    state.risk.time_weighted_exposure = 1_000.0;

    let mut store = MemoryStore::new();
    store.save(&state).expect("save");

    let now = 2 * MS_PER_DAY;
    let mut restored = ImpactPipeline::new(detection_config()).expect("config");
    let update = store
        .load()
        .expect("load")
        .expect("state present")
        .restore_into(&mut restored, now);
    assert!(update.exposure < 100.0);
}

#[test]
fn cleared_state_restores_to_zero() {
    let mut store = MemoryStore::with_state(PersistedState::capture(&live_pipeline()));
    store.save(&PersistedState::cleared()).expect("save");

    let mut restored = ImpactPipeline::new(detection_config()).expect("config");
    let update = store
        .load()
        .expect("load")
        .expect("state present")
        .restore_into(&mut restored, MS_PER_DAY);
    assert_eq!(update.composite, 0.0);
    assert!(restored.history().is_empty());
}
