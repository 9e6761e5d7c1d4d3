//! Capture session
//!
//! ## Ownership
//!
//! ```text
//!              ┌──────────── Session (Clone) ────────────┐
//!              │  Arc<Inner>                             │
//!              │   ├── Mutex<ImpactPipeline>  ←── samples, ticks, commands
//!              │   ├── Mutex<Box<dyn SnapshotStore>>      │
//!              │   ├── broadcast::Sender<SessionOutput> ──→ subscribers
//!              │   └── Mutex<Option<JoinHandle>>  (ticker)│
//!              └─────────────────────────────────────────┘
//! ```
//!
//! The sample path and the periodic tick both take the pipeline lock, so
//! risk state has a single writer at a time. Locks are never held across
//! an `.await`. The ticker task only keeps a weak reference and ends once
//! the last session handle is dropped.
//!
//! Saves happen while the pipeline lock is held, and the store lock is
//! always taken second. A snapshot therefore reaches the store in the same
//! order its pipeline state was produced, and a clear is never followed by
//! an older impact write. A failed impact save is logged and broadcast as
//! [`SessionOutput::PersistenceFailed`]; the session carries on from memory.

use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use neurorisk_core::{
    ControlFlags, ImpactEvent, ImpactPipeline, OffsetSource, PipelineEvent, RiskLevel, RiskState,
    RiskUpdate, Sample, SampleReport, TimeSource, Timestamp, Vec3, ZeroedSample,
};
use neurorisk_store::{PersistedState, SnapshotStore};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::frame::decode_frame;
use crate::source::SampleSource;

/// What a session tells its presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SessionOutput {
    /// Zeroed reading for every accepted sample
    Sample(ZeroedSample),
    Impact(ImpactEvent),
    Risk(RiskUpdate),
    Alert {
        level: RiskLevel,
        composite: f64,
        timestamp: Timestamp,
    },
    OffsetsUpdated {
        source: OffsetSource,
        accel: Vec3,
        gyro: Vec3,
        timestamp: Timestamp,
    },
    /// A save failed; in-memory state is unaffected
    PersistenceFailed(String),
}

impl From<PipelineEvent> for SessionOutput {
    fn from(event: PipelineEvent) -> Self {
        match event {
            PipelineEvent::ImpactDetected(impact) => SessionOutput::Impact(impact),
            PipelineEvent::RiskUpdated(update) => SessionOutput::Risk(update),
            PipelineEvent::Alert { level, composite, timestamp } => {
                SessionOutput::Alert { level, composite, timestamp }
            }
            PipelineEvent::OffsetsUpdated { source, accel, gyro, timestamp } => {
                SessionOutput::OffsetsUpdated { source, accel, gyro, timestamp }
            }
        }
    }
}

/// Counters from one [`Session::run`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub processed: u64,
    /// Frames that failed to decode or samples the pipeline refused
    pub dropped: u64,
}

/// Shared handle to one capture session
#[derive(Clone)]
pub struct Session {
    inner: Arc<Inner>,
}

struct Inner {
    config: SessionConfig,
    pipeline: Mutex<ImpactPipeline>,
    store: Mutex<Box<dyn SnapshotStore>>,
    clock: Arc<dyn TimeSource>,
    flags: Arc<ControlFlags>,
    outputs: broadcast::Sender<SessionOutput>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

fn lock<'a, T: ?Sized>(mutex: &'a Mutex<T>, what: &'static str) -> SessionResult<MutexGuard<'a, T>> {
    mutex.lock().map_err(|_| SessionError::LockPoisoned(what))
}

impl Session {
    pub fn new(
        config: SessionConfig,
        store: impl SnapshotStore + 'static,
        clock: Arc<dyn TimeSource>,
    ) -> SessionResult<Self> {
        let pipeline = ImpactPipeline::new(config.pipeline)?;
        let flags = pipeline.flags();
        let (outputs, _) = broadcast::channel(config.output_capacity.max(1));

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                pipeline: Mutex::new(pipeline),
                store: Mutex::new(Box::new(store)),
                clock,
                flags,
                outputs,
                ticker: Mutex::new(None),
            }),
        })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionOutput> {
        self.inner.outputs.subscribe()
    }

    pub fn flags(&self) -> Arc<ControlFlags> {
        Arc::clone(&self.inner.flags)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    /// Restores persisted history and risk, if any
    ///
    /// On error the session keeps its current in-memory state.
    pub fn load(&self) -> SessionResult<Option<RiskUpdate>> {
        let now = self.inner.clock.now();
        let update = {
            let mut pipeline = lock(&self.inner.pipeline, "pipeline")?;
            let state = lock(&self.inner.store, "store")?.load()?;
            state.map(|state| state.restore_into(&mut pipeline, now))
        };

        match update {
            Some(update) => self.inner.publish(SessionOutput::Risk(update)),
            None => log::info!("no persisted state, starting fresh"),
        }
        Ok(update)
    }

    /// Marks a new sensor connection; detection waits out the settling delay
    pub fn connect(&self) -> SessionResult<()> {
        let now = self.inner.clock.now();
        lock(&self.inner.pipeline, "pipeline")?.on_connect(now);
        Ok(())
    }

    /// Runs one sample through the pipeline and publishes the results
    pub fn handle_sample(&self, sample: &Sample) -> SessionResult<SampleReport> {
        let now = self.inner.clock.now();
        let (report, saved) = {
            let mut pipeline = lock(&self.inner.pipeline, "pipeline")?;
            let report = pipeline.process_sample(sample, now)?;
            let saved = (report.impact().is_some() && self.inner.config.persist_on_impact)
                .then(|| self.inner.save(&PersistedState::capture(&pipeline)));
            (report, saved)
        };

        self.inner.publish(SessionOutput::Sample(report.zeroed));
        for event in &report.events {
            self.inner.publish(event.clone().into());
        }
        if let Some(Err(e)) = saved {
            log::error!("could not persist impact history: {}", e);
            self.inner.publish(SessionOutput::PersistenceFailed(e.to_string()));
        }
        Ok(report)
    }

    /// Decodes and handles one transport frame
    pub fn handle_frame(&self, frame: &str) -> SessionResult<SampleReport> {
        let sample = decode_frame(frame)?;
        self.handle_sample(&sample)
    }

    /// Drives `source` until it ends
    ///
    /// Bad frames and refused samples are logged and counted, not fatal.
    pub async fn run<S: SampleSource + ?Sized>(&self, source: &mut S) -> SessionResult<RunStats> {
        let mut stats = RunStats::default();
        while let Some(next) = source.next_sample().await {
            let result = next
                .map_err(SessionError::from)
                .and_then(|sample| self.handle_sample(&sample));
            match result {
                Ok(_) => stats.processed += 1,
                Err(SessionError::Frame(e)) => {
                    log::warn!("dropping frame: {}", e);
                    stats.dropped += 1;
                }
                Err(SessionError::Pipeline(e)) => {
                    log::warn!("dropping sample: {}", e);
                    stats.dropped += 1;
                }
                Err(e) => return Err(e),
            }
        }
        log::info!(
            "source ended after {} samples ({} dropped)",
            stats.processed,
            stats.dropped
        );
        Ok(stats)
    }

    /// One periodic risk recompute; `None` while there is no history
    pub fn tick(&self) -> SessionResult<Option<RiskUpdate>> {
        self.inner.tick()
    }

    /// Starts (or restarts) the background risk tick
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start_ticker(&self) -> SessionResult<()> {
        let mut slot = lock(&self.inner.ticker, "ticker")?;
        if let Some(previous) = slot.take() {
            previous.abort();
        }

        let period = Duration::from_millis(self.inner.config.tick_interval_ms.max(1));
        let weak = Arc::downgrade(&self.inner);
        *slot = Some(tokio::spawn(run_ticker(weak, period)));
        log::debug!("risk ticker started, every {:?}", period);
        Ok(())
    }

    /// Stops the background tick; stored state is untouched
    ///
    /// Returns whether a ticker was running.
    pub fn stop_ticker(&self) -> SessionResult<bool> {
        let handle = lock(&self.inner.ticker, "ticker")?.take();
        Ok(match handle {
            Some(handle) => {
                handle.abort();
                log::debug!("risk ticker stopped");
                true
            }
            None => false,
        })
    }

    pub fn is_ticking(&self) -> SessionResult<bool> {
        Ok(lock(&self.inner.ticker, "ticker")?
            .as_ref()
            .is_some_and(|handle| !handle.is_finished()))
    }

    pub fn pause(&self) {
        self.inner.flags.set_paused(true);
    }

    pub fn resume(&self) {
        self.inner.flags.set_paused(false);
    }

    pub fn set_detection_enabled(&self, enabled: bool) {
        self.inner.flags.set_detection_disabled(!enabled);
    }

    pub fn set_auto_zero_enabled(&self, enabled: bool) {
        self.inner.flags.set_auto_zero_enabled(enabled);
    }

    /// Zeroes offsets to the most recent raw sample
    pub fn manual_zero(&self) -> SessionResult<()> {
        let now = self.inner.clock.now();
        let event = lock(&self.inner.pipeline, "pipeline")?.manual_zero(now)?;
        self.inner.publish(event.into());
        Ok(())
    }

    /// Drops all impacts, zeroes risk and persists the cleared state
    ///
    /// Works with or without a sensor connection.
    pub fn clear_history(&self) -> SessionResult<()> {
        let mut pipeline = lock(&self.inner.pipeline, "pipeline")?;
        pipeline.clear_history();
        self.inner.save(&PersistedState::cleared())
    }

    /// Saves the current state immediately
    pub fn persist(&self) -> SessionResult<()> {
        let pipeline = lock(&self.inner.pipeline, "pipeline")?;
        self.inner.save(&PersistedState::capture(&pipeline))
    }

    pub fn risk_state(&self) -> SessionResult<RiskState> {
        Ok(*lock(&self.inner.pipeline, "pipeline")?.risk_state())
    }

    pub fn history(&self) -> SessionResult<Vec<ImpactEvent>> {
        Ok(lock(&self.inner.pipeline, "pipeline")?.history().to_vec())
    }
}

impl Inner {
    fn publish(&self, output: SessionOutput) {
        // No subscribers is not an error
        let _ = self.outputs.send(output);
    }

    fn tick(&self) -> SessionResult<Option<RiskUpdate>> {
        let now = self.clock.now();
        let update = lock(&self.pipeline, "pipeline")?.tick(now);
        if let Some(update) = update {
            self.publish(SessionOutput::Risk(update));
        }
        Ok(update)
    }

    /// Callers hold the pipeline lock
    fn save(&self, state: &PersistedState) -> SessionResult<()> {
        lock(&self.store, "store")?.save(state)?;
        Ok(())
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Ok(slot) = self.ticker.get_mut() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}

async fn run_ticker(weak: Weak<Inner>, period: Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // first tick completes immediately
    interval.tick().await;

    loop {
        interval.tick().await;
        let Some(inner) = weak.upgrade() else {
            break;
        };
        if let Err(e) = inner.tick() {
            log::warn!("risk tick failed: {}", e);
        }
    }
}
