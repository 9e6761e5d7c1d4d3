//! Persistence for NeuroRisk
//!
//! Stores the minimal state needed to resume scoring after a restart: the
//! impact history and the risk snapshot. Derived values (exposure and the
//! composite score) are written for inspection but recomputed on restore.
//!
//! ```no_run
//! use neurorisk_core::{ImpactPipeline, PipelineConfig};
//! use neurorisk_store::{JsonFileStore, PersistedState, SnapshotStore};
//!
//! let mut pipeline = ImpactPipeline::new(PipelineConfig::default()).unwrap();
//! let mut store = JsonFileStore::new("/var/lib/neurorisk/state.json");
//!
//! if let Ok(Some(state)) = store.load() {
//!     state.restore_into(&mut pipeline, 0);
//! }
//! store.save(&PersistedState::capture(&pipeline)).unwrap();
//! ```

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use neurorisk_core::{ImpactEvent, ImpactPipeline, RiskSnapshot, RiskUpdate, Timestamp};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Layout version written by this crate
pub const STATE_VERSION: u32 = 1;

/// Persistence errors
///
/// None of these are fatal to the pipeline; the caller keeps running from
/// memory and reports them.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("state could not be encoded or decoded: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("state version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Everything persisted between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub version: u32,
    pub history: Vec<ImpactEvent>,
    pub risk: RiskSnapshot,
}

impl PersistedState {
    pub fn new(history: Vec<ImpactEvent>, risk: RiskSnapshot) -> Self {
        Self { version: STATE_VERSION, history, risk }
    }

    /// Copies the persistable parts of a live pipeline
    pub fn capture(pipeline: &ImpactPipeline) -> Self {
        Self::new(pipeline.history().to_vec(), pipeline.snapshot())
    }

    /// Empty history with zeroed risk
    pub fn cleared() -> Self {
        Self::new(Vec::new(), RiskSnapshot::default())
    }

    /// Replays the state into `pipeline`, recomputing derived risk at `now`
    pub fn restore_into(self, pipeline: &mut ImpactPipeline, now: Timestamp) -> RiskUpdate {
        pipeline.restore(self.history, self.risk, now)
    }

    fn check_version(&self) -> StoreResult<()> {
        if self.version != STATE_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found: self.version,
                supported: STATE_VERSION,
            });
        }
        Ok(())
    }
}

/// Backing store for [`PersistedState`]
pub trait SnapshotStore: Send {
    /// Replaces whatever was stored before
    fn save(&mut self, state: &PersistedState) -> StoreResult<()>;

    /// `Ok(None)` when nothing has been saved yet
    fn load(&self) -> StoreResult<Option<PersistedState>>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn save(&mut self, state: &PersistedState) -> StoreResult<()> {
        (**self).save(state)
    }

    fn load(&self) -> StoreResult<Option<PersistedState>> {
        (**self).load()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_carries_current_version() {
        let state = PersistedState::cleared();
        assert_eq!(state.version, STATE_VERSION);
        assert!(state.check_version().is_ok());
    }

    #[test]
    fn other_versions_are_rejected() {
        let mut state = PersistedState::cleared();
        state.version = 7;
        assert!(matches!(
            state.check_version(),
            Err(StoreError::UnsupportedVersion { found: 7, supported: 1 })
        ));
    }

    #[test]
    fn serializes_with_stable_field_names() {
        let state = PersistedState::new(
            vec![ImpactEvent::new(1000, 1.5, 6000.0, 0.6)],
            RiskSnapshot { last_update: 1000, cumulative_load_index: 0.006, ..Default::default() },
        );
        let json = serde_json::to_value(&state).expect("encode");
        assert_eq!(json["version"], 1);
        assert_eq!(json["history"][0]["severity"], 0.6);
        assert_eq!(json["risk"]["cumulative_load_index"], 0.006);
    }
}
