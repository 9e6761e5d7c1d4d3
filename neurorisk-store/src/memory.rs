//! In-memory backend for tests and throwaway sessions

use crate::{PersistedState, SnapshotStore, StoreResult};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Option<PersistedState>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `state`
    pub fn with_state(state: PersistedState) -> Self {
        Self { state: Some(state), saves: 0 }
    }

    /// Number of successful saves
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl SnapshotStore for MemoryStore {
    fn save(&mut self, state: &PersistedState) -> StoreResult<()> {
        self.state = Some(state.clone());
        self.saves += 1;
        Ok(())
    }

    fn load(&self) -> StoreResult<Option<PersistedState>> {
        if let Some(state) = &self.state {
            state.check_version()?;
        }
        Ok(self.state.clone())
    }
}
