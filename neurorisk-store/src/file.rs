//! JSON file backend

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::{PersistedState, SnapshotStore, StoreResult};

/// Keeps the state in one pretty-printed JSON file
///
/// Writes go to a sibling `.tmp` file that is renamed over the target, so
/// a crash mid-write leaves the previous state intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&mut self, state: &PersistedState) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_vec_pretty(state)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;

        log::debug!(
            "saved {} impacts to {}",
            state.history.len(),
            self.path.display()
        );
        Ok(())
    }

    fn load(&self) -> StoreResult<Option<PersistedState>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let state: PersistedState = serde_json::from_slice(&bytes)?;
        state.check_version()?;
        log::debug!(
            "loaded {} impacts from {}",
            state.history.len(),
            self.path.display()
        );
        Ok(Some(state))
    }
}
