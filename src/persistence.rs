//! Durable storage for the series store.
//!
//! The whole [`PersistedSnapshot`] is written on every accepted bar and read
//! back once at startup. Both directions fail soft: a snapshot that cannot
//! be read starts the process with an empty store, and a failed write is
//! logged and skipped so the live stream keeps running.

use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::Result;
use crate::error::WicklineError;
use crate::store::PersistedSnapshot;

/// A single durable slot holding the serialized store.
pub trait SnapshotStorage {
    /// Reads the stored snapshot, or an empty one if there is none or it
    /// cannot be read.
    fn load(&mut self) -> PersistedSnapshot;

    /// Overwrites the stored snapshot. Failures are logged, never returned.
    fn save(&mut self, snapshot: &PersistedSnapshot);
}

/// Stores the snapshot as a JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the snapshot file.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`WicklineError::Storage`] if the file cannot be read, or
    /// [`WicklineError::Json`] if its contents are not a valid snapshot.
    pub fn try_load(&self) -> Result<Option<PersistedSnapshot>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(WicklineError::Storage(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };
        let snapshot = serde_json::from_str(&contents)?;
        Ok(Some(snapshot))
    }

    /// Serializes `snapshot` and atomically replaces the snapshot file.
    ///
    /// The JSON is written to a sibling `.tmp` file, synced to disk and
    /// then renamed over the slot, so readers never observe a half-written
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`WicklineError::Storage`] if the directory, the temporary
    /// file or the rename fails.
    pub fn try_save(&self, snapshot: &PersistedSnapshot) -> Result<()> {
        let json = serde_json::to_vec(snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                WicklineError::Storage(format!("failed to create {}: {e}", parent.display()))
            })?;
        }

        let tmp = self.temp_path();
        write_synced(&tmp, &json).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            WicklineError::Storage(format!("failed to write {}: {e}", tmp.display()))
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = std::fs::remove_file(&tmp);
            WicklineError::Storage(format!(
                "failed to replace {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Writes `bytes` to a fresh file at `path` and flushes it to disk.
///
/// The data must be durable before the file is renamed over the slot.
fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

impl SnapshotStorage for JsonFileStorage {
    fn load(&mut self) -> PersistedSnapshot {
        match self.try_load() {
            Ok(Some(snapshot)) => {
                info!(path = %self.path.display(), "Restored candlestick snapshot");
                snapshot
            }
            Ok(None) => {
                info!(path = %self.path.display(), "No snapshot found, starting empty");
                PersistedSnapshot::new()
            }
            Err(e) => {
                warn!(path = %self.path.display(), "Discarding unreadable snapshot: {e}");
                PersistedSnapshot::new()
            }
        }
    }

    fn save(&mut self, snapshot: &PersistedSnapshot) {
        match self.try_save(snapshot) {
            Ok(()) => debug!(path = %self.path.display(), "Snapshot saved"),
            Err(e) => warn!(path = %self.path.display(), "Failed to save snapshot: {e}"),
        }
    }
}

/// Keeps the snapshot in memory only.
///
/// Useful when persistence is not wanted and for driving the engine in
/// tests; [`MemoryStorage::saves`] counts write-throughs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    snapshot: Option<PersistedSnapshot>,
    saves: usize,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with `snapshot` already stored.
    #[must_use]
    pub fn with_snapshot(snapshot: PersistedSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            saves: 0,
        }
    }

    /// The most recently saved snapshot, if any.
    pub fn stored(&self) -> Option<&PersistedSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl SnapshotStorage for MemoryStorage {
    fn load(&mut self) -> PersistedSnapshot {
        self.snapshot.clone().unwrap_or_default()
    }

    fn save(&mut self, snapshot: &PersistedSnapshot) {
        self.snapshot = Some(snapshot.clone());
        self.saves += 1;
    }
}
