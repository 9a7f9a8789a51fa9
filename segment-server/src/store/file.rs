//! JSON-file record store.
//!
//! The whole store is one JSON document, rewritten after every change. Fine
//! for the few thousand segments a registry like this holds.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use crate::domain::{NewSegment, SegmentId, SegmentRecord};

use super::SegmentStore;
use super::error::StoreError;
use super::memory::Snapshot;

/// Record store persisted to a JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    inner: RwLock<Snapshot>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty if the file does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();

        let snapshot = if path.exists() {
            let json = std::fs::read_to_string(&path).map_err(|e| StoreError::Io {
                message: format!("failed to read {}: {}", path.display(), e),
            })?;
            serde_json::from_str(&json).map_err(|e| StoreError::Corrupt {
                message: format!("{}: {}", path.display(), e),
            })?
        } else {
            Snapshot::default()
        };

        debug!(path = %path.display(), records = snapshot.len(), "opened segment store");

        Ok(Self {
            path,
            inner: RwLock::new(snapshot),
        })
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `snapshot` to disk via a temporary file and rename, creating
    /// parent directories if needed.
    fn persist(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::Io {
                    message: format!("failed to create store directory: {}", e),
                })?;
            }
        }

        let json = serde_json::to_string_pretty(snapshot).map_err(|e| StoreError::Io {
            message: format!("failed to serialize store: {}", e),
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|e| StoreError::Io {
            message: format!("failed to write {}: {}", tmp.display(), e),
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::Io {
            message: format!("failed to replace {}: {}", self.path.display(), e),
        })?;

        Ok(())
    }
}

impl SegmentStore for JsonFileStore {
    fn create(&self, segment: NewSegment) -> Result<SegmentRecord, StoreError> {
        let mut guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;

        // Change a copy so a failed write leaves memory and disk in agreement.
        let mut next = guard.clone();
        let record = next.insert(segment);
        self.persist(&next)?;
        *guard = next;

        Ok(record)
    }

    fn get(&self, id: SegmentId) -> Result<Option<SegmentRecord>, StoreError> {
        let guard = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.get(id))
    }

    fn delete(&self, id: SegmentId) -> Result<Option<SegmentRecord>, StoreError> {
        let mut guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;

        let mut next = guard.clone();
        let removed = next.remove(id);
        if removed.is_some() {
            self.persist(&next)?;
            *guard = next;
        }

        Ok(removed)
    }

    fn list(&self) -> Result<Vec<SegmentRecord>, StoreError> {
        let guard = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.list())
    }

    fn len(&self) -> Result<usize, StoreError> {
        let guard = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.len())
    }
}
