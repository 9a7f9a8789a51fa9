//! In-memory record store.

use std::collections::BTreeMap;
use std::sync::RwLock;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::domain::{NewSegment, SegmentId, SegmentRecord};

use super::SegmentStore;
use super::error::StoreError;

/// The full contents of a store, as kept in memory and on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    /// Next id to hand out. Ids are never reused, even after deletion.
    next_id: u64,
    records: BTreeMap<SegmentId, SegmentRecord>,
}

impl Snapshot {
    pub(crate) fn insert(&mut self, segment: NewSegment) -> SegmentRecord {
        self.next_id += 1;
        let id = SegmentId(self.next_id);
        let record = SegmentRecord::from_new(id, segment, Utc::now());
        self.records.insert(id, record.clone());
        record
    }

    pub(crate) fn remove(&mut self, id: SegmentId) -> Option<SegmentRecord> {
        self.records.remove(&id)
    }

    pub(crate) fn get(&self, id: SegmentId) -> Option<SegmentRecord> {
        self.records.get(&id).cloned()
    }

    /// Newest first.
    pub(crate) fn list(&self) -> Vec<SegmentRecord> {
        let mut records: Vec<SegmentRecord> = self.records.values().cloned().collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        records
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}

/// Record store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Snapshot>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SegmentStore for MemoryStore {
    fn create(&self, segment: NewSegment) -> Result<SegmentRecord, StoreError> {
        let mut guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.insert(segment))
    }

    fn get(&self, id: SegmentId) -> Result<Option<SegmentRecord>, StoreError> {
        let guard = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.get(id))
    }

    fn delete(&self, id: SegmentId) -> Result<Option<SegmentRecord>, StoreError> {
        let mut guard = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.remove(id))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::new_segment;

    #[test]
    fn create_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let a = store.create(new_segment("B")).unwrap();
        let b = store.create(new_segment("C")).unwrap();

        assert_eq!(a.id, SegmentId(1));
        assert_eq!(b.id, SegmentId(2));
        assert_eq!(store.len().unwrap(), 2);
    }

    #[test]
    fn ids_not_reused_after_delete() {
        let store = MemoryStore::new();
        let a = store.create(new_segment("B")).unwrap();
        store.delete(a.id).unwrap();
        let b = store.create(new_segment("B")).unwrap();

        assert_eq!(b.id, SegmentId(2));
    }

    #[test]
    fn delete_reports_missing() {
        let store = MemoryStore::new();
        assert!(store.delete(SegmentId(42)).unwrap().is_none());

        let a = store.create(new_segment("B")).unwrap();
        let removed = store.delete(a.id).unwrap().unwrap();
        assert_eq!(removed.segment_type, "B");
        assert!(store.get(a.id).unwrap().is_none());
        assert_eq!(store.len().unwrap(), 0);
    }

    #[test]
    fn list_is_newest_first() {
        let store = MemoryStore::new();
        store.create(new_segment("first")).unwrap();
        store.create(new_segment("second")).unwrap();
        store.create(new_segment("third")).unwrap();

        let types: Vec<String> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|r| r.segment_type)
            .collect();
        assert_eq!(types, ["third", "second", "first"]);
    }
}
