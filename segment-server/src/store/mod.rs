//! Segment record persistence.
//!
//! The registrar talks to storage only through [`SegmentStore`], injected at
//! construction. Records are created and deleted, never updated.

mod error;
mod file;
mod memory;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::domain::{NewSegment, SegmentId, SegmentRecord};

/// A store of segment records.
///
/// Implementations serialize their own writes; callers need no locking.
pub trait SegmentStore: Send + Sync {
    /// Persist a new segment under a fresh id.
    fn create(&self, segment: NewSegment) -> Result<SegmentRecord, StoreError>;

    /// Fetch one record.
    fn get(&self, id: SegmentId) -> Result<Option<SegmentRecord>, StoreError>;

    /// Remove a record, returning it, or `None` if there was no such id.
    fn delete(&self, id: SegmentId) -> Result<Option<SegmentRecord>, StoreError>;

    /// All records, newest first.
    fn list(&self) -> Result<Vec<SegmentRecord>, StoreError>;

    /// Number of records.
    fn len(&self) -> Result<usize, StoreError>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::domain::{GeometryDocument, NewSegment, ReferenceData, SegmentForm, SegmentRequest};

    /// A valid new segment with the given type.
    pub(crate) fn new_segment(segment_type: &str) -> NewSegment {
        let form = SegmentForm {
            reference_date: "2024-03-15".into(),
            state_id: "13".into(),
            route_id: "4".into(),
            segment_type: segment_type.into(),
            initial_milepost: "1".into(),
            final_milepost: "2".into(),
        };
        let request = SegmentRequest::validate(&form, &ReferenceData::seeded()).unwrap();
        let geometry =
            GeometryDocument::parse(br#"{"geometry":{"type":"LineString","coordinates":[]}}"#)
                .unwrap();
        NewSegment::new(&request, geometry).unwrap()
    }
}
