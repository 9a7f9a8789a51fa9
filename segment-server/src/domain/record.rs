//! Persisted highway segments.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::geometry::GeometryDocument;
use super::milepost::Milepost;
use super::reference::{RouteId, StateId};
use super::reference_date::ReferenceDate;
use super::request::SegmentRequest;

/// Store-generated identifier of a segment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(pub u64);

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A segment ready to be persisted: validated input plus its geometry.
///
/// Only constructible from a [`SegmentRequest`] and a geometry document that
/// carries a `geometry` member.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSegment {
    pub reference_date: ReferenceDate,
    pub state_id: StateId,
    pub route_id: RouteId,
    pub segment_type: String,
    pub initial_milepost: Milepost,
    pub final_milepost: Milepost,
    pub geometry: GeometryDocument,
}

impl NewSegment {
    /// Pair a validated request with its fetched geometry.
    ///
    /// Returns `None` if the document has no usable geometry.
    pub fn new(request: &SegmentRequest, geometry: GeometryDocument) -> Option<Self> {
        if !geometry.has_geometry() {
            return None;
        }
        Some(Self {
            reference_date: request.reference_date().clone(),
            state_id: request.state().id,
            route_id: request.route().id,
            segment_type: request.segment_type().to_string(),
            initial_milepost: request.initial_milepost(),
            final_milepost: request.final_milepost(),
            geometry,
        })
    }
}

/// A stored segment. Immutable once created; it can only be deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub id: SegmentId,
    pub reference_date: ReferenceDate,
    pub state_id: StateId,
    pub route_id: RouteId,
    pub segment_type: String,
    pub initial_milepost: Milepost,
    pub final_milepost: Milepost,
    pub geometry: GeometryDocument,
    pub created_at: DateTime<Utc>,
}

impl SegmentRecord {
    /// Materialise a new segment under a store-assigned id.
    pub fn from_new(id: SegmentId, new: NewSegment, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            reference_date: new.reference_date,
            state_id: new.state_id,
            route_id: new.route_id,
            segment_type: new.segment_type,
            initial_milepost: new.initial_milepost,
            final_milepost: new.final_milepost,
            geometry: new.geometry,
            created_at,
        }
    }
}
