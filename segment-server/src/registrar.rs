//! Segment registration: validate, fetch geometry, persist.
//!
//! The registrar owns the policy of what a user sees. Validation problems
//! come back per field; fetch problems collapse into exactly one of three
//! messages; nothing is persisted unless a geometry was obtained.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{
    FieldErrors, NewSegment, ReferenceData, Route, SegmentForm, SegmentId, SegmentRecord,
    SegmentRequest, State,
};
use crate::geo::{FetchOutcome, GeometryQuery, GeometrySource};
use crate::store::{SegmentStore, StoreError};

/// Why a fetch did not yield a geometry, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchRejection {
    /// The upstream answered, but not in JSON
    FormatMismatch,
    /// The upstream answered, but no answer carried a geometry
    UpstreamUnavailable,
    /// The upstream could not be reached at all
    CommunicationError,
}

impl FetchRejection {
    /// The message shown to the user.
    pub fn message(&self) -> &'static str {
        match self {
            FetchRejection::FormatMismatch => {
                "The DNIT API is not returning data in JSON format. \
                 This may be a temporary limitation of the API."
            }
            FetchRejection::UpstreamUnavailable => {
                "Could not obtain the segment geometry from the DNIT API. \
                 Try again later or check that the parameters are correct."
            }
            FetchRejection::CommunicationError => {
                "Error communicating with the DNIT API. \
                 The response may not be valid JSON."
            }
        }
    }
}

/// Result of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A record was created
    Created(SegmentId),
    /// The input was rejected before any fetch
    ValidationRejected(FieldErrors),
    /// The fetch failed; nothing was persisted
    FetchRejected(FetchRejection),
}

/// Infrastructure failures, distinct from user-facing rejections.
#[derive(Debug, thiserror::Error)]
pub enum RegistrarError {
    /// No record with this id
    #[error("segment {0} not found")]
    SegmentNotFound(SegmentId),

    /// The record store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A record joined with its state and route, for display.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentListing {
    pub record: SegmentRecord,
    /// `None` if the reference data no longer has this state
    pub state: Option<State>,
    /// `None` if the reference data no longer has this route
    pub route: Option<Route>,
}

/// Orchestrates validation, geometry fetch and persistence.
pub struct SegmentRegistrar {
    source: Arc<dyn GeometrySource>,
    store: Arc<dyn SegmentStore>,
    reference: Arc<ReferenceData>,
}

impl SegmentRegistrar {
    /// Create a registrar over the given collaborators.
    pub fn new(
        source: Arc<dyn GeometrySource>,
        store: Arc<dyn SegmentStore>,
        reference: Arc<ReferenceData>,
    ) -> Self {
        Self {
            source,
            store,
            reference,
        }
    }

    /// Validate `form`, fetch its geometry and persist the segment.
    ///
    /// The upstream is never contacted for invalid input. Only storage
    /// failures are returned as errors.
    pub async fn submit(&self, form: &SegmentForm) -> Result<Outcome, RegistrarError> {
        let request = match SegmentRequest::validate(form, &self.reference) {
            Ok(request) => request,
            Err(errors) => {
                info!(fields = errors.len(), "submission failed validation");
                return Ok(Outcome::ValidationRejected(errors));
            }
        };

        let query = GeometryQuery::from_request(&request);
        let outcome = self.source.fetch(&query).await;

        let rejection = match outcome {
            FetchOutcome::Found(document) => {
                let Some(segment) = NewSegment::new(&request, document) else {
                    return Ok(Outcome::FetchRejected(FetchRejection::UpstreamUnavailable));
                };
                return self.persist(&request, segment);
            }
            FetchOutcome::NotFound => FetchRejection::UpstreamUnavailable,
            FetchOutcome::FormatFailure(reason) => {
                warn!(kind = "format_failure", reason = %reason, "geometry fetch failed");
                FetchRejection::FormatMismatch
            }
            FetchOutcome::TransportFailure(reason) => {
                warn!(kind = "transport_failure", reason = %reason, "geometry fetch failed");
                FetchRejection::CommunicationError
            }
        };
        Ok(Outcome::FetchRejected(rejection))
    }

    fn persist(
        &self,
        request: &SegmentRequest,
        segment: NewSegment,
    ) -> Result<Outcome, RegistrarError> {
        let record = self.store.create(segment)?;
        info!(
            id = %record.id,
            route = %request.route().number,
            state = %request.state().code,
            "segment created"
        );

        Ok(Outcome::Created(record.id))
    }

    /// Delete a segment. An unknown id is an error, not a no-op.
    pub fn remove(&self, id: SegmentId) -> Result<SegmentRecord, RegistrarError> {
        let removed = self
            .store
            .delete(id)?
            .ok_or(RegistrarError::SegmentNotFound(id))?;
        info!(id = %id, "segment removed");
        Ok(removed)
    }

    /// All segments, newest first, with their references resolved.
    pub fn list(&self) -> Result<Vec<SegmentListing>, RegistrarError> {
        let listings = self
            .store
            .list()?
            .into_iter()
            .map(|record| SegmentListing {
                state: self.reference.state(record.state_id).cloned(),
                route: self.reference.route(record.route_id).cloned(),
                record,
            })
            .collect();
        Ok(listings)
    }

    /// The state and route lookup lists.
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }
}
