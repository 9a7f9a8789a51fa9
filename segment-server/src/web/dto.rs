//! Data transfer objects for web requests and responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{FieldErrors, Route, SegmentForm, SegmentId, State};
use crate::registrar::{FetchRejection, SegmentListing};

/// Query string of the listing page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Success notice to show: `created` or `removed`
    pub notice: Option<String>,
}

/// A JSON scalar that is accepted as form text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(s) => s,
            Scalar::Number(n) => n.to_string(),
        }
    }
}

/// JSON submission. Ids and mileposts may be given as numbers or strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SegmentPayload {
    pub reference_date: Option<Scalar>,
    pub state_id: Option<Scalar>,
    pub route_id: Option<Scalar>,
    pub segment_type: Option<Scalar>,
    pub initial_milepost: Option<Scalar>,
    pub final_milepost: Option<Scalar>,
}

impl SegmentPayload {
    /// Convert to the raw form the registrar validates.
    pub fn into_form(self) -> SegmentForm {
        let text = |s: Option<Scalar>| s.map(Scalar::into_text).unwrap_or_default();
        SegmentForm {
            reference_date: text(self.reference_date),
            state_id: text(self.state_id),
            route_id: text(self.route_id),
            segment_type: text(self.segment_type),
            initial_milepost: text(self.initial_milepost),
            final_milepost: text(self.final_milepost),
        }
    }
}

/// Response for a created segment.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: SegmentId,
}

/// Response for a submission that failed validation.
#[derive(Debug, Serialize)]
pub struct ValidationErrorResponse {
    pub errors: FieldErrors,
    /// The submitted values, for re-display
    pub input: SegmentForm,
}

/// Response for a submission whose geometry could not be fetched.
#[derive(Debug, Serialize)]
pub struct FetchErrorResponse {
    pub error: &'static str,
    pub kind: FetchRejection,
    /// The submitted values, for re-display
    pub input: SegmentForm,
}

/// A state in JSON output.
#[derive(Debug, Serialize)]
pub struct StateResult {
    pub id: u32,
    pub name: String,
    pub code: String,
}

impl StateResult {
    pub fn from_state(state: &State) -> Self {
        Self {
            id: state.id.0,
            name: state.name.clone(),
            code: state.code.to_string(),
        }
    }
}

/// A route in JSON output.
#[derive(Debug, Serialize)]
pub struct RouteResult {
    pub id: u32,
    pub number: String,
}

impl RouteResult {
    pub fn from_route(route: &Route) -> Self {
        Self {
            id: route.id.0,
            number: route.number.query_value(),
        }
    }
}

/// A segment in JSON output.
#[derive(Debug, Serialize)]
pub struct SegmentResult {
    pub id: SegmentId,
    pub reference_date: String,
    pub state: Option<StateResult>,
    pub route: Option<RouteResult>,
    pub segment_type: String,
    pub initial_milepost: f64,
    pub final_milepost: f64,
    pub geometry: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl SegmentResult {
    pub fn from_listing(listing: &SegmentListing) -> Self {
        let record = &listing.record;
        Self {
            id: record.id,
            reference_date: record.reference_date.to_string(),
            state: listing.state.as_ref().map(StateResult::from_state),
            route: listing.route.as_ref().map(RouteResult::from_route),
            segment_type: record.segment_type.clone(),
            initial_milepost: record.initial_milepost.km(),
            final_milepost: record.final_milepost.km(),
            geometry: record.geometry.to_value(),
            created_at: record.created_at,
        }
    }
}

/// Response listing segments.
#[derive(Debug, Serialize)]
pub struct SegmentListResponse {
    pub segments: Vec<SegmentResult>,
}

/// Reference lookup lists for building a form.
#[derive(Debug, Serialize)]
pub struct ReferenceResponse {
    pub states: Vec<StateResult>,
    pub routes: Vec<RouteResult>,
}

/// Generic error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
