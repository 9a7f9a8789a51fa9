//! Mapping a validated request onto the upstream query string.

use crate::domain::SegmentRequest;

/// Classification code meaning "unspecified".
pub const UNSPECIFIED_CLASSIFICATION: &str = "null";

/// Query parameters for the line-spatialisation endpoint.
///
/// Pure data: building one does no I/O, and the same value is sent to every
/// endpoint and to the fallback transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeometryQuery {
    /// Route number, zero-padded to three digits (`br`)
    pub route: String,
    /// Segment type, verbatim (`tipo`)
    pub segment_type: String,
    /// State short code (`uf`)
    pub state: String,
    /// Classification code (`cd_tipo`)
    pub classification: String,
    /// Reference date as the caller wrote it (`data`)
    pub date: String,
    /// Initial milepost with three fractional digits (`kmi`)
    pub initial_km: String,
    /// Final milepost with three fractional digits (`kmf`)
    pub final_km: String,
}

impl GeometryQuery {
    /// Build the query for a validated request.
    pub fn from_request(request: &SegmentRequest) -> Self {
        Self {
            route: request.route().number.query_value(),
            segment_type: request.segment_type().to_string(),
            state: request.state().code.as_str().to_string(),
            classification: UNSPECIFIED_CLASSIFICATION.to_string(),
            date: request.reference_date().as_str().to_string(),
            initial_km: request.initial_milepost().query_value(),
            final_km: request.final_milepost().query_value(),
        }
    }

    /// Name/value pairs in wire order.
    pub fn pairs(&self) -> [(&'static str, &str); 7] {
        [
            ("br", &self.route),
            ("tipo", &self.segment_type),
            ("uf", &self.state),
            ("cd_tipo", &self.classification),
            ("data", &self.date),
            ("kmi", &self.initial_km),
            ("kmf", &self.final_km),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReferenceData, SegmentForm};

    fn request(route_id: &str, initial: &str, fin: &str) -> SegmentRequest {
        let form = SegmentForm {
            reference_date: "15/03/2024".into(),
            state_id: "25".into(),
            route_id: route_id.into(),
            segment_type: "B".into(),
            initial_milepost: initial.into(),
            final_milepost: fin.into(),
        };
        SegmentRequest::validate(&form, &ReferenceData::seeded()).unwrap()
    }

    #[test]
    fn maps_every_parameter() {
        let query = GeometryQuery::from_request(&request("1", "5", "12.3456"));

        assert_eq!(query.route, "010");
        assert_eq!(query.segment_type, "B");
        assert_eq!(query.state, "SP");
        assert_eq!(query.classification, "null");
        assert_eq!(query.date, "15/03/2024");
        assert_eq!(query.initial_km, "5.000");
        assert_eq!(query.final_km, "12.346");
    }

    #[test]
    fn pairs_use_upstream_names() {
        let query = GeometryQuery::from_request(&request("9", "0", "1"));
        let names: Vec<&str> = query.pairs().iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["br", "tipo", "uf", "cd_tipo", "data", "kmi", "kmf"]);
        assert_eq!(query.pairs()[0], ("br", "251"));
    }
}
