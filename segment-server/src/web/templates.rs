//! Askama templates for the web frontend.

use askama::Template;

use crate::domain::{Field, FieldErrors, ReferenceData, SegmentForm};
use crate::registrar::SegmentListing;

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Segment listing with the registration form.
#[derive(Template)]
#[template(path = "segments.html")]
pub struct SegmentsTemplate {
    pub segments: Vec<SegmentRow>,
    pub states: Vec<OptionView>,
    pub routes: Vec<OptionView>,
    pub form: SegmentForm,
    pub errors: FormErrorsView,
    /// The single fetch error message, if the last submission failed upstream
    pub fetch_error: Option<String>,
    pub notice: Option<String>,
}

/// Error page.
#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub title: String,
    pub message: String,
}

// ============================================================================
// View Models (for templates)
// ============================================================================

/// One row of the segment table.
#[derive(Debug, Clone)]
pub struct SegmentRow {
    pub id: u64,
    pub reference_date: String,
    pub state: String,
    pub route: String,
    pub segment_type: String,
    pub initial_milepost: String,
    pub final_milepost: String,
    pub geometry_type: String,
}

impl SegmentRow {
    /// Create from a listing; missing references show as `?`.
    pub fn from_listing(listing: &SegmentListing) -> Self {
        let record = &listing.record;
        Self {
            id: record.id.0,
            reference_date: record.reference_date.date().format("%d/%m/%Y").to_string(),
            state: listing
                .state
                .as_ref()
                .map(|s| s.code.to_string())
                .unwrap_or_else(|| "?".to_string()),
            route: listing
                .route
                .as_ref()
                .map(|r| format!("BR-{}", r.number))
                .unwrap_or_else(|| "?".to_string()),
            segment_type: record.segment_type.clone(),
            initial_milepost: record.initial_milepost.query_value(),
            final_milepost: record.final_milepost.query_value(),
            geometry_type: record
                .geometry
                .geometry()
                .and_then(|g| g.get("type"))
                .and_then(|t| t.as_str())
                .unwrap_or("unknown")
                .to_string(),
        }
    }
}

/// An `<option>` in a select box.
#[derive(Debug, Clone)]
pub struct OptionView {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

/// Per-field validation messages.
#[derive(Debug, Clone, Default)]
pub struct FormErrorsView {
    pub reference_date: Option<String>,
    pub state_id: Option<String>,
    pub route_id: Option<String>,
    pub segment_type: Option<String>,
    pub initial_milepost: Option<String>,
    pub final_milepost: Option<String>,
}

impl FormErrorsView {
    pub fn from_errors(errors: &FieldErrors) -> Self {
        let get = |field| errors.get(field).map(str::to_string);
        Self {
            reference_date: get(Field::ReferenceDate),
            state_id: get(Field::StateId),
            route_id: get(Field::RouteId),
            segment_type: get(Field::SegmentType),
            initial_milepost: get(Field::InitialMilepost),
            final_milepost: get(Field::FinalMilepost),
        }
    }
}

impl SegmentsTemplate {
    /// Build the page. `form` is echoed back into the inputs.
    pub fn new(
        listings: &[SegmentListing],
        reference: &ReferenceData,
        form: SegmentForm,
        errors: Option<&FieldErrors>,
        fetch_error: Option<&str>,
        notice: Option<&str>,
    ) -> Self {
        let selected_state = form.state_id.trim().to_string();
        let selected_route = form.route_id.trim().to_string();

        let states = reference
            .states()
            .iter()
            .map(|s| {
                let value = s.id.to_string();
                OptionView {
                    selected: value == selected_state,
                    label: format!("{} ({})", s.name, s.code),
                    value,
                }
            })
            .collect();

        let routes = reference
            .routes()
            .iter()
            .map(|r| {
                let value = r.id.to_string();
                OptionView {
                    selected: value == selected_route,
                    label: format!("BR-{}", r.number),
                    value,
                }
            })
            .collect();

        Self {
            segments: listings.iter().map(SegmentRow::from_listing).collect(),
            states,
            routes,
            form,
            errors: errors.map(FormErrorsView::from_errors).unwrap_or_default(),
            fetch_error: fetch_error.map(str::to_string),
            notice: notice.map(str::to_string),
        }
    }
}

/// Text for a `?notice=` key. Unknown keys show nothing.
pub fn notice_message(key: Option<&str>) -> Option<&'static str> {
    match key {
        Some("created") => Some("Segment registered successfully!"),
        Some("removed") => Some("Segment removed."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SegmentRequest;

    fn form() -> SegmentForm {
        SegmentForm {
            reference_date: "2024-03-15".into(),
            state_id: "13".into(),
            route_id: "4".into(),
            segment_type: "B".into(),
            initial_milepost: "5".into(),
            final_milepost: "5".into(),
        }
    }

    #[test]
    fn preserves_input_and_selection() {
        let reference = ReferenceData::seeded();
        let errors = SegmentRequest::validate(&form(), &reference).unwrap_err();

        let page = SegmentsTemplate::new(&[], &reference, form(), Some(&errors), None, None);

        assert_eq!(page.form.final_milepost, "5");
        assert!(page.errors.final_milepost.is_some());
        assert!(page.errors.segment_type.is_none());
        let selected: Vec<&str> = page
            .states
            .iter()
            .filter(|s| s.selected)
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(selected, ["Minas Gerais (MG)"]);
        assert!(page.routes.iter().any(|r| r.selected && r.label == "BR-040"));
    }

    #[test]
    fn renders_fetch_error_and_input() {
        let reference = ReferenceData::seeded();
        let page = SegmentsTemplate::new(
            &[],
            &reference,
            form(),
            None,
            Some("Could not obtain the segment geometry"),
            None,
        );

        let html = page.render().unwrap();
        assert!(html.contains("Could not obtain the segment geometry"));
        assert!(html.contains("value=\"2024-03-15\""));
    }

    #[test]
    fn notices() {
        assert_eq!(
            notice_message(Some("created")),
            Some("Segment registered successfully!")
        );
        assert_eq!(notice_message(Some("removed")), Some("Segment removed."));
        assert_eq!(notice_message(Some("<script>")), None);
        assert_eq!(notice_message(None), None);
    }
}
