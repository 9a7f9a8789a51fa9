//! Segment submissions: raw form input and its validated form.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::milepost::Milepost;
use super::reference::{ReferenceData, Route, RouteId, State, StateId};
use super::reference_date::ReferenceDate;

/// Raw, unvalidated submission exactly as the user typed it.
///
/// Every field is text so the original input can always be re-offered on
/// failure, including values that did not parse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentForm {
    pub reference_date: String,
    pub state_id: String,
    pub route_id: String,
    pub segment_type: String,
    pub initial_milepost: String,
    pub final_milepost: String,
}

/// A form field that can carry a validation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ReferenceDate,
    StateId,
    RouteId,
    SegmentType,
    InitialMilepost,
    FinalMilepost,
}

impl Field {
    /// The form field name.
    pub fn name(&self) -> &'static str {
        match self {
            Field::ReferenceDate => "reference_date",
            Field::StateId => "state_id",
            Field::RouteId => "route_id",
            Field::SegmentType => "segment_type",
            Field::InitialMilepost => "initial_milepost",
            Field::FinalMilepost => "final_milepost",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Field-level validation errors, at most one message per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    fn add(&mut self, field: Field, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// The message for a field, if it failed.
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Whether any field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Failing fields with their messages, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

/// A validated segment submission with its references resolved.
///
/// Construction goes through [`SegmentRequest::validate`], so a value of this
/// type always satisfies `final_milepost > initial_milepost >= 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRequest {
    reference_date: ReferenceDate,
    state: State,
    route: Route,
    segment_type: String,
    initial_milepost: Milepost,
    final_milepost: Milepost,
}

impl SegmentRequest {
    /// Validate a raw submission against the reference data.
    ///
    /// Every field is checked so that all problems are reported at once.
    pub fn validate(form: &SegmentForm, reference: &ReferenceData) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();

        let reference_date = required(&form.reference_date, Field::ReferenceDate, &mut errors)
            .and_then(|raw| match ReferenceDate::parse(raw) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add(Field::ReferenceDate, "The reference date is not a valid date.");
                    None
                }
            });

        let state = required(&form.state_id, Field::StateId, &mut errors).and_then(|raw| {
            let found = raw
                .parse()
                .ok()
                .and_then(|id| reference.state(StateId(id)));
            if found.is_none() {
                errors.add(Field::StateId, "The selected state is invalid.");
            }
            found.cloned()
        });

        let route = required(&form.route_id, Field::RouteId, &mut errors).and_then(|raw| {
            let found = raw
                .parse()
                .ok()
                .and_then(|id| reference.route(RouteId(id)));
            if found.is_none() {
                errors.add(Field::RouteId, "The selected route is invalid.");
            }
            found.cloned()
        });

        let segment_type =
            required(&form.segment_type, Field::SegmentType, &mut errors).map(str::to_string);

        let initial_milepost = required(&form.initial_milepost, Field::InitialMilepost, &mut errors)
            .and_then(|raw| match Milepost::parse(raw) {
                Ok(m) => Some(m),
                Err(_) => {
                    errors.add(
                        Field::InitialMilepost,
                        "The initial milepost must be a number of at least 0.",
                    );
                    None
                }
            });

        let final_milepost = required(&form.final_milepost, Field::FinalMilepost, &mut errors)
            .and_then(|raw| match Milepost::parse(raw) {
                Ok(m) => Some(m),
                Err(_) => {
                    errors.add(Field::FinalMilepost, "The final milepost must be a number.");
                    None
                }
            });

        if let (Some(initial), Some(fin)) = (initial_milepost, final_milepost) {
            if fin.metres() <= initial.metres() {
                errors.add(
                    Field::FinalMilepost,
                    "The final milepost must be greater than the initial milepost.",
                );
            }
        }

        match (
            reference_date,
            state,
            route,
            segment_type,
            initial_milepost,
            final_milepost,
        ) {
            (Some(reference_date), Some(state), Some(route), Some(segment_type), Some(i), Some(f))
                if errors.is_empty() =>
            {
                Ok(Self {
                    reference_date,
                    state,
                    route,
                    segment_type,
                    initial_milepost: i,
                    final_milepost: f,
                })
            }
            _ => Err(errors),
        }
    }

    pub fn reference_date(&self) -> &ReferenceDate {
        &self.reference_date
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn segment_type(&self) -> &str {
        &self.segment_type
    }

    pub fn initial_milepost(&self) -> Milepost {
        self.initial_milepost
    }

    pub fn final_milepost(&self) -> Milepost {
        self.final_milepost
    }
}

/// Trimmed value of a required field, recording an error when blank.
fn required<'a>(raw: &'a str, field: Field, errors: &mut FieldErrors) -> Option<&'a str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        errors.add(field, format!("The {} field is required.", field.name().replace('_', " ")));
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> SegmentForm {
        SegmentForm {
            reference_date: "2024-03-15".into(),
            state_id: "13".into(),
            route_id: "4".into(),
            segment_type: "B".into(),
            initial_milepost: "10".into(),
            final_milepost: "25.5".into(),
        }
    }

    #[test]
    fn valid_form_resolves_references() {
        let reference = ReferenceData::seeded();
        let request = SegmentRequest::validate(&form(), &reference).unwrap();

        assert_eq!(request.reference_date().as_str(), "2024-03-15");
        assert_eq!(request.state().code.as_str(), "MG");
        assert_eq!(request.route().number.query_value(), "040");
        assert_eq!(request.segment_type(), "B");
        assert_eq!(request.initial_milepost().km(), 10.0);
        assert_eq!(request.final_milepost().km(), 25.5);
    }

    #[test]
    fn inputs_are_trimmed() {
        let reference = ReferenceData::seeded();
        let mut form = form();
        form.segment_type = "  B  ".into();
        form.state_id = " 13 ".into();

        let request = SegmentRequest::validate(&form, &reference).unwrap();
        assert_eq!(request.segment_type(), "B");
    }

    #[test]
    fn empty_form_reports_every_field() {
        let reference = ReferenceData::seeded();
        let errors = SegmentRequest::validate(&SegmentForm::default(), &reference).unwrap_err();

        assert_eq!(errors.len(), 6);
        assert_eq!(
            errors.get(Field::SegmentType),
            Some("The segment type field is required.")
        );
    }

    #[test]
    fn final_must_exceed_initial() {
        let reference = ReferenceData::seeded();

        let mut equal = form();
        equal.final_milepost = "10.000".into();
        let errors = SegmentRequest::validate(&equal, &reference).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.get(Field::FinalMilepost).is_some());

        let mut reversed = form();
        reversed.initial_milepost = "30".into();
        let errors = SegmentRequest::validate(&reversed, &reference).unwrap_err();
        assert!(errors.get(Field::FinalMilepost).is_some());
    }

    #[test]
    fn mileposts_equal_at_metre_precision_rejected() {
        let reference = ReferenceData::seeded();
        let mut form = form();
        form.initial_milepost = "5.0001".into();
        form.final_milepost = "5.0002".into();

        let errors = SegmentRequest::validate(&form, &reference).unwrap_err();
        assert_eq!(
            errors.get(Field::FinalMilepost),
            Some("The final milepost must be greater than the initial milepost.")
        );

        form.final_milepost = "5.001".into();
        assert!(SegmentRequest::validate(&form, &reference).is_ok());
    }

    #[test]
    fn huge_milepost_rejected() {
        let reference = ReferenceData::seeded();
        let mut form = form();
        form.final_milepost = "100000000000000000000000".into();

        let errors = SegmentRequest::validate(&form, &reference).unwrap_err();
        assert!(errors.get(Field::FinalMilepost).is_some());
    }

    #[test]
    fn negative_initial_rejected() {
        let reference = ReferenceData::seeded();
        let mut form = form();
        form.initial_milepost = "-1".into();

        let errors = SegmentRequest::validate(&form, &reference).unwrap_err();
        assert!(errors.get(Field::InitialMilepost).is_some());
        assert!(errors.get(Field::FinalMilepost).is_none());
    }

    #[test]
    fn unknown_references_rejected() {
        let reference = ReferenceData::seeded();
        let mut form = form();
        form.state_id = "99".into();
        form.route_id = "abc".into();

        let errors = SegmentRequest::validate(&form, &reference).unwrap_err();
        assert_eq!(errors.get(Field::StateId), Some("The selected state is invalid."));
        assert_eq!(errors.get(Field::RouteId), Some("The selected route is invalid."));
    }

    #[test]
    fn bad_date_rejected() {
        let reference = ReferenceData::seeded();
        let mut form = form();
        form.reference_date = "next tuesday".into();

        let errors = SegmentRequest::validate(&form, &reference).unwrap_err();
        assert_eq!(
            errors.get(Field::ReferenceDate),
            Some("The reference date is not a valid date.")
        );
    }

    #[test]
    fn errors_serialize_by_field_name() {
        let reference = ReferenceData::seeded();
        let mut form = form();
        form.segment_type = String::new();

        let errors = SegmentRequest::validate(&form, &reference).unwrap_err();
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["segment_type"], "The segment type field is required.");
    }
}
