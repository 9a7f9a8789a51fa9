//! Domain types for the highway segment registry.
//!
//! Values here enforce their invariants at construction time, so code that
//! receives them can trust their validity: a [`SegmentRequest`] always has
//! `final > initial >= 0`, a [`RouteNumber`] always renders as three digits,
//! and so on.

mod error;
mod geometry;
mod milepost;
mod record;
mod reference;
mod reference_date;
mod request;
mod route;
mod state_code;

pub use error::DomainError;
pub use geometry::{DocumentError, GeometryDocument};
pub use milepost::{InvalidMilepost, Milepost};
pub use record::{NewSegment, SegmentId, SegmentRecord};
pub use reference::{ReferenceData, Route, RouteId, State, StateId};
pub use reference_date::{InvalidReferenceDate, ReferenceDate};
pub use request::{Field, FieldErrors, SegmentForm, SegmentRequest};
pub use route::{InvalidRouteNumber, RouteNumber};
pub use state_code::{InvalidStateCode, StateCode};
