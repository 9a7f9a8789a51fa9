//! Geometry acquisition from the upstream line-spatialisation service.
//!
//! The upstream is unreliable in practice:
//! - valid JSON is sometimes served with a non-JSON content type
//! - error pages come back as HTML with a 200 status
//! - the TLS chain does not always verify
//!
//! [`GeometryClient`] absorbs all of this and reports a [`FetchOutcome`]
//! instead of an error.

mod client;
mod error;
pub mod mock;
mod outcome;
mod query;
mod relaxed;
mod response;
mod source;

pub use client::{
    BROWSER_USER_AGENT, DEFAULT_ENDPOINTS, GeometryClient, GeometryClientConfig, conclude,
};
pub use error::FetchError;
pub use outcome::FetchOutcome;
pub use query::{GeometryQuery, UNSPECIFIED_CLASSIFICATION};
pub use response::UpstreamResponse;
pub use source::GeometrySource;
