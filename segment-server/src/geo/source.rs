//! The seam between the registrar and the upstream service.

use futures::future::BoxFuture;

use super::outcome::FetchOutcome;
use super::query::GeometryQuery;

/// Anything that can turn a query into a geometry outcome.
///
/// Implemented by [`GeometryClient`](super::GeometryClient) for the real
/// service and by [`ScriptedGeometrySource`](super::mock::ScriptedGeometrySource)
/// for tests. Implementations must not fail: every fault is expressed as a
/// [`FetchOutcome`].
pub trait GeometrySource: Send + Sync {
    /// Acquire a geometry for `query`.
    fn fetch<'a>(&'a self, query: &'a GeometryQuery) -> BoxFuture<'a, FetchOutcome>;
}
