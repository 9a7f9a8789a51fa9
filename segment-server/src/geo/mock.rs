//! Scripted geometry source for testing without the upstream service.
//!
//! Serves a queue of prepared outcomes and records every query it receives,
//! so tests can assert both what was asked and how often.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use futures::future::{self, BoxFuture, FutureExt};

use super::outcome::FetchOutcome;
use super::query::GeometryQuery;
use super::source::GeometrySource;

#[derive(Debug)]
struct Script {
    queued: VecDeque<FetchOutcome>,
    otherwise: FetchOutcome,
    queries: Vec<GeometryQuery>,
}

/// Geometry source that replays prepared outcomes.
///
/// Cloning shares the script, so a test can keep a handle after moving a
/// clone into the registrar.
#[derive(Debug, Clone)]
pub struct ScriptedGeometrySource {
    script: Arc<Mutex<Script>>,
}

impl ScriptedGeometrySource {
    /// Answer every query with `outcome`.
    pub fn always(outcome: FetchOutcome) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                queued: VecDeque::new(),
                otherwise: outcome,
                queries: Vec::new(),
            })),
        }
    }

    /// Answer the next query with `outcome`, before falling back to the
    /// default answer.
    pub fn then(self, outcome: FetchOutcome) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.queued.push_back(outcome);
        }
        self
    }

    /// Number of queries received so far.
    pub fn calls(&self) -> usize {
        self.script.lock().map(|s| s.queries.len()).unwrap_or_default()
    }

    /// Every query received, in order.
    pub fn queries(&self) -> Vec<GeometryQuery> {
        self.script
            .lock()
            .map(|s| s.queries.clone())
            .unwrap_or_default()
    }

    fn answer(&self, query: &GeometryQuery) -> FetchOutcome {
        match self.script.lock() {
            Ok(mut script) => {
                script.queries.push(query.clone());
                let otherwise = script.otherwise.clone();
                script.queued.pop_front().unwrap_or(otherwise)
            }
            Err(_) => FetchOutcome::TransportFailure("script lock poisoned".to_string()),
        }
    }
}

impl GeometrySource for ScriptedGeometrySource {
    fn fetch<'a>(&'a self, query: &'a GeometryQuery) -> BoxFuture<'a, FetchOutcome> {
        future::ready(self.answer(query)).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeometryDocument;

    fn query() -> GeometryQuery {
        GeometryQuery {
            route: "040".into(),
            segment_type: "B".into(),
            state: "MG".into(),
            classification: "null".into(),
            date: "2024-03-15".into(),
            initial_km: "0.000".into(),
            final_km: "1.000".into(),
        }
    }

    #[tokio::test]
    async fn replays_queue_then_default() {
        let doc = GeometryDocument::parse(br#"{"geometry":{}}"#).unwrap();
        let source = ScriptedGeometrySource::always(FetchOutcome::NotFound)
            .then(FetchOutcome::Found(doc));

        assert!(source.fetch(&query()).await.is_found());
        assert_eq!(source.fetch(&query()).await, FetchOutcome::NotFound);
        assert_eq!(source.fetch(&query()).await, FetchOutcome::NotFound);
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test]
    async fn clones_share_the_script() {
        let source = ScriptedGeometrySource::always(FetchOutcome::NotFound);
        let handle = source.clone();

        source.fetch(&query()).await;
        assert_eq!(handle.calls(), 1);
        assert_eq!(handle.queries()[0].state, "MG");
    }
}
