//! Last-resort transport with relaxed certificate verification.
//!
//! KNOWN COMPROMISE: the upstream service's certificate chain does not
//! verify reliably from this deployment, so this transport accepts invalid
//! certificates. It is used for exactly one request per acquisition, against
//! the primary endpoint, after every verified attempt has failed. Nothing
//! else in the crate may use it.

use std::time::Duration;

use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderValue, PRAGMA};
use reqwest::redirect::Policy;
use tracing::warn;

use super::error::FetchError;
use super::query::GeometryQuery;
use super::response::UpstreamResponse;

/// Maximum redirects followed by the fallback request.
const MAX_REDIRECTS: usize = 10;

/// A bare HTTP/1.1 client with certificate verification disabled.
#[derive(Debug, Clone)]
pub(crate) struct RelaxedTlsTransport {
    http: reqwest::Client,
}

impl RelaxedTlsTransport {
    pub(crate) fn new(user_agent: &str, timeout: Duration) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json, */*"));
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("pt-BR,pt;q=0.9,en;q=0.8"),
        );
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(true)
            .http1_only()
            .redirect(Policy::limited(MAX_REDIRECTS))
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { http })
    }

    /// One GET against `endpoint`.
    pub(crate) async fn get(
        &self,
        endpoint: &str,
        query: &GeometryQuery,
    ) -> Result<UpstreamResponse, FetchError> {
        warn!(endpoint, "retrying with relaxed certificate verification");

        let response = self
            .http
            .get(endpoint)
            .query(&query.pairs())
            .send()
            .await?;

        UpstreamResponse::read(response).await
    }
}
