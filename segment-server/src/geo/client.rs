//! Upstream geometry HTTP client.
//!
//! Probes an ordered list of mirror endpoints with browser-like requests,
//! then falls back to a tolerant re-read of the last answer and finally to a
//! single relaxed-TLS request. See [`GeometryClient::fetch_geometry`].

use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::StatusCode;
use reqwest::header::{
    ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, HeaderMap, HeaderName, HeaderValue, ORIGIN, PRAGMA,
    REFERER,
};
use tracing::{debug, info, warn};

use super::error::FetchError;
use super::outcome::FetchOutcome;
use super::query::GeometryQuery;
use super::relaxed::RelaxedTlsTransport;
use super::response::UpstreamResponse;
use super::source::GeometrySource;

/// Default endpoints: the primary API path and its web mirror.
pub const DEFAULT_ENDPOINTS: [&str; 2] = [
    "https://servicos.dnit.gov.br/sgplan/apigeo/rotas/espacializarlinha",
    "https://servicos.dnit.gov.br/sgplan/apigeo/web/rotas/espacializarlinha",
];

/// Default per-attempt timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// The upstream rejects requests that do not look like they come from its
/// own web page.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const DEFAULT_REFERER: &str =
    "https://servicos.dnit.gov.br/sgplan/apigeo/web/rotas/espacializarlinha";

const DEFAULT_ORIGIN: &str = "https://servicos.dnit.gov.br";

/// Configuration for the geometry client.
#[derive(Debug, Clone)]
pub struct GeometryClientConfig {
    /// Candidate endpoints, tried in order; the first is the primary
    pub endpoints: Vec<String>,
    /// Per-attempt timeout in seconds
    pub timeout_secs: u64,
    /// User-Agent presented on every request
    pub user_agent: String,
    /// Referer header for endpoint probes
    pub referer: String,
    /// Origin header for endpoint probes
    pub origin: String,
}

impl GeometryClientConfig {
    /// Create a config pointing at the production service.
    pub fn new() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|e| e.to_string()).collect(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: BROWSER_USER_AGENT.to_string(),
            referer: DEFAULT_REFERER.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
        }
    }

    /// Replace the endpoint list (for testing or a relocated service).
    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    /// Set the per-attempt timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for GeometryClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the upstream line-spatialisation service.
#[derive(Debug, Clone)]
pub struct GeometryClient {
    http: reqwest::Client,
    relaxed: RelaxedTlsTransport,
    endpoints: Vec<String>,
}

impl GeometryClient {
    /// Create a new client. Requires at least two endpoints.
    pub fn new(config: GeometryClientConfig) -> Result<Self, FetchError> {
        if config.endpoints.len() < 2 {
            return Err(FetchError::NotConfigured(
                "at least two endpoints are required".to_string(),
            ));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let headers = browser_headers(&config)?;

        // Compression is negotiated by reqwest itself (gzip, deflate, br
        // features); setting Accept-Encoding by hand would disable decoding.
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(timeout)
            .build()?;

        let relaxed = RelaxedTlsTransport::new(&config.user_agent, timeout)?;

        Ok(Self {
            http,
            relaxed,
            endpoints: config.endpoints,
        })
    }

    /// The endpoints this client probes, primary first.
    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }

    /// Acquire a geometry for `query`.
    ///
    /// 1. Probe each endpoint in order. A successful JSON response carrying
    ///    a geometry wins immediately and later endpoints are not contacted.
    /// 2. Re-read the last response as JSON whatever its declared type. If
    ///    that fails on a non-JSON answer, stop with a format failure.
    /// 3. Make one relaxed-TLS request to the primary endpoint.
    /// 4. Otherwise classify the failure with [`conclude`]. A transport error
    ///    anywhere in the sequence makes it a transport failure.
    ///
    /// Never returns an error: transport faults are logged and folded into
    /// the outcome.
    pub async fn fetch_geometry(&self, query: &GeometryQuery) -> FetchOutcome {
        let mut last_response: Option<UpstreamResponse> = None;
        let mut last_error: Option<FetchError> = None;

        for endpoint in &self.endpoints {
            match self.probe(endpoint, query).await {
                Ok(response) => {
                    debug!(
                        endpoint = %endpoint,
                        status = %response.status(),
                        content_type = response.content_type(),
                        "endpoint answered"
                    );
                    if response.is_success() && response.declares_json() {
                        if let Some(document) = response.usable_document() {
                            info!(endpoint = %endpoint, "geometry found");
                            return FetchOutcome::Found(document);
                        }
                    }
                    last_response = Some(response);
                }
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "endpoint probe failed");
                    last_error = Some(e);
                }
            }
        }

        if let Some(response) = &last_response {
            if response.is_success() {
                if let Some(document) = response.usable_document() {
                    info!(
                        content_type = response.content_type(),
                        "geometry found in mislabelled response"
                    );
                    return FetchOutcome::Found(document);
                }
            }
            // Up but speaking the wrong format: the relaxed transport would
            // get the same answer.
            if last_error.is_none() && response.speaks_wrong_format() {
                let outcome = conclude(last_response.as_ref(), None);
                warn!(kind = outcome.kind(), "no usable geometry obtained");
                return outcome;
            }
        }

        let primary = &self.endpoints[0];
        match self.relaxed.get(primary, query).await {
            Ok(response) => {
                debug!(
                    status = %response.status(),
                    content_type = response.content_type(),
                    "fallback transport answered"
                );
                if response.status() == StatusCode::OK && response.declares_json() {
                    if let Some(document) = response.usable_document() {
                        info!("geometry found via fallback transport");
                        return FetchOutcome::Found(document);
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "fallback transport failed");
                last_error.get_or_insert(e);
            }
        }

        let outcome = conclude(last_response.as_ref(), last_error.as_ref());
        warn!(kind = outcome.kind(), "no usable geometry obtained");
        outcome
    }

    /// One browser-like GET against `endpoint`.
    async fn probe(
        &self,
        endpoint: &str,
        query: &GeometryQuery,
    ) -> Result<UpstreamResponse, FetchError> {
        let response = self
            .http
            .get(endpoint)
            .query(&query.pairs())
            .send()
            .await?;

        UpstreamResponse::read(response).await
    }
}

impl GeometrySource for GeometryClient {
    fn fetch<'a>(&'a self, query: &'a GeometryQuery) -> BoxFuture<'a, FetchOutcome> {
        self.fetch_geometry(query).boxed()
    }
}

/// Classify an acquisition that produced no geometry.
///
/// - Any transport error along the way: a transport failure.
/// - The last endpoint answered 2xx/3xx with a non-JSON content type:
///   the upstream is up but speaking the wrong format.
/// - Otherwise the upstream answered but had nothing usable.
pub fn conclude(
    last_response: Option<&UpstreamResponse>,
    last_error: Option<&FetchError>,
) -> FetchOutcome {
    if let Some(error) = last_error {
        return FetchOutcome::TransportFailure(error.to_string());
    }
    match last_response {
        Some(response) if response.speaks_wrong_format() => {
            FetchOutcome::FormatFailure(format!(
                "upstream answered {} with content type {:?}",
                response.status(),
                response.content_type()
            ))
        }
        Some(_) => FetchOutcome::NotFound,
        None => FetchOutcome::TransportFailure("no endpoint produced a response".to_string()),
    }
}

/// Headers that make a probe look like the upstream's own web page calling it.
fn browser_headers(config: &GeometryClientConfig) -> Result<HeaderMap, FetchError> {
    let header = |value: &str| {
        HeaderValue::from_str(value)
            .map_err(|_| FetchError::NotConfigured(format!("invalid header value {value:?}")))
    };

    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json, */*"));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("pt-BR,pt;q=0.9,en;q=0.8"),
    );
    headers.insert(REFERER, header(&config.referer)?);
    headers.insert(ORIGIN, header(&config.origin)?);
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(
        HeaderName::from_static("sec-fetch-dest"),
        HeaderValue::from_static("empty"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-mode"),
        HeaderValue::from_static("cors"),
    );
    headers.insert(
        HeaderName::from_static("sec-fetch-site"),
        HeaderValue::from_static("same-origin"),
    );
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = GeometryClientConfig::new()
            .with_endpoints(["http://localhost:1/a", "http://localhost:1/b"])
            .with_timeout(5)
            .with_user_agent("test-agent");

        assert_eq!(config.endpoints, ["http://localhost:1/a", "http://localhost:1/b"]);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent, "test-agent");
    }

    #[test]
    fn config_defaults() {
        let config = GeometryClientConfig::default();

        assert_eq!(config.endpoints, DEFAULT_ENDPOINTS);
        assert_eq!(config.timeout_secs, 60);
        assert_eq!(config.user_agent, BROWSER_USER_AGENT);
    }

    #[test]
    fn client_creation() {
        let client = GeometryClient::new(GeometryClientConfig::new()).unwrap();
        assert_eq!(client.endpoints().len(), 2);
    }

    #[test]
    fn single_endpoint_rejected() {
        let config = GeometryClientConfig::new().with_endpoints(["http://localhost:1/a"]);
        assert!(matches!(
            GeometryClient::new(config),
            Err(FetchError::NotConfigured(_))
        ));
    }

    #[test]
    fn browser_headers_present() {
        let headers = browser_headers(&GeometryClientConfig::new()).unwrap();
        assert_eq!(headers["x-requested-with"], "XMLHttpRequest");
        assert_eq!(headers[ORIGIN], DEFAULT_ORIGIN);
        assert_eq!(headers[REFERER], DEFAULT_REFERER);
        assert_eq!(headers["sec-fetch-mode"], "cors");
        assert!(!headers.contains_key("accept-encoding"));
    }

    #[test]
    fn conclude_successful_html_is_format_failure() {
        let html = UpstreamResponse::new(StatusCode::OK, "text/html", "<html></html>");
        assert!(matches!(
            conclude(Some(&html), None),
            FetchOutcome::FormatFailure(_)
        ));
    }

    #[test]
    fn conclude_json_without_geometry_is_not_found() {
        let json = UpstreamResponse::new(StatusCode::OK, "application/json", r#"{"a":1}"#);
        assert_eq!(conclude(Some(&json), None), FetchOutcome::NotFound);

        let text_json = UpstreamResponse::new(StatusCode::OK, "text/json", "[]");
        assert_eq!(conclude(Some(&text_json), None), FetchOutcome::NotFound);
    }

    #[test]
    fn conclude_server_error_page_is_not_found() {
        let error_page = UpstreamResponse::new(StatusCode::BAD_GATEWAY, "text/html", "<h1>502</h1>");
        assert_eq!(conclude(Some(&error_page), None), FetchOutcome::NotFound);
    }

    #[test]
    fn conclude_transport_error_outranks_a_later_answer() {
        let html = UpstreamResponse::new(StatusCode::OK, "text/html", "<html></html>");
        let err = FetchError::NotConfigured("timed out".into());
        match conclude(Some(&html), Some(&err)) {
            FetchOutcome::TransportFailure(reason) => assert!(reason.contains("timed out")),
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn conclude_without_any_response_is_transport_failure() {
        let err = FetchError::NotConfigured("boom".into());
        match conclude(None, Some(&err)) {
            FetchOutcome::TransportFailure(reason) => assert!(reason.contains("boom")),
            other => panic!("unexpected outcome {other:?}"),
        }

        assert!(matches!(
            conclude(None, None),
            FetchOutcome::TransportFailure(_)
        ));
    }
}
