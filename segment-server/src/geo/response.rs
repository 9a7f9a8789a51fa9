//! A fully-read upstream response and the checks made on it.

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;

use crate::domain::GeometryDocument;

use super::error::FetchError;

/// Status, declared content type and body of one upstream answer.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    status: StatusCode,
    content_type: String,
    body: Vec<u8>,
}

impl UpstreamResponse {
    /// Build a response from its parts.
    pub fn new(status: StatusCode, content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    /// Read status, content type and the whole body.
    pub async fn read(response: reqwest::Response) -> Result<Self, FetchError> {
        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = response.bytes().await?.to_vec();

        Ok(Self {
            status,
            content_type,
            body,
        })
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// 2xx.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// 2xx or 3xx: the upstream answered rather than erroring.
    pub fn responded(&self) -> bool {
        self.status.is_success() || self.status.is_redirection()
    }

    /// Declares `application/json`.
    pub fn declares_json(&self) -> bool {
        self.content_type
            .to_ascii_lowercase()
            .contains("application/json")
    }

    /// Declares `application/json` or `text/json`.
    pub fn declares_json_like(&self) -> bool {
        self.declares_json() || self.content_type.to_ascii_lowercase().contains("text/json")
    }

    /// Answered 2xx/3xx with a content type that is not JSON-like.
    pub fn speaks_wrong_format(&self) -> bool {
        self.responded() && !self.declares_json_like()
    }

    /// The body decoded as a document, whatever the declared content type.
    /// Undecodable or empty bodies give `None`.
    pub fn document(&self) -> Option<GeometryDocument> {
        GeometryDocument::from_body(&self.body)
    }

    /// The decoded document, only if it carries a geometry.
    pub fn usable_document(&self) -> Option<GeometryDocument> {
        self.document().filter(GeometryDocument::has_geometry)
    }
}
