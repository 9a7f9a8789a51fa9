//! Geometry client error types.
//!
//! These never reach the registrar directly: every failure during an
//! acquisition is logged and folded into a [`FetchOutcome`](super::FetchOutcome).

/// Errors from the upstream HTTP transports.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP request failed (connection refused, timeout, TLS, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Client misconfigured
    #[error("not configured: {0}")]
    NotConfigured(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = FetchError::NotConfigured("at least two endpoints are required".into());
        assert_eq!(
            err.to_string(),
            "not configured: at least two endpoints are required"
        );
    }
}
