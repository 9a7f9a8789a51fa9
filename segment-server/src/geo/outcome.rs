//! The tagged result of one geometry acquisition.

use crate::domain::GeometryDocument;

/// What a geometry acquisition produced.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// A document with a usable `geometry` member
    Found(GeometryDocument),

    /// No endpoint could be reached at all
    TransportFailure(String),

    /// The upstream answered successfully, but not with JSON
    FormatFailure(String),

    /// The upstream answered, but no answer carried a geometry
    NotFound,
}

impl FetchOutcome {
    /// Whether a usable geometry was obtained.
    pub fn is_found(&self) -> bool {
        matches!(self, FetchOutcome::Found(_))
    }

    /// Short machine-readable label, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchOutcome::Found(_) => "found",
            FetchOutcome::TransportFailure(_) => "transport_failure",
            FetchOutcome::FormatFailure(_) => "format_failure",
            FetchOutcome::NotFound => "not_found",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        let doc = GeometryDocument::parse(br#"{"geometry":{}}"#).unwrap();
        assert!(FetchOutcome::Found(doc).is_found());
        assert!(!FetchOutcome::NotFound.is_found());
        assert_eq!(FetchOutcome::NotFound.kind(), "not_found");
        assert_eq!(
            FetchOutcome::FormatFailure("text/html".into()).kind(),
            "format_failure"
        );
        assert_eq!(
            FetchOutcome::TransportFailure("refused".into()).kind(),
            "transport_failure"
        );
    }
}
