//! Geometry documents returned by the upstream service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key that marks a document as carrying a usable geometry.
const GEOMETRY_KEY: &str = "geometry";

/// Error decoding a response body as a geometry document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// The body is not valid JSON
    #[error("body is not valid JSON: {0}")]
    Syntax(String),

    /// The body is JSON but not an object
    #[error("body is JSON but not an object")]
    NotAnObject,
}

/// An opaque JSON object describing a segment's shape.
///
/// The system never interprets the geometry itself; it only checks that a
/// non-null `geometry` member is present and stores the document as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeometryDocument(Map<String, Value>);

impl GeometryDocument {
    /// Decode a JSON object.
    pub fn parse(body: &[u8]) -> Result<Self, DocumentError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| DocumentError::Syntax(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(DocumentError::NotAnObject),
        }
    }

    /// Decode leniently: malformed, non-object and empty bodies all yield
    /// `None`, the "no document" value.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        Self::parse(body).ok().filter(|doc| !doc.is_empty())
    }

    /// Whether the document has no members at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the document carries a non-null `geometry` member.
    pub fn has_geometry(&self) -> bool {
        self.geometry().is_some()
    }

    /// The `geometry` member, if present and non-null.
    pub fn geometry(&self) -> Option<&Value> {
        self.0.get(GEOMETRY_KEY).filter(|v| !v.is_null())
    }

    /// The document as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl TryFrom<Value> for GeometryDocument {
    type Error = DocumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(DocumentError::NotAnObject),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_object_with_geometry() {
        let doc = GeometryDocument::parse(
            br#"{"type":"Feature","geometry":{"type":"Point","coordinates":[1,2]}}"#,
        )
        .unwrap();
        assert!(doc.has_geometry());
        assert_eq!(doc.geometry().unwrap()["type"], "Point");
    }

    #[test]
    fn missing_or_null_geometry_is_not_usable() {
        let doc = GeometryDocument::parse(br#"{"type":"Feature"}"#).unwrap();
        assert!(!doc.has_geometry());

        let doc = GeometryDocument::parse(br#"{"geometry":null}"#).unwrap();
        assert!(!doc.has_geometry());
    }

    #[test]
    fn non_objects_rejected() {
        assert_eq!(
            GeometryDocument::parse(b"[1,2,3]"),
            Err(DocumentError::NotAnObject)
        );
        assert_eq!(
            GeometryDocument::parse(b"null"),
            Err(DocumentError::NotAnObject)
        );
        assert!(matches!(
            GeometryDocument::parse(b"<html>oops</html>"),
            Err(DocumentError::Syntax(_))
        ));
    }

    #[test]
    fn lenient_decode_maps_failures_to_none() {
        assert!(GeometryDocument::from_body(b"").is_none());
        assert!(GeometryDocument::from_body(b"not json").is_none());
        assert!(GeometryDocument::from_body(b"{}").is_none());
        assert!(GeometryDocument::from_body(b"\"text\"").is_none());
        assert!(GeometryDocument::from_body(br#"{"a":1}"#).is_some());
    }

    #[test]
    fn serializes_transparently() {
        let doc = GeometryDocument::parse(br#"{"geometry":{"type":"LineString"}}"#).unwrap();
        let json = serde_json::to_string(&doc).unwrap();
        assert_eq!(json, r#"{"geometry":{"type":"LineString"}}"#);
        assert_eq!(doc.to_value()["geometry"]["type"], "LineString");
    }
}
