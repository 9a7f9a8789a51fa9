//! Domain error types.
//!
//! These cover inconsistent reference data. Per-value parse failures have
//! their own small error types next to the values they guard.

use super::{RouteId, StateId};

/// Domain-level errors for reference data consistency.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// Two states share an internal identifier
    #[error("duplicate state id {0}")]
    DuplicateState(StateId),

    /// Two routes share an internal identifier
    #[error("duplicate route id {0}")]
    DuplicateRoute(RouteId),

    /// Reference data could not be read or decoded
    #[error("failed to load reference data: {message}")]
    ReferenceLoad { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::DuplicateState(StateId(3));
        assert_eq!(err.to_string(), "duplicate state id 3");

        let err = DomainError::DuplicateRoute(RouteId(7));
        assert_eq!(err.to_string(), "duplicate route id 7");

        let err = DomainError::ReferenceLoad {
            message: "missing file".into(),
        };
        assert_eq!(err.to_string(), "failed to load reference data: missing file");
    }
}
