//! Application state for the web layer.

use std::sync::Arc;

use crate::registrar::SegmentRegistrar;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Validation, fetch and persistence for segments
    pub registrar: Arc<SegmentRegistrar>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(registrar: SegmentRegistrar) -> Self {
        Self {
            registrar: Arc::new(registrar),
        }
    }
}
