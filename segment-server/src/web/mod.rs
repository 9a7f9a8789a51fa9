//! Web layer for the segment registry.
//!
//! Serves the HTML listing and form, plus a JSON API over the same
//! registrar.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
