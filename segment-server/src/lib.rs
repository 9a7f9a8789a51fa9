//! Highway segment registry server.
//!
//! Records road segments (route, state, milepost range) together with the
//! line geometry looked up from the DNIT route-spatialization service.

pub mod config;
pub mod domain;
pub mod geo;
pub mod registrar;
pub mod store;
pub mod web;
