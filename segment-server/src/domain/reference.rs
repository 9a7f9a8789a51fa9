//! State and route reference data.
//!
//! Forms and stored records refer to states and routes by internal id. The
//! upstream query needs the state's short code and the padded route number,
//! so every submission resolves its ids through [`ReferenceData`].

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::route::RouteNumber;
use super::state_code::StateCode;

/// Internal identifier of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(pub u32);

/// Internal identifier of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub u32);

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A federative unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub name: String,
    pub code: StateCode,
}

/// A federal highway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub number: RouteNumber,
}

/// The default set of states: (name, code).
const SEEDED_STATES: [(&str, &str); 27] = [
    ("Acre", "AC"),
    ("Alagoas", "AL"),
    ("Amapá", "AP"),
    ("Amazonas", "AM"),
    ("Bahia", "BA"),
    ("Ceará", "CE"),
    ("Distrito Federal", "DF"),
    ("Espírito Santo", "ES"),
    ("Goiás", "GO"),
    ("Maranhão", "MA"),
    ("Mato Grosso", "MT"),
    ("Mato Grosso do Sul", "MS"),
    ("Minas Gerais", "MG"),
    ("Pará", "PA"),
    ("Paraíba", "PB"),
    ("Paraná", "PR"),
    ("Pernambuco", "PE"),
    ("Piauí", "PI"),
    ("Rio de Janeiro", "RJ"),
    ("Rio Grande do Norte", "RN"),
    ("Rio Grande do Sul", "RS"),
    ("Rondônia", "RO"),
    ("Roraima", "RR"),
    ("Santa Catarina", "SC"),
    ("São Paulo", "SP"),
    ("Sergipe", "SE"),
    ("Tocantins", "TO"),
];

/// The default set of routes.
const SEEDED_ROUTES: [&str; 11] = [
    "010", "020", "030", "040", "050", "060", "070", "080", "251", "450", "479",
];

/// Lookup tables for states and routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceData {
    states: Vec<State>,
    routes: Vec<Route>,
}

impl ReferenceData {
    /// Build reference data, rejecting duplicate ids.
    pub fn new(states: Vec<State>, routes: Vec<Route>) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for state in &states {
            if !seen.insert(state.id) {
                return Err(DomainError::DuplicateState(state.id));
            }
        }

        let mut seen = HashSet::new();
        for route in &routes {
            if !seen.insert(route.id) {
                return Err(DomainError::DuplicateRoute(route.id));
            }
        }

        Ok(Self { states, routes })
    }

    /// The built-in seed: all 27 federative units and the default routes,
    /// numbered from 1 in listing order.
    pub fn seeded() -> Self {
        let states = SEEDED_STATES
            .iter()
            .zip(1..)
            .filter_map(|(&(name, code), id)| {
                StateCode::parse(code).ok().map(|code| State {
                    id: StateId(id),
                    name: name.to_string(),
                    code,
                })
            })
            .collect();

        let routes = SEEDED_ROUTES
            .iter()
            .zip(1..)
            .filter_map(|(number, id)| {
                RouteNumber::parse(number).ok().map(|number| Route {
                    id: RouteId(id),
                    number,
                })
            })
            .collect();

        Self { states, routes }
    }

    /// Load reference data from a JSON file of the form
    /// `{"states": [...], "routes": [...]}`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DomainError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| DomainError::ReferenceLoad {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_json(&json)
    }

    /// Decode reference data from JSON text.
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let data: ReferenceData =
            serde_json::from_str(json).map_err(|e| DomainError::ReferenceLoad {
                message: e.to_string(),
            })?;
        Self::new(data.states, data.routes)
    }

    /// Look up a state by id.
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.iter().find(|s| s.id == id)
    }

    /// Look up a route by id.
    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.routes.iter().find(|r| r.id == id)
    }

    /// All states, in listing order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// All routes, in listing order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
