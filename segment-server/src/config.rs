//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::geo::GeometryClientConfig;

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Default store file.
const DEFAULT_DATA_FILE: &str = "segments.json";

/// Default static asset directory.
const DEFAULT_STATIC_DIR: &str = "static";

/// Invalid configuration values.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}: invalid value {value:?}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind_addr: SocketAddr,
    /// JSON file backing the record store
    pub data_file: PathBuf,
    /// Optional JSON file replacing the built-in states and routes
    pub reference_file: Option<PathBuf>,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Upstream client settings
    pub upstream: GeometryClientConfig,
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its
    /// value. Unset and empty variables take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let bind_addr = get("SEGMENTS_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: "SEGMENTS_BIND_ADDR",
                value: bind_addr.clone(),
                reason: e.to_string(),
            })?;

        let mut upstream = GeometryClientConfig::new();

        if let Some(endpoints) = get("SEGMENTS_UPSTREAM_ENDPOINTS") {
            let list: Vec<String> = endpoints
                .split(',')
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(str::to_string)
                .collect();
            if list.len() < 2 {
                return Err(ConfigError::Invalid {
                    var: "SEGMENTS_UPSTREAM_ENDPOINTS",
                    value: endpoints,
                    reason: "at least two comma-separated endpoints are required".to_string(),
                });
            }
            upstream = upstream.with_endpoints(list);
        }

        if let Some(timeout) = get("SEGMENTS_UPSTREAM_TIMEOUT_SECS") {
            let secs: u64 = timeout.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "SEGMENTS_UPSTREAM_TIMEOUT_SECS",
                value: timeout.clone(),
                reason: "must be a positive whole number of seconds".to_string(),
            })?;
            if secs == 0 {
                return Err(ConfigError::Invalid {
                    var: "SEGMENTS_UPSTREAM_TIMEOUT_SECS",
                    value: timeout,
                    reason: "must be a positive whole number of seconds".to_string(),
                });
            }
            upstream = upstream.with_timeout(secs);
        }

        Ok(Self {
            bind_addr,
            data_file: get("SEGMENTS_DATA_FILE")
                .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string())
                .into(),
            reference_file: get("SEGMENTS_REFERENCE_FILE").map(PathBuf::from),
            static_dir: get("SEGMENTS_STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string())
                .into(),
            upstream,
        })
    }
}
