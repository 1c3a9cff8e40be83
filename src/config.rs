//! Configuration for the mock endpoint server.
//!
//! Defines the declarative route table: one [`RouteSpec`] per mock endpoint,
//! loaded from YAML and validated before the server starts.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Built-in route table reproducing the canned endpoints this server exists
/// to fake: rate-limit, ping, and wait-room.
pub const DEFAULT_ROUTES_YAML: &str = include_str!("../default-routes.yaml");

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("route {index} ({method} {path}): invalid status code {status}")]
    InvalidStatus {
        index: usize,
        method: String,
        path: String,
        status: u16,
    },

    #[error("route {index}: unknown HTTP method {method:?}")]
    UnknownMethod { index: usize, method: String },

    #[error("route {index}: path {path:?} must start with '/'")]
    InvalidPath { index: usize, path: String },

    #[error("duplicate route definition for {method} {path}")]
    DuplicateRoute { method: String, path: String },

    #[error("default_response: invalid status code {status}")]
    InvalidDefaultStatus { status: u16 },
}

/// Main configuration for the mock endpoint server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MockConfig {
    /// Port the HTTP listener binds to.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Route definitions served by the mock.
    #[serde(default)]
    pub routes: Vec<RouteSpec>,

    /// Global settings
    #[serde(default)]
    pub settings: GlobalSettings,

    /// Response for requests no route matches. When absent, unmatched
    /// requests get a 404 with an empty body.
    #[serde(default)]
    pub default_response: Option<DefaultResponse>,
}

fn default_port() -> u16 {
    8080
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            routes: Vec::new(),
            settings: GlobalSettings::default(),
            default_response: None,
        }
    }
}

impl MockConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, route) in self.routes.iter().enumerate() {
            route.validate(i)?;
        }
        if let Some(default) = &self.default_response {
            if !(100..=599).contains(&default.status) {
                return Err(ConfigError::InvalidDefaultStatus {
                    status: default.status,
                });
            }
        }
        Ok(())
    }
}

/// One mock endpoint: the request it answers and the canned response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteSpec {
    /// HTTP method to match (case-insensitive in config, normalized upward).
    pub method: String,

    /// Request path to match, exactly.
    pub path: String,

    /// HTTP status code of the response.
    #[serde(default = "default_status")]
    pub status: u16,

    /// JSON body template returned to the client.
    #[serde(default)]
    pub body: serde_json::Map<String, serde_json::Value>,

    /// Extra response headers. Content-Type defaults to application/json.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Fixed delay applied before responding, scoped to this request only.
    #[serde(default)]
    pub delay_seconds: u64,

    /// Echo the parsed request body back under a `sentBody` key.
    #[serde(default)]
    pub echo_request_body: bool,
}

fn default_status() -> u16 {
    200
}

const KNOWN_METHODS: &[&str] = &[
    "GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS", "TRACE",
];

impl RouteSpec {
    /// Validate one route definition. `index` is its position in the table,
    /// used for error reporting.
    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if !KNOWN_METHODS.contains(&self.method.to_uppercase().as_str()) {
            return Err(ConfigError::UnknownMethod {
                index,
                method: self.method.clone(),
            });
        }
        if !self.path.starts_with('/') {
            return Err(ConfigError::InvalidPath {
                index,
                path: self.path.clone(),
            });
        }
        if !(100..=599).contains(&self.status) {
            return Err(ConfigError::InvalidStatus {
                index,
                method: self.method.clone(),
                path: self.path.clone(),
                status: self.status,
            });
        }
        Ok(())
    }
}

/// Canned response for requests that match no route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultResponse {
    /// HTTP status code
    #[serde(default = "default_not_found")]
    pub status: u16,

    /// JSON body
    #[serde(default)]
    pub body: serde_json::Map<String, serde_json::Value>,
}

fn default_not_found() -> u16 {
    404
}

/// Global settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlobalSettings {
    /// Log every matched request
    #[serde(default = "default_true")]
    pub log_matches: bool,

    /// Log unmatched requests
    #[serde(default = "default_true")]
    pub log_unmatched: bool,
}

fn default_true() -> bool {
    true
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            log_matches: true,
            log_unmatched: true,
        }
    }
}
