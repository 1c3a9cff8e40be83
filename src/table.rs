//! Route table construction and lookup.
//!
//! Compiles the configured [`RouteSpec`] list into an exact-match table keyed
//! by (method, path). At most one route can occupy a key, so lookup is
//! deterministic by construction.

use crate::config::{ConfigError, RouteSpec};
use std::collections::HashMap;

/// Exact-match lookup table over the configured routes.
#[derive(Debug)]
pub struct RouteTable {
    routes: HashMap<(String, String), RouteSpec>,
}

impl RouteTable {
    /// Build the table, rejecting duplicate (method, path) definitions.
    pub fn new(routes: Vec<RouteSpec>) -> Result<Self, ConfigError> {
        let mut table = HashMap::with_capacity(routes.len());

        for route in routes {
            let key = (route.method.to_uppercase(), route.path.clone());
            if table.contains_key(&key) {
                return Err(ConfigError::DuplicateRoute {
                    method: key.0,
                    path: key.1,
                });
            }
            table.insert(key, route);
        }

        Ok(Self { routes: table })
    }

    /// Find the route for a request. Exact match on method and path, no
    /// pattern matching.
    pub fn lookup(&self, method: &str, path: &str) -> Option<&RouteSpec> {
        self.routes
            .get(&(method.to_uppercase(), path.to_string()))
    }

    /// Number of routes in the table.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether the table has no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
