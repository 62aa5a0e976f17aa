//! Ordered route dispatch.
//!
//! # Responsibilities
//! - Store compiled routes with their handlers, in registration order
//! - Find the first route that matches a request path
//! - Report an explicit no-match carrying every route's failure
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) linear scan; registration order is the only tie-breaker
//! - First match wins, later routes are never consulted

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::parser::Failure;
use crate::routing::params::ParamMap;
use crate::routing::route::Route;

/// A compiled route bound to its handler.
#[derive(Debug, Clone)]
pub struct RouteEntry<H> {
    pub route: Route,
    pub handler: H,
}

/// Ordered, immutable list of routes and handlers.
#[derive(Debug, Clone)]
pub struct RouteTable<H> {
    entries: Vec<RouteEntry<H>>,
}

impl<H> RouteTable<H> {
    pub fn builder() -> RouteTableBuilder<H> {
        RouteTableBuilder {
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[RouteEntry<H>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<H> FromIterator<(Route, H)> for RouteTable<H> {
    fn from_iter<I: IntoIterator<Item = (Route, H)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(route, handler)| RouteEntry { route, handler })
                .collect(),
        }
    }
}

/// Collects routes in registration order.
pub struct RouteTableBuilder<H> {
    entries: Vec<RouteEntry<H>>,
}

impl<H> RouteTableBuilder<H> {
    pub fn route(mut self, route: Route, handler: H) -> Self {
        self.entries.push(RouteEntry { route, handler });
        self
    }

    pub fn build(self) -> RouteTable<H> {
        RouteTable {
            entries: self.entries,
        }
    }
}

/// The route that accepted a path, with the parameters it extracted.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    /// Position of the route in the table.
    pub index: usize,
    pub route: &'a Route,
    pub handler: &'a H,
    pub params: ParamMap,
}

/// Why a single route rejected the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAttempt {
    pub route: String,
    pub failure: Failure,
}

/// No route in the table accepted the path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no route matched '{path}' ({} routes tried)", .attempts.len())]
pub struct NoRouteMatched {
    pub path: String,
    pub attempts: Vec<RouteAttempt>,
}

/// Dispatches request paths over a shared route table.
pub struct Dispatcher<H> {
    table: Arc<RouteTable<H>>,
}

impl<H> Clone for Dispatcher<H> {
    fn clone(&self) -> Self {
        Self {
            table: Arc::clone(&self.table),
        }
    }
}

impl<H> fmt::Debug for Dispatcher<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.table.entries.iter().map(|e| e.route.name()).collect();
        f.debug_struct("Dispatcher").field("routes", &names).finish()
    }
}

impl<H> Dispatcher<H> {
    pub fn new(table: RouteTable<H>) -> Self {
        Self {
            table: Arc::new(table),
        }
    }

    pub fn table(&self) -> &RouteTable<H> {
        &self.table
    }

    /// Try each route in order and return the first one that matches `path`.
    pub fn dispatch(&self, path: &str) -> Result<RouteMatch<'_, H>, NoRouteMatched> {
        let mut attempts = Vec::new();

        for (index, entry) in self.table.entries.iter().enumerate() {
            match entry.route.parse(path) {
                Ok(params) => {
                    tracing::debug!(
                        path = %path,
                        route = %entry.route.name(),
                        index,
                        "Route matched"
                    );
                    return Ok(RouteMatch {
                        index,
                        route: &entry.route,
                        handler: &entry.handler,
                        params,
                    });
                }
                Err(failure) => {
                    tracing::trace!(
                        path = %path,
                        route = %entry.route.name(),
                        error = %failure,
                        "Route rejected path"
                    );
                    attempts.push(RouteAttempt {
                        route: entry.route.name().to_string(),
                        failure,
                    });
                }
            }
        }

        tracing::debug!(path = %path, routes = attempts.len(), "No route matched");
        Err(NoRouteMatched {
            path: path.to_string(),
            attempts,
        })
    }

    /// Dispatch `path` and invoke the matching handler, or `not_found`.
    pub fn handle<O, F>(&self, path: &str, not_found: F) -> O
    where
        H: Fn(&ParamMap) -> O,
        F: FnOnce(&NoRouteMatched) -> O,
    {
        match self.dispatch(path) {
            Ok(matched) => (matched.handler)(&matched.params),
            Err(miss) => not_found(&miss),
        }
    }
}
