//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::{self, Fragment, Route, RouteError, RouteTable};

/// Root configuration for the router service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Route definitions, tried in this order.
    pub routes: Vec<RouteConfig>,
}

impl RouterConfig {
    /// Compile every route, in order, binding each to the handler `handler_for` returns.
    pub fn build_table<H, F>(&self, mut handler_for: F) -> Result<RouteTable<H>, RouteError>
    where
        F: FnMut(&RouteConfig) -> H,
    {
        let mut builder = RouteTable::builder();
        for route in &self.routes {
            builder = builder.route(route.compile()?, handler_for(route));
        }
        Ok(builder.build())
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
        }
    }
}

/// Timeout configuration for request handling.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// A named route: an ordered list of path fragments.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Fragments matched left to right.
    #[serde(default)]
    pub fragments: Vec<FragmentConfig>,
}

impl RouteConfig {
    pub fn compile(&self) -> Result<Route, RouteError> {
        let fragments = self.fragments.iter().map(FragmentConfig::to_fragment).collect();
        Route::new(self.name.clone(), fragments)
    }
}

/// One path segment of a route.
///
/// ```toml
/// fragments = [
///     { kind = "literal", value = "user" },
///     { kind = "deny_list", name = "id", values = ["0", "1", "2"] },
///     { kind = "allow_list", name = "action", values = ["dashboard", "settings"] },
/// ]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FragmentConfig {
    /// Segment must equal `value`.
    Literal { value: String },
    /// Any token, bound to `name`.
    Capture { name: String },
    /// One of `values`, tried in order, bound to `name`.
    AllowList { name: String, values: Vec<String> },
    /// Any token not in `values`, bound to `name`.
    DenyList { name: String, values: Vec<String> },
}

impl FragmentConfig {
    /// Parameter name bound by this fragment, if any.
    pub fn param_name(&self) -> Option<&str> {
        match self {
            FragmentConfig::Literal { .. } => None,
            FragmentConfig::Capture { name }
            | FragmentConfig::AllowList { name, .. }
            | FragmentConfig::DenyList { name, .. } => Some(name.as_str()),
        }
    }

    pub fn to_fragment(&self) -> Fragment {
        match self {
            FragmentConfig::Literal { value } => routing::literal(value),
            FragmentConfig::Capture { name } => routing::capture(name.clone()),
            FragmentConfig::AllowList { name, values } => {
                routing::allow_listed(name.clone(), values)
            }
            FragmentConfig::DenyList { name, values } => {
                routing::deny_listed(name.clone(), values.iter().cloned())
            }
        }
    }
}
