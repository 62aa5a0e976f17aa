//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject routes that would bind one parameter twice
//! - Reject empty names, literals and value lists
//! - Reject literals and listed values outside `[0-9A-Za-z]+`
//! - Validate listener and metrics addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{FragmentConfig, RouterConfig};
use crate::parser::is_token;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid {field} '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("route #{index} has an empty name")]
    EmptyRouteName { index: usize },

    #[error("route name '{0}' is used more than once")]
    DuplicateRouteName(String),

    #[error("route '{route}' binds parameter '{name}' more than once")]
    DuplicateParameter { route: String, name: String },

    #[error("route '{route}' fragment #{index} has an empty {field}")]
    EmptyField {
        route: String,
        index: usize,
        field: &'static str,
    },

    #[error("route '{route}' parameter '{name}' has an empty value list")]
    EmptyValueList { route: String, name: String },

    #[error("route '{route}' fragment #{index} value '{value}' is not a path segment")]
    InvalidSegment {
        route: String,
        index: usize,
        value: String,
    },
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "bind address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(&mut errors, "metrics address", &config.observability.metrics_address);
    }

    let mut route_names = HashSet::new();
    for (index, route) in config.routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyRouteName { index });
        } else if !route_names.insert(route.name.as_str()) {
            errors.push(ValidationError::DuplicateRouteName(route.name.clone()));
        }

        let mut params = HashSet::new();
        for (position, fragment) in route.fragments.iter().enumerate() {
            let empty = |field| ValidationError::EmptyField {
                route: route.name.clone(),
                index: position,
                field,
            };
            let invalid = |value: &String| ValidationError::InvalidSegment {
                route: route.name.clone(),
                index: position,
                value: value.clone(),
            };

            match fragment {
                FragmentConfig::Literal { value } if value.is_empty() => {
                    errors.push(empty("literal"));
                }
                FragmentConfig::Literal { value } if !is_token(value) => {
                    errors.push(invalid(value));
                }
                FragmentConfig::AllowList { name, values }
                | FragmentConfig::DenyList { name, values } => {
                    if values.is_empty() {
                        errors.push(ValidationError::EmptyValueList {
                            route: route.name.clone(),
                            name: name.clone(),
                        });
                    }
                    if values.iter().any(String::is_empty) {
                        errors.push(empty("value"));
                    }
                    for value in values.iter().filter(|v| !v.is_empty() && !is_token(v)) {
                        errors.push(invalid(value));
                    }
                }
                _ => {}
            }

            if let Some(name) = fragment.param_name() {
                if name.is_empty() {
                    errors.push(empty("parameter name"));
                } else if !params.insert(name) {
                    errors.push(ValidationError::DuplicateParameter {
                        route: route.name.clone(),
                        name: name.to_string(),
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
