//! Responses produced by route handlers.
//!
//! # Responsibilities
//! - Define the handler type bound to each route
//! - Echo extracted parameters as JSON
//! - Answer unmatched paths with 404
//!
//! # Design Decisions
//! - Handlers are synchronous: matching and echoing never block
//! - The not-found body is plain text, like the rest of the error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::routing::ParamMap;

/// Handler invoked with the parameters of the matching route.
pub type RouteHandler = Box<dyn Fn(&ParamMap) -> Response + Send + Sync>;

/// Handler answering `200 OK` with the parameters as a JSON object.
pub fn echo_params() -> RouteHandler {
    Box::new(|params: &ParamMap| Json(params.clone()).into_response())
}

/// Response for paths no route accepted.
pub fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not Found").into_response()
}
