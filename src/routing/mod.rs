//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → dispatcher.rs (ordered scan over the route table)
//!     → route.rs (anchored parse: fragments, optional '/', end of input)
//!     → fragment.rs (literal, capture, allow-list, deny-list)
//!     → Return: RouteMatch { params } or NoRouteMatched
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → Build fragments
//!     → Compile anchored parsers
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex: segments are matched by small combinator parsers
//! - Deterministic: same input always matches same route
//! - First match wins (registration order)

pub mod dispatcher;
pub mod fragment;
pub mod params;
pub mod route;

pub use dispatcher::{
    Dispatcher, NoRouteMatched, RouteAttempt, RouteEntry, RouteMatch, RouteTable,
    RouteTableBuilder,
};
pub use fragment::{allow_listed, capture, capture_with, deny_listed, literal, Fragment};
pub use params::ParamMap;
pub use route::{Route, RouteError};
