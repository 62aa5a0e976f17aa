//! Parser-combinator path router.
//!
//! Routes are sequences of small path parsers (literal segments, free
//! captures, allow-listed and deny-listed captures) anchored to the whole
//! request path. A [`routing::Dispatcher`] tries them in registration order
//! and hands the first match's parameters to its handler.
//!
//! ```
//! use segment_router::routing::{allow_listed, capture, deny_listed, literal, Dispatcher, Route, RouteTable};
//!
//! let admin_ids = ["0", "1", "2"];
//! let table = RouteTable::builder()
//!     .route(Route::new("user", vec![literal("user"), capture("id")]).unwrap(), "user")
//!     .route(
//!         Route::new(
//!             "user_page",
//!             vec![
//!                 literal("user"),
//!                 deny_listed("id", admin_ids),
//!                 allow_listed("action", ["dashboard", "settings"]),
//!             ],
//!         )
//!         .unwrap(),
//!         "user_page",
//!     )
//!     .build();
//!
//! let dispatcher = Dispatcher::new(table);
//! let matched = dispatcher.dispatch("/user/5/dashboard").unwrap();
//! assert_eq!(*matched.handler, "user_page");
//! assert_eq!(matched.params.get("action"), Some("dashboard"));
//! assert!(dispatcher.dispatch("/user/0/dashboard").is_err());
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod parser;
pub mod routing;

pub use config::schema::RouterConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
