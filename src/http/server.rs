//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with a single dispatching fallback
//! - Wire up middleware (timeout, request ID, tracing)
//! - Dispatch request paths to the route table
//! - Swap in a rebuilt route table when the config changes
//! - Observability (metrics, correlation IDs)

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use arc_swap::ArcSwap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{RouteConfig, RouterConfig};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::{echo_params, not_found, RouteHandler};
use crate::observability::metrics;
use crate::routing::{Dispatcher, RouteError};

/// Builds the handler for a configured route.
pub type HandlerFactory = Arc<dyn Fn(&RouteConfig) -> RouteHandler + Send + Sync>;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<ArcSwap<Dispatcher<RouteHandler>>>,
}

/// HTTP front end for the route table.
pub struct HttpServer {
    router: Router,
    dispatcher: Arc<ArcSwap<Dispatcher<RouteHandler>>>,
    handlers: HandlerFactory,
}

impl HttpServer {
    /// Create a server whose routes all echo their parameters as JSON.
    pub fn new(config: RouterConfig) -> Result<Self, RouteError> {
        Self::with_handlers(config, Arc::new(|_: &RouteConfig| echo_params()))
    }

    /// Create a server binding each configured route to the handler `handlers` builds.
    ///
    /// The same factory is used again whenever the configuration is reloaded.
    pub fn with_handlers(config: RouterConfig, handlers: HandlerFactory) -> Result<Self, RouteError> {
        let table = config.build_table(|route| handlers(route))?;
        let dispatcher = Arc::new(ArcSwap::from_pointee(Dispatcher::new(table)));

        let state = AppState {
            dispatcher: Arc::clone(&dispatcher),
        };
        let router = Self::build_router(&config, state);

        Ok(Self {
            router,
            dispatcher,
            handlers,
        })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// The Axum router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The dispatcher currently serving requests.
    pub fn dispatcher(&self) -> Arc<Dispatcher<RouteHandler>> {
        self.dispatcher.load_full()
    }

    /// Run the server, accepting connections on the given listener.
    ///
    /// Configurations received on `config_updates` replace the route table;
    /// the server stops once `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<RouterConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.dispatcher.load().table().len(),
            "HTTP server starting"
        );

        let dispatcher = Arc::clone(&self.dispatcher);
        let handlers = Arc::clone(&self.handlers);
        let reloader = tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                match config.build_table(|route| handlers(route)) {
                    Ok(table) => {
                        tracing::info!(routes = table.len(), "Route table reloaded");
                        dispatcher.store(Arc::new(Dispatcher::new(table)));
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected reloaded routes, keeping current table");
                    }
                }
            }
        });

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        reloader.abort();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Fallback handler: every request path goes through the dispatcher.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let request_id = request.request_id();
    let dispatcher = state.dispatcher.load_full();
    let served = serve_path(&dispatcher, request.uri().path(), request_id);
    metrics::record_request(served.route, served.response.status().as_u16(), served.dispatch_time);
    served.response
}

/// Outcome of serving one path.
struct Served<'a> {
    /// Matched route name, or `metrics::NO_ROUTE`.
    route: &'a str,
    response: Response,
    /// Time spent matching, before any handler ran.
    dispatch_time: Duration,
}

fn serve_path<'a>(
    dispatcher: &'a Dispatcher<RouteHandler>,
    path: &str,
    request_id: &str,
) -> Served<'a> {
    let started = Instant::now();
    let outcome = dispatcher.dispatch(path);
    let dispatch_time = started.elapsed();

    match outcome {
        Ok(matched) => {
            tracing::info!(
                request_id = %request_id,
                path = %path,
                route = %matched.route.name(),
                "Route matched"
            );
            Served {
                route: matched.route.name(),
                response: (matched.handler)(&matched.params),
                dispatch_time,
            }
        }
        Err(miss) => {
            tracing::info!(
                request_id = %request_id,
                path = %path,
                routes_tried = miss.attempts.len(),
                "No route matched"
            );
            Served {
                route: metrics::NO_ROUTE,
                response: not_found(),
                dispatch_time,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FragmentConfig;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    fn config() -> RouterConfig {
        let mut config = RouterConfig::default();
        config.routes.push(RouteConfig {
            name: "user".into(),
            fragments: vec![
                FragmentConfig::Literal { value: "user".into() },
                FragmentConfig::Capture { name: "id".into() },
            ],
        });
        config
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, String, bool) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let has_request_id = response.headers().contains_key("x-request-id");
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap(), has_request_id)
    }

    #[tokio::test]
    async fn test_matched_route_echoes_params() {
        let server = HttpServer::new(config()).unwrap();
        let (status, body, has_request_id) = get(server.router(), "/user/42?ignored=1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"id":"42"}"#);
        assert!(has_request_id);
    }

    #[tokio::test]
    async fn test_unmatched_route_is_not_found() {
        let server = HttpServer::new(config()).unwrap();
        let (status, body, _) = get(server.router(), "/user/42/extra").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not Found");
    }

    #[tokio::test]
    async fn test_custom_handlers() {
        let handlers: HandlerFactory = Arc::new(|route: &RouteConfig| {
            let name = route.name.clone();
            Box::new(move |params: &crate::routing::ParamMap| {
                use axum::response::IntoResponse;
                format!("{name}:{}", params.get("id").unwrap_or_default()).into_response()
            }) as RouteHandler
        });
        let server = HttpServer::with_handlers(config(), handlers).unwrap();
        let (status, body, _) = get(server.router(), "/user/7").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "user:7");
    }

    #[test]
    fn test_dispatch_time_excludes_handler() {
        let handlers: HandlerFactory = Arc::new(|_: &RouteConfig| {
            Box::new(|params: &crate::routing::ParamMap| {
                std::thread::sleep(Duration::from_millis(200));
                echo_params()(params)
            }) as RouteHandler
        });
        let server = HttpServer::with_handlers(config(), handlers).unwrap();
        let dispatcher = server.dispatcher();

        let started = Instant::now();
        let served = serve_path(&dispatcher, "/user/9", "test");
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert_eq!(served.route, "user");
        assert_eq!(served.response.status(), StatusCode::OK);
        assert!(served.dispatch_time < Duration::from_millis(200));

        let served = serve_path(&dispatcher, "/nowhere", "test");
        assert_eq!(served.route, metrics::NO_ROUTE);
        assert_eq!(served.response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_duplicate_parameter_fails_construction() {
        let mut config = RouterConfig::default();
        config.routes.push(RouteConfig {
            name: "dup".into(),
            fragments: vec![
                FragmentConfig::Capture { name: "id".into() },
                FragmentConfig::Capture { name: "id".into() },
            ],
        });
        assert!(HttpServer::new(config).is_err());
    }
}
