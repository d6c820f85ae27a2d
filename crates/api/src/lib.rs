//! HTTP API of the video catalog admin backend.
//!
//! Exposes category and genre CRUD plus paginated listings, with structured
//! logging (tracing), Prometheus metrics and problem-details error bodies.

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use domain::CatalogStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Environment;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    /// Cancelled when the server shuts down; in-flight use cases observe it.
    pub shutdown: CancellationToken,
    pub environment: Environment,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        shutdown: CancellationToken,
        environment: Environment,
    ) -> Self {
        Self {
            store,
            shutdown,
            environment,
        }
    }

    /// Per-request cancellation token tied to server shutdown.
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: AppState, metrics_handle: PrometheusHandle) -> Router {
    let environment = state.environment;

    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route(
            "/categories",
            get(routes::categories::list).post(routes::categories::create),
        )
        .route(
            "/categories/{id}",
            get(routes::categories::get)
                .put(routes::categories::update)
                .delete(routes::categories::delete),
        )
        .route(
            "/genres",
            get(routes::genres::list).post(routes::genres::create),
        )
        .route(
            "/genres/{id}",
            get(routes::genres::get)
                .put(routes::genres::update)
                .delete(routes::genres::delete),
        )
        .with_state(state)
        .merge(metrics_router)
        .layer(middleware::from_fn_with_state(
            environment,
            error::expose_diagnostics,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
