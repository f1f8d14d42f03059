//! Main webserver implementation
//!
//! Wires the handlers to their routes and serves them until Ctrl+C.

use axum::routing::{delete, get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use curator::{DecisionOracle, ItemStore};
use shared::{logging, service_info, ServiceId};

use crate::error::{WebServerError, WebServerResult};
use crate::state::AppState;
use crate::web::handlers::{delete_item, health_check, list_items, optimization_log, optimize, upload_document};

pub struct WebServer<S, O>
where
    S: ItemStore + 'static,
    O: DecisionOracle + 'static,
{
    bind_address: SocketAddr,
    state: Arc<AppState<S, O>>,
}

impl<S, O> WebServer<S, O>
where
    S: ItemStore + 'static,
    O: DecisionOracle + 'static,
{
    pub fn new(bind_address: SocketAddr, state: AppState<S, O>) -> Self {
        Self {
            bind_address,
            state: Arc::new(state),
        }
    }

    /// Build the Axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            .route("/health", get(health_check))
            .route("/api/cases/:case/items", get(list_items::<S, O>))
            .route("/api/cases/:case/items/:item_id", delete(delete_item::<S, O>))
            .route("/api/cases/:case/optimize", post(optimize::<S, O>))
            .route("/api/cases/:case/optimization-log", get(optimization_log::<S, O>))
            .route("/api/cases/:case/documents", post(upload_document::<S, O>))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(self.state.clone())
    }

    /// Serve until Ctrl+C
    pub async fn run(&self) -> WebServerResult<()> {
        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(self.bind_address)
            .await
            .map_err(|e| WebServerError::ServerStartup(format!("Failed to bind to {}: {}", self.bind_address, e)))?;

        service_info!(ServiceId::current(), "🌐 Web server listening on http://{}", self.bind_address);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| WebServerError::ServerStartup(e.to_string()))
    }

    pub fn state(&self) -> &Arc<AppState<S, O>> {
        &self.state
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logging::log_shutdown(ServiceId::current(), "Received Ctrl+C signal"),
        Err(err) => logging::log_error(ServiceId::current(), "Signal handling", &err),
    }
}
