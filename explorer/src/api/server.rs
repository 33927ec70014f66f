//! API server implementation

use axum::{
    Router,
    http::Method,
    routing::get,
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use std::sync::Arc;
use tokio::sync::watch;
use crate::config::Config;
use crate::database::Database;
use crate::api::routes;
use crate::websocket::{SubscriberRegistry, WSServer, WsState};
use crate::error::{ExplorerError, Result};

/// Shared by the REST routes.
#[derive(Clone)]
pub struct AppState {
    pub database: Database,
    pub page_limit: i64,
}

pub struct ApiServer {
    state: AppState,
    ws_state: WsState,
    bind_address: String,
    port: u16,
}

impl ApiServer {
    pub fn new(database: Database, registry: Arc<SubscriberRegistry>, config: &Config) -> Self {
        Self {
            state: AppState {
                database,
                page_limit: config.pagination.page_limit,
            },
            ws_state: WsState {
                registry,
                session_queue_capacity: config.listener.session_queue_capacity,
            },
            bind_address: config.server.bind_address.clone(),
            port: config.server.port,
        }
    }

    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any);

        let api = Router::new()
            .merge(routes::notifications::routes(self.state.clone()))
            .merge(routes::blocks::routes(self.state.clone()))
            .merge(routes::transactions::routes(self.state.clone()))
            .merge(routes::wallets::routes(self.state.clone()));

        let ws = Router::new()
            .route("/ws", get(WSServer::handle_connection))
            .with_state(self.ws_state.clone());

        Router::new()
            .nest("/api", api.clone())
            .merge(api)
            .merge(ws)
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Serves until `shutdown` flips to true, then drains in-flight requests.
    pub async fn start(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let app = self.router();
        let addr = format!("{}:{}", self.bind_address, self.port);
        let listener = tokio::net::TcpListener::bind(&addr).await
            .map_err(|e| ExplorerError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

        tracing::info!("API server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.changed().await;
            })
            .await
            .map_err(|e| ExplorerError::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }
}
