//! Composition root and server runner.

use std::sync::Arc;

use axum::{Router, routing::get};
use thiserror::Error;
use tower_http::trace::TraceLayer;

use crate::{
    config::ServerConfig,
    infrastructure::{InMemoryConnectionRegistry, default_caches},
    ui::{
        handler::{get_group_detail, get_hub_summary, health_check, websocket_handler},
        signal::shutdown_signal,
        state::AppState,
    },
    usecase::{ChatHub, GroupBroadcaster},
};

/// Errors that stop the server
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server loop failed
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Build the hub with an in-memory registry and the default caches
pub fn build_hub(config: &ServerConfig) -> Arc<ChatHub> {
    let registry = Arc::new(InMemoryConnectionRegistry::new());
    let broadcaster = GroupBroadcaster::new(registry.clone(), config.send_timeout());
    Arc::new(ChatHub::new(registry, broadcaster, default_caches()))
}

/// Build the router
pub fn create_app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/chat", get(websocket_handler))
        .route("/api/health", get(health_check))
        .route("/api/hub", get(get_hub_summary))
        .route("/api/groups/{name}", get(get_group_detail))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the server until Ctrl+C or SIGTERM
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let state = Arc::new(AppState {
        hub: build_hub(&config),
        channel_capacity: config.channel_capacity,
    });
    let app = create_app(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    tracing::info!("Chat hub listening on ws://{}/chat", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
