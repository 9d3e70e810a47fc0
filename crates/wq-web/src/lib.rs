//! WikiQuran Web Server
//!
//! Axum-based JSON API over the verse-network traversal queries.

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use wq_core::config::ServerConfig;
use wq_graph::GraphStore;

use state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/network/ayah/{surah}/{verse}", get(routes::network::ayah_network))
        .route("/network/root/{key}", get(routes::network::root_network))
        .route("/graph/status", get(routes::status::graph_status))
        .with_state(state);

    Router::new()
        .route("/health", get(routes::status::health))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Run the web server.
pub async fn run_server(store: Arc<dyn GraphStore>, config: &ServerConfig) -> anyhow::Result<()> {
    let app = create_router(AppState::new(store));

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Web server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
