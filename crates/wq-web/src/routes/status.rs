//! Health and graph status handlers.

use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use wq_graph::{NodeLabel, RelType};

use super::{internal, ApiError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GraphStatus {
    pub backend: &'static str,
    pub last_synced_at: Option<String>,
    pub nodes: BTreeMap<&'static str, usize>,
    pub relationships: BTreeMap<&'static str, usize>,
}

/// `GET /health`
pub async fn health() -> &'static str {
    "ok"
}

/// `GET /api/graph/status`
pub async fn graph_status(State(state): State<AppState>) -> Result<Json<GraphStatus>, ApiError> {
    let counts = state.store.counts().await.map_err(internal)?;
    let last_synced_at = state.store.last_sync_time().await.map_err(internal)?;

    Ok(Json(GraphStatus {
        backend: state.store.backend_name(),
        last_synced_at,
        nodes: NodeLabel::ALL
            .iter()
            .map(|l| (l.as_str(), counts.label(*l)))
            .collect(),
        relationships: RelType::ALL
            .iter()
            .map(|r| (r.as_str(), counts.rel(*r)))
            .collect(),
    }))
}
