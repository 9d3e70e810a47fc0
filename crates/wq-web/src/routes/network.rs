//! Verse-network route handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use wq_core::{NeighborhoodResult, SelectionMode, SubgraphResult};

use super::{check_range, internal, ApiError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AyahNetworkParams {
    pub min_roots: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RootNetworkParams {
    pub max_nodes: Option<usize>,
    pub min_roots: Option<usize>,
    pub limit: Option<usize>,
    pub sort: Option<String>,
}

/// `GET /api/network/ayah/{surah}/{verse}`
pub async fn ayah_network(
    State(state): State<AppState>,
    Path((surah, verse)): Path<(i64, i64)>,
    Query(params): Query<AyahNetworkParams>,
) -> Result<Json<NeighborhoodResult>, ApiError> {
    let min_roots = check_range("min_roots", params.min_roots.unwrap_or(2), 1, 10)?;
    let limit = check_range("limit", params.limit.unwrap_or(50), 1, 200)?;

    let result = wq_graph::verse_neighborhood(state.store.as_ref(), surah, verse, min_roots, limit)
        .await
        .map_err(internal)?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Ayah {}:{} not found", surah, verse)))?;

    Ok(Json(result))
}

/// `GET /api/network/root/{key}`
pub async fn root_network(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<RootNetworkParams>,
) -> Result<Json<SubgraphResult>, ApiError> {
    let max_nodes = check_range("max_nodes", params.max_nodes.unwrap_or(30), 1, 100)?;
    let min_roots = check_range("min_roots", params.min_roots.unwrap_or(2), 1, 10)?;
    let limit = check_range("limit", params.limit.unwrap_or(100), 1, 500)?;
    let mode = match params.sort.as_deref() {
        None => SelectionMode::default(),
        Some(s) => s
            .parse::<SelectionMode>()
            .map_err(|e| (StatusCode::BAD_REQUEST, e))?,
    };

    let result = wq_graph::root_subgraph(state.store.as_ref(), &key, max_nodes, min_roots, limit, mode)
        .await
        .map_err(internal)?
        .ok_or_else(|| (StatusCode::NOT_FOUND, format!("Root '{}' not found", key)))?;

    Ok(Json(result))
}
