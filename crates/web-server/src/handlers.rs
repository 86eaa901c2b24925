use crate::{AppState, error::AppError};
use allocation::{Breakdown, PoolStats};
use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;

/// # GET /api/stats
/// Aggregate pool statistics plus every investor's share.
pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<PoolStats>, AppError> {
    let stats = state.engine.compute_stats(&state.snapshot)?;
    Ok(Json(stats))
}

/// # GET /api/breakdown/operator
/// Per-instrument detail of the operator's result.
pub async fn get_operator_breakdown(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Breakdown>, AppError> {
    let breakdown = state.engine.operator_breakdown(&state.snapshot)?;
    Ok(Json(breakdown))
}

/// # GET /api/breakdown/investors/:name
/// Per-instrument detail of one investor's result; 404 for unknown names.
pub async fn get_investor_breakdown(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<Breakdown>, AppError> {
    let breakdown = state.engine.investor_breakdown(&state.snapshot, &name)?;
    Ok(Json(breakdown))
}
