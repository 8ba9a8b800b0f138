use axum::{extract::State, Json};
use std::sync::Arc;

use crate::info::StatsReport;
use crate::AppState;

use super::AppError;

// ─── GET / · /info · /api/info ───────────────────────────────────

/// Latency statistics over the most recent samples of the configured
/// endpoint.
pub async fn get_info(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatsReport>, AppError> {
    let report = state.info.report().await?;
    Ok(Json(report))
}
