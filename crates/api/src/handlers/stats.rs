use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use eqitems_db::repositories::StatsRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/stats
///
/// Catalog-wide aggregates. These deliberately ignore listing filters.
pub async fn get_stats(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let stats = StatsRepo::summary(&state.pool)
        .await
        .map_err(AppError::fetch_failed("stats"))?;

    Ok(Json(stats))
}
