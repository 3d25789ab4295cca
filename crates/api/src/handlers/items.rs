//! Handlers for the item listing and single-item lookup.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use eqitems_core::error::CoreError;
use eqitems_core::filter::ItemFilter;
use eqitems_core::pagination::PageRequest;
use eqitems_core::query_params::RawQuery;
use eqitems_core::types::ItemId;
use eqitems_db::repositories::ItemRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Decoded query-string pairs. Repeated keys are kept so the parsers can
/// tell single from multiple values.
pub type QueryPairs = Vec<(String, String)>;

/// Turn the raw extractor result into a [`RawQuery`], reporting undecodable
/// query strings as JSON 400s.
pub(crate) fn raw_query(query: Result<Query<QueryPairs>, QueryRejection>) -> AppResult<RawQuery> {
    let Query(pairs) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    Ok(RawQuery::from_pairs(pairs))
}

// ---------------------------------------------------------------------------
// GET /api/items
// ---------------------------------------------------------------------------

/// List items with filtering, sorting and pagination.
///
/// Only a malformed `itemTypes` value is a client error; every other
/// parameter falls back to its default.
pub async fn list_items(
    State(state): State<AppState>,
    query: Result<Query<QueryPairs>, QueryRejection>,
) -> AppResult<impl IntoResponse> {
    let query = raw_query(query)?;
    let filter = ItemFilter::from_query(&query)?;
    let page = PageRequest::from_query(&query, state.config.page_limits());

    let result = ItemRepo::list_page(&state.pool, &filter, page)
        .await
        .map_err(AppError::fetch_failed("items"))?;

    tracing::debug!(
        total = result.pagination.total,
        page = page.page,
        sort = filter.sort.as_param(),
        "Item listing served",
    );

    Ok(Json(result))
}

// ---------------------------------------------------------------------------
// GET /api/items/{id}
// ---------------------------------------------------------------------------

/// Fetch one item with its parse metrics.
///
/// Identifiers that are not integers cannot match a row and are reported
/// as not found without a query.
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "Item",
            id: id.clone(),
        })
    };

    let item_id: ItemId = id.parse().map_err(|_| not_found())?;

    let item = ItemRepo::find_by_id(&state.pool, item_id)
        .await
        .map_err(AppError::fetch_failed("item"))?
        .ok_or_else(not_found)?;

    Ok(Json(item))
}
