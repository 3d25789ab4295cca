pub mod health;
pub mod items;
pub mod stats;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /health                                          liveness (GET)
///
/// /items                                           filtered, paginated listing (GET)
/// /items/{id}                                      single item (GET)
///
/// /stats                                           catalog aggregates (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(items::router())
        .merge(stats::router())
}
