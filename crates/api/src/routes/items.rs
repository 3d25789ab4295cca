//! Route definitions for the item catalog.

use axum::routing::get;
use axum::Router;

use crate::handlers::items;
use crate::state::AppState;

/// Item routes.
///
/// ```text
/// GET    /items                  -> list_items
/// GET    /items/{id}             -> get_item
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/items", get(items::list_items))
        .route("/items/{id}", get(items::get_item))
}
