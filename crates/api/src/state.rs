use std::sync::Arc;

use crate::config::AppConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: eqitems_db::DbPool,
    /// Immutable configuration loaded at startup.
    pub config: Arc<AppConfig>,
}
