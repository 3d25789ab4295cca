#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::MySqlPool;
use tower::ServiceExt;

use eqitems_api::config::AppConfig;
use eqitems_api::router::build_app_router;
use eqitems_api::state::AppState;
use eqitems_db::PoolSettings;

/// Build a test `AppConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a small maximum page size so clamping is easy to observe.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.cors_origins = vec!["http://localhost:5173".to_string()];
    config.api.page_size = 5;
    config.api.max_page_size = 10;
    config
}

/// A pool that never connects successfully.
///
/// Nothing listens on port 1, so any query fails once the short acquire
/// timeout elapses. Requests that are rejected before touching the
/// database never notice.
pub fn unreachable_pool() -> MySqlPool {
    eqitems_db::create_lazy_pool(&PoolSettings {
        host: "127.0.0.1".to_string(),
        port: 1,
        user: "root".to_string(),
        password: String::new(),
        database: "eqitems_test".to_string(),
        max_connections: 1,
        acquire_timeout: Duration::from_secs(1),
    })
}

/// Build the full application router over `pool` with the production
/// middleware stack.
pub fn build_test_app(pool: MySqlPool) -> Router {
    build_test_app_with(pool, test_config())
}

/// Like [`build_test_app`] with a caller-supplied configuration.
pub fn build_test_app_with(pool: MySqlPool, config: AppConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Router over [`unreachable_pool`].
pub fn build_offline_app() -> Router {
    build_test_app(unreachable_pool())
}

/// Send a GET request to `uri`.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
