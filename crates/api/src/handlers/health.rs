use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `ok` while the process is serving requests.
    pub status: &'static str,
    /// Current server time, RFC 3339 with millisecond precision.
    pub timestamp: String,
}

/// GET /api/health
///
/// Liveness only; does not touch the database.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
