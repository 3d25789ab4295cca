use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use eqitems_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `eqitems_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database read failed. The client only sees `Failed to fetch {resource}`.
    #[error("Failed to fetch {resource}: {source}")]
    FetchFailed {
        resource: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Adapter for `map_err` on repository calls.
    ///
    /// ```ignore
    /// ItemRepo::find_by_id(&pool, id).await.map_err(AppError::fetch_failed("item"))?;
    /// ```
    pub fn fetch_failed(resource: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
        move |source| AppError::FetchFailed { resource, source }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- Database errors ---
            AppError::FetchFailed { resource, source } => {
                tracing::error!(error = %source, resource, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    format!("Failed to fetch {resource}"),
                )
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
