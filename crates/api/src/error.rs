use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cameo_core::error::CoreError;
use cameo_genai::GenerationError;
use cameo_pipeline::StudioError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`StudioError`] and [`CoreError`] and adds a bad-request variant.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// An error from a studio action.
    #[error(transparent)]
    Studio(#[from] StudioError),

    /// A domain-level error from `cameo_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Studio(err) => classify_studio_error(err),
            AppError::Core(core) => classify_core_error(core),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core_error(err: &CoreError) -> (StatusCode, &'static str, String) {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
    }
}

/// Classify a studio error into an HTTP status, error code, and message.
///
/// - Generation failures surface their message for display; a missing
///   credential is a 503 since no request can succeed until it is set.
/// - Flow conflicts (busy, nothing to act on) map to 409.
/// - Storage and task failures map to 500 with a sanitized message.
fn classify_studio_error(err: &StudioError) -> (StatusCode, &'static str, String) {
    match err {
        StudioError::Core(core) => classify_core_error(core),
        StudioError::Generation(GenerationError::MissingCredential) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "MISSING_CREDENTIAL",
            err.to_string(),
        ),
        StudioError::Generation(gen) => {
            (StatusCode::BAD_GATEWAY, "GENERATION_FAILED", gen.to_string())
        }
        StudioError::Busy(_) => (StatusCode::CONFLICT, "FLOW_BUSY", err.to_string()),
        StudioError::NoPreview(_) => (StatusCode::CONFLICT, "NO_PREVIEW", err.to_string()),
        StudioError::Store(store) => {
            tracing::error!(error = %store, "Storage error");
            internal()
        }
        StudioError::TaskFailed(msg) => {
            tracing::error!(error = %msg, "Generation task failed");
            internal()
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
