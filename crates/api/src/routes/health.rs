use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether a generation API key is configured.
    pub credential_configured: bool,
}

/// GET /health -- returns service status and credential presence.
///
/// A missing credential degrades the service: the library still works but
/// every generation fails.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let credential_configured = state.studio.has_credential();
    let status = if credential_configured { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        credential_configured,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api/v1`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
