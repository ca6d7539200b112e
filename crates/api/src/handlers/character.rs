//! Handlers for the `/characters` library resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use cameo_core::character::Character;
use cameo_core::types::EntityId;

use crate::error::AppResult;
use crate::handlers::download;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/characters
///
/// Newest first.
pub async fn list(State(state): State<AppState>) -> Json<DataResponse<Vec<Character>>> {
    Json(DataResponse::new(state.studio.characters().await))
}

/// GET /api/v1/characters/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Character>>> {
    let character = state.studio.character(id).await?;
    Ok(Json(DataResponse::new(character)))
}

/// DELETE /api/v1/characters/{id}
///
/// Scenes that feature the character keep referencing its id.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    state.studio.delete_character(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/characters/{id}/export
pub async fn export(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Response> {
    let export = state.studio.export_character(id).await?;
    Ok(download::attachment(export))
}
