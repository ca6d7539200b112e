//! Handlers for the `/scenes` library resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use cameo_core::scene::Scene;
use cameo_core::types::EntityId;

use crate::error::AppResult;
use crate::handlers::download;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/scenes
pub async fn list(State(state): State<AppState>) -> Json<DataResponse<Vec<Scene>>> {
    Json(DataResponse::new(state.studio.scenes().await))
}

/// GET /api/v1/scenes/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Json<DataResponse<Scene>>> {
    let scene = state.studio.scene(id).await?;
    Ok(Json(DataResponse::new(scene)))
}

/// DELETE /api/v1/scenes/{id}
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<StatusCode> {
    state.studio.delete_scene(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/scenes/{id}/export
pub async fn export(
    State(state): State<AppState>,
    Path(id): Path<EntityId>,
) -> AppResult<Response> {
    let export = state.studio.export_scene(id).await?;
    Ok(download::attachment(export))
}
