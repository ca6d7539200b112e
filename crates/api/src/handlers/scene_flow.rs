//! Handlers for the scene composition flow (`/flows/scene`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use cameo_core::scene::{AspectRatio, Scene};
use cameo_core::types::EntityId;
use cameo_pipeline::{FlowSnapshot, SceneDraft};
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

type SnapshotResponse = Json<DataResponse<FlowSnapshot<SceneDraft>>>;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSceneRequest {
    pub prompt: String,
    #[serde(default)]
    pub character_ids: Vec<EntityId>,
    /// `"1:1"`, `"16:9"` or `"9:16"`; defaults to `"16:9"`.
    #[serde(default)]
    pub aspect_ratio: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EditSceneRequest {
    pub prompt: String,
}

/// GET /api/v1/flows/scene
pub async fn status(State(state): State<AppState>) -> SnapshotResponse {
    Json(DataResponse::new(state.studio.scene_flow().await))
}

/// POST /api/v1/flows/scene/generate
pub async fn generate(
    State(state): State<AppState>,
    Json(input): Json<GenerateSceneRequest>,
) -> AppResult<SnapshotResponse> {
    let aspect_ratio = match input.aspect_ratio.as_deref() {
        Some(raw) => raw.parse::<AspectRatio>()?,
        None => AspectRatio::default(),
    };
    let snapshot = state
        .studio
        .generate_scene(&input.prompt, input.character_ids, aspect_ratio)
        .await?;
    Ok(Json(DataResponse::new(snapshot)))
}

/// POST /api/v1/flows/scene/edit
///
/// Applies the edit to the current preview, keeping its prompt and cast.
pub async fn edit(
    State(state): State<AppState>,
    Json(input): Json<EditSceneRequest>,
) -> AppResult<SnapshotResponse> {
    let snapshot = state.studio.edit_scene(&input.prompt).await?;
    Ok(Json(DataResponse::new(snapshot)))
}

/// POST /api/v1/flows/scene/commit
pub async fn commit(
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<DataResponse<Scene>>)> {
    let scene = state.studio.commit_scene().await?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(scene))))
}

/// POST /api/v1/flows/scene/discard
pub async fn discard(State(state): State<AppState>) -> AppResult<SnapshotResponse> {
    let snapshot = state.studio.discard_scene().await?;
    Ok(Json(DataResponse::new(snapshot)))
}
