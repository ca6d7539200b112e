//! Route definitions for the two creative flows.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{character_flow, scene_flow};
use crate::state::AppState;

/// Routes mounted at `/flows`.
///
/// ```text
/// GET    /character            -> character_flow::status
/// POST   /character/generate   -> character_flow::generate
/// POST   /character/upload     -> character_flow::upload
/// POST   /character/commit     -> character_flow::commit
/// POST   /character/discard    -> character_flow::discard
///
/// GET    /scene                -> scene_flow::status
/// POST   /scene/generate       -> scene_flow::generate
/// POST   /scene/edit           -> scene_flow::edit
/// POST   /scene/commit         -> scene_flow::commit
/// POST   /scene/discard        -> scene_flow::discard
/// ```
pub fn router() -> Router<AppState> {
    let character_routes = Router::new()
        .route("/", get(character_flow::status))
        .route("/generate", post(character_flow::generate))
        .route("/upload", post(character_flow::upload))
        .route("/commit", post(character_flow::commit))
        .route("/discard", post(character_flow::discard));

    let scene_routes = Router::new()
        .route("/", get(scene_flow::status))
        .route("/generate", post(scene_flow::generate))
        .route("/edit", post(scene_flow::edit))
        .route("/commit", post(scene_flow::commit))
        .route("/discard", post(scene_flow::discard));

    Router::new()
        .nest("/character", character_routes)
        .nest("/scene", scene_routes)
}
