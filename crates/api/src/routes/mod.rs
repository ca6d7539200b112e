pub mod character;
pub mod flow;
pub mod health;
pub mod scene;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /characters                         list
/// /characters/{id}                    get, delete
/// /characters/{id}/export             download image
///
/// /scenes                             list
/// /scenes/{id}                        get, delete
/// /scenes/{id}/export                 download image
///
/// /flows/character                    snapshot
/// /flows/character/generate           generate preview (POST)
/// /flows/character/upload             upload preview (POST, multipart)
/// /flows/character/commit             save preview (POST)
/// /flows/character/discard            drop preview (POST)
///
/// /flows/scene                        snapshot
/// /flows/scene/generate               generate preview (POST)
/// /flows/scene/edit                   edit preview (POST)
/// /flows/scene/commit                 save preview (POST)
/// /flows/scene/discard                drop preview (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/characters", character::router())
        .nest("/scenes", scene::router())
        .nest("/flows", flow::router())
}
