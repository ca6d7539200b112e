//! Route definitions for saved scenes.

use axum::routing::get;
use axum::Router;

use crate::handlers::scene;
use crate::state::AppState;

/// Routes mounted at `/scenes`.
///
/// ```text
/// GET    /                 -> list
/// GET    /{id}             -> get_by_id
/// DELETE /{id}             -> delete
/// GET    /{id}/export      -> export
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(scene::list))
        .route("/{id}", get(scene::get_by_id).delete(scene::delete))
        .route("/{id}/export", get(scene::export))
}
