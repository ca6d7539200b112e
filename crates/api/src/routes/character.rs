//! Route definitions for saved characters.

use axum::routing::get;
use axum::Router;

use crate::handlers::character;
use crate::state::AppState;

/// Routes mounted at `/characters`.
///
/// ```text
/// GET    /                 -> list
/// GET    /{id}             -> get_by_id
/// DELETE /{id}             -> delete
/// GET    /{id}/export      -> export
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(character::list))
        .route("/{id}", get(character::get_by_id).delete(character::delete))
        .route("/{id}/export", get(character::export))
}
