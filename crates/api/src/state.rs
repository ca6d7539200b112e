use std::sync::Arc;

use cameo_pipeline::Studio;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; the studio and config are both behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Library and creative flows.
    pub studio: Studio,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
