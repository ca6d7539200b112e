use cameo_core::error::CoreError;
use cameo_genai::GenerationError;
use cameo_store::StoreError;

use crate::flow::FlowKind;

/// Errors surfaced by [`crate::Studio`] actions.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// Precondition or lookup failure from the domain layer.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The generation call failed; the flow is back to idle.
    #[error(transparent)]
    Generation(#[from] GenerationError),

    /// Persisting the library failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The flow already has a generation call in flight.
    #[error("The {0} flow is already generating")]
    Busy(FlowKind),

    /// Commit or edit was requested with no preview to act on.
    #[error("The {0} flow has no preview")]
    NoPreview(FlowKind),

    /// The spawned generation task panicked.
    #[error("Generation task failed: {0}")]
    TaskFailed(String),
}
